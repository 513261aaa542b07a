use anyhow::Result;
use mybank_client::format::{format_currency, format_date};
use mybank_client::models::InvestmentSummary;

use crate::app::{App, data};
use crate::cli::OutputFormat;
use crate::output::{print_field, print_json, print_success, print_table};

pub async fn summary(app: &App, format: OutputFormat) -> Result<()> {
    app.require_user().await?;
    let summary = data(app.client().investments().summary().await)?;
    match format {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Table => print_summary(&summary),
    }
    Ok(())
}

pub async fn round_up(app: &App, account_id: &str, enable: bool) -> Result<()> {
    app.require_user().await?;
    let investments = app.client().investments();
    if enable {
        data(investments.enable_round_up(account_id).await)?;
        print_success(&format!("Round-up investing enabled for {account_id}"));
    } else {
        data(investments.disable_round_up(account_id).await)?;
        print_success(&format!("Round-up investing disabled for {account_id}"));
    }
    Ok(())
}

fn print_summary(summary: &InvestmentSummary) {
    print_field("Total invested", format_currency(summary.total_invested));
    print_field("Rounded up", format_currency(summary.total_rounded_up));
    print_field("Round-up transactions", summary.total_round_up_transactions);
    println!();

    let rows = summary
        .recent_investments
        .iter()
        .map(|i| {
            [
                i.product_name.clone(),
                i.investment_type.label().to_string(),
                format_currency(i.amount),
                format_date(&i.invested_at),
            ]
        })
        .collect();
    print_table(
        ["Product", "Type", "Amount", "Date"],
        rows,
        "No investments yet.",
    );
}
