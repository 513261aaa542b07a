use anyhow::Result;
use mybank_client::format::{format_currency, share_percent};
use mybank_client::models::AssetSummary;

use crate::app::{App, data};
use crate::cli::OutputFormat;
use crate::output::{print_field, print_json, print_success, print_table};

pub async fn summary(app: &App, sync: bool, format: OutputFormat) -> Result<()> {
    app.require_user().await?;
    let assets = app.client().assets();

    if sync {
        data(assets.sync().await)?;
        print_success("Accounts synchronized");
    }

    let summary = data(assets.summary().await)?;
    match format {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Table => print_summary(&summary),
    }
    Ok(())
}

fn print_summary(summary: &AssetSummary) {
    print_field("Total balance", format_currency(summary.total_balance));
    println!();

    let rows = summary
        .assets
        .iter()
        .map(|a| {
            [
                a.institution_name.clone(),
                a.account_name.clone(),
                a.asset_type.label().to_string(),
                format_currency(a.balance),
            ]
        })
        .collect();
    print_table(
        ["Institution", "Account", "Type", "Balance"],
        rows,
        "No linked accounts.",
    );

    let rows = summary
        .category_breakdown
        .iter()
        .map(|c| {
            [
                c.asset_type.label().to_string(),
                c.count.to_string(),
                format_currency(c.total_value),
                format!("{}%", share_percent(c.total_value, summary.total_balance)),
            ]
        })
        .collect();
    print_table(["Type", "Accounts", "Value", "Share"], rows, "");
}
