use anyhow::Result;
use mybank_client::format::{format_currency, share_percent};
use mybank_client::models::SpendingAnalysis;

use crate::app::{App, data};
use crate::cli::OutputFormat;
use crate::output::{print_field, print_json, print_table, print_warning};

pub async fn spending(app: &App, days: u32, format: OutputFormat) -> Result<()> {
    app.require_user().await?;
    let analysis = data(app.client().analytics().spending(Some(days)).await)?;

    match format {
        OutputFormat::Json => print_json(&analysis)?,
        OutputFormat::Table => print_analysis(&analysis),
    }
    Ok(())
}

fn print_analysis(analysis: &SpendingAnalysis) {
    print_field("Period", &analysis.period);
    print_field("Total spending", format_currency(analysis.total_spending));
    println!();

    let rows = analysis
        .category_breakdown
        .iter()
        .map(|c| {
            [
                c.category.clone(),
                format_currency(c.amount),
                c.transaction_count.to_string(),
                format_currency(c.average_amount),
                format!("{}%", share_percent(c.amount, analysis.total_spending)),
            ]
        })
        .collect();
    print_table(
        ["Category", "Amount", "Transactions", "Average", "Share"],
        rows,
        "No spending in this period.",
    );

    if !analysis.breakdown_matches_total() {
        print_warning("Category amounts do not add up to the total.");
    }
}
