use anyhow::Result;
use colored::Colorize;
use mybank_client::ApiError;
use mybank_client::format::{format_currency, format_date_time};
use mybank_client::models::{PageRequest, Payment, PaymentStatus, TransferRequest};
use mybank_client::validation::validate_transfer;

use crate::app::{App, data, friendly};
use crate::cli::{OutputFormat, TransferArgs};
use crate::output::{print_field, print_json, print_success, print_table};

pub async fn history(app: &App, page: PageRequest, format: OutputFormat) -> Result<()> {
    app.require_user().await?;
    let history = data(app.client().payments().history(page).await)?;

    match format {
        OutputFormat::Json => print_json(&history)?,
        OutputFormat::Table => {
            let rows = history.payments.iter().map(payment_row).collect();
            print_table(
                ["ID", "Recipient", "Amount", "Status", "Date"],
                rows,
                "No payments found.",
            );
            println!(
                "Page {} of {} ({} payments)",
                page.page + 1,
                history.total_pages.max(1),
                history.total_elements
            );
        }
    }
    Ok(())
}

pub async fn show(app: &App, payment_id: &str, format: OutputFormat) -> Result<()> {
    app.require_user().await?;
    let payment = data(app.client().payments().payment(payment_id).await)?;
    print_payment(&payment, format)
}

pub async fn transfer(app: &App, args: &TransferArgs, format: OutputFormat) -> Result<()> {
    let request = TransferRequest {
        from_account_id: args.from.trim().to_string(),
        to_account_id: args.to.trim().to_string(),
        recipient_name: args.recipient.trim().to_string(),
        amount: args.amount,
        description: args
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string),
    };
    validate_transfer(&request).map_err(|e| friendly(ApiError::from(e)))?;

    app.require_user().await?;
    let payment = data(app.client().payments().transfer(&request).await)?;

    if payment.status == PaymentStatus::Completed {
        print_success(&format!(
            "Sent {} to {}",
            format_currency(payment.amount),
            payment.recipient_name.cyan()
        ));
    }
    print_payment(&payment, format)
}

fn print_payment(payment: &Payment, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(payment)?,
        OutputFormat::Table => {
            print_field("Payment", &payment.payment_id);
            print_field("Recipient", &payment.recipient_name);
            print_field("Amount", format_currency(payment.amount));
            print_field("Status", status_label(payment.status));
            print_field("Date", format_date_time(&payment.created_at));
            if let Some(message) = &payment.message {
                print_field("Message", message);
            }
        }
    }
    Ok(())
}

fn payment_row(payment: &Payment) -> [String; 5] {
    [
        payment.payment_id.clone(),
        payment.recipient_name.clone(),
        format_currency(payment.amount),
        payment.status.as_str().to_string(),
        format_date_time(&payment.created_at),
    ]
}

fn status_label(status: PaymentStatus) -> colored::ColoredString {
    match status {
        PaymentStatus::Completed => status.as_str().green(),
        PaymentStatus::Pending => status.as_str().yellow(),
        PaymentStatus::Failed | PaymentStatus::Cancelled => status.as_str().red(),
    }
}
