use anyhow::Result;
use colored::Colorize;
use mybank_client::models::{LoginRequest, RegistrationForm, User};

use crate::app::{App, friendly};
use crate::cli::{LoginArgs, OutputFormat, RegisterArgs};
use crate::output::{print_field, print_json, print_success};

pub async fn login(app: &App, args: &LoginArgs) -> Result<()> {
    let request = LoginRequest {
        email: args.email.trim().to_string(),
        password: args.password.clone(),
    };
    let user = app.auth().login(&request).await.map_err(friendly)?;
    print_success(&format!(
        "Logged in as {} ({})",
        user.name.cyan(),
        user.email
    ));
    Ok(())
}

pub async fn register(app: &App, args: &RegisterArgs) -> Result<()> {
    let form = RegistrationForm {
        name: args.name.clone(),
        email: args.email.clone(),
        phone_number: args.phone.clone(),
        password: args.password.clone(),
        confirm_password: args
            .confirm_password
            .clone()
            .unwrap_or_else(|| args.password.clone()),
    };
    let user = app.auth().register(&form).await.map_err(friendly)?;
    print_success(&format!("Welcome, {}! Your account is ready.", user.name.cyan()));
    Ok(())
}

pub async fn social_login(app: &App, code: &str) -> Result<()> {
    let user = app.auth().social_login(code).await.map_err(friendly)?;
    print_success(&format!("Logged in as {} via Kakao", user.name.cyan()));
    Ok(())
}

pub fn authorize_url(app: &App, redirect_uri: &str) -> Result<()> {
    let url = app.auth().authorize_url(redirect_uri).map_err(friendly)?;
    println!("{url}");
    Ok(())
}

pub async fn logout(app: &App) -> Result<()> {
    match app.auth().session().persisted_tokens().await {
        Ok(Some(tokens)) => app
            .client()
            .set_auth(tokens.access_token, tokens.refresh_token),
        Ok(None) => {}
        Err(e) => tracing::warn!(error = %e, "Could not read stored tokens"),
    }
    app.auth().logout().await;
    print_success("Logged out");
    Ok(())
}

pub async fn whoami(app: &App, format: OutputFormat) -> Result<()> {
    let user = app.require_user().await?;
    match format {
        OutputFormat::Json => print_json(&user)?,
        OutputFormat::Table => print_user(app, &user),
    }
    Ok(())
}

fn print_user(app: &App, user: &User) {
    print_field("Name", &user.name);
    print_field("Email", &user.email);
    if let Some(phone) = &user.phone_number {
        print_field("Phone", phone);
    }
    print_field("Server", app.client().base_url());
    print_field("Tokens", app.store().path().display());
}
