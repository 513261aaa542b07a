mod app;
mod cli;
mod commands;
mod observability;
mod output;

use anyhow::Result;
use clap::Parser;
use mybank_client::models::PageRequest;

use app::App;
use cli::{Cli, Commands, ConfigCommands, RoundUpCommands};
use output::print_error;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = app::load(&cli)?;
    observability::init_tracing_with_level(&config.logging.level);
    let format = cli.format.unwrap_or_default();

    let app = App::new(&config)?;
    match &cli.command {
        Commands::Login(args) => commands::auth::login(&app, args).await?,
        Commands::Register(args) => commands::auth::register(&app, args).await?,
        Commands::SocialLogin(args) => commands::auth::social_login(&app, &args.code).await?,
        Commands::AuthorizeUrl(args) => commands::auth::authorize_url(&app, &args.redirect_uri)?,
        Commands::Logout => commands::auth::logout(&app).await?,
        Commands::Whoami => commands::auth::whoami(&app, format).await?,
        Commands::Assets(args) => commands::assets::summary(&app, args.sync, format).await?,
        Commands::Spending(args) => commands::spending::spending(&app, args.days, format).await?,
        Commands::Payments(args) => {
            let page = PageRequest {
                page: args.page,
                size: args.size,
            };
            commands::payments::history(&app, page, format).await?;
        }
        Commands::Payment(args) => commands::payments::show(&app, &args.id, format).await?,
        Commands::Transfer(args) => commands::payments::transfer(&app, args, format).await?,
        Commands::Invest => commands::invest::summary(&app, format).await?,
        Commands::Roundup(args) => match &args.command {
            RoundUpCommands::Enable(account) => {
                commands::invest::round_up(&app, &account.account, true).await?;
            }
            RoundUpCommands::Disable(account) => {
                commands::invest::round_up(&app, &account.account, false).await?;
            }
        },
        Commands::Config(args) => match &args.command {
            ConfigCommands::Show => commands::config::show(&config, format)?,
        },
    }

    Ok(())
}
