use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "mybank")]
#[command(about = "MyBank CLI: assets, spending, payments and round-up investing")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API base URL (overrides config and MYBANK_URL env var)
    #[arg(short, long, global = true, env = "MYBANK_URL")]
    pub server: Option<String>,

    /// Config file path (defaults to ./mybank.toml when present)
    #[arg(short, long, global = true, env = "MYBANK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Credentials profile name
    #[arg(short, long, global = true, env = "MYBANK_PROFILE")]
    pub profile: Option<String>,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in with email and password
    Login(LoginArgs),
    /// Create an account and log in
    Register(RegisterArgs),
    /// Complete a social login with the provider's authorization code
    SocialLogin(SocialLoginArgs),
    /// Print the social login page URL
    AuthorizeUrl(AuthorizeUrlArgs),
    /// Log out and remove stored tokens
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Show linked accounts and balances
    Assets(AssetsArgs),
    /// Show spending by category
    Spending(SpendingArgs),
    /// List payment history
    Payments(PaymentsArgs),
    /// Show a single payment
    Payment(PaymentArgs),
    /// Send money to another account
    Transfer(TransferArgs),
    /// Show investment summary
    Invest,
    /// Turn round-up investing on or off for an account
    Roundup(RoundUpArgs),
    /// Inspect CLI configuration
    Config(ConfigArgs),
}

#[derive(clap::Args)]
pub struct LoginArgs {
    /// Account email
    #[arg(short, long)]
    pub email: String,
    /// Password
    #[arg(long, env = "MYBANK_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(clap::Args)]
pub struct RegisterArgs {
    /// Display name
    #[arg(long)]
    pub name: String,
    /// Account email
    #[arg(short, long)]
    pub email: String,
    /// Phone number, digits only (10-11)
    #[arg(long)]
    pub phone: String,
    /// Password
    #[arg(long, env = "MYBANK_PASSWORD", hide_env_values = true)]
    pub password: String,
    /// Password confirmation (defaults to --password)
    #[arg(long)]
    pub confirm_password: Option<String>,
}

#[derive(clap::Args)]
pub struct SocialLoginArgs {
    /// Authorization code from the provider redirect
    #[arg(long)]
    pub code: String,
}

#[derive(clap::Args)]
pub struct AuthorizeUrlArgs {
    /// Redirect URI registered with the provider
    #[arg(long, default_value = "http://localhost:3000/auth/kakao/callback")]
    pub redirect_uri: String,
}

#[derive(clap::Args)]
pub struct AssetsArgs {
    /// Pull fresh balances from every institution first
    #[arg(long)]
    pub sync: bool,
}

#[derive(clap::Args)]
pub struct SpendingArgs {
    /// Lookback window in days
    #[arg(short, long, default_value_t = 30)]
    pub days: u32,
}

#[derive(clap::Args)]
pub struct PaymentsArgs {
    /// Zero-based page number
    #[arg(long, default_value_t = 0)]
    pub page: u32,
    /// Page size
    #[arg(long, default_value_t = 10)]
    pub size: u32,
}

#[derive(clap::Args)]
pub struct PaymentArgs {
    /// Payment ID
    pub id: String,
}

#[derive(clap::Args)]
pub struct TransferArgs {
    /// Source account ID
    #[arg(long)]
    pub from: String,
    /// Destination account number
    #[arg(long)]
    pub to: String,
    /// Recipient name
    #[arg(long)]
    pub recipient: String,
    /// Amount in KRW
    #[arg(long)]
    pub amount: f64,
    /// Memo shown to the recipient
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(clap::Args)]
pub struct RoundUpArgs {
    #[command(subcommand)]
    pub command: RoundUpCommands,
}

#[derive(Subcommand)]
pub enum RoundUpCommands {
    /// Start rounding up payments from an account
    Enable(RoundUpAccount),
    /// Stop rounding up payments from an account
    Disable(RoundUpAccount),
}

#[derive(clap::Args)]
pub struct RoundUpAccount {
    /// Account ID
    pub account: String,
}

#[derive(clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show effective config
    Show,
}
