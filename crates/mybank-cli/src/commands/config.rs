use anyhow::Result;
use mybank_client::ClientConfig;

use crate::app::token_store;
use crate::cli::OutputFormat;
use crate::output::{print_field, print_json};

pub fn show(config: &ClientConfig, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(config)?,
        OutputFormat::Table => {
            print_field("Server", &config.api.base_url);
            print_field("Timeout", format!("{} ms", config.api.request_timeout_ms));
            print_field("Profile", &config.storage.profile);
            match token_store(config) {
                Ok(store) => print_field("Tokens", store.path().display()),
                Err(e) => print_field("Tokens", format!("(unavailable: {e})")),
            }
            let client_id = if config.oauth.client_id.is_empty() {
                "(not set)"
            } else {
                config.oauth.client_id.as_str()
            };
            print_field("OAuth client", client_id);
            print_field("Log level", &config.logging.level);
        }
    }
    Ok(())
}
