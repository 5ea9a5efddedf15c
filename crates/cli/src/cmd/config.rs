use anyhow::Result;
use clap::Subcommand;
use serde_json::json;
use std::path::Path;

use super::{helpers, CommandOutput, Globals};
use crate::config::CliConfig;
use crate::output::{print_error, print_json, print_success, theme, OutputMode};

#[derive(Subcommand)]
pub enum ConfigCmd {
    /// Print the effective settings (flags applied over the file)
    Show,
    /// Check the config file without contacting the server
    Validate,
    /// Print the config file location
    Path,
}

pub fn execute(cmd: ConfigCmd, globals: &Globals) -> Result<CommandOutput> {
    match cmd {
        ConfigCmd::Show => {
            let cfg = helpers::resolve_config(
                globals.server.as_deref(),
                globals.subscription.as_deref(),
                globals.config.as_deref(),
            )?;
            Ok(CommandOutput::Config(cfg))
        }
        ConfigCmd::Validate => {
            let path = helpers::config_path(globals.config.as_deref());
            let error = helpers::load_config(globals.config.as_deref())
                .err()
                .map(|e| format!("{e:#}"));
            Ok(CommandOutput::Validation { path, error })
        }
        ConfigCmd::Path => Ok(CommandOutput::Path(helpers::config_path(
            globals.config.as_deref(),
        ))),
    }
}

fn masked(cfg: &CliConfig) -> CliConfig {
    CliConfig {
        access_token: cfg.access_token.as_ref().map(|_| "********".to_string()),
        ..cfg.clone()
    }
}

pub fn render_config(cfg: &CliConfig, mode: OutputMode) -> Result<()> {
    let cfg = masked(cfg);
    match mode {
        OutputMode::Json => print_json(&cfg)?,
        OutputMode::Human => {
            theme::print_header("CLI Configuration");

            theme::print_section("Endpoint");
            theme::print_kv("URL", &cfg.endpoint);
            theme::print_kv("API version", &cfg.api_version);
            theme::print_kv("Timeout", &format!("{}s", cfg.timeout_seconds));

            theme::print_section("Identity");
            theme::print_kv("Subscription", &cfg.subscription_id);
            theme::print_kv_colored(
                "Access token",
                cfg.access_token.as_deref().unwrap_or("<not set>"),
                cfg.access_token.is_some(),
            );
            println!();
        }
    }
    Ok(())
}

pub fn render_validation(path: &Path, error: Option<&str>, mode: OutputMode) -> Result<()> {
    match (mode, error) {
        (OutputMode::Json, None) => print_json(&json!({"valid": true, "path": path}))?,
        (OutputMode::Json, Some(e)) => {
            print_json(&json!({"valid": false, "path": path, "error": e}))?
        }
        (OutputMode::Human, None) => print_success("Configuration is valid"),
        (OutputMode::Human, Some(e)) => print_error(&format!("Invalid configuration: {e}")),
    }
    Ok(())
}
