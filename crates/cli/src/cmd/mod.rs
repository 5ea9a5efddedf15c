mod alert;
mod config;
mod group;
pub(crate) mod helpers;
mod version;

use anyhow::Result;
use clap::Subcommand;
use monitor_common::{AlertRuleResource, ResourceGroup};
use serde::Serialize;
use std::path::PathBuf;

use crate::client::MonitorClient;
use crate::config::CliConfig;
use crate::output::{print_json, print_success, theme, OutputMode};

pub use alert::AlertCmd;
pub use config::ConfigCmd;
pub use group::GroupCmd;

#[derive(Subcommand)]
pub enum Commands {
    /// Manage classic metric alert rules
    #[command(subcommand)]
    Alert(AlertCmd),
    /// Manage resource groups
    #[command(subcommand)]
    Group(GroupCmd),
    /// Inspect the CLI configuration
    #[command(subcommand)]
    Config(ConfigCmd),
    Version,
}

/// Flags shared by every command.
pub struct Globals {
    pub mode: OutputMode,
    pub server: Option<String>,
    pub subscription: Option<String>,
    pub config: Option<String>,
}

impl Globals {
    pub fn client(&self) -> Result<MonitorClient> {
        helpers::build_client(
            self.server.as_deref(),
            self.subscription.as_deref(),
            self.config.as_deref(),
        )
    }
}

/// What a command produced; rendering is separate so callers can inspect it.
#[derive(Debug)]
pub enum CommandOutput {
    Rule(AlertRuleResource),
    Rules(Vec<AlertRuleResource>),
    Group(ResourceGroup),
    Deleted {
        kind: &'static str,
        name: String,
        existed: bool,
    },
    Cancelled,
    Config(CliConfig),
    Validation {
        path: PathBuf,
        error: Option<String>,
    },
    Path(PathBuf),
    Version(version::VersionInfo),
}

#[derive(Serialize)]
struct DeletedJson<'a> {
    deleted: bool,
    kind: &'a str,
    name: &'a str,
}

impl CommandOutput {
    pub fn rule(&self) -> Option<&AlertRuleResource> {
        match self {
            Self::Rule(rule) => Some(rule),
            _ => None,
        }
    }

    pub fn rules(&self) -> Option<&[AlertRuleResource]> {
        match self {
            Self::Rules(rules) => Some(rules),
            _ => None,
        }
    }

    pub fn render(&self, mode: OutputMode) -> Result<()> {
        match self {
            Self::Rule(rule) => alert::render_rule(rule, mode),
            Self::Rules(rules) => alert::render_rules(rules, mode),
            Self::Group(group) => group::render_group(group, mode),
            Self::Deleted {
                kind,
                name,
                existed,
            } => match mode {
                OutputMode::Json => print_json(&DeletedJson {
                    deleted: *existed,
                    kind,
                    name,
                }),
                OutputMode::Human => {
                    if *existed {
                        print_success(&format!("{kind} '{name}' deleted"));
                    } else {
                        theme::print_dim(&format!("{kind} '{name}' did not exist"));
                    }
                    Ok(())
                }
            },
            Self::Cancelled => {
                theme::print_dim("Cancelled.");
                Ok(())
            }
            Self::Config(cfg) => config::render_config(cfg, mode),
            Self::Validation { path, error } => config::render_validation(path, error.as_deref(), mode),
            Self::Path(path) => {
                println!("{}", path.display());
                Ok(())
            }
            Self::Version(info) => version::render(info, mode),
        }
    }
}

pub async fn dispatch(opts: crate::Opts) -> Result<CommandOutput> {
    let globals = Globals {
        mode: opts.output_mode(),
        server: opts.server,
        subscription: opts.subscription,
        config: opts.config,
    };

    match opts.cmd {
        Commands::Alert(cmd) => alert::execute(cmd, &globals).await,
        Commands::Group(cmd) => group::execute(cmd, &globals).await,
        Commands::Config(cmd) => config::execute(cmd, &globals),
        Commands::Version => Ok(version::execute()),
    }
}

pub async fn run(opts: crate::Opts) -> Result<()> {
    let mode = opts.output_mode();
    dispatch(opts).await?.render(mode)
}
