pub mod client;
pub mod cmd;
pub mod config;
pub mod output;

use clap::Parser;
use cmd::Commands;
use output::OutputMode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "monitor", version, about = "Manage metric alert rules")]
pub struct Opts {
    #[clap(subcommand)]
    pub cmd: Commands,

    #[arg(long, global = true, help = "Output as JSON")]
    pub json: bool,

    #[arg(long, global = true, env = "MONITOR_SERVER", help = "API endpoint (overrides config)")]
    pub server: Option<String>,

    #[arg(
        long,
        global = true,
        env = "MONITOR_SUBSCRIPTION",
        help = "Subscription id (overrides config)"
    )]
    pub subscription: Option<String>,

    #[arg(long, global = true, help = "Path to CLI config file")]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Log requests to stderr")]
    pub verbose: bool,
}

impl Opts {
    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }
}

/// Logs go to stderr so `--json` output stays parseable.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("monitor_cli=debug,monitor_common=debug,warn")
    } else {
        EnvFilter::try_from_env("MONITOR_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
