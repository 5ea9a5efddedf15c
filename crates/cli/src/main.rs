use clap::Parser;
use monitor_cli::output::print_error;
use monitor_cli::{cmd, init_tracing, Opts};
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let opts = Opts::parse();
    init_tracing(opts.verbose);

    match cmd::run(opts).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
