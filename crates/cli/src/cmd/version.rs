use anyhow::Result;
use serde::Serialize;

use super::CommandOutput;
use crate::config::DEFAULT_API_VERSION;
use crate::output::{banner, print_json, OutputMode};

#[derive(Debug, Serialize)]
pub struct VersionInfo {
    name: &'static str,
    version: &'static str,
    api_version: &'static str,
    arch: &'static str,
    os: &'static str,
}

pub fn execute() -> CommandOutput {
    CommandOutput::Version(VersionInfo {
        name: "monitor",
        version: env!("CARGO_PKG_VERSION"),
        api_version: DEFAULT_API_VERSION,
        arch: std::env::consts::ARCH,
        os: std::env::consts::OS,
    })
}

pub fn render(info: &VersionInfo, mode: OutputMode) -> Result<()> {
    match mode {
        OutputMode::Json => print_json(info),
        OutputMode::Human => {
            banner::print_version_block(info.version, info.api_version);
            Ok(())
        }
    }
}
