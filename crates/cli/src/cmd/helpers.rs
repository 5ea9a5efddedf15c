use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::client::MonitorClient;
use crate::config::{self, load_from_file, CliConfig};

pub fn default_config_path() -> PathBuf {
    if let Some(dir) = dirs::config_dir() {
        return dir.join("monitor").join("config.yml");
    }
    PathBuf::from("/etc/monitor/config.yml")
}

pub fn config_path(config_path: Option<&str>) -> PathBuf {
    config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path)
}

pub fn load_config(config_path: Option<&str>) -> Result<CliConfig> {
    let path = self::config_path(config_path);
    load_from_file(&path).with_context(|| format!("loading config from {}", path.display()))
}

/// Flags win over the file. With both `--server` and `--subscription` set,
/// the default config file is read only if it exists.
pub fn resolve_config(
    server: Option<&str>,
    subscription: Option<&str>,
    config_path: Option<&str>,
) -> Result<CliConfig> {
    let mut cfg = match (server, subscription) {
        (Some(endpoint), Some(sub))
            if config_path.is_none() && !default_config_path().exists() =>
        {
            CliConfig::from_flags(endpoint, sub)
        }
        _ => load_config(config_path)?,
    };

    if let Some(endpoint) = server {
        cfg.endpoint = endpoint.to_string();
    }
    if let Some(sub) = subscription {
        cfg.subscription_id = sub.to_string();
    }
    config::validate(&cfg).context("invalid settings")?;
    tracing::debug!(endpoint = %cfg.endpoint, subscription = %cfg.subscription_id, "settings resolved");
    Ok(cfg)
}

pub fn build_client(
    server: Option<&str>,
    subscription: Option<&str>,
    config_path: Option<&str>,
) -> Result<MonitorClient> {
    let cfg = resolve_config(server, subscription, config_path)?;
    Ok(MonitorClient::new(&cfg)?)
}

/// `KEY[=VALUE]` pairs; a bare key maps to an empty value.
pub fn parse_tags(pairs: &[String]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .filter(|p| !p.is_empty())
        .map(|p| match p.split_once('=') {
            Some((k, v)) => (k.to_string(), v.to_string()),
            None => (p.clone(), String::new()),
        })
        .collect()
}
