use std::net::SocketAddr;

pub const DEFAULT_LOCATION: &str = "global";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub rest_addr: SocketAddr,
    pub api_token: Option<String>,
    pub default_location: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            rest_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            api_token: None,
            default_location: DEFAULT_LOCATION.to_string(),
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `MONITOR_SERVER_ADDR`, `MONITOR_API_TOKEN` and
    /// `MONITOR_DEFAULT_LOCATION`.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let mut cfg = Self::default();

        if let Some(addr) = lookup("MONITOR_SERVER_ADDR") {
            cfg.rest_addr = addr
                .parse()
                .map_err(|e| format!("MONITOR_SERVER_ADDR '{addr}': {e}"))?;
        }
        if let Some(token) = lookup("MONITOR_API_TOKEN").filter(|t| !t.is_empty()) {
            cfg.api_token = Some(token);
        }
        if let Some(location) = lookup("MONITOR_DEFAULT_LOCATION").filter(|l| !l.is_empty()) {
            cfg.default_location = location;
        }

        Ok(cfg)
    }
}
