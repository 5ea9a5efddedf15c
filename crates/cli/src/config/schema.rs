use serde::{Deserialize, Serialize};

pub const DEFAULT_API_VERSION: &str = "2016-03-01";

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CliConfig {
    pub endpoint: String,
    pub subscription_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl CliConfig {
    /// Config assembled from flags alone, with every optional field defaulted.
    pub fn from_flags(endpoint: &str, subscription_id: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            subscription_id: subscription_id.to_string(),
            access_token: None,
            api_version: default_api_version(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}
