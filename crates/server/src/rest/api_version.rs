use serde::Deserialize;

use super::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ApiVersion {
    #[serde(rename = "api-version")]
    api_version: Option<String>,
}

impl ApiVersion {
    pub fn require(&self) -> Result<&str, ApiError> {
        self.api_version
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(ApiError::missing_api_version)
    }
}
