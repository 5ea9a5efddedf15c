use std::path::Path;
use super::schema::CliConfig;

#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Parse(serde_yaml::Error),
    Validation(String),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Parse(e) => write!(f, "parse: {e}"),
            Self::Validation(msg) => write!(f, "validation: {msg}"),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_yaml::Error> for LoadError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Parse(e)
    }
}

pub fn load_from_file(path: &Path) -> Result<CliConfig, LoadError> {
    let contents = std::fs::read_to_string(path)?;
    load_from_str(&contents)
}

pub fn load_from_str(yaml: &str) -> Result<CliConfig, LoadError> {
    let cfg: CliConfig = serde_yaml::from_str(yaml)?;
    validate(&cfg)?;
    Ok(cfg)
}

pub fn validate(cfg: &CliConfig) -> Result<(), LoadError> {
    if cfg.endpoint.trim().is_empty() {
        return Err(LoadError::Validation("endpoint must not be empty".into()));
    }
    if !cfg.endpoint.starts_with("http://") && !cfg.endpoint.starts_with("https://") {
        return Err(LoadError::Validation(format!(
            "endpoint '{}' must be an http(s) URL",
            cfg.endpoint
        )));
    }
    if cfg.subscription_id.trim().is_empty() {
        return Err(LoadError::Validation("subscription_id must not be empty".into()));
    }
    if cfg.api_version.trim().is_empty() {
        return Err(LoadError::Validation("api_version must not be empty".into()));
    }
    if cfg.timeout_seconds == 0 {
        return Err(LoadError::Validation("timeout_seconds must be > 0".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_config_with_defaults() {
        let yaml = r#"
endpoint: http://localhost:8080
subscription_id: 00000000-0000-0000-0000-000000000000
"#;
        let cfg = load_from_str(yaml).unwrap();
        assert_eq!(cfg.endpoint, "http://localhost:8080");
        assert_eq!(cfg.api_version, "2016-03-01");
        assert_eq!(cfg.timeout_seconds, 30);
        assert!(cfg.access_token.is_none());
    }

    #[test]
    fn explicit_fields_override_defaults() {
        let yaml = r#"
endpoint: https://management.example.com
subscription_id: sub
access_token: abc
api_version: "2018-01-01"
timeout_seconds: 5
"#;
        let cfg = load_from_str(yaml).unwrap();
        assert_eq!(cfg.access_token.as_deref(), Some("abc"));
        assert_eq!(cfg.api_version, "2018-01-01");
        assert_eq!(cfg.timeout_seconds, 5);
    }

    #[test]
    fn empty_endpoint_rejected() {
        let err = load_from_str("endpoint: \"\"\nsubscription_id: s\n").unwrap_err();
        assert!(err.to_string().contains("endpoint"));
    }

    #[test]
    fn non_http_endpoint_rejected() {
        let err = load_from_str("endpoint: grpc://x\nsubscription_id: s\n").unwrap_err();
        assert!(matches!(err, LoadError::Validation(_)));
    }

    #[test]
    fn zero_timeout_rejected() {
        let err =
            load_from_str("endpoint: http://x\nsubscription_id: s\ntimeout_seconds: 0\n").unwrap_err();
        assert!(err.to_string().contains("timeout_seconds"));
    }

    #[test]
    fn missing_subscription_is_parse_error() {
        let err = load_from_str("endpoint: http://x\n").unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn load_from_file_works() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "endpoint: http://h:1\nsubscription_id: s\n").unwrap();
        let cfg = load_from_file(&path).unwrap();
        assert_eq!(cfg.subscription_id, "s");
    }
}
