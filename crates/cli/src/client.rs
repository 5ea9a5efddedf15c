//! Thin typed client for the alert-rule resource API.

use monitor_common::model::ResourceList;
use monitor_common::resource_id::{ALERT_RULES_TYPE, INSIGHTS_NAMESPACE};
use monitor_common::{AlertRuleResource, ResourceGroup};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::config::CliConfig;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid endpoint '{0}'")]
    InvalidEndpoint(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{code}: {message} (HTTP {status})")]
    Api {
        status: u16,
        code: String,
        message: String,
    },
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

#[derive(Serialize)]
struct GroupBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<&'a str>,
    tags: &'a BTreeMap<String, String>,
}

pub struct MonitorClient {
    http: reqwest::Client,
    endpoint: Url,
    subscription: String,
    api_version: String,
    token: Option<String>,
}

impl MonitorClient {
    pub fn new(cfg: &CliConfig) -> Result<Self, ClientError> {
        let endpoint = Url::parse(&cfg.endpoint)
            .map_err(|e| ClientError::InvalidEndpoint(format!("{}: {e}", cfg.endpoint)))?;
        if endpoint.cannot_be_a_base() {
            return Err(ClientError::InvalidEndpoint(cfg.endpoint.clone()));
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            endpoint,
            subscription: cfg.subscription_id.clone(),
            api_version: cfg.api_version.clone(),
            token: cfg.access_token.clone(),
        })
    }

    pub fn subscription(&self) -> &str {
        &self.subscription
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.endpoint.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.query_pairs_mut()
            .append_pair("api-version", &self.api_version);
        url
    }

    fn group_url(&self, resource_group: &str) -> Url {
        self.url(&["subscriptions", &self.subscription, "resourceGroups", resource_group])
    }

    fn rules_url(&self, resource_group: &str, name: Option<&str>) -> Url {
        let mut segments = vec![
            "subscriptions",
            self.subscription.as_str(),
            "resourceGroups",
            resource_group,
            "providers",
            INSIGHTS_NAMESPACE,
            ALERT_RULES_TYPE,
        ];
        segments.extend(name);
        self.url(&segments)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let req = self.http.request(method, url);
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, ClientError> {
        let req = req.build()?;
        let method = req.method().clone();
        let url = req.url().to_string();

        let resp = self.http.execute(req).await?;
        let status = resp.status();
        tracing::debug!(%method, %url, status = status.as_u16(), "api call");

        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let (code, message) = match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(env) => (env.error.code, env.error.message),
            Err(_) => (
                status.canonical_reason().unwrap_or("HttpError").replace(' ', ""),
                body,
            ),
        };
        Err(ClientError::Api {
            status: status.as_u16(),
            code,
            message,
        })
    }

    pub async fn put_group(
        &self,
        resource_group: &str,
        location: Option<&str>,
        tags: &BTreeMap<String, String>,
    ) -> Result<ResourceGroup, ClientError> {
        let req = self
            .request(Method::PUT, self.group_url(resource_group))
            .json(&GroupBody { location, tags });
        Ok(self.send(req).await?.json().await?)
    }

    pub async fn get_group(&self, resource_group: &str) -> Result<ResourceGroup, ClientError> {
        let req = self.request(Method::GET, self.group_url(resource_group));
        Ok(self.send(req).await?.json().await?)
    }

    /// Returns `false` when the group did not exist.
    pub async fn delete_group(&self, resource_group: &str) -> Result<bool, ClientError> {
        let req = self.request(Method::DELETE, self.group_url(resource_group));
        let resp = self.send(req).await?;
        Ok(resp.status() != StatusCode::NO_CONTENT)
    }

    pub async fn list_rules(
        &self,
        resource_group: &str,
    ) -> Result<Vec<AlertRuleResource>, ClientError> {
        let req = self.request(Method::GET, self.rules_url(resource_group, None));
        let list: ResourceList<AlertRuleResource> = self.send(req).await?.json().await?;
        Ok(list.value)
    }

    pub async fn get_rule(
        &self,
        resource_group: &str,
        name: &str,
    ) -> Result<AlertRuleResource, ClientError> {
        let req = self.request(Method::GET, self.rules_url(resource_group, Some(name)));
        Ok(self.send(req).await?.json().await?)
    }

    pub async fn put_rule(
        &self,
        resource_group: &str,
        name: &str,
        rule: &AlertRuleResource,
    ) -> Result<AlertRuleResource, ClientError> {
        let req = self
            .request(Method::PUT, self.rules_url(resource_group, Some(name)))
            .json(rule);
        Ok(self.send(req).await?.json().await?)
    }

    /// Returns `false` when the rule did not exist.
    pub async fn delete_rule(&self, resource_group: &str, name: &str) -> Result<bool, ClientError> {
        let req = self.request(Method::DELETE, self.rules_url(resource_group, Some(name)));
        let resp = self.send(req).await?;
        Ok(resp.status() != StatusCode::NO_CONTENT)
    }
}
