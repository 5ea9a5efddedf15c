use axum::middleware::from_fn_with_state;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;

use super::{alert_rules, health, metrics, resource_groups};
use crate::config::ServerConfig;
use crate::metrics::ServerMetrics;
use crate::middleware::{auth_middleware, track_requests};
use crate::store::{GroupStore, RuleStore};

const GROUP_PATH: &str = "/subscriptions/{subscription_id}/resourceGroups/{resource_group}";
const RULES_PATH: &str = "/subscriptions/{subscription_id}/resourceGroups/{resource_group}/providers/microsoft.insights/alertrules";
const RULE_PATH: &str = "/subscriptions/{subscription_id}/resourceGroups/{resource_group}/providers/microsoft.insights/alertrules/{rule_name}";

#[derive(Clone)]
pub struct AppState {
    pub rules: RuleStore,
    pub groups: GroupStore,
    pub metrics: Arc<ServerMetrics>,
    pub api_token: Option<String>,
    pub default_location: String,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            rules: RuleStore::new(),
            groups: GroupStore::new(),
            metrics: ServerMetrics::new(),
            api_token: config.api_token.clone(),
            default_location: config.default_location.clone(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let resources = Router::new()
        .route(
            GROUP_PATH,
            get(resource_groups::get_group)
                .put(resource_groups::put_group)
                .delete(resource_groups::delete_group),
        )
        .route(RULES_PATH, get(alert_rules::list_rules))
        .route(
            RULE_PATH,
            get(alert_rules::get_rule)
                .put(alert_rules::put_rule)
                .delete(alert_rules::delete_rule),
        )
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/ready", get(health::ready))
        .route("/metrics", get(metrics::metrics))
        .merge(resources)
        .layer(from_fn_with_state(state.metrics.clone(), track_requests))
        .with_state(state)
}
