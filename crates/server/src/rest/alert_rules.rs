use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use monitor_common::model::{ResourceList, ALERT_RULE_TYPE};
use monitor_common::resource_id::alert_rule_id;
use monitor_common::AlertRuleResource;

use super::api_version::ApiVersion;
use super::error::ApiError;
use crate::rest::AppState;
use crate::store::ScopeKey;

fn validate_rule(rule: &AlertRuleResource, path_name: &str) -> Result<(), ApiError> {
    if !rule.alert_rule_resource_name.is_empty()
        && !rule.alert_rule_resource_name.eq_ignore_ascii_case(path_name)
    {
        return Err(ApiError::bad_request(format!(
            "alertRuleResourceName '{}' does not match rule name '{path_name}'",
            rule.alert_rule_resource_name
        )));
    }

    let condition = rule.threshold_condition();
    if condition.data_source.metric_name().trim().is_empty() {
        return Err(ApiError::bad_request("condition.dataSource.metricName is required"));
    }
    if condition.data_source.resource_uri().trim().is_empty() {
        return Err(ApiError::bad_request("condition.dataSource.resourceUri is required"));
    }
    if !condition.threshold.is_finite() {
        return Err(ApiError::bad_request("condition.threshold must be a finite number"));
    }
    if rule.webhook_actions().any(|w| w.service_uri.trim().is_empty()) {
        return Err(ApiError::bad_request("webhook actions require a serviceUri"));
    }
    Ok(())
}

/// Stores the rule and rechecks the group, so a rule written while its group
/// is being deleted does not outlive the group.
fn commit_rule(
    state: &AppState,
    scope: &ScopeKey,
    resource_group: &str,
    name: &str,
    rule: AlertRuleResource,
) -> Result<bool, ApiError> {
    let created = state.rules.upsert(scope, name, rule);
    if let Err(e) = require_group(state, scope, resource_group) {
        state.rules.delete(scope, name);
        tracing::warn!(rule = %name, group = %resource_group, "resource group removed during rule write");
        return Err(e);
    }
    Ok(created)
}

fn require_group(state: &AppState, scope: &ScopeKey, resource_group: &str) -> Result<(), ApiError> {
    if state.groups.contains(scope) {
        Ok(())
    } else {
        Err(ApiError::group_not_found(resource_group))
    }
}

pub async fn list_rules(
    State(state): State<AppState>,
    Path((subscription_id, resource_group)): Path<(String, String)>,
    Query(version): Query<ApiVersion>,
) -> Result<Json<ResourceList<AlertRuleResource>>, ApiError> {
    version.require()?;
    let scope = ScopeKey::new(&subscription_id, &resource_group);
    require_group(&state, &scope, &resource_group)?;
    Ok(Json(ResourceList {
        value: state.rules.list(&scope),
    }))
}

pub async fn get_rule(
    State(state): State<AppState>,
    Path((subscription_id, resource_group, rule_name)): Path<(String, String, String)>,
    Query(version): Query<ApiVersion>,
) -> Result<Json<AlertRuleResource>, ApiError> {
    version.require()?;
    let scope = ScopeKey::new(&subscription_id, &resource_group);
    require_group(&state, &scope, &resource_group)?;
    state
        .rules
        .get(&scope, &rule_name)
        .map(Json)
        .ok_or_else(|| ApiError::rule_not_found(&rule_name))
}

pub async fn put_rule(
    State(state): State<AppState>,
    Path((subscription_id, resource_group, rule_name)): Path<(String, String, String)>,
    Query(version): Query<ApiVersion>,
    body: Result<Json<AlertRuleResource>, JsonRejection>,
) -> Result<(StatusCode, Json<AlertRuleResource>), ApiError> {
    version.require()?;
    let scope = ScopeKey::new(&subscription_id, &resource_group);
    require_group(&state, &scope, &resource_group)?;

    let Json(mut rule) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    if let Err(e) = validate_rule(&rule, &rule_name) {
        tracing::warn!(rule = %rule_name, reason = %e.message, "alert rule rejected");
        return Err(e);
    }

    let name = state
        .rules
        .get(&scope, &rule_name)
        .and_then(|existing| existing.name)
        .unwrap_or(rule_name);

    rule.id = Some(alert_rule_id(&subscription_id, &resource_group, &name));
    rule.resource_type = Some(ALERT_RULE_TYPE.to_string());
    rule.alert_rule_resource_name = name.clone();
    rule.name = Some(name.clone());
    if rule.location.trim().is_empty() {
        rule.location = state.default_location.clone();
    }
    rule.last_updated_time = Some(Utc::now());

    let created = commit_rule(&state, &scope, &resource_group, &name, rule.clone())?;
    if created {
        state.metrics.inc_rules_created();
        tracing::info!(rule = %name, group = %resource_group, "alert rule created");
        Ok((StatusCode::CREATED, Json(rule)))
    } else {
        state.metrics.inc_rules_updated();
        tracing::info!(rule = %name, group = %resource_group, "alert rule replaced");
        Ok((StatusCode::OK, Json(rule)))
    }
}

pub async fn delete_rule(
    State(state): State<AppState>,
    Path((subscription_id, resource_group, rule_name)): Path<(String, String, String)>,
    Query(version): Query<ApiVersion>,
) -> Result<StatusCode, ApiError> {
    version.require()?;
    let scope = ScopeKey::new(&subscription_id, &resource_group);
    require_group(&state, &scope, &resource_group)?;

    if state.rules.delete(&scope, &rule_name) {
        state.metrics.inc_rules_deleted();
        tracing::info!(rule = %rule_name, group = %resource_group, "alert rule deleted");
        Ok(StatusCode::OK)
    } else {
        Ok(StatusCode::NO_CONTENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use monitor_common::action::build_actions;
    use monitor_common::model::{RuleAction, RuleWebhookAction};
    use monitor_common::ConditionSpec;

    fn rule(name: &str) -> AlertRuleResource {
        let spec: ConditionSpec = "Percentage CPU > 90 avg 5m".parse().unwrap();
        AlertRuleResource::new(name, "", spec.into_condition("/subscriptions/s/vm"), build_actions(&[], false))
    }

    #[test]
    fn accepts_matching_name_case_insensitively() {
        assert!(validate_rule(&rule("Rule1"), "rule1").is_ok());
    }

    #[test]
    fn empty_resource_name_is_accepted() {
        assert!(validate_rule(&rule(""), "rule1").is_ok());
    }

    #[test]
    fn mismatched_name_is_rejected() {
        let err = validate_rule(&rule("other"), "rule1").unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "InvalidRequestContent");
    }

    #[test]
    fn non_finite_threshold_is_rejected() {
        let mut r = rule("rule1");
        r.threshold_condition_mut().threshold = f64::NAN;
        assert!(validate_rule(&r, "rule1").is_err());
    }

    #[test]
    fn blank_target_is_rejected() {
        let mut r = rule("rule1");
        r.threshold_condition_mut().data_source.set_resource_uri(" ");
        assert!(validate_rule(&r, "rule1").is_err());
    }

    #[test]
    fn blank_webhook_uri_is_rejected() {
        let mut r = rule("rule1");
        r.actions.push(RuleAction::Webhook(RuleWebhookAction {
            service_uri: String::new(),
            properties: Default::default(),
        }));
        assert!(validate_rule(&r, "rule1").is_err());
    }

    #[test]
    fn commit_into_vanished_group_is_rolled_back() {
        let state = AppState::new(&ServerConfig::default());
        let scope = ScopeKey::new("sub", "rg");
        let err = commit_rule(&state, &scope, "rg", "rule1", rule("rule1")).unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.code, "ResourceGroupNotFound");
        assert_eq!(state.rules.count(), 0);
    }
}
