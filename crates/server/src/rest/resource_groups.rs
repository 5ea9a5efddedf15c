use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use monitor_common::model::RESOURCE_GROUP_TYPE;
use monitor_common::resource_id::resource_group_id;
use monitor_common::ResourceGroup;
use serde::Deserialize;
use std::collections::BTreeMap;

use super::api_version::ApiVersion;
use super::error::ApiError;
use crate::rest::AppState;
use crate::store::ScopeKey;

#[derive(Deserialize)]
pub struct PutGroupRequest {
    pub location: Option<String>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

pub async fn put_group(
    State(state): State<AppState>,
    Path((subscription_id, resource_group)): Path<(String, String)>,
    Query(version): Query<ApiVersion>,
    body: Result<Json<PutGroupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ResourceGroup>), ApiError> {
    version.require()?;
    let Json(body) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let scope = ScopeKey::new(&subscription_id, &resource_group);
    let name = state
        .groups
        .get(&scope)
        .map(|g| g.name)
        .unwrap_or(resource_group);

    let group = ResourceGroup {
        id: Some(resource_group_id(&subscription_id, &name)),
        name,
        resource_type: Some(RESOURCE_GROUP_TYPE.to_string()),
        location: body
            .location
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| state.default_location.clone()),
        tags: body.tags,
    };

    let created = state.groups.upsert(scope, group.clone());
    if created {
        state.metrics.inc_groups_created();
        tracing::info!(group = %group.name, location = %group.location, "resource group created");
    }
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(group)))
}

pub async fn get_group(
    State(state): State<AppState>,
    Path((subscription_id, resource_group)): Path<(String, String)>,
    Query(version): Query<ApiVersion>,
) -> Result<Json<ResourceGroup>, ApiError> {
    version.require()?;
    state
        .groups
        .get(&ScopeKey::new(&subscription_id, &resource_group))
        .map(Json)
        .ok_or_else(|| ApiError::group_not_found(&resource_group))
}

pub async fn delete_group(
    State(state): State<AppState>,
    Path((subscription_id, resource_group)): Path<(String, String)>,
    Query(version): Query<ApiVersion>,
) -> Result<StatusCode, ApiError> {
    version.require()?;
    let scope = ScopeKey::new(&subscription_id, &resource_group);
    if !state.groups.delete(&scope) {
        return Ok(StatusCode::NO_CONTENT);
    }

    let removed = state.rules.delete_scope(&scope);
    state.metrics.inc_groups_deleted();
    tracing::info!(group = %resource_group, rules_removed = removed, "resource group deleted");
    Ok(StatusCode::OK)
}
