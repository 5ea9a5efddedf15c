use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::rest::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub resource_groups: usize,
    pub alert_rules: usize,
}

pub async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        resource_groups: state.groups.count(),
        alert_rules: state.rules.count(),
    })
}

pub async fn ready() -> StatusCode {
    StatusCode::OK
}
