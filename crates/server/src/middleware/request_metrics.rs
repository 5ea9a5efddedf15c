use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;
use std::time::Instant;

use crate::metrics::ServerMetrics;

pub async fn track_requests(
    State(metrics): State<Arc<ServerMetrics>>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    metrics.inc_rest_requests();
    let response = next.run(request).await;
    metrics.record_rest_latency(start);

    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        metrics.inc_rest_errors();
    }
    tracing::debug!(%method, %path, status = status.as_u16(), "request handled");
    response
}
