pub mod auth_layer;
pub mod request_metrics;

pub use auth_layer::auth_middleware;
pub use request_metrics::track_requests;
