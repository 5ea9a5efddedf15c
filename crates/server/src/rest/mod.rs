mod alert_rules;
mod api_version;
pub mod error;
mod health;
mod metrics;
mod resource_groups;
mod router;

pub use error::ApiError;
pub use router::{router, AppState};
