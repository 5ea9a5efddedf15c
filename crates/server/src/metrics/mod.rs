pub mod exposition;
pub mod server_metrics;

pub use server_metrics::ServerMetrics;
