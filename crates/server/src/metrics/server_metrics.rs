use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Default)]
pub struct ServerMetrics {
    rest_requests_total: AtomicU64,
    rest_errors_total: AtomicU64,
    rules_created_total: AtomicU64,
    rules_updated_total: AtomicU64,
    rules_deleted_total: AtomicU64,
    groups_created_total: AtomicU64,
    groups_deleted_total: AtomicU64,
    rest_latency_sum_us: AtomicU64,
    rest_latency_count: AtomicU64,
}

impl ServerMetrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_rest_requests(&self) {
        self.rest_requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_rest_errors(&self) {
        self.rest_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_rules_created(&self) {
        self.rules_created_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_rules_updated(&self) {
        self.rules_updated_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_rules_deleted(&self) {
        self.rules_deleted_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_groups_created(&self) {
        self.groups_created_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_groups_deleted(&self) {
        self.groups_deleted_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rest_latency(&self, start: Instant) {
        let us = start.elapsed().as_micros() as u64;
        self.rest_latency_sum_us.fetch_add(us, Ordering::Relaxed);
        self.rest_latency_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn rest_requests_total(&self) -> u64 {
        self.rest_requests_total.load(Ordering::Relaxed)
    }

    pub fn rest_errors_total(&self) -> u64 {
        self.rest_errors_total.load(Ordering::Relaxed)
    }

    pub fn rules_created_total(&self) -> u64 {
        self.rules_created_total.load(Ordering::Relaxed)
    }

    pub fn rules_updated_total(&self) -> u64 {
        self.rules_updated_total.load(Ordering::Relaxed)
    }

    pub fn rules_deleted_total(&self) -> u64 {
        self.rules_deleted_total.load(Ordering::Relaxed)
    }

    pub fn groups_created_total(&self) -> u64 {
        self.groups_created_total.load(Ordering::Relaxed)
    }

    pub fn groups_deleted_total(&self) -> u64 {
        self.groups_deleted_total.load(Ordering::Relaxed)
    }

    pub fn rest_latency_vals(&self) -> (u64, u64) {
        (
            self.rest_latency_sum_us.load(Ordering::Relaxed),
            self.rest_latency_count.load(Ordering::Relaxed),
        )
    }
}
