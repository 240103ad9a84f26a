use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for observability
///
/// Counters for discovery loads, connection switches, and message flow.
/// Use `snapshot()` to get a point-in-time view of all metrics, or use
/// individual getter methods for specific values.
#[derive(Debug, Default)]
pub struct Metrics {
    loads_total: AtomicU64,
    load_failures_total: AtomicU64,
    switches_total: AtomicU64,
    connections_total: AtomicU64,
    connect_failures_total: AtomicU64,
    messages_received_total: AtomicU64,
    messages_forwarded_total: AtomicU64,
    late_messages_dropped_total: AtomicU64,
}

impl Metrics {
    /// Create a new Metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Getters ==========

    /// Get total discovery load attempts
    pub fn loads(&self) -> u64 {
        self.loads_total.load(Ordering::Relaxed)
    }

    /// Get total discovery loads that did not produce a registry
    pub fn load_failures(&self) -> u64 {
        self.load_failures_total.load(Ordering::Relaxed)
    }

    /// Get total connection switches requested
    pub fn switches(&self) -> u64 {
        self.switches_total.load(Ordering::Relaxed)
    }

    /// Get total connections opened
    pub fn connections(&self) -> u64 {
        self.connections_total.load(Ordering::Relaxed)
    }

    /// Get total connection open failures
    pub fn connect_failures(&self) -> u64 {
        self.connect_failures_total.load(Ordering::Relaxed)
    }

    /// Get total messages received over all connections
    pub fn messages_received(&self) -> u64 {
        self.messages_received_total.load(Ordering::Relaxed)
    }

    /// Get total messages forwarded to the consumer callback
    pub fn messages_forwarded(&self) -> u64 {
        self.messages_forwarded_total.load(Ordering::Relaxed)
    }

    /// Get total messages dropped because their connection was superseded
    pub fn late_messages_dropped(&self) -> u64 {
        self.late_messages_dropped_total.load(Ordering::Relaxed)
    }

    // ========== Recording methods (called internally) ==========

    pub(crate) fn record_load(&self) {
        self.loads_total.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_load_failure(&self) {
        self.load_failures_total.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_switch(&self) {
        self.switches_total.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_connection(&self) {
        self.connections_total.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_connect_failure(&self) {
        self.connect_failures_total.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_message_received(&self) {
        self.messages_received_total.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_message_forwarded(&self) {
        self.messages_forwarded_total.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_late_message_dropped(&self) {
        self.late_messages_dropped_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a point-in-time snapshot of all metrics for export
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            loads_total: self.loads_total.load(Ordering::Acquire),
            load_failures_total: self.load_failures_total.load(Ordering::Acquire),
            switches_total: self.switches_total.load(Ordering::Acquire),
            connections_total: self.connections_total.load(Ordering::Acquire),
            connect_failures_total: self.connect_failures_total.load(Ordering::Acquire),
            messages_received_total: self.messages_received_total.load(Ordering::Acquire),
            messages_forwarded_total: self.messages_forwarded_total.load(Ordering::Acquire),
            late_messages_dropped_total: self.late_messages_dropped_total.load(Ordering::Acquire),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub loads_total: u64,
    pub load_failures_total: u64,
    pub switches_total: u64,
    pub connections_total: u64,
    pub connect_failures_total: u64,
    pub messages_received_total: u64,
    pub messages_forwarded_total: u64,
    pub late_messages_dropped_total: u64,
}
