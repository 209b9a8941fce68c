//! Prometheus Metrics Module
//!
//! Core health indicators for the bidding engine.
//!
//! ## Metric types
//! - **Counter**: bid submissions by outcome, live events delivered
//! - **Histogram**: commit section latency
//! - **Gauge**: live subscriber count
//!
//! ## Usage
//! ```rust,ignore
//! use auction_engine::shared::metrics::METRICS;
//!
//! METRICS.bids_total.with_label_values(&["accepted"]).inc();
//! let timer = METRICS.bid_commit_duration.start_timer();
//! // ... commit ...
//! timer.observe_duration();
//! ```

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_histogram, register_int_counter, register_int_gauge,
    CounterVec, Encoder, Histogram, IntCounter, IntGauge, TextEncoder,
};

lazy_static! {
    /// Global metrics instance
    pub static ref METRICS: Metrics = Metrics::new();
}

/// Bidding engine core indicators
pub struct Metrics {
    /// Bid submissions by outcome (accepted / rejected / forbidden / storage_error)
    pub bids_total: CounterVec,

    /// Commit section latency in seconds
    pub bid_commit_duration: Histogram,

    /// Live events delivered to subscriber channels
    pub events_published_total: IntCounter,

    /// Currently registered live subscribers
    pub subscribers_active: IntGauge,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            bids_total: register_counter_vec!(
                "auction_engine_bids_total",
                "Total number of bid submissions",
                &["outcome"]
            )
            .unwrap(),

            bid_commit_duration: register_histogram!(
                "auction_engine_bid_commit_duration_seconds",
                "Bid commit section latency in seconds",
                vec![0.00001, 0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05]
            )
            .unwrap(),

            events_published_total: register_int_counter!(
                "auction_engine_events_published_total",
                "Total number of live bid events delivered to subscribers"
            )
            .unwrap(),

            subscribers_active: register_int_gauge!(
                "auction_engine_subscribers_active",
                "Number of live bid-update subscribers"
            )
            .unwrap(),
        }
    }

    /// Exports all registered metrics in Prometheus text format.
    pub fn export(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = prometheus::gather();
        let mut buffer = vec![];
        encoder.encode(&metric_families, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
