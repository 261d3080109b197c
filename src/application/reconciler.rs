//! Counter reconciliation between upstream snapshots and exported metrics.
//!
//! The upstream reports absolute totals since *its* process start, while the
//! exported counters only support monotonic increments. The reconciler keeps
//! the previous snapshot's totals as its own baseline and applies the
//! difference on each poll, so the exported total always converges on the
//! upstream's absolute value without ever reading metric state back out of
//! the registry.

use crate::domain::status::StubStatus;
use crate::infrastructure::observability::Metrics;
use tracing::warn;

/// Absolute counter totals seen in the previous snapshot
#[derive(Debug, Clone, Copy, Default)]
struct CounterBaseline {
    accepts: u64,
    handled: u64,
    requests: u64,
}

pub struct Reconciler {
    metrics: Metrics,
    baseline: CounterBaseline,
}

impl Reconciler {
    /// Create a reconciler with a zero baseline, so the first snapshot's
    /// absolute totals are applied in full.
    pub fn new(metrics: Metrics) -> Self {
        Self {
            metrics,
            baseline: CounterBaseline::default(),
        }
    }

    /// Fold a fresh snapshot into the exported metrics.
    ///
    /// Gauges take the snapshot value directly. Counters advance by the
    /// difference against the baseline; a total lower than the baseline
    /// means the upstream restarted, in which case the baseline is reset
    /// and the full new total is applied. A negative increment is never
    /// produced.
    pub fn apply(&mut self, status: &StubStatus) {
        self.metrics.active_connections.set(status.active as i64);
        self.metrics.reading_connections.set(status.reading as i64);
        self.metrics.writing_connections.set(status.writing as i64);
        self.metrics.waiting_connections.set(status.waiting as i64);

        self.metrics
            .server_accepts_total
            .inc_by(counter_delta("accepts", self.baseline.accepts, status.accepts));
        self.metrics
            .server_handled_total
            .inc_by(counter_delta("handled", self.baseline.handled, status.handled));
        self.metrics
            .server_requests_total
            .inc_by(counter_delta("requests", self.baseline.requests, status.requests));

        self.baseline = CounterBaseline {
            accepts: status.accepts,
            handled: status.handled,
            requests: status.requests,
        };
    }
}

fn counter_delta(field: &str, baseline: u64, value: u64) -> u64 {
    if value < baseline {
        warn!(
            "Upstream {} total went backwards ({} -> {}), assuming upstream restart",
            field, baseline, value
        );
        value
    } else {
        value - baseline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(accepts: u64, handled: u64, requests: u64) -> StubStatus {
        StubStatus {
            active: 39,
            accepts,
            handled,
            requests,
            reading: 0,
            writing: 64,
            waiting: 10,
        }
    }

    #[test]
    fn test_first_snapshot_applied_in_full() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        let mut reconciler = Reconciler::new(metrics.clone());

        reconciler.apply(&snapshot(286479, 286479, 1417563));

        assert_eq!(metrics.server_accepts_total.get(), 286479);
        assert_eq!(metrics.server_handled_total.get(), 286479);
        assert_eq!(metrics.server_requests_total.get(), 1417563);
    }

    #[test]
    fn test_counters_telescope_to_absolute_value() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        let mut reconciler = Reconciler::new(metrics.clone());

        reconciler.apply(&snapshot(100, 90, 1000));
        reconciler.apply(&snapshot(150, 140, 1800));
        reconciler.apply(&snapshot(151, 141, 1801));

        assert_eq!(metrics.server_accepts_total.get(), 151);
        assert_eq!(metrics.server_handled_total.get(), 141);
        assert_eq!(metrics.server_requests_total.get(), 1801);
    }

    #[test]
    fn test_reapplying_a_snapshot_adds_nothing() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        let mut reconciler = Reconciler::new(metrics.clone());

        let status = snapshot(100, 90, 1000);
        reconciler.apply(&status);
        reconciler.apply(&status);

        assert_eq!(metrics.server_accepts_total.get(), 100);
        assert_eq!(metrics.server_handled_total.get(), 90);
        assert_eq!(metrics.server_requests_total.get(), 1000);
        assert_eq!(metrics.writing_connections.get(), 64);
    }

    #[test]
    fn test_upstream_restart_never_decreases_counters() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        let mut reconciler = Reconciler::new(metrics.clone());

        reconciler.apply(&snapshot(1000, 1000, 5000));
        // Upstream restarted; its totals start over from near zero.
        reconciler.apply(&snapshot(7, 6, 20));

        assert_eq!(metrics.server_accepts_total.get(), 1007);
        assert_eq!(metrics.server_handled_total.get(), 1006);
        assert_eq!(metrics.server_requests_total.get(), 5020);
    }

    #[test]
    fn test_counting_resumes_after_restart() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        let mut reconciler = Reconciler::new(metrics.clone());

        reconciler.apply(&snapshot(1000, 1000, 5000));
        reconciler.apply(&snapshot(7, 6, 20));
        reconciler.apply(&snapshot(10, 9, 25));

        assert_eq!(metrics.server_accepts_total.get(), 1010);
        assert_eq!(metrics.server_handled_total.get(), 1009);
        assert_eq!(metrics.server_requests_total.get(), 5025);
    }

    #[test]
    fn test_gauges_track_latest_snapshot_only() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        let mut reconciler = Reconciler::new(metrics.clone());

        reconciler.apply(&StubStatus {
            active: 39,
            accepts: 100,
            handled: 100,
            requests: 100,
            reading: 5,
            writing: 64,
            waiting: 10,
        });
        reconciler.apply(&StubStatus {
            active: 12,
            accepts: 110,
            handled: 110,
            requests: 115,
            reading: 0,
            writing: 3,
            waiting: 9,
        });

        assert_eq!(metrics.active_connections.get(), 12);
        assert_eq!(metrics.reading_connections.get(), 0);
        assert_eq!(metrics.writing_connections.get(), 3);
        assert_eq!(metrics.waiting_connections.get(), 9);
    }
}
