//! Prometheus metric definitions for the exporter.
//!
//! Metric names are unprefixed so the exporter is a drop-in target for
//! dashboards built against the plain stub_status names.

use prometheus::{IntCounter, IntGauge, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// The seven exported stub_status metrics
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Currently active connections
    pub active_connections: IntGauge,
    /// Total connections accepted by the upstream
    pub server_accepts_total: IntCounter,
    /// Total connections handled by the upstream
    pub server_handled_total: IntCounter,
    /// Total requests served by the upstream
    pub server_requests_total: IntCounter,
    /// Connections currently reading a request
    pub reading_connections: IntGauge,
    /// Connections currently writing a response
    pub writing_connections: IntGauge,
    /// Idle keep-alive connections
    pub waiting_connections: IntGauge,
}

impl Metrics {
    /// Create a new Metrics instance with all gauges and counters registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let active_connections = IntGauge::with_opts(Opts::new(
            "active_connections",
            "The number of active connections",
        ))?;
        registry.register(Box::new(active_connections.clone()))?;

        let server_accepts_total = IntCounter::with_opts(Opts::new(
            "server_accepts_total",
            "The total number of server accepted connections",
        ))?;
        registry.register(Box::new(server_accepts_total.clone()))?;

        let server_handled_total = IntCounter::with_opts(Opts::new(
            "server_handled_total",
            "The total number of server handled connections",
        ))?;
        registry.register(Box::new(server_handled_total.clone()))?;

        let server_requests_total = IntCounter::with_opts(Opts::new(
            "server_requests_total",
            "The total number of server requests",
        ))?;
        registry.register(Box::new(server_requests_total.clone()))?;

        let reading_connections = IntGauge::with_opts(Opts::new(
            "reading_connections",
            "The number of active reading connections",
        ))?;
        registry.register(Box::new(reading_connections.clone()))?;

        let writing_connections = IntGauge::with_opts(Opts::new(
            "writing_connections",
            "The number of active writing connections",
        ))?;
        registry.register(Box::new(writing_connections.clone()))?;

        let waiting_connections = IntGauge::with_opts(Opts::new(
            "waiting_connections",
            "The number of waiting connections",
        ))?;
        registry.register(Box::new(waiting_connections.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            active_connections,
            server_accepts_total,
            server_handled_total,
            server_requests_total,
            reading_connections,
            writing_connections,
            waiting_connections,
        })
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        let output = metrics.render();
        assert!(output.contains("active_connections"));
        assert!(output.contains("server_accepts_total"));
        assert!(output.contains("waiting_connections"));
    }

    #[test]
    fn test_counters_start_at_zero() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        let output = metrics.render();
        assert!(output.contains("server_accepts_total 0"));
        assert!(output.contains("server_handled_total 0"));
        assert!(output.contains("server_requests_total 0"));
    }

    #[test]
    fn test_gauge_update() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        metrics.active_connections.set(39);
        let output = metrics.render();
        assert!(output.contains("active_connections 39"));
    }

    #[test]
    fn test_render_includes_help_and_type() {
        let metrics = Metrics::new().expect("Failed to create metrics");
        let output = metrics.render();
        assert!(output.contains("# HELP active_connections The number of active connections"));
        assert!(output.contains("# TYPE active_connections gauge"));
        assert!(output.contains("# TYPE server_requests_total counter"));
    }
}
