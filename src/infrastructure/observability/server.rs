//! The scrape endpoint.
//!
//! A single `GET /metrics` route rendering the registry on demand. The
//! handler never touches the poll cycle; it only reads the already
//! reconciled metric state.

use super::metrics::Metrics;
use axum::extract::State;
use axum::routing::get;
use axum::Router;

pub fn router(metrics: Metrics) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<Metrics>) -> String {
    metrics.render()
}
