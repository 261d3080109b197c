//! The periodic fetch, parse, reconcile loop.

use crate::application::reconciler::Reconciler;
use crate::domain::ports::StatusSource;
use crate::domain::status;
use std::sync::Arc;
use tokio::time::{self, Duration};
use tracing::{debug, error, info};

/// Fixed delay between poll cycles.
const POLL_INTERVAL: Duration = Duration::from_secs(15);

/// Longest body prefix echoed into parse-failure logs.
const BODY_SNIPPET_LEN: usize = 200;

pub struct StatusPoller {
    source: Arc<dyn StatusSource>,
    reconciler: Reconciler,
}

impl StatusPoller {
    pub fn new(source: Arc<dyn StatusSource>, reconciler: Reconciler) -> Self {
        Self { source, reconciler }
    }

    /// Run one fetch→parse→reconcile cycle.
    ///
    /// A fetch or parse failure is logged and skipped; the exported metrics
    /// keep their previous values until the next successful cycle.
    pub async fn poll_once(&mut self) {
        let body = match self.source.fetch_status().await {
            Ok(body) => body,
            Err(e) => {
                error!("Skipping poll cycle: {}", e);
                return;
            }
        };

        debug!("Upstream body: {:?}", body);
        match status::parse_stub_status(&body) {
            Ok(snapshot) => {
                debug!("Reconciling snapshot: {:?}", snapshot);
                self.reconciler.apply(&snapshot);
            }
            Err(e) => {
                error!(
                    "Skipping poll cycle: {} (body starts with {:?})",
                    e,
                    snippet(&body)
                );
            }
        }
    }

    /// Poll the upstream forever on the fixed interval.
    pub async fn run(mut self) {
        info!("StatusPoller started. Interval: {:?}", POLL_INTERVAL);

        let mut interval = time::interval(POLL_INTERVAL);
        // The first tick completes immediately; the startup poll already ran
        interval.tick().await;

        loop {
            interval.tick().await;
            debug!("Poll tick");
            self.poll_once().await;
        }
    }
}

fn snippet(body: &str) -> &str {
    match body.char_indices().nth(BODY_SNIPPET_LEN) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
