//! Pull-based observability: the exported metric state and the HTTP
//! endpoint scrapers read it from.

pub mod metrics;
pub mod server;

pub use metrics::Metrics;
pub use server::router;
