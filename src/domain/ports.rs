use crate::domain::errors::FetchError;
use async_trait::async_trait;

// Need async_trait for async functions in traits
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch the raw stub_status body from the upstream
    async fn fetch_status(&self) -> Result<String, FetchError>;
}
