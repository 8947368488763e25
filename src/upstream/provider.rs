use async_trait::async_trait;

use crate::standings::error::FetchError;

/// Trait that every standings page source must implement.
#[async_trait]
pub trait StandingsSource: Send + Sync {
    /// Return the raw HTML of the standings page.
    async fn fetch_html(&self) -> Result<String, FetchError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}
