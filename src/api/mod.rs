pub mod alpha_vantage;

pub use alpha_vantage::AlphaVantageClient;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Series;

/// Boundary to whatever serves daily closes.
///
/// Implementations return an ascending series with at least
/// [`crate::models::MIN_HISTORY`] points, or a classified `GameError`.
#[async_trait]
pub trait MarketDataClient: Send + Sync {
    async fn fetch_daily_series(&self, symbol: &str) -> Result<Series>;
}
