use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::Deserialize;

use crate::api::MarketDataClient;
use crate::error::{GameError, Result};
use crate::models::{PricePoint, Series, MIN_HISTORY};

const ALPHA_VANTAGE_BASE: &str = "https://www.alphavantage.co";
const RATE_LIMIT_RPM: u32 = 5; // Free tier: 5 requests per minute
const REQUEST_TIMEOUT_SECS: u64 = 30;

// Type alias for the rate limiter to simplify signatures
type AvRateLimiter = RateLimiter<
    governor::state::direct::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Alpha Vantage TIME_SERIES_DAILY client
///
/// Cloneable so the limiter is shared across clones; one GET per load,
/// rate-limited to the free-tier quota.
#[derive(Clone)]
pub struct AlphaVantageClient {
    client: Client,
    api_key: String,
    base_url: String,
    rate_limiter: Arc<AvRateLimiter>,
}

/// Daily endpoint response. Alpha Vantage signals errors in-band: `Note`
/// (legacy) or `Information` for quota exhaustion, `Error Message` for an
/// unknown symbol, and the series key absent entirely on other failures.
#[derive(Debug, Deserialize)]
struct DailyResponse {
    #[serde(rename = "Time Series (Daily)")]
    time_series: Option<HashMap<String, DailyBar>>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DailyBar {
    #[serde(rename = "4. close")]
    close: String,
}

impl AlphaVantageClient {
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_base_url(api_key, ALPHA_VANTAGE_BASE.to_string())
    }

    /// Construct against a non-default host (local mock server in tests)
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let quota = Quota::per_minute(NonZeroU32::new(RATE_LIMIT_RPM).expect("nonzero quota"));

        Ok(Self {
            client,
            api_key,
            base_url,
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        })
    }

    fn series_from_response(symbol: &str, resp: DailyResponse) -> Result<Series> {
        if resp.note.is_some() || resp.information.is_some() {
            return Err(GameError::RateLimited);
        }
        if resp.error_message.is_some() {
            return Err(GameError::InvalidSymbol(symbol.to_string()));
        }

        let raw = resp
            .time_series
            .ok_or_else(|| GameError::InvalidSymbol(symbol.to_string()))?;

        let points: Vec<PricePoint> = raw
            .into_iter()
            .filter_map(|(date, bar)| {
                let date: NaiveDate = date.parse().ok()?;
                let close: f64 = bar.close.parse().ok()?;
                (close.is_finite() && close > 0.0).then_some(PricePoint { date, close })
            })
            .collect();

        if points.len() < MIN_HISTORY {
            return Err(GameError::InsufficientHistory { got: points.len() });
        }

        Ok(Series::new(points))
    }
}

#[async_trait]
impl MarketDataClient for AlphaVantageClient {
    async fn fetch_daily_series(&self, symbol: &str) -> Result<Series> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}/query", self.base_url);
        tracing::debug!("Fetching daily series for {}", symbol);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol),
                ("outputsize", "compact"),
                ("apikey", &self.api_key),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GameError::Network(format!("HTTP {} from data provider", status)));
        }

        let body: DailyResponse = response.json().await?;
        let series = Self::series_from_response(symbol, body)?;

        tracing::debug!("Fetched {} daily closes for {}", series.len(), symbol);
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn daily_body(days: usize) -> serde_json::Value {
        let mut series = serde_json::Map::new();
        for i in 0..days {
            let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i as i64);
            series.insert(
                date.to_string(),
                json!({ "4. close": format!("{:.2}", 100.0 + i as f64) }),
            );
        }
        json!({ "Time Series (Daily)": series })
    }

    fn test_client(server: &mockito::ServerGuard) -> AlphaVantageClient {
        AlphaVantageClient::with_base_url("demo".to_string(), server.url()).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_parses_and_sorts_series() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/query")
            .match_query(mockito::Matcher::UrlEncoded(
                "symbol".into(),
                "AAPL".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(daily_body(40).to_string())
            .create_async()
            .await;

        let series = test_client(&server)
            .fetch_daily_series("AAPL")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(series.len(), 40);
        // Ascending regardless of JSON map ordering
        for pair in series.points().windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
        assert_eq!(series.get(0).unwrap().close, 100.0);
    }

    #[tokio::test]
    async fn test_note_maps_to_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/query")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(json!({ "Note": "API call frequency is 5 calls per minute" }).to_string())
            .create_async()
            .await;

        let err = test_client(&server)
            .fetch_daily_series("AAPL")
            .await
            .unwrap_err();
        assert!(matches!(err, GameError::RateLimited));
    }

    #[tokio::test]
    async fn test_information_maps_to_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/query")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(json!({ "Information": "daily rate limit reached" }).to_string())
            .create_async()
            .await;

        let err = test_client(&server)
            .fetch_daily_series("AAPL")
            .await
            .unwrap_err();
        assert!(matches!(err, GameError::RateLimited));
    }

    #[tokio::test]
    async fn test_error_message_maps_to_invalid_symbol() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/query")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(json!({ "Error Message": "Invalid API call" }).to_string())
            .create_async()
            .await;

        let err = test_client(&server)
            .fetch_daily_series("NOPE")
            .await
            .unwrap_err();
        assert!(matches!(err, GameError::InvalidSymbol(s) if s == "NOPE"));
    }

    #[tokio::test]
    async fn test_short_series_maps_to_insufficient_history() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/query")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(daily_body(10).to_string())
            .create_async()
            .await;

        let err = test_client(&server)
            .fetch_daily_series("TINY")
            .await
            .unwrap_err();
        assert!(matches!(err, GameError::InsufficientHistory { got: 10 }));
    }

    #[tokio::test]
    async fn test_server_error_maps_to_network() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/query")
            .match_query(mockito::Matcher::Any)
            .with_status(500)
            .with_body("oops")
            .create_async()
            .await;

        let err = test_client(&server)
            .fetch_daily_series("AAPL")
            .await
            .unwrap_err();
        assert!(matches!(err, GameError::Network(_)));
    }

    #[test]
    fn test_unparseable_closes_are_dropped() {
        let mut raw = HashMap::new();
        raw.insert(
            "2024-01-02".to_string(),
            DailyBar { close: "101.50".to_string() },
        );
        raw.insert(
            "2024-01-03".to_string(),
            DailyBar { close: "not-a-number".to_string() },
        );
        let resp = DailyResponse {
            time_series: Some(raw),
            note: None,
            information: None,
            error_message: None,
        };

        let err = AlphaVantageClient::series_from_response("AAPL", resp).unwrap_err();
        // Only one usable point survives the filter
        assert!(matches!(err, GameError::InsufficientHistory { got: 1 }));
    }
}
