//! Quote API provider implementation.
//!
//! Fetches observed end-of-day prices from a quote HTTP API with Bearer
//! token authentication.
//!
//! # API Endpoints
//!
//! - Latest price: `{base}/v1/quotes/{symbol}/latest`
//! - Daily history: `{base}/v1/quotes/{symbol}/daily?from={start}&to={end}`
//! - Search: `{base}/v1/search?query={query}`
//!
//! Responses carry a status field `s` indicating success ("ok") or error.

use async_trait::async_trait;
use chrono::NaiveDate;
use log::warn;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration;
use urlencoding::encode;

use crate::errors::{Result, ValuationError};
use crate::models::{Currency, Day, PricePoint, ProviderCode, ProviderParams, SearchResult};

use super::capabilities::ProviderCapabilities;
use super::traits::{check_date_range, ValuationProvider};

const BASE_URL: &str = "https://api.quoteapi.io";

/// Default HTTP request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Response from the latest-price endpoint.
#[derive(Debug, Deserialize)]
struct LatestResponse {
    /// Status: "ok" or error message
    s: String,
    #[serde(default)]
    day: Option<NaiveDate>,
    #[serde(default)]
    price: Option<Decimal>,
    #[serde(default)]
    currency: Option<String>,
}

/// Response from the daily-history endpoint, parallel arrays per day.
#[derive(Debug, Deserialize)]
struct DailyResponse {
    /// Status: "ok" or error message
    s: String,
    #[serde(default)]
    days: Option<Vec<NaiveDate>>,
    #[serde(default)]
    closes: Option<Vec<Decimal>>,
    #[serde(default)]
    currency: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    s: String,
    #[serde(default)]
    results: Vec<SearchResponseItem>,
}

#[derive(Debug, Deserialize)]
struct SearchResponseItem {
    symbol: String,
    name: String,
    #[serde(default)]
    currency: Option<String>,
}

/// Validated parameters for a quote API assignment.
struct QuoteApiParams {
    symbol: String,
    currency: Option<Currency>,
}

impl QuoteApiParams {
    fn parse(params: &ProviderParams) -> Result<Self> {
        let code = ProviderCode::QUOTE_API;

        let symbol = params.required_str(code, "symbol")?;
        if symbol.trim().is_empty() {
            return Err(ValuationError::InvalidParams {
                provider: code.to_string(),
                message: "field 'symbol': must not be empty".to_string(),
            });
        }

        let currency: Option<Currency> = params.optional(code, "currency")?;
        if let Some(c) = &currency {
            if !c.is_well_formed() {
                return Err(ValuationError::InvalidParams {
                    provider: code.to_string(),
                    message: format!("field 'currency': '{c}' is not a three-letter ISO 4217 code"),
                });
            }
        }

        Ok(Self { symbol, currency })
    }

    /// Currency precedence: explicit parameter, then the API's report,
    /// then USD.
    fn resolve_currency(&self, from_api: Option<String>) -> Currency {
        self.currency
            .clone()
            .or(from_api.map(Currency::new))
            .unwrap_or_else(Currency::usd)
    }
}

/// Quote API provider for observed market prices.
///
/// # Example
///
/// ```ignore
/// let provider = QuoteApiProvider::new("your-api-key".to_string());
/// let point = provider.current_value(&params).await?;
/// ```
pub struct QuoteApiProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl QuoteApiProvider {
    /// Create a new Quote API provider with the given API key.
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, BASE_URL.to_string())
    }

    /// Create a provider pointing at a custom base URL (tests, proxies).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_key,
            base_url,
        }
    }

    /// Fetch a URL with Bearer token authentication and map transport and
    /// HTTP-level failures onto the error taxonomy.
    async fn fetch(&self, url: &str) -> Result<reqwest::Response> {
        let code = ProviderCode::QUOTE_API;
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ValuationError::Timeout {
                        provider: code.to_string(),
                    }
                } else {
                    ValuationError::Network {
                        provider: code.to_string(),
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            return Err(ValuationError::ProviderUnavailable {
                provider: code.to_string(),
                message: format!("HTTP {status}"),
            });
        }
        if !status.is_success() {
            return Err(ValuationError::Network {
                provider: code.to_string(),
                message: format!("HTTP error: {status}"),
            });
        }

        Ok(response)
    }

    async fn fetch_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.fetch(url).await?;
        response
            .json()
            .await
            .map_err(|e| ValuationError::Network {
                provider: ProviderCode::QUOTE_API.to_string(),
                message: format!("malformed response: {e}"),
            })
    }

    // Symbols and queries are caller-supplied and must be percent-encoded
    // before they enter a path segment or query string.
    fn latest_url(&self, symbol: &str) -> String {
        format!("{}/v1/quotes/{}/latest", self.base_url, encode(symbol))
    }

    fn daily_url(&self, symbol: &str, start: Day, end: Day) -> String {
        format!(
            "{}/v1/quotes/{}/daily?from={}&to={}",
            self.base_url,
            encode(symbol),
            start,
            end
        )
    }

    fn search_url(&self, query: &str) -> String {
        format!("{}/v1/search?query={}", self.base_url, encode(query))
    }

    fn map_search_response(body: SearchResponse) -> Result<Vec<SearchResult>> {
        // A declared failure is an upstream error, not an empty result set.
        if body.s != "ok" {
            return Err(ValuationError::ProviderUnavailable {
                provider: ProviderCode::QUOTE_API.to_string(),
                message: format!("search failed: {}", body.s),
            });
        }

        Ok(body
            .results
            .into_iter()
            .map(|item| SearchResult {
                symbol: item.symbol,
                name: item.name,
                currency: item.currency.map(Currency::new),
                source: ProviderCode::QUOTE_API.to_string(),
            })
            .collect())
    }
}

#[async_trait]
impl ValuationProvider for QuoteApiProvider {
    fn code(&self) -> &'static str {
        ProviderCode::QUOTE_API
    }

    fn name(&self) -> &'static str {
        "Quote API"
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            synthetic: false,
            supports_historical: true,
            supports_search: true,
        }
    }

    fn validate_params(&self, params: &ProviderParams) -> Result<()> {
        QuoteApiParams::parse(params).map(|_| ())
    }

    async fn current_value(&self, params: &ProviderParams) -> Result<PricePoint> {
        let parsed = QuoteApiParams::parse(params)?;
        let url = self.latest_url(&parsed.symbol);
        let body: LatestResponse = self.fetch_json(&url).await?;

        if body.s != "ok" {
            return Err(ValuationError::NoData {
                asset_id: parsed.symbol,
            });
        }

        match (body.day, body.price) {
            (Some(day), Some(price)) => Ok(PricePoint::new(
                Day::new(day),
                price,
                parsed.resolve_currency(body.currency),
                ProviderCode::QUOTE_API,
            )),
            _ => Err(ValuationError::NoData {
                asset_id: parsed.symbol,
            }),
        }
    }

    async fn history_value(
        &self,
        params: &ProviderParams,
        start: Day,
        end: Day,
    ) -> Result<Vec<PricePoint>> {
        check_date_range(start, end)?;
        let parsed = QuoteApiParams::parse(params)?;
        let url = self.daily_url(&parsed.symbol, start, end);
        let body: DailyResponse = self.fetch_json(&url).await?;

        if body.s != "ok" {
            return Err(ValuationError::NoData {
                asset_id: parsed.symbol,
            });
        }

        let days = body.days.unwrap_or_default();
        let closes = body.closes.unwrap_or_default();
        if days.len() != closes.len() {
            warn!(
                "Quote API returned mismatched arrays for {}: {} days, {} closes",
                parsed.symbol,
                days.len(),
                closes.len()
            );
            return Err(ValuationError::Network {
                provider: ProviderCode::QUOTE_API.to_string(),
                message: "mismatched response arrays".to_string(),
            });
        }

        let currency = parsed.resolve_currency(body.currency);
        let mut points: Vec<PricePoint> = days
            .into_iter()
            .zip(closes)
            .map(|(day, close)| {
                PricePoint::new(Day::new(day), close, currency.clone(), ProviderCode::QUOTE_API)
            })
            .collect();
        points.sort_by_key(|p| p.day);
        Ok(points)
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        let url = self.search_url(query);
        let body: SearchResponse = self.fetch_json(&url).await?;
        Self::map_search_response(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: serde_json::Value) -> ProviderParams {
        ProviderParams::from_value(ProviderCode::QUOTE_API, value).unwrap()
    }

    #[test]
    fn test_provider_identity() {
        let provider = QuoteApiProvider::new("test_key".to_string());
        assert_eq!(provider.code(), "QUOTE_API");
        let caps = provider.capabilities();
        assert!(!caps.synthetic);
        assert!(caps.supports_historical);
        assert!(caps.supports_search);
    }

    #[test]
    fn test_validate_requires_symbol() {
        let provider = QuoteApiProvider::new("test_key".to_string());

        let err = provider.validate_params(&params(json!({}))).unwrap_err();
        assert!(matches!(err, ValuationError::MissingParams { .. }));

        let err = provider
            .validate_params(&params(json!({ "symbol": "  " })))
            .unwrap_err();
        assert!(matches!(err, ValuationError::InvalidParams { .. }));

        assert!(provider
            .validate_params(&params(json!({ "symbol": "AAPL" })))
            .is_ok());
    }

    #[test]
    fn test_validate_currency_shape() {
        let provider = QuoteApiProvider::new("test_key".to_string());
        let err = provider
            .validate_params(&params(json!({ "symbol": "AAPL", "currency": "dollars" })))
            .unwrap_err();
        assert!(matches!(err, ValuationError::InvalidParams { .. }));

        assert!(provider
            .validate_params(&params(json!({ "symbol": "AAPL", "currency": "USD" })))
            .is_ok());
    }

    #[test]
    fn test_currency_precedence() {
        let parsed = QuoteApiParams::parse(&params(json!({
            "symbol": "AAPL",
            "currency": "EUR"
        })))
        .unwrap();
        // Explicit parameter beats the API's report.
        assert_eq!(
            parsed.resolve_currency(Some("USD".to_string())).as_str(),
            "EUR"
        );

        let bare = QuoteApiParams::parse(&params(json!({ "symbol": "AAPL" }))).unwrap();
        assert_eq!(bare.resolve_currency(Some("GBP".to_string())).as_str(), "GBP");
        assert_eq!(bare.resolve_currency(None).as_str(), "USD");
    }

    #[tokio::test]
    async fn test_inverted_range_fails_before_io() {
        // Points at an unroutable base URL: an error other than
        // InvalidDateRange would mean the request went out.
        let provider =
            QuoteApiProvider::with_base_url("k".to_string(), "http://127.0.0.1:0".to_string());
        let err = provider
            .history_value(
                &params(json!({ "symbol": "AAPL" })),
                Day::from_ymd(2025, 2, 1).unwrap(),
                Day::from_ymd(2025, 1, 1).unwrap(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ValuationError::InvalidDateRange { .. }));
    }

    #[test]
    fn test_urls_are_percent_encoded() {
        let provider =
            QuoteApiProvider::with_base_url("k".to_string(), "https://example.test".to_string());

        assert_eq!(
            provider.latest_url("BRK/B"),
            "https://example.test/v1/quotes/BRK%2FB/latest"
        );
        assert_eq!(
            provider.daily_url(
                "BRK/B",
                Day::from_ymd(2025, 1, 1).unwrap(),
                Day::from_ymd(2025, 1, 31).unwrap()
            ),
            "https://example.test/v1/quotes/BRK%2FB/daily?from=2025-01-01&to=2025-01-31"
        );
        // Spaces, ampersands, and fragments must not leak into the query.
        assert_eq!(
            provider.search_url("brown & co #1"),
            "https://example.test/v1/search?query=brown%20%26%20co%20%231"
        );
    }

    #[test]
    fn test_search_failure_status_is_an_error_not_empty() {
        let failed: SearchResponse = serde_json::from_value(json!({
            "s": "error: invalid api key",
            "results": []
        }))
        .unwrap();
        let err = QuoteApiProvider::map_search_response(failed).unwrap_err();
        match err {
            ValuationError::ProviderUnavailable { provider, message } => {
                assert_eq!(provider, "QUOTE_API");
                assert!(message.contains("invalid api key"));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        // A successful response with no hits really is empty.
        let empty: SearchResponse = serde_json::from_value(json!({
            "s": "ok",
            "results": []
        }))
        .unwrap();
        assert!(QuoteApiProvider::map_search_response(empty).unwrap().is_empty());

        let hits: SearchResponse = serde_json::from_value(json!({
            "s": "ok",
            "results": [{ "symbol": "AAPL", "name": "Apple Inc.", "currency": "USD" }]
        }))
        .unwrap();
        let results = QuoteApiProvider::map_search_response(hits).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].symbol, "AAPL");
        assert_eq!(results[0].source, "QUOTE_API");
    }

    #[test]
    fn test_daily_response_parsing() {
        let body: DailyResponse = serde_json::from_value(json!({
            "s": "ok",
            "days": ["2025-01-02", "2025-01-03"],
            "closes": ["241.80", "242.10"],
            "currency": "USD"
        }))
        .unwrap();
        assert_eq!(body.s, "ok");
        assert_eq!(body.days.unwrap().len(), 2);
        assert_eq!(body.closes.unwrap().len(), 2);
    }
}
