use std::sync::Arc;

use serde::Deserialize;

use crate::data_source::{QuoteFuture, QuoteProvider, SourceError};
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::provider_config::ProviderConfig;
use crate::MarketQuote;

/// Source label stamped on quotes from the live provider.
pub const LIVE_SOURCE: &str = "Alpha Vantage";

/// Live Alpha Vantage adapter. Constructed only with a validated configuration.
#[derive(Clone)]
pub struct LiveAdapter {
    http_client: Arc<dyn HttpClient>,
    config: ProviderConfig,
}

impl LiveAdapter {
    pub fn new(config: ProviderConfig) -> Self {
        Self::with_http_client(Arc::new(ReqwestHttpClient::new()), config)
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>, config: ProviderConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

impl QuoteProvider for LiveAdapter {
    fn id(&self) -> &'static str {
        "live"
    }

    fn fetch_quote<'a>(&'a self, symbol: &'a str) -> QuoteFuture<'a> {
        Box::pin(async move {
            let symbol = symbol.trim();
            if symbol.is_empty() {
                return Err(SourceError::invalid_request(
                    "live quote request requires a symbol",
                ));
            }

            let request = HttpRequest::get(format!("{}/query", self.config.base_url()))
                .with_query("function", "GLOBAL_QUOTE")
                .with_query("symbol", symbol.to_uppercase())
                .with_query("apikey", self.config.api_key())
                .with_timeout_ms(self.config.timeout_ms());

            let response = self.http_client.execute(request).await.map_err(|error| {
                SourceError::unavailable(format!("alphavantage transport error: {error}"))
            })?;

            if !response.is_success() {
                return Err(SourceError::unavailable(format!(
                    "alphavantage returned status {}",
                    response.status
                )));
            }

            let payload: GlobalQuoteResponse = serde_json::from_str(&response.body).map_err(|e| {
                SourceError::internal(format!("failed to parse alphavantage response: {e}"))
            })?;

            let quote = payload
                .quote
                .filter(|quote| !quote.price.trim().is_empty())
                .ok_or_else(|| SourceError::unavailable("no quote data in alphavantage response"))?;

            let price = quote.price.trim().parse::<f64>().map_err(|_| {
                SourceError::internal(format!("alphavantage price '{}' is not numeric", quote.price))
            })?;
            let reported_symbol = quote.symbol.as_deref().unwrap_or(symbol);

            MarketQuote::captured_now(reported_symbol, price, Some(LIVE_SOURCE))
                .map_err(|error| SourceError::internal(error.to_string()))
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote", default)]
    quote: Option<GlobalQuoteData>,
}

#[derive(Debug, Clone, Deserialize)]
struct GlobalQuoteData {
    #[serde(rename = "01. symbol", default)]
    symbol: Option<String>,
    #[serde(rename = "05. price", default)]
    price: String,
}
