use std::time::Duration;

use crate::data_source::{QuoteFuture, QuoteProvider, SourceError};
use crate::MarketQuote;

/// Source label stamped on every simulated quote.
pub const MOCK_SOURCE: &str = "Mock Provider";

/// Simulated quote adapter. Needs no configuration.
#[derive(Debug, Clone)]
pub struct MockAdapter {
    latency: Duration,
    failure_rate: f64,
}

impl Default for MockAdapter {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(200),
            failure_rate: 0.0,
        }
    }
}

impl MockAdapter {
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Probability in `[0, 1]` that a fetch fails with a simulated outage.
    pub fn with_failure_rate(mut self, failure_rate: f64) -> Self {
        self.failure_rate = failure_rate.clamp(0.0, 1.0);
        self
    }

    fn simulated_price(symbol: &str) -> f64 {
        let seed = symbol_seed(symbol);
        let base = 95.0 + (seed % 5_100) as f64 / 10.0;
        let jitter = (fastrand::f64() - 0.5) * 2.0;
        ((base + jitter) * 100.0).round() / 100.0
    }
}

impl QuoteProvider for MockAdapter {
    fn id(&self) -> &'static str {
        "mock"
    }

    fn fetch_quote<'a>(&'a self, symbol: &'a str) -> QuoteFuture<'a> {
        Box::pin(async move {
            if symbol.trim().is_empty() {
                return Err(SourceError::invalid_request(
                    "mock quote request requires a symbol",
                ));
            }

            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }

            if self.failure_rate > 0.0 && fastrand::f64() < self.failure_rate {
                return Err(SourceError::unavailable(format!(
                    "simulated upstream outage for {}",
                    symbol.trim().to_uppercase()
                )));
            }

            let price = Self::simulated_price(&symbol.trim().to_uppercase());
            MarketQuote::captured_now(symbol, price, Some(MOCK_SOURCE))
                .map_err(|error| SourceError::internal(error.to_string()))
        })
    }
}

fn symbol_seed(symbol: &str) -> u64 {
    symbol.bytes().fold(13_u64, |acc, byte| {
        acc.wrapping_mul(29).wrapping_add(u64::from(byte))
    })
}
