use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::ValidationError;

/// Age after which a quote is considered stale.
pub const STALE_AFTER_MS: i64 = 60_000;

const UNKNOWN_SOURCE: &str = "UNKNOWN";

/// One priced snapshot for a symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "QuoteRecord")]
pub struct MarketQuote {
    symbol: String,
    price: f64,
    timestamp: i64,
    source: String,
}

impl MarketQuote {
    /// Builds a quote, normalizing the symbol to uppercase.
    ///
    /// A missing or blank `source` is recorded as `UNKNOWN`.
    pub fn new(
        symbol: &str,
        price: f64,
        timestamp: i64,
        source: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let symbol = symbol.trim();
        if symbol.is_empty() {
            return Err(ValidationError::EmptySymbol);
        }
        validate_non_negative("price", price)?;

        let source = source
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(UNKNOWN_SOURCE);

        Ok(Self {
            symbol: symbol.to_uppercase(),
            price,
            timestamp,
            source: source.to_owned(),
        })
    }

    /// Builds a quote stamped with the current wall-clock time.
    pub fn captured_now(
        symbol: &str,
        price: f64,
        source: Option<&str>,
    ) -> Result<Self, ValidationError> {
        Self::new(symbol, price, now_epoch_ms(), source)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    /// Capture time in epoch milliseconds.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Milliseconds elapsed since capture. Never negative.
    pub fn age_ms(&self) -> i64 {
        now_epoch_ms().saturating_sub(self.timestamp).max(0)
    }

    pub fn is_stale(&self) -> bool {
        self.age_ms() > STALE_AFTER_MS
    }

    /// Capture time rendered as RFC 3339 (UTC), if representable.
    pub fn captured_at(&self) -> Option<String> {
        let nanos = i128::from(self.timestamp) * 1_000_000;
        OffsetDateTime::from_unix_timestamp_nanos(nanos)
            .ok()
            .and_then(|value| value.format(&Rfc3339).ok())
    }
}

/// Wire shape of a quote; deserialization goes through [`MarketQuote::new`].
#[derive(Deserialize)]
struct QuoteRecord {
    symbol: String,
    price: f64,
    timestamp: i64,
    #[serde(default)]
    source: Option<String>,
}

impl TryFrom<QuoteRecord> for MarketQuote {
    type Error = ValidationError;

    fn try_from(record: QuoteRecord) -> Result<Self, Self::Error> {
        Self::new(
            &record.symbol,
            record.price,
            record.timestamp,
            record.source.as_deref(),
        )
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
    i64::try_from(nanos / 1_000_000).unwrap_or(i64::MAX)
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}
