//! Quote port and adapter-level errors.
//!
//! Every data-provider adapter implements [`QuoteProvider`]. The orchestrator
//! only ever sees `Box<dyn QuoteProvider>`, whichever adapter the manifest
//! selected.

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::MarketQuote;

/// Boxed future returned by [`QuoteProvider::fetch_quote`].
pub type QuoteFuture<'a> = Pin<Box<dyn Future<Output = Result<MarketQuote, SourceError>> + Send + 'a>>;

/// What went wrong inside an adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// Upstream down, throttled, or without data for the symbol.
    Unavailable,
    /// The request itself was unusable.
    InvalidRequest,
    /// The adapter could not make sense of what it received.
    Internal,
}

impl SourceErrorKind {
    pub const fn code(self) -> &'static str {
        match self {
            Self::Unavailable => "source.unavailable",
            Self::InvalidRequest => "source.invalid_request",
            Self::Internal => "source.internal",
        }
    }
}

/// Failure returned by a quote adapter.
///
/// The message may carry provider detail and is meant for diagnostics, not
/// for the operator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} ({})", .kind.code())]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn new(kind: SourceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Unavailable, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::InvalidRequest, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(SourceErrorKind::Internal, message)
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Only outages are worth retrying; nothing in this crate retries.
    pub const fn retryable(&self) -> bool {
        matches!(self.kind, SourceErrorKind::Unavailable)
    }

    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }
}

/// Quote adapter contract.
///
/// Implementations must be `Send + Sync`; the resolver hands them out as
/// trait objects.
pub trait QuoteProvider: Send + Sync {
    /// Short adapter identifier, e.g. `mock` or `live`.
    fn id(&self) -> &'static str;

    /// Fetches the latest quote for `symbol`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the symbol is blank, the upstream is
    /// unavailable, or the upstream payload cannot be normalized.
    fn fetch_quote<'a>(&'a self, symbol: &'a str) -> QuoteFuture<'a>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_appends_code() {
        let error = SourceError::unavailable("upstream returned 503");
        assert_eq!(error.to_string(), "upstream returned 503 (source.unavailable)");
    }

    #[test]
    fn only_unavailable_is_retryable() {
        assert!(SourceError::unavailable("x").retryable());
        assert!(!SourceError::invalid_request("x").retryable());
        assert!(!SourceError::internal("x").retryable());
    }
}
