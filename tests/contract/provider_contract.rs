use std::sync::Arc;
use std::time::Duration;

use plnexus_core::{
    HttpResponse, LiveAdapter, MockAdapter, ProviderConfig, QuoteProvider, SourceErrorKind,
    StaticHttpClient,
};

struct ProviderCase {
    id: &'static str,
    source: Arc<dyn QuoteProvider>,
    source_label: &'static str,
}

fn provider_cases() -> Vec<ProviderCase> {
    let live_client = Arc::new(StaticHttpClient::responding(HttpResponse::ok_json(
        r#"{"Global Quote": {"01. symbol": "AAPL", "05. price": "189.9100"}}"#,
    )));
    let live_config = ProviderConfig::new("alphavantage", "https://example.test", "demo", 500);

    vec![
        ProviderCase {
            id: "mock",
            source: Arc::new(MockAdapter::default().with_latency(Duration::ZERO)),
            source_label: "Mock Provider",
        },
        ProviderCase {
            id: "live",
            source: Arc::new(LiveAdapter::with_http_client(live_client, live_config)),
            source_label: "Alpha Vantage",
        },
    ]
}

#[tokio::test]
async fn quote_returns_valid_structure_for_all_providers() {
    for case in provider_cases() {
        assert_eq!(case.source.id(), case.id);

        let quote = case
            .source
            .fetch_quote("aapl")
            .await
            .unwrap_or_else(|error| panic!("provider '{}' quote failed: {error}", case.id));

        assert_eq!(quote.symbol(), "AAPL", "provider '{}': symbol", case.id);
        assert!(quote.price() >= 0.0, "provider '{}': price", case.id);
        assert_eq!(quote.source(), case.source_label, "provider '{}': source", case.id);
        assert!(
            quote.age_ms() < 1_000,
            "provider '{}': freshly captured",
            case.id
        );
        assert!(!quote.is_stale(), "provider '{}': not stale", case.id);
    }
}

#[tokio::test]
async fn blank_symbol_is_rejected_by_all_providers() {
    for case in provider_cases() {
        let error = case
            .source
            .fetch_quote("   ")
            .await
            .expect_err("blank symbol must fail");

        assert_eq!(
            error.kind(),
            SourceErrorKind::InvalidRequest,
            "provider '{}': error kind",
            case.id
        );
        assert!(!error.retryable(), "provider '{}': not retryable", case.id);
    }
}
