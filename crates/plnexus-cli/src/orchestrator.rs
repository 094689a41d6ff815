//! Sequencing of one end-to-end quote retrieval.
//!
//! ```text
//! UNSTARTED ─▶ TRACER_READY ─▶ MODE_AND_SYMBOL_RESOLVED ─▶ ADAPTER_RESOLVED
//!                                                                │
//!                               RENDERED ◀─ QUOTE_FETCHED ◀──────┘
//! ```
//!
//! States only move forward. The first failure ends the run: it is recorded
//! as `CLI/RUN_FAILED`, handed to the presenter, and returned.

use std::path::PathBuf;
use std::sync::Arc;

use plnexus_core::{
    AdapterResolver, Layer, MarketQuote, ProviderConfigSource, QuoteProvider, SpanTracer,
};
use serde_json::json;
use tokio::io::{AsyncBufRead, AsyncWrite};

use crate::cli::Mode;
use crate::error::CliError;
use crate::presenter::QuotePresenter;
use crate::prompt::Prompt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RunState {
    Unstarted,
    TracerReady,
    ModeAndSymbolResolved,
    AdapterResolved,
    QuoteFetched,
    Rendered,
}

impl RunState {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unstarted => "UNSTARTED",
            Self::TracerReady => "TRACER_READY",
            Self::ModeAndSymbolResolved => "MODE_AND_SYMBOL_RESOLVED",
            Self::AdapterResolved => "ADAPTER_RESOLVED",
            Self::QuoteFetched => "QUOTE_FETCHED",
            Self::Rendered => "RENDERED",
        }
    }
}

/// What the command line already decided; the rest is prompted for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunRequest {
    pub mode: Option<Mode>,
    pub symbol: Option<String>,
}

pub struct Orchestrator {
    tracer: SpanTracer,
    root: Option<PathBuf>,
    namespace: String,
    config_source: Arc<dyn ProviderConfigSource>,
    presenter: Arc<dyn QuotePresenter>,
    resolver: Option<AdapterResolver>,
}

impl Orchestrator {
    pub fn new(
        tracer: SpanTracer,
        root: Option<PathBuf>,
        namespace: impl Into<String>,
        config_source: Arc<dyn ProviderConfigSource>,
        presenter: Arc<dyn QuotePresenter>,
    ) -> Self {
        Self {
            tracer,
            root,
            namespace: namespace.into(),
            config_source,
            presenter,
            resolver: None,
        }
    }

    /// Replaces the resolver built from the root, e.g. one with a custom registry.
    #[cfg(test)]
    pub fn with_resolver(mut self, resolver: AdapterResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Runs one retrieval. Failures are reported to the presenter before
    /// being returned.
    pub async fn run<R, W>(
        &self,
        request: RunRequest,
        prompt: &mut Prompt<R, W>,
    ) -> Result<MarketQuote, CliError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut state = RunState::Unstarted;
        match self.drive(request, prompt, &mut state).await {
            Ok(quote) => Ok(quote),
            Err(error) => {
                self.tracer
                    .record(
                        Layer::Cli,
                        "RUN_FAILED",
                        json!({
                            "state": state.as_str(),
                            "error": error.to_string(),
                            "level": "error",
                        }),
                    )
                    .await;
                self.presenter.render_error(&error.to_string());
                Err(error)
            }
        }
    }

    async fn drive<R, W>(
        &self,
        request: RunRequest,
        prompt: &mut Prompt<R, W>,
        state: &mut RunState,
    ) -> Result<MarketQuote, CliError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let resolver = match &self.resolver {
            Some(resolver) => resolver.clone(),
            None => AdapterResolver::new(self.root.clone())?,
        };

        self.tracer
            .initialize(resolver.root(), &self.namespace)
            .await;
        advance(state, RunState::TracerReady);
        self.tracer
            .record(
                Layer::Cli,
                "SESSION_START",
                json!({
                    "mode_flag": request.mode.map(Mode::key),
                    "symbol_arg": request.symbol.as_deref(),
                }),
            )
            .await;

        let mode = match request.mode {
            Some(mode) => mode,
            None => prompt.choose_mode().await?,
        };
        let symbol = match request.symbol {
            Some(symbol) => symbol,
            None => prompt.ask_symbol().await?,
        };
        advance(state, RunState::ModeAndSymbolResolved);
        self.tracer
            .record(
                Layer::Cli,
                "MODE_SELECTED",
                json!({ "mode": mode.key(), "label": mode.label(), "symbol": symbol }),
            )
            .await;

        let adapter: Box<dyn QuoteProvider> = self
            .tracer
            .trace_span(
                Layer::Infra,
                "adapter_load",
                json!({ "mode": mode.key() }),
                || resolver.load_adapter(mode.key(), self.config_source.as_ref()),
            )
            .await?;
        advance(state, RunState::AdapterResolved);

        let quote = self
            .tracer
            .trace_span(
                Layer::Domain,
                "fetch_quote",
                json!({ "symbol": symbol, "adapter": adapter.id() }),
                || adapter.fetch_quote(&symbol),
            )
            .await
            .map_err(|error| {
                tracing::error!(
                    adapter = adapter.id(),
                    symbol = %symbol,
                    kind = ?error.kind(),
                    retryable = error.retryable(),
                    error = %error,
                    "quote fetch failed"
                );
                CliError::Fetch {
                    symbol: symbol.trim().to_uppercase(),
                }
            })?;
        advance(state, RunState::QuoteFetched);

        self.presenter.render(&quote);
        advance(state, RunState::Rendered);
        self.tracer
            .record(
                Layer::Cli,
                "QUOTE_RENDERED",
                json!({
                    "symbol": quote.symbol(),
                    "source": quote.source(),
                    "stale": quote.is_stale(),
                }),
            )
            .await;

        Ok(quote)
    }
}

fn advance(state: &mut RunState, next: RunState) {
    tracing::debug!(from = state.as_str(), to = next.as_str(), "run state advanced");
    *state = next;
}
