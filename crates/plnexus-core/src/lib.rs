//! # plnexus core
//!
//! Quote port, adapter resolution, and span tracing for the plnexus CLI.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Mock and live (Alpha Vantage) quote adapters |
//! | [`data_source`] | `QuoteProvider` port and `SourceError` |
//! | [`domain`] | `MarketQuote` value object |
//! | [`error`] | Validation, manifest, config, and resolution errors |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`manifest`] | `config/adapters.manifest.json` model |
//! | [`provider_config`] | Provider configuration validators |
//! | [`registry`] | Module/export → adapter constructor table |
//! | [`resolver`] | Mode → adapter resolution |
//! | [`trace`] | Session-scoped span tracer |
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────┐
//! │  Orchestrator   │────▶│   SpanTracer     │──▶ logs/traces/*.trace.log
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ AdapterResolver │────▶│ adapters.manifest│
//! └────────┬────────┘     └──────────────────┘
//!          │   ▲
//!          │   └── ProviderConfigResolver (only when the entry requires config)
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ QuoteProvider   │────▶│ HttpClient       │
//! │ (mock / live)   │     │ (reqwest/static) │
//! └────────┬────────┘     └──────────────────┘
//!          ▼
//!     MarketQuote
//! ```
//!
//! ## Security
//!
//! - API keys come from the environment only and are redacted from `Debug`
//!   output of [`ProviderConfig`].

pub mod adapters;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod manifest;
pub mod provider_config;
pub mod registry;
pub mod resolver;
pub mod trace;

pub use adapters::{LiveAdapter, MockAdapter};

pub use data_source::{QuoteFuture, QuoteProvider, SourceError, SourceErrorKind};

pub use domain::{now_epoch_ms, MarketQuote, STALE_AFTER_MS};

pub use error::{
    ConfigError, ManifestError, MissingRootError, ResolveError, ResolveErrorKind, ValidationError,
};

pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient, StaticHttpClient,
};

pub use manifest::{AdapterManifest, ManifestEntry, MANIFEST_RELATIVE_PATH};

pub use provider_config::{
    AlphaVantageValidator, ConfigValidator, EnvLookup, ProviderConfig, ProviderConfigResolver,
    ProviderConfigSource,
};

pub use registry::{AdapterConstructor, AdapterModule, AdapterRegistry};

pub use resolver::AdapterResolver;

pub use trace::{Layer, Session, SpanTracer, TraceEvent, TraceLevel, TraceSwitch, TracerConfig};
