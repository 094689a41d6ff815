//! # Span tracing
//!
//! Session-scoped execution tracing written to an append-only JSON-lines file.
//!
//! ## File layout
//!
//! ```text
//! <root>/logs/traces/<namespace>-<YYYY-MM-DD>.trace.log
//! ```
//!
//! The date is the local calendar date at initialization. Each line is one
//! [`TraceEvent`]:
//!
//! ```json
//! {"ts":"2024-05-01T09:30:00.123Z","sid":"a8Kd02xQ","lyr":"DOMAIN","evt":"FETCH_QUOTE_COMPLETE","dat":{"symbol":"SPX","duration_ms":212.4}}
//! ```
//!
//! ## Gating
//!
//! | Check | Effect when it fails |
//! |-------|----------------------|
//! | [`TraceSwitch`] enabled | nothing recorded, spans run the bare operation |
//! | session initialized | nothing recorded |
//! | `dat.level` not more verbose than [`TracerConfig::level`] | event dropped |
//!
//! The switch is a shared handle and is read on every call, so flipping it
//! affects all later records.
//!
//! ## Failure policy
//!
//! Directory creation, serialization, and append failures are reported via
//! `tracing` and then discarded. [`SpanTracer::trace_span`] returns the
//! wrapped operation's `Result` exactly as produced.
//!
//! ## Example
//!
//! ```rust,ignore
//! use plnexus_core::trace::{Layer, SpanTracer, TraceLevel, TraceSwitch, TracerConfig};
//! use serde_json::json;
//!
//! let tracer = SpanTracer::new(TraceSwitch::new(true), TracerConfig::local(TraceLevel::Info));
//! tracer.initialize(root, "plnexus").await;
//!
//! let quote = tracer
//!     .trace_span(Layer::Domain, "fetch_quote", json!({ "symbol": "SPX" }), || {
//!         adapter.fetch_quote("SPX")
//!     })
//!     .await?;
//! ```

mod event;
mod tracer;

pub use event::{into_metadata, Layer, TraceEvent, TraceLevel};
pub use tracer::{Session, SpanTracer, TraceSwitch, TracerConfig, DEFAULT_NAMESPACE};
