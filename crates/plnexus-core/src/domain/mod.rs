//! Domain values shared by adapters, the orchestrator, and presenters.

mod quote;

pub use quote::{now_epoch_ms, MarketQuote, STALE_AFTER_MS};
