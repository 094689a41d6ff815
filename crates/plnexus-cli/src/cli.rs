//! CLI argument definitions for plnexus.
//!
//! # Usage
//!
//! | Invocation | Behavior |
//! |------------|----------|
//! | `plnexus` | prompt for mode and symbol |
//! | `plnexus --mock spx` | simulated quote for `SPX` |
//! | `plnexus --live AAPL` | Alpha Vantage quote for `AAPL` |
//! | `plnexus --live` | live mode, prompt for the symbol |
//!
//! # Environment
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `PLNEXUS_ROOT` | current directory | project root holding `config/` and `logs/` |
//! | `ENABLE_TRACING` | `false` | write span traces under `logs/traces/` |
//! | `LOG_LEVEL` | `info` | most verbose trace level written |
//! | `ALPHAVANTAGE_API_KEY` | | required by `--live` |

use std::path::PathBuf;

use clap::Parser;

/// plnexus - market quote lookup with span tracing
#[derive(Debug, Parser)]
#[command(
    name = "plnexus",
    author,
    version,
    about = "Fetch a market quote from a simulated or live provider",
    long_about = "Fetches one market quote and prints it to the terminal.\n\
\n\
Without --live or --mock the mode is chosen from an interactive menu; without a \
symbol you are prompted for one (default SPX)."
)]
pub struct Cli {
    /// Ticker symbol to quote.
    pub symbol: Option<String>,

    /// Use live market data (mode 1).
    #[arg(long, conflicts_with = "mock")]
    pub live: bool,

    /// Use simulated market data (mode 2).
    #[arg(long)]
    pub mock: bool,

    /// Project root containing config/adapters.manifest.json.
    #[arg(long, env = "PLNEXUS_ROOT", value_name = "DIR")]
    pub root: Option<PathBuf>,
}

impl Cli {
    /// Mode selected by flags, if any.
    pub fn mode(&self) -> Option<Mode> {
        if self.live {
            Some(Mode::Live)
        } else if self.mock {
            Some(Mode::Mock)
        } else {
            None
        }
    }

    /// Symbol argument with surrounding whitespace removed; blank counts as absent.
    pub fn symbol(&self) -> Option<&str> {
        self.symbol
            .as_deref()
            .map(str::trim)
            .filter(|symbol| !symbol.is_empty())
    }
}

/// Execution mode offered to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Live,
    Mock,
}

impl Mode {
    pub const ALL: [Self; 2] = [Self::Live, Self::Mock];

    /// Manifest key for this mode.
    pub const fn key(self) -> &'static str {
        match self {
            Self::Live => "1",
            Self::Mock => "2",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Live => "Live Market Data",
            Self::Mock => "Mock/Simulation",
        }
    }

    /// Parses a menu choice.
    pub fn from_choice(choice: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.key() == choice.trim())
    }
}
