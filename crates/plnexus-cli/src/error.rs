use plnexus_core::{MissingRootError, ResolveError};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("input error: {0}")]
    Input(String),

    #[error("project root is not set; pass --root or set PLNEXUS_ROOT")]
    MissingRoot(#[from] MissingRootError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Carries no provider detail; the cause is logged where it is caught.
    #[error("unable to retrieve a quote for {symbol}; please try again later")]
    Fetch { symbol: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Input(_)
            | Self::MissingRoot(_)
            | Self::Resolve(_)
            | Self::Fetch { .. }
            | Self::Io(_) => 1,
        }
    }
}
