use std::path::PathBuf;

use thiserror::Error;

/// Validation errors raised while constructing domain values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("invalid log level '{value}', expected one of error, warn, info, debug")]
    InvalidLevel { value: String },
}

/// Failures reading or parsing the adapter manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest missing at {}", path.display())]
    Missing { path: PathBuf },

    #[error("manifest unreadable at {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed manifest: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Failures producing a validated provider configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "no configuration validator registered for provider '{provider}'; known providers: {}",
        known.join(", ")
    )]
    ValidatorMissing { provider: String, known: Vec<String> },

    #[error("missing required variable {variable} for provider '{provider}'")]
    MissingVariable {
        provider: String,
        variable: &'static str,
    },

    #[error("invalid value for {variable} (provider '{provider}'): {reason}")]
    InvalidVariable {
        provider: String,
        variable: &'static str,
        reason: String,
    },
}

impl ConfigError {
    /// Operator-facing remediation hint logged next to the failure.
    pub fn remediation(&self) -> String {
        match self {
            Self::ValidatorMissing { provider, .. } => format!(
                "register a validator for '{provider}' or point the manifest configKey at a known provider"
            ),
            Self::MissingVariable { variable, .. } => {
                format!("set {variable} in the environment or in a .env file")
            }
            Self::InvalidVariable { variable, .. } => {
                format!("correct the value of {variable} in the environment or .env file")
            }
        }
    }
}

/// Adapter resolution failure, always scoped to the requested mode.
#[derive(Debug, Error)]
#[error("failed to load adapter for mode '{mode}': {kind}")]
pub struct ResolveError {
    mode: String,
    #[source]
    kind: ResolveErrorKind,
}

impl ResolveError {
    pub fn new(mode: impl Into<String>, kind: ResolveErrorKind) -> Self {
        Self {
            mode: mode.into(),
            kind,
        }
    }

    pub fn mode(&self) -> &str {
        &self.mode
    }

    pub fn kind(&self) -> &ResolveErrorKind {
        &self.kind
    }
}

/// Underlying cause of a [`ResolveError`].
#[derive(Debug, Error)]
pub enum ResolveErrorKind {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("unknown mode; available modes: {}", available.join(", "))]
    UnknownMode { available: Vec<String> },

    #[error("module not found: {module}; registered modules: {}", registered.join(", "))]
    ModuleNotFound {
        module: String,
        registered: Vec<String>,
    },

    #[error("export not found: '{export}' in module {module}")]
    ExportNotFound { module: String, export: String },

    #[error("manifest entry requires configuration but declares no configKey")]
    MissingConfigKey,

    #[error("constructor for '{export}' {expectation}")]
    ConstructorMismatch {
        export: String,
        expectation: &'static str,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Raised when the resolver is built without a root path.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("adapter resolver requires a root path")]
pub struct MissingRootError;
