//! Provider configuration contracts.
//!
//! Validators are registered as factories and only constructed when their
//! provider is requested, so a provider nobody selected never inspects the
//! environment. Nothing here is cached: every call re-validates.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::ConfigError;

/// Provider key of the live Alpha Vantage adapter.
pub const ALPHAVANTAGE: &str = "alphavantage";

const ALPHAVANTAGE_DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";
const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Environment lookup used by validators.
pub type EnvLookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

type ValidatorFactory = Box<dyn Fn() -> Box<dyn ConfigValidator> + Send + Sync>;

/// Boxed future returned by [`ProviderConfigSource::provider_config`].
pub type ConfigFuture<'a> = Pin<Box<dyn Future<Output = Result<ProviderConfig, ConfigError>> + Send + 'a>>;

/// Validated, immutable configuration for one data provider.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    provider: String,
    base_url: String,
    api_key: String,
    timeout_ms: u64,
}

impl ProviderConfig {
    pub fn new(
        provider: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout_ms: u64,
    ) -> Self {
        Self {
            provider: provider.into(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout_ms,
        }
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

/// Source of provider configuration consumed by the adapter resolver.
pub trait ProviderConfigSource: Send + Sync {
    fn provider_config<'a>(&'a self, provider: &'a str) -> ConfigFuture<'a>;
}

/// Provider-specific validation of environment-supplied settings.
pub trait ConfigValidator: Send + Sync {
    fn provider(&self) -> &'static str;

    fn validate(&self, env: &EnvLookup) -> Result<ProviderConfig, ConfigError>;
}

/// Validator for the Alpha Vantage live provider.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlphaVantageValidator;

impl AlphaVantageValidator {
    pub const API_KEY: &'static str = "ALPHAVANTAGE_API_KEY";
    pub const BASE_URL: &'static str = "ALPHAVANTAGE_BASE_URL";
    pub const TIMEOUT_MS: &'static str = "ALPHAVANTAGE_TIMEOUT_MS";
}

impl ConfigValidator for AlphaVantageValidator {
    fn provider(&self) -> &'static str {
        ALPHAVANTAGE
    }

    fn validate(&self, env: &EnvLookup) -> Result<ProviderConfig, ConfigError> {
        let api_key = non_blank(env(Self::API_KEY)).ok_or_else(|| ConfigError::MissingVariable {
            provider: ALPHAVANTAGE.to_owned(),
            variable: Self::API_KEY,
        })?;

        let base_url = non_blank(env(Self::BASE_URL))
            .unwrap_or_else(|| ALPHAVANTAGE_DEFAULT_BASE_URL.to_owned());
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(ConfigError::InvalidVariable {
                provider: ALPHAVANTAGE.to_owned(),
                variable: Self::BASE_URL,
                reason: String::from("must be an http(s) URL"),
            });
        }

        let timeout_ms = match non_blank(env(Self::TIMEOUT_MS)) {
            None => DEFAULT_TIMEOUT_MS,
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|value| *value > 0)
                .ok_or_else(|| ConfigError::InvalidVariable {
                    provider: ALPHAVANTAGE.to_owned(),
                    variable: Self::TIMEOUT_MS,
                    reason: format!("'{raw}' is not a positive integer"),
                })?,
        };

        Ok(ProviderConfig::new(
            ALPHAVANTAGE,
            base_url.trim_end_matches('/'),
            api_key,
            timeout_ms,
        ))
    }
}

/// Resolves provider configuration by provider name.
pub struct ProviderConfigResolver {
    validators: BTreeMap<String, ValidatorFactory>,
    env: EnvLookup,
}

impl ProviderConfigResolver {
    /// Empty resolver reading from the given lookup.
    pub fn new(env: EnvLookup) -> Self {
        Self {
            validators: BTreeMap::new(),
            env,
        }
    }

    /// Built-in validators reading from the process environment.
    pub fn from_env() -> Self {
        Self::new(Arc::new(|name: &str| std::env::var(name).ok())).with_builtin_validators()
    }

    /// Built-in validators reading from a fixed variable map.
    pub fn with_lookup(values: HashMap<String, String>) -> Self {
        Self::new(Arc::new(move |name: &str| values.get(name).cloned()))
            .with_builtin_validators()
    }

    pub fn with_builtin_validators(self) -> Self {
        self.register(ALPHAVANTAGE, || Box::new(AlphaVantageValidator))
    }

    pub fn register<F>(mut self, provider: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Box<dyn ConfigValidator> + Send + Sync + 'static,
    {
        self.validators.insert(provider.into(), Box::new(factory));
        self
    }

    pub fn providers(&self) -> Vec<String> {
        self.validators.keys().cloned().collect()
    }

    /// Validates and returns the configuration for `provider`.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ValidatorMissing`] when no validator is registered, or
    /// whatever the validator reports. Failures are logged with a remediation
    /// hint before being returned.
    pub fn get_provider_config(&self, provider: &str) -> Result<ProviderConfig, ConfigError> {
        let result = match self.validators.get(provider) {
            Some(factory) => factory().validate(&self.env),
            None => Err(ConfigError::ValidatorMissing {
                provider: provider.to_owned(),
                known: self.providers(),
            }),
        };

        if let Err(error) = &result {
            tracing::error!(
                provider,
                error = %error,
                hint = %error.remediation(),
                "provider configuration failed"
            );
        }
        result
    }
}

impl ProviderConfigSource for ProviderConfigResolver {
    fn provider_config<'a>(&'a self, provider: &'a str) -> ConfigFuture<'a> {
        Box::pin(async move { self.get_provider_config(provider) })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect()
    }

    #[test]
    fn validates_alphavantage_with_defaults() {
        let resolver =
            ProviderConfigResolver::with_lookup(lookup(&[("ALPHAVANTAGE_API_KEY", "secret")]));

        let config = resolver
            .get_provider_config(ALPHAVANTAGE)
            .expect("key present");
        assert_eq!(config.provider(), "alphavantage");
        assert_eq!(config.api_key(), "secret");
        assert_eq!(config.base_url(), "https://www.alphavantage.co");
        assert_eq!(config.timeout_ms(), 5_000);
    }

    #[test]
    fn missing_api_key_is_reported() {
        let resolver = ProviderConfigResolver::with_lookup(HashMap::new());

        let err = resolver
            .get_provider_config(ALPHAVANTAGE)
            .expect_err("key absent");
        assert_eq!(
            err,
            ConfigError::MissingVariable {
                provider: String::from("alphavantage"),
                variable: "ALPHAVANTAGE_API_KEY",
            }
        );
        assert!(err.remediation().contains("ALPHAVANTAGE_API_KEY"));
    }

    #[test]
    fn rejects_non_numeric_timeout() {
        let resolver = ProviderConfigResolver::with_lookup(lookup(&[
            ("ALPHAVANTAGE_API_KEY", "secret"),
            ("ALPHAVANTAGE_TIMEOUT_MS", "soon"),
        ]));

        let err = resolver
            .get_provider_config(ALPHAVANTAGE)
            .expect_err("bad timeout");
        assert!(matches!(
            err,
            ConfigError::InvalidVariable {
                variable: "ALPHAVANTAGE_TIMEOUT_MS",
                ..
            }
        ));
    }

    #[test]
    fn unknown_provider_has_no_validator() {
        let resolver = ProviderConfigResolver::with_lookup(HashMap::new());

        let err = resolver.get_provider_config("bloomberg").expect_err("unknown");
        assert!(matches!(
            &err,
            ConfigError::ValidatorMissing { provider, known }
                if provider == "bloomberg" && known == &["alphavantage"]
        ));
        assert!(err.to_string().contains("known providers: alphavantage"));
    }

    #[test]
    fn revalidates_on_every_call() {
        let values = Arc::new(Mutex::new(HashMap::<String, String>::new()));
        let env_values = Arc::clone(&values);
        let resolver = ProviderConfigResolver::new(Arc::new(move |name: &str| {
            env_values.lock().ok().and_then(|guard| guard.get(name).cloned())
        }))
        .with_builtin_validators();

        assert!(resolver.get_provider_config(ALPHAVANTAGE).is_err());

        values
            .lock()
            .expect("lock")
            .insert(String::from("ALPHAVANTAGE_API_KEY"), String::from("late"));
        let config = resolver
            .get_provider_config(ALPHAVANTAGE)
            .expect("observes new value");
        assert_eq!(config.api_key(), "late");
    }

    #[test]
    fn validators_are_constructed_lazily() {
        static BUILT: AtomicUsize = AtomicUsize::new(0);

        let resolver = ProviderConfigResolver::with_lookup(HashMap::new()).register("counted", || {
            BUILT.fetch_add(1, Ordering::SeqCst);
            Box::new(AlphaVantageValidator)
        });
        assert_eq!(BUILT.load(Ordering::SeqCst), 0);

        let _ = resolver.get_provider_config(ALPHAVANTAGE);
        assert_eq!(BUILT.load(Ordering::SeqCst), 0);

        let _ = resolver.get_provider_config("counted");
        assert_eq!(BUILT.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let config = ProviderConfig::new(ALPHAVANTAGE, "https://example.test", "secret", 10);
        assert!(!format!("{config:?}").contains("secret"));
    }
}
