//! Process settings hydrated from the environment.

use std::path::PathBuf;

use plnexus_core::trace::DEFAULT_NAMESPACE;
use plnexus_core::{TraceLevel, TraceSwitch};

pub const ENABLE_TRACING: &str = "ENABLE_TRACING";
pub const LOG_LEVEL: &str = "LOG_LEVEL";
pub const TRACE_NAMESPACE: &str = "PLNEXUS_TRACE_NAMESPACE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub tracing_enabled: bool,
    pub log_level: TraceLevel,
    pub root: Option<PathBuf>,
    pub namespace: String,
}

impl Settings {
    /// Reads the process environment. `root` comes from `--root`/`PLNEXUS_ROOT`
    /// and falls back to the current directory.
    pub fn from_env(root: Option<PathBuf>) -> Self {
        Self::from_lookup(|name| std::env::var(name).ok(), root)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>, root: Option<PathBuf>) -> Self {
        let tracing_enabled = TraceSwitch::from_flag(lookup(ENABLE_TRACING).as_deref()).is_enabled();

        let log_level = match lookup(LOG_LEVEL) {
            None => TraceLevel::default(),
            Some(raw) => raw.parse().unwrap_or_else(|error| {
                tracing::warn!(%error, "falling back to info trace level");
                TraceLevel::default()
            }),
        };

        let namespace = lookup(TRACE_NAMESPACE)
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_owned());

        let root = root.or_else(|| std::env::current_dir().ok());

        Self {
            tracing_enabled,
            log_level,
            root,
            namespace,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> Settings {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        Settings::from_lookup(
            |name| values.get(name).cloned(),
            Some(PathBuf::from("/srv/plnexus")),
        )
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let settings = settings(&[]);
        assert!(!settings.tracing_enabled);
        assert_eq!(settings.log_level, TraceLevel::Info);
        assert_eq!(settings.namespace, DEFAULT_NAMESPACE);
        assert_eq!(settings.root, Some(PathBuf::from("/srv/plnexus")));
    }

    #[test]
    fn tracing_flag_is_case_insensitive_true_only() {
        assert!(settings(&[(ENABLE_TRACING, "TRUE")]).tracing_enabled);
        assert!(settings(&[(ENABLE_TRACING, "true")]).tracing_enabled);
        assert!(!settings(&[(ENABLE_TRACING, "1")]).tracing_enabled);
        assert!(!settings(&[(ENABLE_TRACING, "yes")]).tracing_enabled);
    }

    #[test]
    fn invalid_log_level_falls_back_to_info() {
        assert_eq!(settings(&[(LOG_LEVEL, "debug")]).log_level, TraceLevel::Debug);
        assert_eq!(settings(&[(LOG_LEVEL, "verbose")]).log_level, TraceLevel::Info);
    }

    #[test]
    fn custom_namespace_is_trimmed() {
        assert_eq!(settings(&[(TRACE_NAMESPACE, " quotes ")]).namespace, "quotes");
        assert_eq!(settings(&[(TRACE_NAMESPACE, "  ")]).namespace, DEFAULT_NAMESPACE);
    }
}
