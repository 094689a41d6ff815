//! Static table of adapter constructors.
//!
//! Manifest entries name a module reference and an export. The registry maps
//! both to a constructor; nothing is built until the resolver asks for it.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::adapters::{LiveAdapter, MockAdapter};
use crate::data_source::QuoteProvider;
use crate::provider_config::ProviderConfig;

/// Module reference of the simulated adapter.
pub const MOCK_MODULE: &str = "adapters/mock";
/// Module reference of the live adapter.
pub const LIVE_MODULE: &str = "adapters/live";

type PlainFn = dyn Fn() -> Box<dyn QuoteProvider> + Send + Sync;
type ConfiguredFn = dyn Fn(ProviderConfig) -> Box<dyn QuoteProvider> + Send + Sync;

/// How an exported adapter is constructed.
#[derive(Clone)]
pub enum AdapterConstructor {
    /// Takes no arguments.
    Plain(Arc<PlainFn>),
    /// Takes the validated provider configuration as its single argument.
    Configured(Arc<ConfiguredFn>),
}

impl AdapterConstructor {
    pub fn plain<F>(factory: F) -> Self
    where
        F: Fn() -> Box<dyn QuoteProvider> + Send + Sync + 'static,
    {
        Self::Plain(Arc::new(factory))
    }

    pub fn configured<F>(factory: F) -> Self
    where
        F: Fn(ProviderConfig) -> Box<dyn QuoteProvider> + Send + Sync + 'static,
    {
        Self::Configured(Arc::new(factory))
    }

    pub const fn requires_config(&self) -> bool {
        matches!(self, Self::Configured(_))
    }
}

impl std::fmt::Debug for AdapterConstructor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain(_) => f.write_str("AdapterConstructor::Plain"),
            Self::Configured(_) => f.write_str("AdapterConstructor::Configured"),
        }
    }
}

/// Named exports of one module.
#[derive(Debug, Clone, Default)]
pub struct AdapterModule {
    exports: BTreeMap<String, AdapterConstructor>,
}

impl AdapterModule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn export(mut self, name: impl Into<String>, constructor: AdapterConstructor) -> Self {
        self.exports.insert(name.into(), constructor);
        self
    }

    pub fn get(&self, name: &str) -> Option<&AdapterConstructor> {
        self.exports.get(name)
    }
}

/// Module reference → module table.
#[derive(Debug, Clone, Default)]
pub struct AdapterRegistry {
    modules: BTreeMap<PathBuf, AdapterModule>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the mock and live adapters.
    pub fn builtin() -> Self {
        Self::new()
            .with_module(
                MOCK_MODULE,
                AdapterModule::new().export(
                    "MockAdapter",
                    AdapterConstructor::plain(|| Box::new(MockAdapter::default())),
                ),
            )
            .with_module(
                LIVE_MODULE,
                AdapterModule::new().export(
                    "LiveAdapter",
                    AdapterConstructor::configured(|config| Box::new(LiveAdapter::new(config))),
                ),
            )
    }

    /// Registers `module` under a root-relative (or absolute) reference.
    pub fn with_module(mut self, reference: impl AsRef<Path>, module: AdapterModule) -> Self {
        self.modules
            .insert(normalize_lexically(reference.as_ref()), module);
        self
    }

    pub fn module(&self, key: &Path) -> Option<&AdapterModule> {
        self.modules.get(key)
    }

    pub fn module_keys(&self) -> Vec<String> {
        self.modules
            .keys()
            .map(|key| key.display().to_string())
            .collect()
    }
}

/// Turns a manifest module reference into a registry key.
///
/// Relative references are joined onto `root`. Paths inside `root` are keyed
/// relative to it; paths outside stay absolute.
pub fn resolve_module_key(root: &Path, reference: &str) -> PathBuf {
    let reference = Path::new(reference);
    let absolute = if reference.is_absolute() {
        normalize_lexically(reference)
    } else {
        normalize_lexically(&root.join(reference))
    };
    let root = normalize_lexically(root);

    match absolute.strip_prefix(&root) {
        Ok(relative) => relative.to_path_buf(),
        Err(_) => absolute,
    }
}

/// Removes `.` components and folds `..` without touching the filesystem.
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}
