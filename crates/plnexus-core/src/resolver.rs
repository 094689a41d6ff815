//! Manifest-driven adapter resolution.
//!
//! ```text
//! mode ──▶ manifest entry ──▶ module key ──▶ export ──▶ constructor
//!                                                        │
//!                      provider config (if required) ────┘
//! ```

use std::path::{Path, PathBuf};

use crate::data_source::QuoteProvider;
use crate::manifest::AdapterManifest;
use crate::provider_config::ProviderConfigSource;
use crate::registry::{resolve_module_key, AdapterConstructor, AdapterRegistry};
use crate::{MissingRootError, ResolveError, ResolveErrorKind};

/// Translates a mode identifier into a constructed quote adapter.
#[derive(Debug, Clone)]
pub struct AdapterResolver {
    root: PathBuf,
    registry: AdapterRegistry,
}

impl AdapterResolver {
    /// Resolver over the built-in adapters.
    pub fn new(root: Option<PathBuf>) -> Result<Self, MissingRootError> {
        Self::with_registry(root, AdapterRegistry::builtin())
    }

    pub fn with_registry(
        root: Option<PathBuf>,
        registry: AdapterRegistry,
    ) -> Result<Self, MissingRootError> {
        let root = root
            .filter(|root| !root.as_os_str().is_empty())
            .ok_or(MissingRootError)?;
        Ok(Self { root, registry })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Loads the adapter declared for `mode`.
    ///
    /// The manifest is re-read on every call. Every failure is logged with the
    /// mode and returned as a [`ResolveError`].
    pub async fn load_adapter(
        &self,
        mode: &str,
        config_source: &dyn ProviderConfigSource,
    ) -> Result<Box<dyn QuoteProvider>, ResolveError> {
        match self.try_load(mode, config_source).await {
            Ok(adapter) => {
                tracing::debug!(mode, adapter = adapter.id(), "adapter resolved");
                Ok(adapter)
            }
            Err(kind) => {
                tracing::error!(
                    mode,
                    error = %kind,
                    detail = ?kind,
                    root = %self.root.display(),
                    "adapter resolution failed"
                );
                Err(ResolveError::new(mode, kind))
            }
        }
    }

    async fn try_load(
        &self,
        mode: &str,
        config_source: &dyn ProviderConfigSource,
    ) -> Result<Box<dyn QuoteProvider>, ResolveErrorKind> {
        let manifest = AdapterManifest::load(&self.root).await?;

        let entry = manifest
            .entry(mode)
            .ok_or_else(|| ResolveErrorKind::UnknownMode {
                available: manifest.modes(),
            })?;

        let module_key = resolve_module_key(&self.root, &entry.path);
        let module = self
            .registry
            .module(&module_key)
            .ok_or_else(|| ResolveErrorKind::ModuleNotFound {
                module: module_key.display().to_string(),
                registered: self.registry.module_keys(),
            })?;

        let constructor =
            module
                .get(&entry.class_name)
                .ok_or_else(|| ResolveErrorKind::ExportNotFound {
                    module: module_key.display().to_string(),
                    export: entry.class_name.clone(),
                })?;

        match (entry.requires_config, constructor) {
            (true, AdapterConstructor::Configured(build)) => {
                let provider = entry
                    .config_key
                    .as_deref()
                    .filter(|key| !key.trim().is_empty())
                    .ok_or(ResolveErrorKind::MissingConfigKey)?;
                let config = config_source.provider_config(provider).await?;
                Ok(build(config))
            }
            (false, AdapterConstructor::Plain(build)) => Ok(build()),
            (true, AdapterConstructor::Plain(_)) => Err(ResolveErrorKind::ConstructorMismatch {
                export: entry.class_name.clone(),
                expectation: "takes no configuration but the manifest requires one",
            }),
            (false, AdapterConstructor::Configured(_)) => {
                Err(ResolveErrorKind::ConstructorMismatch {
                    export: entry.class_name.clone(),
                    expectation: "requires configuration but the manifest declares none",
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_requires_root() {
        assert_eq!(AdapterResolver::new(None).unwrap_err(), MissingRootError);
        assert_eq!(
            AdapterResolver::new(Some(PathBuf::new())).unwrap_err(),
            MissingRootError
        );
    }

    #[test]
    fn keeps_root() {
        let resolver = AdapterResolver::new(Some(PathBuf::from("/srv/plnexus"))).expect("root");
        assert_eq!(resolver.root(), Path::new("/srv/plnexus"));
    }
}
