//! Behavior-driven tests for manifest-driven adapter resolution
//!
//! These tests verify WHICH adapter an operator gets for a mode, and that
//! every way resolution can fail surfaces as one mode-scoped error.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use plnexus_core::provider_config::ConfigFuture;
use plnexus_core::{
    AdapterConstructor, AdapterModule, AdapterRegistry, AdapterResolver, ConfigError,
    ManifestError, MockAdapter, ProviderConfig, ProviderConfigResolver, ProviderConfigSource,
    ResolveErrorKind,
};
use serde_json::json;
use tempfile::{tempdir, TempDir};

const DEFAULT_MANIFEST: &str = r#"{
  "adapters": {
    "1": { "path": "adapters/live", "className": "LiveAdapter", "requiresConfig": true, "configKey": "alphavantage" },
    "2": { "path": "adapters/mock", "className": "MockAdapter", "requiresConfig": false }
  }
}"#;

/// Config source that counts calls and hands out a fixed configuration.
#[derive(Default)]
struct CountingConfigSource {
    calls: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl CountingConfigSource {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ProviderConfigSource for CountingConfigSource {
    fn provider_config<'a>(&'a self, provider: &'a str) -> ConfigFuture<'a> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut requested) = self.requested.lock() {
                requested.push(provider.to_owned());
            }
            Ok(ProviderConfig::new(provider, "https://example.test", "demo", 1_000))
        })
    }
}

fn project_with_manifest(manifest: &str) -> TempDir {
    let root = tempdir().expect("tempdir");
    let config_dir = root.path().join("config");
    std::fs::create_dir_all(&config_dir).expect("config dir");
    std::fs::write(config_dir.join("adapters.manifest.json"), manifest).expect("manifest");
    root
}

fn resolver(root: &Path) -> AdapterResolver {
    AdapterResolver::new(Some(root.to_path_buf())).expect("root present")
}

// =============================================================================
// Successful resolution
// =============================================================================

#[tokio::test]
async fn mock_mode_returns_mock_adapter_without_configuration() {
    // Given: the default manifest
    let root = project_with_manifest(DEFAULT_MANIFEST);
    let config = CountingConfigSource::default();

    // When: the operator selects mode 2
    let adapter = resolver(root.path())
        .load_adapter("2", &config)
        .await
        .expect("mock adapter");

    // Then: the mock adapter is built and no configuration was requested
    assert_eq!(adapter.id(), "mock");
    assert_eq!(config.calls(), 0);
}

#[tokio::test]
async fn live_mode_injects_named_provider_configuration() {
    let root = project_with_manifest(DEFAULT_MANIFEST);
    let config = CountingConfigSource::default();

    let adapter = resolver(root.path())
        .load_adapter("1", &config)
        .await
        .expect("live adapter");

    assert_eq!(adapter.id(), "live");
    assert_eq!(config.calls(), 1);
    assert_eq!(
        config.requested.lock().expect("lock").as_slice(),
        ["alphavantage"]
    );
}

#[tokio::test]
async fn absolute_module_paths_resolve_like_relative_ones() {
    let root = tempdir().expect("tempdir");
    let absolute = root.path().join("adapters").join("mock");
    let manifest = json!({
        "adapters": {
            "2": { "path": absolute, "className": "MockAdapter", "requiresConfig": false }
        }
    });
    std::fs::create_dir_all(root.path().join("config")).expect("config dir");
    std::fs::write(
        root.path().join("config/adapters.manifest.json"),
        manifest.to_string(),
    )
    .expect("manifest");

    let adapter = resolver(root.path())
        .load_adapter("2", &CountingConfigSource::default())
        .await
        .expect("absolute path resolves");
    assert_eq!(adapter.id(), "mock");
}

#[tokio::test]
async fn configured_constructor_receives_the_validated_configuration() {
    let seen: Arc<Mutex<Option<ProviderConfig>>> = Arc::new(Mutex::new(None));
    let captured = Arc::clone(&seen);
    let registry = AdapterRegistry::new().with_module(
        "vendors/feed",
        AdapterModule::new().export(
            "FeedAdapter",
            AdapterConstructor::configured(move |config| {
                if let Ok(mut slot) = captured.lock() {
                    *slot = Some(config);
                }
                Box::new(MockAdapter::default())
            }),
        ),
    );
    let root = project_with_manifest(
        r#"{"adapters": {"7": {"path": "vendors/feed", "className": "FeedAdapter", "requiresConfig": true, "configKey": "feedco"}}}"#,
    );
    let resolver =
        AdapterResolver::with_registry(Some(root.path().to_path_buf()), registry).expect("root");

    resolver
        .load_adapter("7", &CountingConfigSource::default())
        .await
        .expect("adapter");

    let config = seen.lock().expect("lock").clone().expect("config injected");
    assert_eq!(config.provider(), "feedco");
}

#[tokio::test]
async fn manifest_is_reread_on_every_call() {
    let root = project_with_manifest(DEFAULT_MANIFEST);
    let resolver = resolver(root.path());
    let config = CountingConfigSource::default();

    resolver.load_adapter("2", &config).await.expect("mode 2 at first");

    std::fs::write(
        root.path().join("config/adapters.manifest.json"),
        r#"{"adapters": {"3": {"path": "adapters/mock", "className": "MockAdapter"}}}"#,
    )
    .expect("rewrite manifest");

    let error = resolver
        .load_adapter("2", &config)
        .await
        .err()
        .expect("mode 2 removed");
    assert!(matches!(error.kind(), ResolveErrorKind::UnknownMode { .. }));
    resolver.load_adapter("3", &config).await.expect("mode 3 added");
}

// =============================================================================
// Failure shapes
// =============================================================================

#[tokio::test]
async fn unknown_mode_lists_declared_modes() {
    let root = project_with_manifest(DEFAULT_MANIFEST);

    let error = resolver(root.path())
        .load_adapter("9", &CountingConfigSource::default())
        .await
        .err()
        .expect("unknown mode");

    assert_eq!(error.mode(), "9");
    match error.kind() {
        ResolveErrorKind::UnknownMode { available } => {
            assert_eq!(available, &vec![String::from("1"), String::from("2")]);
        }
        other => panic!("unexpected failure: {other:?}"),
    }
    let message = error.to_string();
    assert!(message.contains("'9'"));
    assert!(message.contains("1, 2"));
}

#[tokio::test]
async fn missing_manifest_is_reported_with_its_path() {
    let root = tempdir().expect("tempdir");

    let error = resolver(root.path())
        .load_adapter("2", &CountingConfigSource::default())
        .await
        .err()
        .expect("missing manifest");

    assert!(matches!(
        error.kind(),
        ResolveErrorKind::Manifest(ManifestError::Missing { .. })
    ));
    assert!(error.to_string().contains("manifest missing at"));
}

#[tokio::test]
async fn malformed_manifest_is_distinct_from_missing() {
    let root = project_with_manifest("{ \"adapters\": [ ");

    let error = resolver(root.path())
        .load_adapter("2", &CountingConfigSource::default())
        .await
        .err()
        .expect("malformed manifest");

    assert!(matches!(
        error.kind(),
        ResolveErrorKind::Manifest(ManifestError::Malformed(_))
    ));
    assert!(error.to_string().contains("malformed manifest"));
}

#[tokio::test]
async fn unknown_export_is_reported() {
    let root = project_with_manifest(
        r#"{"adapters": {"2": {"path": "adapters/mock", "className": "PaperAdapter"}}}"#,
    );

    let error = resolver(root.path())
        .load_adapter("2", &CountingConfigSource::default())
        .await
        .err()
        .expect("missing export");

    assert!(matches!(
        error.kind(),
        ResolveErrorKind::ExportNotFound { .. }
    ));
    assert!(error.to_string().contains("export not found"));
}

#[tokio::test]
async fn unknown_module_is_reported() {
    let root = project_with_manifest(
        r#"{"adapters": {"2": {"path": "adapters/paper", "className": "MockAdapter"}}}"#,
    );

    let error = resolver(root.path())
        .load_adapter("2", &CountingConfigSource::default())
        .await
        .err()
        .expect("missing module");

    match error.kind() {
        ResolveErrorKind::ModuleNotFound { module, registered } => {
            assert!(module.ends_with("adapters/paper"));
            assert!(registered.iter().any(|key| key.ends_with("adapters/mock")));
            assert!(registered.iter().any(|key| key.ends_with("adapters/live")));
        }
        other => panic!("expected ModuleNotFound, got {other:?}"),
    }
    assert!(error.to_string().contains("registered modules:"));
}

#[tokio::test]
async fn missing_credentials_fail_live_resolution() {
    let root = project_with_manifest(DEFAULT_MANIFEST);
    let config = ProviderConfigResolver::with_lookup(HashMap::new());

    let error = resolver(root.path())
        .load_adapter("1", &config)
        .await
        .err()
        .expect("credentials absent");

    assert!(matches!(
        error.kind(),
        ResolveErrorKind::Config(ConfigError::MissingVariable { .. })
    ));
    assert!(error.to_string().contains("mode '1'"));
}

#[tokio::test]
async fn requires_config_without_config_key_is_rejected() {
    let root = project_with_manifest(
        r#"{"adapters": {"1": {"path": "adapters/live", "className": "LiveAdapter", "requiresConfig": true}}}"#,
    );

    let error = resolver(root.path())
        .load_adapter("1", &CountingConfigSource::default())
        .await
        .err()
        .expect("no config key");

    assert!(matches!(error.kind(), ResolveErrorKind::MissingConfigKey));
}

#[tokio::test]
async fn manifest_and_constructor_must_agree_on_configuration() {
    let root = project_with_manifest(
        r#"{"adapters": {"1": {"path": "adapters/live", "className": "LiveAdapter", "requiresConfig": false}}}"#,
    );

    let error = resolver(root.path())
        .load_adapter("1", &CountingConfigSource::default())
        .await
        .err()
        .expect("mismatch");

    assert!(matches!(
        error.kind(),
        ResolveErrorKind::ConstructorMismatch { .. }
    ));
}

#[test]
fn resolver_requires_a_root() {
    assert!(AdapterResolver::new(None).is_err());
    assert!(AdapterResolver::new(Some(PathBuf::new())).is_err());
}
