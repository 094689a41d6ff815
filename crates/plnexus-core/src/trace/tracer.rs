use std::fmt::Display;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde_json::{json, Map, Value};
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};
use tokio::io::AsyncWriteExt;
use tokio::sync::OnceCell;

use super::event::{into_metadata, Layer, TraceEvent, TraceLevel};

/// Namespace used for the trace file name when none is given.
pub const DEFAULT_NAMESPACE: &str = "plnexus";

const SESSION_ID_LEN: usize = 8;

/// Shared on/off flag for tracing, read on every call.
#[derive(Debug, Clone, Default)]
pub struct TraceSwitch(Arc<AtomicBool>);

impl TraceSwitch {
    pub fn new(enabled: bool) -> Self {
        Self(Arc::new(AtomicBool::new(enabled)))
    }

    /// Only `true` (any case) enables tracing.
    pub fn from_flag(raw: Option<&str>) -> Self {
        Self::new(raw.is_some_and(|value| value.trim().eq_ignore_ascii_case("true")))
    }

    pub fn is_enabled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.0.store(enabled, Ordering::Relaxed);
    }
}

/// Static tracer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TracerConfig {
    /// Most verbose level written to the trace file.
    pub level: TraceLevel,
    /// Offset used to pick the calendar date in the trace file name.
    pub utc_offset: UtcOffset,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            level: TraceLevel::Info,
            utc_offset: UtcOffset::UTC,
        }
    }
}

impl TracerConfig {
    /// Settings using the machine's local offset.
    ///
    /// Must run before any other thread is spawned; the `time` crate refuses
    /// to read the local offset from a multi-threaded process. Falls back to
    /// UTC in that case.
    pub fn local(level: TraceLevel) -> Self {
        Self {
            level,
            utc_offset: UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC),
        }
    }
}

/// Identity and log file of one process run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    id: String,
    trace_path: PathBuf,
}

impl Session {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn trace_path(&self) -> &Path {
        &self.trace_path
    }
}

/// Internal tracer failures. Logged and discarded, never returned.
#[derive(Debug, Error)]
enum TraceError {
    #[error("failed to create trace directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to append to {}: {source}", path.display())]
    Append {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize trace event: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to format timestamp: {0}")]
    Format(#[from] time::error::Format),
}

/// Session-scoped span tracer writing JSON lines to an append-only file.
///
/// Cloning yields another handle to the same session. Nothing the tracer does
/// can fail the caller: I/O problems go to the diagnostic log only.
#[derive(Debug, Clone)]
pub struct SpanTracer {
    inner: Arc<TracerInner>,
}

#[derive(Debug)]
struct TracerInner {
    switch: TraceSwitch,
    config: TracerConfig,
    session: OnceCell<Session>,
}

impl SpanTracer {
    pub fn new(switch: TraceSwitch, config: TracerConfig) -> Self {
        Self {
            inner: Arc::new(TracerInner {
                switch,
                config,
                session: OnceCell::new(),
            }),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.switch.is_enabled()
    }

    pub fn switch(&self) -> &TraceSwitch {
        &self.inner.switch
    }

    pub fn level(&self) -> TraceLevel {
        self.inner.config.level
    }

    /// Current session, once initialization succeeded.
    pub fn session(&self) -> Option<&Session> {
        self.inner.session.get()
    }

    /// Opens the session and its trace file location.
    ///
    /// A no-op once a session exists. On failure the tracer stays
    /// uninitialized and a later call may try again.
    pub async fn initialize(&self, root: &Path, namespace: &str) {
        if self.inner.session.initialized() {
            return;
        }

        let enabled = self.is_enabled();
        tracing::info!(enabled, "tracing status: {enabled}");

        let namespace = match namespace.trim() {
            "" => DEFAULT_NAMESPACE,
            trimmed => trimmed,
        };

        let session = match open_session(root, namespace, self.inner.config.utc_offset).await {
            Ok(session) => session,
            Err(error) => {
                tracing::warn!(error = %error, root = %root.display(), "span tracer initialization failed");
                return;
            }
        };

        if self.inner.session.set(session).is_err() {
            return;
        }

        if let Some(session) = self.session() {
            let ready = json!({
                "sid": session.id(),
                "pid": std::process::id(),
                "os": std::env::consts::OS,
                "arch": std::env::consts::ARCH,
                "version": env!("CARGO_PKG_VERSION"),
                "level": self.level().as_str(),
                "trace_path": session.trace_path().display().to_string(),
            });
            self.record(Layer::System, "TRACER_READY", ready).await;
        }
    }

    /// Appends one event, subject to the switch and the level filter.
    pub async fn record(&self, layer: Layer, event: &str, data: Value) {
        self.record_metadata(layer, event, into_metadata(data)).await;
    }

    /// Runs `operation` as a span: `<LABEL>_START`, then `<LABEL>_COMPLETE`
    /// or `<LABEL>_FAILED` with the elapsed milliseconds.
    ///
    /// The operation's result is returned untouched. When tracing is disabled
    /// the operation runs without any bookkeeping.
    pub async fn trace_span<T, E, F, Fut>(
        &self,
        layer: Layer,
        label: &str,
        meta: Value,
        operation: F,
    ) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        if !self.is_enabled() {
            return operation().await;
        }

        let label = label.trim().to_uppercase();
        let meta = into_metadata(meta);

        self.record_metadata(layer, &format!("{label}_START"), meta.clone())
            .await;

        let started = Instant::now();
        let outcome = operation().await;
        let duration_ms = (started.elapsed().as_secs_f64() * 1_000_000.0).round() / 1_000.0;

        let mut data = meta;
        data.insert(String::from("duration_ms"), json!(duration_ms));
        match &outcome {
            Ok(_) => {
                self.record_metadata(layer, &format!("{label}_COMPLETE"), data)
                    .await;
            }
            Err(error) => {
                data.insert(String::from("error"), json!(error.to_string()));
                self.record_metadata(layer, &format!("{label}_FAILED"), data)
                    .await;
            }
        }

        outcome
    }

    async fn record_metadata(&self, layer: Layer, event: &str, data: Map<String, Value>) {
        if !self.is_enabled() {
            return;
        }
        let Some(session) = self.session() else {
            return;
        };
        if TraceLevel::declared_in(&data) > self.level() {
            return;
        }

        if let Err(error) = append_event(session, layer, event, data).await {
            tracing::warn!(error = %error, event, "trace write failed");
        }
    }
}

async fn open_session(
    root: &Path,
    namespace: &str,
    utc_offset: UtcOffset,
) -> Result<Session, TraceError> {
    let date = OffsetDateTime::now_utc()
        .to_offset(utc_offset)
        .date()
        .format(format_description!("[year]-[month]-[day]"))?;

    let dir = root.join("logs").join("traces");
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|source| TraceError::CreateDir {
            path: dir.clone(),
            source,
        })?;

    Ok(Session {
        id: session_id(),
        trace_path: dir.join(format!("{namespace}-{date}.trace.log")),
    })
}

fn session_id() -> String {
    std::iter::repeat_with(fastrand::alphanumeric)
        .take(SESSION_ID_LEN)
        .collect()
}

async fn append_event(
    session: &Session,
    layer: Layer,
    event: &str,
    dat: Map<String, Value>,
) -> Result<(), TraceError> {
    let record = TraceEvent {
        ts: OffsetDateTime::now_utc().format(&Rfc3339)?,
        sid: session.id.clone(),
        lyr: layer,
        evt: event.trim().to_uppercase(),
        dat,
    };

    let mut line = serde_json::to_string(&record)?;
    line.push('\n');

    let append_error = |source| TraceError::Append {
        path: session.trace_path.clone(),
        source,
    };
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&session.trace_path)
        .await
        .map_err(append_error)?;
    // One write per line keeps concurrent appenders from splitting a record.
    file.write_all(line.as_bytes()).await.map_err(append_error)?;
    file.flush().await.map_err(append_error)?;
    Ok(())
}
