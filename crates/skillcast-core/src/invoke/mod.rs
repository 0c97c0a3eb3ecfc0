//! In-process handler invocation.
//!
//! [`Invoker::send`] takes a finished request envelope (or a builder,
//! transparently), resolves the target entry point through a
//! [`host::HandlerHost`], runs it under the configured time budget, and
//! returns the handler's response value. Failures -- unresolvable
//! handler, handler error, exceeded budget -- surface as
//! [`InvokeError`] without translation and are never retried.

pub mod host;

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use skillcast_types::request::RequestEnvelope;

use host::HandlerHost;

/// Default handler module path when the config leaves it unset.
pub const DEFAULT_HANDLER_PATH: &str = "index";
/// Default exported entry-point name.
pub const DEFAULT_HANDLER_NAME: &str = "handler";
/// Default execution budget in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 3000;

/// Failures surfaced by a handler invocation. Timeouts are the same
/// kind of failure as any other; nothing is retried by this layer.
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("no handler '{name}' exported from '{path}'")]
    HandlerNotFound { path: String, name: String },

    #[error("handler '{name}' exceeded its {timeout_ms} ms budget")]
    Timeout { name: String, timeout_ms: u64 },

    #[error("handler failed: {0}")]
    Handler(#[source] anyhow::Error),

    #[error("failed to encode request event: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Which handler to run and for how long.
///
/// Start from [`InvokeConfig::default`] and override individual fields
/// with struct-update syntax.
#[derive(Debug, Clone)]
pub struct InvokeConfig {
    /// Filesystem location of the handler module.
    pub handler_path: PathBuf,
    /// Exported entry point to call.
    pub handler_name: String,
    /// Execution time budget.
    pub timeout: Duration,
}

impl Default for InvokeConfig {
    fn default() -> Self {
        Self {
            handler_path: PathBuf::from(DEFAULT_HANDLER_PATH),
            handler_name: DEFAULT_HANDLER_NAME.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

/// Where invocation diagnostics go, passed per call so concurrent
/// invocations stay independent. There is no process-wide logger state.
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Drop console diagnostics entirely.
    pub suppress_console: bool,
    /// Also append diagnostics to this file, one line per event.
    pub log_file: Option<PathBuf>,
}

/// Dispatches request envelopes to handlers resolved through `H`.
pub struct Invoker<H: HandlerHost> {
    host: H,
}

impl<H: HandlerHost> Invoker<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }

    /// Run the configured handler against `request` and return its
    /// response value. Accepts a raw envelope or a request builder.
    pub async fn send(
        &self,
        request: impl Into<RequestEnvelope>,
        config: InvokeConfig,
    ) -> Result<Value, InvokeError> {
        self.send_with_output(request, config, OutputConfig::default())
            .await
    }

    /// Same as [`send`](Self::send) with explicit diagnostics routing.
    pub async fn send_with_output(
        &self,
        request: impl Into<RequestEnvelope>,
        config: InvokeConfig,
        output: OutputConfig,
    ) -> Result<Value, InvokeError> {
        let envelope = request.into();
        let path = config.handler_path.display().to_string();
        let name = config.handler_name.clone();

        let handler = self
            .host
            .resolve(&config.handler_path, &config.handler_name)
            .ok_or_else(|| InvokeError::HandlerNotFound {
                path: path.clone(),
                name: name.clone(),
            })?;

        let event = serde_json::to_value(&envelope)?;
        debug!(handler = %name, path = %path, "dispatching request event");
        emit(&output, &format!("invoking '{name}' from '{path}'"));

        let started = Instant::now();
        match tokio::time::timeout(config.timeout, handler(event)).await {
            Ok(Ok(response)) => {
                let elapsed_ms = started.elapsed().as_millis() as u64;
                info!(handler = %name, elapsed_ms, "handler completed");
                emit(&output, &format!("'{name}' completed in {elapsed_ms} ms"));
                Ok(response)
            }
            Ok(Err(err)) => {
                emit(&output, &format!("'{name}' failed: {err:#}"));
                Err(InvokeError::Handler(err))
            }
            Err(_) => {
                let timeout_ms = config.timeout.as_millis() as u64;
                emit(&output, &format!("'{name}' timed out after {timeout_ms} ms"));
                Err(InvokeError::Timeout { name, timeout_ms })
            }
        }
    }
}

/// Route one diagnostic line per the per-call output config.
///
/// Diagnostics are a side channel: a failed file append is reported as
/// a warning event, never as an invocation outcome.
fn emit(output: &OutputConfig, line: &str) {
    if !output.suppress_console {
        info!(target: "skillcast::invoke", "{line}");
    }
    if let Some(path) = &output.log_file {
        if let Err(err) = append_line(path, line) {
            warn!(target: "skillcast::invoke", path = %path.display(), "log append failed: {err}");
        }
    }
}

fn append_line(path: &Path, line: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use host::HandlerRegistry;

    use crate::request::builder::RequestBuilder;

    fn echo_invoker() -> Invoker<HandlerRegistry> {
        let mut registry = HandlerRegistry::new();
        registry.register("index", "handler", |event| async move {
            // Echo the locale back the way a greeting handler would.
            let locale = event["request"]["locale"].clone();
            Ok(serde_json::json!({
                "version": "1.0",
                "response": { "outputSpeech": { "type": "PlainText", "text": locale } }
            }))
        });
        Invoker::new(registry)
    }

    #[tokio::test]
    async fn test_send_echoes_built_locale() {
        let mut builder = RequestBuilder::launch();
        builder.set_locale("en-GB");

        let response = echo_invoker()
            .send(builder, InvokeConfig::default())
            .await
            .unwrap();
        assert_eq!(response["response"]["outputSpeech"]["text"], "en-GB");
    }

    #[tokio::test]
    async fn test_send_accepts_raw_envelope() {
        let envelope = RequestBuilder::launch().into_envelope();
        let response = echo_invoker()
            .send(envelope, InvokeConfig::default())
            .await
            .unwrap();
        assert_eq!(response["version"], "1.0");
    }

    #[tokio::test]
    async fn test_unresolvable_handler_fails() {
        let invoker = Invoker::new(HandlerRegistry::new());
        let err = invoker
            .send(RequestBuilder::launch(), InvokeConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            InvokeError::HandlerNotFound { ref name, .. } if name == "handler"
        ));
    }

    #[tokio::test]
    async fn test_handler_error_propagates_unchanged() {
        let mut registry = HandlerRegistry::new();
        registry.register("index", "handler", |_| async {
            Err(anyhow::anyhow!("boom"))
        });

        let err = Invoker::new(registry)
            .send(RequestBuilder::launch(), InvokeConfig::default())
            .await
            .unwrap_err();
        match err {
            InvokeError::Handler(inner) => assert_eq!(inner.to_string(), "boom"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_exceeded_budget_is_a_timeout() {
        let mut registry = HandlerRegistry::new();
        registry.register("index", "handler", |_| async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(Value::Null)
        });

        let config = InvokeConfig {
            timeout: Duration::from_millis(20),
            ..InvokeConfig::default()
        };
        let err = Invoker::new(registry)
            .send(RequestBuilder::launch(), config)
            .await
            .unwrap_err();
        assert!(matches!(err, InvokeError::Timeout { timeout_ms: 20, .. }));
    }

    #[tokio::test]
    async fn test_config_overrides_defaults() {
        let mut registry = HandlerRegistry::new();
        registry.register("handlers/order", "confirm", |_| async {
            Ok(serde_json::json!({"ok": true}))
        });

        let config = InvokeConfig {
            handler_path: PathBuf::from("handlers/order"),
            handler_name: "confirm".to_string(),
            ..InvokeConfig::default()
        };
        let response = Invoker::new(registry)
            .send(RequestBuilder::intent("OrderIntent"), config)
            .await
            .unwrap();
        assert_eq!(response["ok"], true);
    }

    #[tokio::test]
    async fn test_log_file_receives_invocation_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("invocations.log");

        let output = OutputConfig {
            suppress_console: true,
            log_file: Some(log_path.clone()),
        };
        echo_invoker()
            .send_with_output(RequestBuilder::launch(), InvokeConfig::default(), output)
            .await
            .unwrap();

        let contents = std::fs::read_to_string(&log_path).unwrap();
        assert!(contents.contains("invoking 'handler' from 'index'"));
        assert!(contents.contains("completed in"));
    }
}
