//! Handler resolution boundary.
//!
//! The invoker locates a callable entry point by a filesystem path and
//! an exported name. [`HandlerHost`] abstracts that lookup so tests and
//! embedders can supply handlers in-process; [`HandlerRegistry`] is the
//! default host, a table of registered async functions keyed by
//! `(path, name)`.

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;

/// Boxed future returned by a handler invocation.
pub type HandlerFuture = Pin<Box<dyn Future<Output = anyhow::Result<Value>> + Send>>;

/// An object-safe handler entry point: one structured event in, one
/// response value (or failure) out.
pub type HandlerFn = Arc<dyn Fn(Value) -> HandlerFuture + Send + Sync>;

/// Locates handler entry points by filesystem path and exported name.
pub trait HandlerHost: Send + Sync {
    /// Look up the entry point exported as `name` from the module at
    /// `path`. `None` when no such export exists.
    fn resolve(&self, path: &Path, name: &str) -> Option<HandlerFn>;
}

/// In-process handler host: a table of registered async functions.
///
/// Cloning the registry clones the table; the handlers themselves are
/// shared through `Arc`.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    entries: HashMap<(PathBuf, String), HandlerFn>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` as the entry point exported as `name` from the
    /// module at `path`. Re-registering the same pair replaces the
    /// previous handler.
    pub fn register<F, Fut>(&mut self, path: impl Into<PathBuf>, name: &str, handler: F)
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        let boxed: HandlerFn = Arc::new(move |event| Box::pin(handler(event)) as HandlerFuture);
        self.entries.insert((path.into(), name.to_string()), boxed);
    }
}

impl HandlerHost for HandlerRegistry {
    fn resolve(&self, path: &Path, name: &str) -> Option<HandlerFn> {
        self.entries
            .get(&(path.to_path_buf(), name.to_string()))
            .cloned()
    }
}
