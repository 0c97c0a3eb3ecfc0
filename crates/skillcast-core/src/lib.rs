//! Test-fixture builder and in-process invoker for voice-assistant
//! skill handlers.
//!
//! Two components: [`request::builder::RequestBuilder`] produces and
//! mutates a typed platform request envelope, and [`invoke::Invoker`]
//! dispatches a finished envelope to a locally-registered handler,
//! returning its response for assertions.

pub mod invoke;
pub mod request;

pub use invoke::host::{HandlerHost, HandlerRegistry};
pub use invoke::{InvokeConfig, InvokeError, Invoker, OutputConfig};
pub use request::builder::RequestBuilder;
