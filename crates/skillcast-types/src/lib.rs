//! Shared domain types for Skillcast.
//!
//! This crate contains the typed request envelope mirroring the voice
//! platform's JSON request schema, plus the error types raised by
//! builder operations.
//!
//! Zero infrastructure dependencies -- only serde, serde_json, thiserror.

pub mod error;
pub mod request;
