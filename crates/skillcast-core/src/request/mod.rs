//! Request construction: randomized identifiers, seed templates, and
//! the fluent builder over [`skillcast_types::request::RequestEnvelope`].

pub mod builder;
pub mod ids;
pub mod template;
