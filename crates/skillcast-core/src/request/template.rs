//! Seed templates for the two canonical request flavors.
//!
//! These are the minimal skeletons a builder starts from when the
//! caller supplies no seed of their own. Identifier fields are left
//! absent so construction fills them with randomized defaults.
//! Arbitrary platform JSON fixtures can be used instead by
//! deserializing them into [`RequestEnvelope`] with serde.

use skillcast_types::request::{Intent, RequestEnvelope};

/// Default API endpoint carried by the seed templates.
pub const DEFAULT_API_ENDPOINT: &str = "https://api.amazonalexa.com";

fn base() -> RequestEnvelope {
    let mut envelope = RequestEnvelope::default();
    envelope.version = "1.0".to_string();
    envelope.session.new = true;
    envelope.request.locale = "en-US".to_string();
    envelope.context.system.api_endpoint = Some(DEFAULT_API_ENDPOINT.to_string());
    envelope
}

/// Skeleton for a session-opening launch request.
pub fn launch() -> RequestEnvelope {
    let mut envelope = base();
    envelope.request.request_type = "LaunchRequest".to_string();
    envelope
}

/// Skeleton for an intent request. The intent is present but unnamed;
/// the builder's constructor fills in the name.
pub fn intent() -> RequestEnvelope {
    let mut envelope = base();
    envelope.request.request_type = "IntentRequest".to_string();
    envelope.request.intent = Some(Intent::default());
    envelope
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_template_defaults() {
        let envelope = launch();
        assert_eq!(envelope.version, "1.0");
        assert!(envelope.session.new);
        assert_eq!(envelope.request.request_type, "LaunchRequest");
        assert_eq!(envelope.request.locale, "en-US");
        assert!(envelope.request.intent.is_none());
        // Identifiers stay absent for fill-if-absent to act on.
        assert!(envelope.session.session_id.is_none());
        assert!(envelope.session.user.user_id.is_none());
    }

    #[test]
    fn test_intent_template_has_empty_intent() {
        let envelope = intent();
        assert_eq!(envelope.request.request_type, "IntentRequest");
        let intent = envelope.request.intent.unwrap();
        assert!(intent.name.is_empty());
        assert!(intent.slots.is_none());
    }
}
