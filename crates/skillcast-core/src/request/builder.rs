//! Fluent builder over a typed platform request envelope.
//!
//! Construction is two-phase: the seed is taken by value, then every
//! identifier field the seed left absent is filled with a randomized
//! default. After construction each setter unconditionally overwrites,
//! so explicit seed values survive and later calls always win. There is
//! no hidden "initializing" flag; the fill rule acts once, on `Option`
//! fields that are still `None`.

use std::collections::HashMap;

use chrono::Utc;
use serde_json::{Map, Value};

use skillcast_types::error::RequestError;
use skillcast_types::request::{
    ConfirmationStatus, DialogState, ER_SUCCESS_MATCH, Intent, RequestEnvelope,
    ResolutionAuthority, ResolutionMatch, ResolutionStatus, ResolutionValue, Resolutions, Slot,
};

use super::{ids, template};

/// Builds and incrementally mutates a platform request envelope.
///
/// Each builder owns its envelope outright, so sibling builders never
/// share mutable state; clone a shared template before seeding two
/// builders from it. Mutators return `&mut Self` for chaining, and the
/// enum-validated ones return `Result<&mut Self, RequestError>`.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    envelope: RequestEnvelope,
}

impl RequestBuilder {
    /// Build from a seed envelope, filling randomized defaults into the
    /// identifier fields the seed left absent.
    pub fn new(seed: RequestEnvelope) -> Self {
        let mut builder = Self { envelope: seed };
        builder.fill_defaults();
        builder
    }

    /// Build from the launch-request template.
    pub fn launch() -> Self {
        Self::new(template::launch())
    }

    /// Build from the intent-request template with the given intent name.
    pub fn intent(name: &str) -> Self {
        let mut builder = Self::new(template::intent());
        builder.set_intent_name(name);
        builder
    }

    /// Fill-if-absent pass, run exactly once at construction.
    ///
    /// Application and user identifiers mirror into both the session and
    /// `context.System` copies, keyed off the session copy.
    fn fill_defaults(&mut self) {
        if self.envelope.session.user.user_id.is_none() {
            self.write_user_id(ids::user_id());
        }
        if self.envelope.session.session_id.is_none() {
            self.envelope.session.session_id = Some(ids::session_id());
        }
        if self.envelope.request.request_id.is_none() {
            self.envelope.request.request_id = Some(ids::request_id());
        }
        if self.envelope.session.application.application_id.is_none() {
            self.write_application_id(ids::application_id());
        }
        if self.envelope.context.system.device.device_id.is_none() {
            self.envelope.context.system.device.device_id = Some(ids::device_id());
        }
        if self.envelope.request.timestamp.is_none() {
            self.envelope.request.timestamp = Some(now_iso8601());
        }
    }

    fn write_application_id(&mut self, id: String) {
        self.envelope.context.system.application.application_id = Some(id.clone());
        self.envelope.session.application.application_id = Some(id);
    }

    fn write_user_id(&mut self, id: String) {
        self.envelope.context.system.user.user_id = Some(id.clone());
        self.envelope.session.user.user_id = Some(id);
    }

    fn intent_mut(&mut self) -> &mut Intent {
        self.envelope.request.intent.get_or_insert_with(Intent::default)
    }

    // -----------------------------------------------------------------------
    // Envelope-level fields
    // -----------------------------------------------------------------------

    pub fn set_version(&mut self, version: impl Into<String>) -> &mut Self {
        self.envelope.version = version.into();
        self
    }

    pub fn version(&self) -> &str {
        &self.envelope.version
    }

    pub fn set_is_new_session(&mut self, is_new: bool) -> &mut Self {
        self.envelope.session.new = is_new;
        self
    }

    pub fn is_new_session(&self) -> bool {
        self.envelope.session.new
    }

    // -----------------------------------------------------------------------
    // Identifiers
    // -----------------------------------------------------------------------

    /// Set `session.sessionId`; `None` generates a fresh random one.
    pub fn set_session_id(&mut self, id: Option<&str>) -> &mut Self {
        let id = id.map(str::to_owned).unwrap_or_else(ids::session_id);
        self.envelope.session.session_id = Some(id);
        self
    }

    pub fn session_id(&self) -> Option<&str> {
        self.envelope.session.session_id.as_deref()
    }

    /// Set the application ID in both the session and `context.System`
    /// copies; `None` generates a fresh random one.
    pub fn set_application_id(&mut self, id: Option<&str>) -> &mut Self {
        let id = id.map(str::to_owned).unwrap_or_else(ids::application_id);
        self.write_application_id(id);
        self
    }

    pub fn application_id(&self) -> Option<&str> {
        self.envelope.session.application.application_id.as_deref()
    }

    /// Set the user ID in both the session and `context.System` copies;
    /// `None` generates a fresh random one.
    pub fn set_user_id(&mut self, id: Option<&str>) -> &mut Self {
        let id = id.map(str::to_owned).unwrap_or_else(ids::user_id);
        self.write_user_id(id);
        self
    }

    pub fn user_id(&self) -> Option<&str> {
        self.envelope.session.user.user_id.as_deref()
    }

    /// Set `context.System.device.deviceId`; `None` generates a fresh
    /// random one.
    pub fn set_device_id(&mut self, id: Option<&str>) -> &mut Self {
        let id = id.map(str::to_owned).unwrap_or_else(ids::device_id);
        self.envelope.context.system.device.device_id = Some(id);
        self
    }

    pub fn device_id(&self) -> Option<&str> {
        self.envelope.context.system.device.device_id.as_deref()
    }

    pub fn set_request_id(&mut self, id: Option<&str>) -> &mut Self {
        let id = id.map(str::to_owned).unwrap_or_else(ids::request_id);
        self.envelope.request.request_id = Some(id);
        self
    }

    pub fn request_id(&self) -> Option<&str> {
        self.envelope.request.request_id.as_deref()
    }

    /// Set `context.System.apiAccessToken`; `None` generates a fresh
    /// random token. Not part of the construction fill pass.
    pub fn set_api_access_token(&mut self, token: Option<&str>) -> &mut Self {
        let token = token.map(str::to_owned).unwrap_or_else(ids::api_access_token);
        self.envelope.context.system.api_access_token = Some(token);
        self
    }

    pub fn api_access_token(&self) -> Option<&str> {
        self.envelope.context.system.api_access_token.as_deref()
    }

    /// Set `request.timestamp`; `None` renders the current UTC time at
    /// whole-second precision (the platform rejects sub-second
    /// timestamps).
    pub fn set_timestamp(&mut self, timestamp: Option<&str>) -> &mut Self {
        let timestamp = timestamp.map(str::to_owned).unwrap_or_else(now_iso8601);
        self.envelope.request.timestamp = Some(timestamp);
        self
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.envelope.request.timestamp.as_deref()
    }

    // -----------------------------------------------------------------------
    // Device interfaces
    // -----------------------------------------------------------------------

    pub fn set_supported_interfaces(&mut self, interfaces: Map<String, Value>) -> &mut Self {
        self.envelope.context.system.device.supported_interfaces = interfaces;
        self
    }

    pub fn supported_interfaces(&self) -> &Map<String, Value> {
        &self.envelope.context.system.device.supported_interfaces
    }

    /// Insert or overwrite one supported-interface entry.
    pub fn add_supported_interface(&mut self, name: &str, value: Value) -> &mut Self {
        self.envelope
            .context
            .system
            .device
            .supported_interfaces
            .insert(name.to_string(), value);
        self
    }

    /// Advertise the `AudioPlayer` interface with an empty descriptor.
    pub fn supports_audio_interface(&mut self) -> &mut Self {
        self.add_supported_interface("AudioPlayer", Value::Object(Map::new()))
    }

    // -----------------------------------------------------------------------
    // Plain passthroughs
    // -----------------------------------------------------------------------

    pub fn set_api_endpoint(&mut self, endpoint: impl Into<String>) -> &mut Self {
        self.envelope.context.system.api_endpoint = Some(endpoint.into());
        self
    }

    pub fn api_endpoint(&self) -> Option<&str> {
        self.envelope.context.system.api_endpoint.as_deref()
    }

    pub fn set_locale(&mut self, locale: impl Into<String>) -> &mut Self {
        self.envelope.request.locale = locale.into();
        self
    }

    pub fn locale(&self) -> &str {
        &self.envelope.request.locale
    }

    pub fn set_request_type(&mut self, request_type: impl Into<String>) -> &mut Self {
        self.envelope.request.request_type = request_type.into();
        self
    }

    pub fn request_type(&self) -> &str {
        &self.envelope.request.request_type
    }

    // -----------------------------------------------------------------------
    // Intent
    // -----------------------------------------------------------------------

    /// Set the intent name, creating the intent if the envelope has none.
    pub fn set_intent_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.intent_mut().name = name.into();
        self
    }

    pub fn intent_name(&self) -> Option<&str> {
        self.envelope.request.intent.as_ref().map(|i| i.name.as_str())
    }

    /// Set the intent confirmation status from its wire string.
    ///
    /// Rejects anything outside NONE / CONFIRMED / DENIED, leaving the
    /// envelope untouched.
    pub fn set_intent_confirmation_status(
        &mut self,
        status: &str,
    ) -> Result<&mut Self, RequestError> {
        let status: ConfirmationStatus = status.parse()?;
        self.intent_mut().confirmation_status = Some(status);
        Ok(self)
    }

    pub fn intent_confirmation_status(&self) -> Option<ConfirmationStatus> {
        self.envelope
            .request
            .intent
            .as_ref()
            .and_then(|i| i.confirmation_status)
    }

    /// Set the dialog state from its wire string.
    ///
    /// Rejects anything outside STARTED / IN_PROGRESS / COMPLETED,
    /// leaving the envelope untouched.
    pub fn set_dialog_state(&mut self, state: &str) -> Result<&mut Self, RequestError> {
        let state: DialogState = state.parse()?;
        self.envelope.request.dialog_state = Some(state);
        Ok(self)
    }

    pub fn dialog_state(&self) -> Option<DialogState> {
        self.envelope.request.dialog_state
    }

    // -----------------------------------------------------------------------
    // Slots
    // -----------------------------------------------------------------------

    /// Replace the whole slots mapping, creating the intent if needed.
    pub fn set_slots(&mut self, slots: HashMap<String, Slot>) -> &mut Self {
        self.intent_mut().slots = Some(slots);
        self
    }

    pub fn slots(&self) -> Option<&HashMap<String, Slot>> {
        self.envelope.request.intent.as_ref().and_then(|i| i.slots.as_ref())
    }

    /// Look up one slot by name.
    pub fn slot(&self, name: &str) -> Result<&Slot, RequestError> {
        self.slots()
            .and_then(|slots| slots.get(name))
            .ok_or_else(|| RequestError::SlotNotFound(name.to_string()))
    }

    /// Insert a slot resolved to itself: surface value and canonical
    /// resolution name are both `value`. The resolution ID is generated
    /// (32 lowercase hex) when omitted.
    pub fn with_slot(&mut self, name: &str, value: &str, id: Option<&str>) -> &mut Self {
        self.insert_resolved_slot(name, value, value, id)
    }

    /// Insert a slot filled by a synonym: the surface value is the
    /// synonym, while the canonical resolution carries `value`.
    pub fn with_synonym_slot(
        &mut self,
        name: &str,
        value: &str,
        synonym: &str,
        id: Option<&str>,
    ) -> &mut Self {
        self.insert_resolved_slot(name, synonym, value, id)
    }

    fn insert_resolved_slot(
        &mut self,
        name: &str,
        surface: &str,
        canonical: &str,
        id: Option<&str>,
    ) -> &mut Self {
        let id = id.map(str::to_owned).unwrap_or_else(ids::resolution_value_id);
        let authority = format!(
            "amzn1.er-authority.echo-sdk.{}.{}",
            self.application_id().unwrap_or_default(),
            name
        );
        let slot = Slot {
            name: name.to_string(),
            value: surface.to_string(),
            resolutions: Some(Resolutions {
                resolutions_per_authority: vec![ResolutionAuthority {
                    authority,
                    status: ResolutionStatus {
                        code: ER_SUCCESS_MATCH.to_string(),
                    },
                    values: vec![ResolutionMatch {
                        value: ResolutionValue {
                            name: canonical.to_string(),
                            id,
                        },
                    }],
                }],
            }),
        };
        self.intent_mut()
            .slots
            .get_or_insert_with(HashMap::new)
            .insert(name.to_string(), slot);
        self
    }

    /// The resolved matches of the slot's first authority, in match
    /// order. Failures wrap the underlying cause.
    pub fn resolve_slot(&self, name: &str) -> Result<&[ResolutionMatch], RequestError> {
        let wrap = |source: RequestError| RequestError::UnresolvedSlot {
            name: name.to_string(),
            source: Box::new(source),
        };
        let slot = self.slot(name).map_err(wrap)?;
        let authority = slot
            .resolutions
            .as_ref()
            .and_then(|r| r.resolutions_per_authority.first())
            .ok_or_else(|| wrap(RequestError::MissingResolutions(name.to_string())))?;
        Ok(&authority.values)
    }

    /// Project [`resolve_slot`](Self::resolve_slot) to the canonical names.
    pub fn resolve_slot_to_names(&self, name: &str) -> Result<Vec<&str>, RequestError> {
        Ok(self
            .resolve_slot(name)?
            .iter()
            .map(|m| m.value.name.as_str())
            .collect())
    }

    /// Project [`resolve_slot`](Self::resolve_slot) to the canonical IDs.
    pub fn resolve_slot_to_ids(&self, name: &str) -> Result<Vec<&str>, RequestError> {
        Ok(self
            .resolve_slot(name)?
            .iter()
            .map(|m| m.value.id.as_str())
            .collect())
    }

    // -----------------------------------------------------------------------
    // Hand-off
    // -----------------------------------------------------------------------

    /// Borrow the envelope as built so far.
    pub fn envelope(&self) -> &RequestEnvelope {
        &self.envelope
    }

    /// Consume the builder, handing the envelope off by value.
    pub fn into_envelope(self) -> RequestEnvelope {
        self.envelope
    }
}

impl From<RequestBuilder> for RequestEnvelope {
    fn from(builder: RequestBuilder) -> Self {
        builder.into_envelope()
    }
}

/// Current UTC time at whole-second precision, ISO-8601.
fn now_iso8601() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
