//! Request envelope domain types.
//!
//! Mirrors the voice platform's inbound request schema: a versioned
//! envelope with `session`, `context.System`, and `request`
//! sub-structures. Field names serialize camelCase to match the wire
//! format, so any platform JSON fixture deserializes directly into
//! [`RequestEnvelope`].
//!
//! Identifier fields are `Option<String>`: a seed document may leave
//! them absent, and the builder fills absent ones with randomized
//! defaults at construction. `None` is never serialized.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::RequestError;

/// Resolution status code for a successful entity match.
pub const ER_SUCCESS_MATCH: &str = "ER_SUCCESS_MATCH";

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// A single inbound platform request: version, session, context, request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestEnvelope {
    pub version: String,
    pub session: Session,
    pub context: Context,
    pub request: RequestBody,
}

/// The `session` sub-structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Session {
    pub new: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub application: Application,
    pub user: User,
}

/// Application identity, duplicated between `session` and `context.System`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Application {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<String>,
}

/// User identity, duplicated between `session` and `context.System`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

/// The `context` sub-structure. The platform capitalizes `System`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Context {
    #[serde(rename = "System")]
    pub system: SystemContext,
}

/// The `context.System` sub-structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SystemContext {
    pub application: Application,
    pub user: User,
    pub device: Device,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_access_token: Option<String>,
}

/// Device identity and capability advertisement.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Device {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    pub supported_interfaces: Map<String, Value>,
}

/// The `request` sub-structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequestBody {
    #[serde(rename = "type")]
    pub request_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// ISO-8601 at whole-second precision; the platform rejects
    /// sub-second timestamps.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub locale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dialog_state: Option<DialogState>,
}

/// A recognized intent with its resolved slots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Intent {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation_status: Option<ConfirmationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slots: Option<HashMap<String, Slot>>,
}

// ---------------------------------------------------------------------------
// Slots and entity resolution
// ---------------------------------------------------------------------------

/// A named argument extracted from user speech: a surface `value` plus
/// an optional canonical resolution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Slot {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolutions: Option<Resolutions>,
}

/// Entity-resolution results grouped by authority.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Resolutions {
    pub resolutions_per_authority: Vec<ResolutionAuthority>,
}

/// One authority's resolution outcome, in match order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolutionAuthority {
    pub authority: String,
    pub status: ResolutionStatus,
    pub values: Vec<ResolutionMatch>,
}

/// Outcome code for a resolution authority (e.g. [`ER_SUCCESS_MATCH`]).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionStatus {
    pub code: String,
}

/// Wrapper object the platform puts around each resolved value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionMatch {
    pub value: ResolutionValue,
}

/// A canonical resolved entity: display name plus stable identifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionValue {
    pub name: String,
    pub id: String,
}

// ---------------------------------------------------------------------------
// Validated enums
// ---------------------------------------------------------------------------

/// Intent confirmation status. Parsing rejects anything outside the
/// platform's three legal values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfirmationStatus {
    None,
    Confirmed,
    Denied,
}

impl fmt::Display for ConfirmationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "NONE"),
            Self::Confirmed => write!(f, "CONFIRMED"),
            Self::Denied => write!(f, "DENIED"),
        }
    }
}

impl FromStr for ConfirmationStatus {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NONE" => Ok(Self::None),
            "CONFIRMED" => Ok(Self::Confirmed),
            "DENIED" => Ok(Self::Denied),
            other => Err(RequestError::InvalidConfirmationStatus(other.to_string())),
        }
    }
}

/// Dialog delegation state on an intent request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DialogState {
    Started,
    InProgress,
    Completed,
}

impl fmt::Display for DialogState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started => write!(f, "STARTED"),
            Self::InProgress => write!(f, "IN_PROGRESS"),
            Self::Completed => write!(f, "COMPLETED"),
        }
    }
}

impl FromStr for DialogState {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STARTED" => Ok(Self::Started),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "COMPLETED" => Ok(Self::Completed),
            other => Err(RequestError::InvalidDialogState(other.to_string())),
        }
    }
}
