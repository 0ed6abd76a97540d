//! Conversation record domain types.
//!
//! A `ConversationRecord` is one logged exchange turn between a user and the
//! assistant. Records are created once and never updated.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Unique identifier for a conversation record, wrapping a UUID v7 (time-sortable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConversationId(pub Uuid);

impl ConversationId {
    /// Create a new ConversationId using UUID v7.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ConversationId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A single persisted conversation turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationRecord {
    pub id: ConversationId,
    /// Who the assistant was talking to (usually a phone number). Never blank.
    pub user_identifier: String,
    /// What the user sent, or the media-type placeholder.
    pub user_message: String,
    /// What the assistant answered, or the media-type acknowledgement.
    pub assistant_message: String,
    pub media_type: MediaType,
    /// When the turn happened, rendered in the service's civil timezone.
    pub timestamp: DateTime<FixedOffset>,
}

/// Canonical media types. Every stored record resolves to one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Text,
    Audio,
    Image,
    Video,
}

impl MediaType {
    /// Every canonical media type, in declaration order.
    pub const ALL: [MediaType; 4] = [
        MediaType::Text,
        MediaType::Audio,
        MediaType::Image,
        MediaType::Video,
    ];

    /// The lowercase tag stored in the database and sent over the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Text => "text",
            MediaType::Audio => "audio",
            MediaType::Image => "image",
            MediaType::Video => "video",
        }
    }

    /// Comma-separated list of the canonical tags, for error messages.
    pub fn allowed_list() -> String {
        Self::ALL
            .iter()
            .map(MediaType::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a canonical tag only (case-insensitive, surrounding whitespace ignored).
/// Synonyms such as "photo" are resolved by the normalizer, not here.
impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(MediaType::Text),
            "audio" => Ok(MediaType::Audio),
            "image" => Ok(MediaType::Image),
            "video" => Ok(MediaType::Video),
            other => Err(format!("invalid media type: '{other}'")),
        }
    }
}

/// Raw body of a create request, before normalization.
///
/// Fields are kept as loose JSON values because upstream automation tools send
/// numbers, nulls, or nothing at all. Legacy field names of the first version
/// of the service are accepted as aliases.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConversationRequest {
    #[serde(default, alias = "usuario_numero", skip_serializing_if = "Option::is_none")]
    pub user_identifier: Option<serde_json::Value>,
    #[serde(default, alias = "mensaje_usuario", skip_serializing_if = "Option::is_none")]
    pub user_message: Option<serde_json::Value>,
    #[serde(default, alias = "mensaje_IA", skip_serializing_if = "Option::is_none")]
    pub assistant_message: Option<serde_json::Value>,
    #[serde(default, alias = "tipo_medio", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<serde_json::Value>,
    #[serde(default, alias = "fecha", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<serde_json::Value>,
}
