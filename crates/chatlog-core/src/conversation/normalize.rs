//! Normalization of incoming conversation turns.
//!
//! Maps loose media-type labels ("photo", "ptt", "sticker", ...) to canonical
//! tags and fills empty message fields with media-type placeholders. Never
//! rejects input: an unknown label passes through lower-cased and the
//! validator decides.

use std::collections::HashMap;
use std::sync::LazyLock;

use chatlog_types::conversation::{CreateConversationRequest, MediaType};
use serde_json::Value;

/// Synonym table: lower-cased label -> canonical media type.
static MEDIA_TYPE_SYNONYMS: LazyLock<HashMap<&'static str, MediaType>> = LazyLock::new(|| {
    let entries: &[(&str, MediaType)] = &[
        ("text", MediaType::Text),
        ("texto", MediaType::Text),
        ("document", MediaType::Text),
        ("documento", MediaType::Text),
        ("chat", MediaType::Text),
        ("audio", MediaType::Audio),
        ("voice", MediaType::Audio),
        ("ptt", MediaType::Audio),
        ("voz", MediaType::Audio),
        ("nota_de_voz", MediaType::Audio),
        ("image", MediaType::Image),
        ("imagen", MediaType::Image),
        ("photo", MediaType::Image),
        ("foto", MediaType::Image),
        ("sticker", MediaType::Image),
        ("video", MediaType::Video),
        ("gif", MediaType::Video),
        ("animation", MediaType::Video),
        ("video_note", MediaType::Video),
    ];
    entries.iter().copied().collect()
});

/// A create request after normalization, ready for validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedConversation {
    /// Trimmed identifier; may be empty (the validator rejects that).
    pub user_identifier: String,
    /// Canonical tag when the label was recognized, otherwise the lower-cased label.
    pub media_type: String,
    pub user_message: String,
    pub assistant_message: String,
    /// Raw timestamp, parsed by the validator. `None` when absent or blank.
    pub timestamp: Option<Value>,
}

/// Output of [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedMessages {
    pub media_type: String,
    pub user_message: String,
    pub assistant_message: String,
}

/// Resolve a raw label to its canonical media type, if it is a known synonym.
pub fn resolve_media_type(raw_label: &str) -> Option<MediaType> {
    MEDIA_TYPE_SYNONYMS
        .get(raw_label.trim().to_lowercase().as_str())
        .copied()
}

/// Placeholder stored when the user sent no usable text.
pub fn user_placeholder(media_type: MediaType) -> &'static str {
    match media_type {
        MediaType::Text => "[Text message]",
        MediaType::Audio => "[Audio received]",
        MediaType::Image => "[Image received]",
        MediaType::Video => "[Video received]",
    }
}

/// Acknowledgement stored when the assistant reply is empty. Empty for text.
pub fn assistant_placeholder(media_type: MediaType) -> &'static str {
    match media_type {
        MediaType::Text => "",
        MediaType::Audio => "Audio received and processed",
        MediaType::Image => "Image received and processed",
        MediaType::Video => "Video received and processed",
    }
}

/// Normalize the media-type label and both message fields.
///
/// Messages that are absent, non-string, or blank get the placeholder for the
/// resolved media type. When the label is not recognized there is nothing to
/// pick a placeholder from, so such messages become empty strings.
pub fn normalize(
    raw_label: &str,
    raw_user_message: Option<&Value>,
    raw_assistant_message: Option<&Value>,
) -> NormalizedMessages {
    let label = raw_label.trim().to_lowercase();
    let resolved = resolve_media_type(&label);

    let media_type = match resolved {
        Some(media_type) => media_type.as_str().to_string(),
        None => label,
    };

    let user_message = message_text(raw_user_message)
        .unwrap_or_else(|| resolved.map(user_placeholder).unwrap_or_default().to_string());
    let assistant_message = message_text(raw_assistant_message)
        .unwrap_or_else(|| resolved.map(assistant_placeholder).unwrap_or_default().to_string());

    NormalizedMessages {
        media_type,
        user_message,
        assistant_message,
    }
}

/// Normalize a whole create request.
pub fn normalize_request(request: &CreateConversationRequest) -> NormalizedConversation {
    let label = request
        .media_type
        .as_ref()
        .map(scalar_text)
        .unwrap_or_default();

    let messages = normalize(
        &label,
        request.user_message.as_ref(),
        request.assistant_message.as_ref(),
    );

    let user_identifier = request
        .user_identifier
        .as_ref()
        .map(scalar_text)
        .unwrap_or_default();

    let timestamp = request.timestamp.clone().filter(|value| match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    });

    NormalizedConversation {
        user_identifier,
        media_type: messages.media_type,
        user_message: messages.user_message,
        assistant_message: messages.assistant_message,
        timestamp,
    }
}

/// Trimmed text of a message field, `None` when unusable.
fn message_text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Trimmed text of a scalar field. Numbers and booleans are stringified
/// (phone numbers often arrive as JSON numbers); other values become empty.
fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_synonyms_resolve_to_canonical_tags() {
        let cases = [
            ("image", MediaType::Image),
            ("photo", MediaType::Image),
            ("sticker", MediaType::Image),
            ("imagen", MediaType::Image),
            ("voice", MediaType::Audio),
            ("ptt", MediaType::Audio),
            ("audio", MediaType::Audio),
            ("document", MediaType::Text),
            ("text", MediaType::Text),
            ("texto", MediaType::Text),
            ("video", MediaType::Video),
            ("gif", MediaType::Video),
        ];
        for (label, expected) in cases {
            assert_eq!(resolve_media_type(label), Some(expected), "label {label}");
        }
    }

    #[test]
    fn test_every_synonym_maps_to_a_canonical_tag() {
        for (label, media_type) in MEDIA_TYPE_SYNONYMS.iter() {
            assert!(MediaType::ALL.contains(media_type), "{label}");
            let normalized = normalize(label, None, None);
            assert_eq!(normalized.media_type, media_type.as_str());
        }
    }

    #[test]
    fn test_label_is_trimmed_and_lowercased() {
        assert_eq!(resolve_media_type("  PHOTO "), Some(MediaType::Image));
        assert_eq!(normalize(" PTT", None, None).media_type, "audio");
    }

    #[test]
    fn test_unknown_label_passes_through_lowercased() {
        let normalized = normalize(" Hologram ", Some(&json!("hi")), None);
        assert_eq!(normalized.media_type, "hologram");
        assert_eq!(normalized.user_message, "hi");
        assert_eq!(normalized.assistant_message, "");
    }

    #[test]
    fn test_empty_user_message_gets_placeholder() {
        assert_eq!(
            normalize("video", Some(&json!("")), None).user_message,
            "[Video received]"
        );
        assert_eq!(
            normalize("text", Some(&json!("   ")), None).user_message,
            "[Text message]"
        );
        assert_eq!(normalize("photo", None, None).user_message, "[Image received]");
        assert_eq!(
            normalize("voice", Some(&json!(null)), None).user_message,
            "[Audio received]"
        );
    }

    #[test]
    fn test_non_string_message_gets_placeholder() {
        let normalized = normalize("image", Some(&json!(42)), Some(&json!({"a": 1})));
        assert_eq!(normalized.user_message, "[Image received]");
        assert_eq!(normalized.assistant_message, "Image received and processed");
    }

    #[test]
    fn test_assistant_placeholder_empty_for_text() {
        let normalized = normalize("text", Some(&json!("hola")), Some(&json!("")));
        assert_eq!(normalized.assistant_message, "");
        assert_eq!(
            normalize("audio", None, None).assistant_message,
            "Audio received and processed"
        );
    }

    #[test]
    fn test_messages_are_trimmed() {
        let normalized = normalize("text", Some(&json!("  hola  ")), Some(&json!(" ok ")));
        assert_eq!(normalized.user_message, "hola");
        assert_eq!(normalized.assistant_message, "ok");
    }

    #[test]
    fn test_normalize_request_photo_scenario() {
        let request = CreateConversationRequest {
            user_identifier: Some(json!(" +59170000000 ")),
            user_message: Some(json!("")),
            assistant_message: Some(json!("ok")),
            media_type: Some(json!("photo")),
            timestamp: None,
        };
        let normalized = normalize_request(&request);
        assert_eq!(normalized.user_identifier, "+59170000000");
        assert_eq!(normalized.media_type, "image");
        assert_eq!(normalized.user_message, "[Image received]");
        assert_eq!(normalized.assistant_message, "ok");
        assert!(normalized.timestamp.is_none());
    }

    #[test]
    fn test_normalize_request_numeric_identifier() {
        let request = CreateConversationRequest {
            user_identifier: Some(json!(59170000000u64)),
            media_type: Some(json!("text")),
            ..Default::default()
        };
        assert_eq!(normalize_request(&request).user_identifier, "59170000000");
    }

    #[test]
    fn test_normalize_request_blank_timestamp_is_absent() {
        let request = CreateConversationRequest {
            timestamp: Some(json!("  ")),
            ..Default::default()
        };
        assert!(normalize_request(&request).timestamp.is_none());

        let request = CreateConversationRequest {
            timestamp: Some(json!("2024-01-01")),
            ..Default::default()
        };
        assert_eq!(normalize_request(&request).timestamp, Some(json!("2024-01-01")));
    }

    #[test]
    fn test_normalize_request_missing_everything() {
        let normalized = normalize_request(&CreateConversationRequest::default());
        assert_eq!(normalized.user_identifier, "");
        assert_eq!(normalized.media_type, "");
        assert_eq!(normalized.user_message, "");
        assert_eq!(normalized.assistant_message, "");
    }
}
