//! Aggregate statistics over conversation records.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::conversation::MediaType;

/// Totals for either the whole collection or one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationStats {
    pub total: u64,
    /// One entry per media type that has at least one record.
    pub by_media_type: Vec<MediaTypeCount>,
    /// Timestamp of the most recent record, `None` when nothing matches.
    pub last_record_timestamp: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaTypeCount {
    pub media_type: MediaType,
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stats_serialize_null_timestamp() {
        let stats = ConversationStats {
            total: 0,
            by_media_type: Vec::new(),
            last_record_timestamp: None,
        };
        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["total"], 0);
        assert!(value["byMediaType"].as_array().unwrap().is_empty());
        assert!(value["lastRecordTimestamp"].is_null());
    }

    #[test]
    fn test_media_type_count_shape() {
        let count = MediaTypeCount {
            media_type: MediaType::Image,
            count: 4,
        };
        let value = serde_json::to_value(&count).unwrap();
        assert_eq!(value, serde_json::json!({"mediaType": "image", "count": 4}));
    }
}
