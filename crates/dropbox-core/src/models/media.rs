use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

/// Opaque media identifier, used as the library key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct MediaId(String);

impl MediaId {
    /// Generate a fresh identifier (random v4 UUID in simple hex form).
    pub fn generate() -> Self {
        MediaId(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for MediaId {
    fn from(value: String) -> Self {
        MediaId(value)
    }
}

impl From<&str> for MediaId {
    fn from(value: &str) -> Self {
        MediaId(value.to_string())
    }
}

/// A library entry as persisted in the library document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaEntry {
    pub media_id: MediaId,
    pub title: String,
    pub url: String,
    /// Playback length in milliseconds; 0 when unknown
    #[serde(default)]
    pub duration: u64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}

impl MediaEntry {
    pub fn new(media_id: MediaId, title: impl Into<String>, url: impl Into<String>) -> Self {
        MediaEntry {
            media_id,
            title: title.into(),
            url: url.into(),
            duration: 0,
            tags: Vec::new(),
            subtitle: None,
        }
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration = duration_ms;
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaResponse {
    #[schema(value_type = String)]
    pub media_id: MediaId,
    pub title: String,
    pub url: String,
    /// Mirrors `url`
    pub src: String,
    /// Milliseconds
    pub duration: u64,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
}

impl From<MediaEntry> for MediaResponse {
    fn from(entry: MediaEntry) -> Self {
        MediaResponse {
            media_id: entry.media_id,
            title: entry.title,
            src: entry.url.clone(),
            url: entry.url,
            duration: entry.duration,
            tags: entry.tags,
            subtitle: entry.subtitle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_serializes_camel_case_without_subtitle() {
        let entry = MediaEntry::new("abc".into(), "Demo", "http://x/demo.mp4");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["mediaId"], "abc");
        assert_eq!(json["duration"], 0);
        assert!(json.get("subtitle").is_none());
    }

    #[test]
    fn test_entry_tolerates_missing_optional_fields() {
        let entry: MediaEntry =
            serde_json::from_str(r#"{"mediaId":"a1","title":"T","url":"/media/a1.mp3"}"#).unwrap();
        assert_eq!(entry.duration, 0);
        assert!(entry.tags.is_empty());
        assert_eq!(entry.subtitle, None);
    }

    #[test]
    fn test_response_mirrors_url_in_src() {
        let mut entry = MediaEntry::new("abc".into(), "Demo", "http://x/demo.mp4");
        entry.subtitle = Some("abc.vtt".to_string());
        let response = MediaResponse::from(entry);
        assert_eq!(response.src, "http://x/demo.mp4");
        assert_eq!(response.url, response.src);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["subtitle"], "abc.vtt");
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let a = MediaId::generate();
        let b = MediaId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);
    }
}
