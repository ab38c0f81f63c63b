use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Body for creating an entry that references external media.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CreateMediaRequest {
    /// Display title; derived from the URL when omitted
    #[serde(default)]
    pub title: Option<String>,
    pub url: String,
}

/// Partial update of an entry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PatchMediaRequest {
    #[serde(default)]
    pub set_title: Option<String>,
    #[serde(default)]
    pub add_tags: Vec<String>,
    #[serde(default)]
    pub del_tags: Vec<String>,
}

/// Optional library filters.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, IntoParams, ToSchema)]
pub struct SearchQuery {
    /// Exact tag match (case-insensitive)
    #[serde(default)]
    pub tag: Option<String>,
    /// Case-insensitive title substring
    #[serde(default)]
    pub q: Option<String>,
}
