//! Keyword tracking entries.

use serde::{Deserialize, Serialize};

/// A search keyword tracked against one page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Keyword {
    pub id: String,
    pub keyword: String,
    pub page: String,
    #[serde(default)]
    pub ranking: Option<i64>,
    #[serde(default)]
    pub search_volume: Option<i64>,
    #[serde(default)]
    pub difficulty: Option<String>,
    pub tracked_at: String,
}

/// Request body for tracking a new keyword.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateKeywordRequest {
    pub keyword: String,
    pub page: String,
    #[serde(default)]
    pub ranking: Option<i64>,
    #[serde(default)]
    pub search_volume: Option<i64>,
    #[serde(default)]
    pub difficulty: Option<String>,
}
