//! Dashboard summary.

use serde::{Deserialize, Serialize};

/// Counts shown on the admin dashboard.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalyticsSummary {
    pub total_pages: i64,
    pub total_blogs: i64,
    pub total_keywords: i64,
    /// Titles of the most recently updated blog posts, newest first
    #[serde(default)]
    pub recent_updates: Vec<String>,
}
