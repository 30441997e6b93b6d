//! SEO metadata records and robots.txt.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Metadata for one logical page, keyed by `page`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeoRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub page: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Comma-separated search terms
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub og_image: Option<String>,
    /// Structured data: one JSON-LD object or an array of them
    #[serde(default)]
    pub json_ld: Option<Value>,
    #[serde(default)]
    pub updated_at: String,
}

/// Request body for creating (`POST /seo`) or upserting (`PUT /seo/{page}`) a record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeoRequest {
    /// Required on create; ignored on upsert where the path names the page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub og_image: Option<String>,
    #[serde(default)]
    pub json_ld: Option<Value>,
}

/// Check that structured data is an object or a non-empty array of objects.
pub fn validate_json_ld(value: &Value) -> Result<(), String> {
    match value {
        Value::Object(_) => Ok(()),
        Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_object) => Ok(()),
        Value::Array(_) => Err("json_ld array must contain only objects".to_string()),
        _ => Err("json_ld must be an object or an array of objects".to_string()),
    }
}

/// Stored robots.txt document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RobotsTxt {
    pub id: String,
    pub content: String,
    pub updated_at: String,
}

/// Body of `GET`/`PUT /robots-txt`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RobotsContent {
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_ld_shapes() {
        assert!(validate_json_ld(&json!({"@type": "Organization"})).is_ok());
        assert!(validate_json_ld(&json!([{"@type": "Organization"}, {"@type": "LocalBusiness"}])).is_ok());
        assert!(validate_json_ld(&json!([])).is_err());
        assert!(validate_json_ld(&json!([1, 2])).is_err());
        assert!(validate_json_ld(&json!("text")).is_err());
    }

    #[test]
    fn test_partial_record_decodes() {
        let record: SeoRecord = serde_json::from_str(r#"{"title": "Only a title"}"#).unwrap();
        assert_eq!(record.title.as_deref(), Some("Only a title"));
        assert!(record.description.is_none());
        assert!(record.json_ld.is_none());
    }
}
