//! Blog posts.

use serde::{Deserialize, Serialize};

pub const DEFAULT_AUTHOR: &str = "TechResona Team";

/// One published (or draft) article.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlogPost {
    #[serde(default)]
    pub id: String,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    pub content: String,
    /// Comma-separated search terms
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub meta_description: String,
    #[serde(default = "default_author")]
    pub author: String,
    #[serde(default = "default_published")]
    pub published: bool,
    #[serde(default)]
    pub featured_image: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl BlogPost {
    /// Keyword set, trimmed, with blanks dropped. An empty string yields no keywords.
    pub fn keyword_list(&self) -> Vec<String> {
        split_keywords(&self.keywords)
    }

    /// Paragraphs separated by blank lines.
    pub fn paragraphs(&self) -> Vec<&str> {
        self.content
            .split("\n\n")
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }
}

/// Request body for `POST /blogs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBlogRequest {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub keywords: String,
    pub meta_description: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub published: Option<bool>,
    #[serde(default)]
    pub featured_image: Option<String>,
}

impl CreateBlogRequest {
    pub fn validate(&self) -> Result<(), String> {
        if !is_valid_slug(&self.slug) {
            return Err(format!(
                "Invalid slug '{}': use lowercase letters, digits and single hyphens",
                self.slug
            ));
        }
        if self.title.trim().is_empty() {
            return Err("Title is required".to_string());
        }
        if self.content.trim().is_empty() {
            return Err("Content is required".to_string());
        }
        if split_keywords(&self.keywords).is_empty() {
            return Err("At least one keyword is required".to_string());
        }
        Ok(())
    }
}

/// Request body for `PUT /blogs/{slug}`. The slug itself is immutable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBlogRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
}

impl UpdateBlogRequest {
    pub fn validate(&self) -> Result<(), String> {
        if matches!(&self.content, Some(c) if c.trim().is_empty()) {
            return Err("Content cannot be empty".to_string());
        }
        if matches!(&self.keywords, Some(k) if split_keywords(k).is_empty()) {
            return Err("At least one keyword is required".to_string());
        }
        Ok(())
    }
}

/// Query string of `GET /blogs`.
#[derive(Debug, Clone, Deserialize)]
pub struct BlogListQuery {
    #[serde(default = "default_published")]
    pub published_only: bool,
}

impl Default for BlogListQuery {
    fn default() -> Self {
        Self {
            published_only: true,
        }
    }
}

/// Lowercase ASCII letters, digits and single inner hyphens.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

pub fn split_keywords(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

fn default_author() -> String {
    DEFAULT_AUTHOR.to_string()
}

fn default_published() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateBlogRequest {
        CreateBlogRequest {
            slug: "cloud-migration-strategy-india-2025".into(),
            title: "Cloud Migration Strategy".into(),
            excerpt: "Proven strategies".into(),
            content: "First paragraph.\n\nSecond paragraph.".into(),
            keywords: "cloud migration, azure".into(),
            meta_description: "Guide".into(),
            author: None,
            published: None,
            featured_image: None,
        }
    }

    #[test]
    fn test_slug_rules() {
        assert!(is_valid_slug("azure-cost-optimization-2025"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("Azure"));
        assert!(!is_valid_slug("-leading"));
        assert!(!is_valid_slug("trailing-"));
        assert!(!is_valid_slug("double--hyphen"));
        assert!(!is_valid_slug("with space"));
        assert!(!is_valid_slug("../etc"));
    }

    #[test]
    fn test_create_validation() {
        assert!(request().validate().is_ok());

        let mut no_content = request();
        no_content.content = "  ".into();
        assert!(no_content.validate().is_err());

        let mut no_keywords = request();
        no_keywords.keywords = " , ".into();
        assert!(no_keywords.validate().is_err());
    }

    #[test]
    fn test_empty_keywords_yield_empty_set() {
        let post: BlogPost = serde_json::from_str(
            r#"{"slug": "a", "title": "A", "content": "Body"}"#,
        )
        .unwrap();
        assert!(post.keyword_list().is_empty());
        assert_eq!(post.author, DEFAULT_AUTHOR);
        assert!(post.published);
    }

    #[test]
    fn test_paragraphs() {
        let post: BlogPost = serde_json::from_str(
            r#"{"slug": "a", "title": "A", "content": "One.\n\nTwo.\n\n\n\nThree.", "keywords": " azure ,aws,, "}"#,
        )
        .unwrap();
        assert_eq!(post.paragraphs(), vec!["One.", "Two.", "Three."]);
        assert_eq!(post.keyword_list(), vec!["azure".to_string(), "aws".to_string()]);
    }
}
