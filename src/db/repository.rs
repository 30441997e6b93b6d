//! Database repository for CRUD operations.
//!
//! Uses prepared statements and transactions for data integrity.

use chrono::{SecondsFormat, Utc};
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{
    Admin, AnalyticsSummary, BlogPost, CreateBlogRequest, CreateKeywordRequest, Keyword,
    RobotsTxt, SeoRecord, SeoRequest, UpdateBlogRequest, DEFAULT_AUTHOR,
};

/// Number of blog titles reported as recent updates on the dashboard.
const RECENT_UPDATES_LIMIT: i64 = 5;

/// Current time as a fixed-width RFC 3339 string, so stored timestamps sort lexically.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== ADMIN OPERATIONS ====================

    /// Find an admin by e-mail (case-insensitive).
    pub async fn find_admin_by_email(&self, email: &str) -> Result<Option<Admin>, AppError> {
        let row = sqlx::query(
            "SELECT id, email, password_hash, created_at FROM admins WHERE lower(email) = lower(?)",
        )
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(admin_from_row))
    }

    /// Create an admin with an already-hashed password.
    pub async fn create_admin(&self, email: &str, password_hash: &str) -> Result<Admin, AppError> {
        if self.find_admin_by_email(email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let admin = Admin {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.trim().to_string(),
            password_hash: password_hash.to_string(),
            created_at: now_timestamp(),
        };

        sqlx::query("INSERT INTO admins (id, email, password_hash, created_at) VALUES (?, ?, ?, ?)")
            .bind(&admin.id)
            .bind(&admin.email)
            .bind(&admin.password_hash)
            .bind(&admin.created_at)
            .execute(&self.pool)
            .await?;

        Ok(admin)
    }

    // ==================== SEO OPERATIONS ====================

    /// List all SEO records.
    pub async fn list_seo(&self) -> Result<Vec<SeoRecord>, AppError> {
        let rows = sqlx::query(
            "SELECT id, page, title, description, keywords, og_image, json_ld, updated_at FROM seo_settings ORDER BY page",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(seo_from_row).collect())
    }

    /// Get the SEO record of one page.
    pub async fn get_seo(&self, page: &str) -> Result<Option<SeoRecord>, AppError> {
        let row = sqlx::query(
            "SELECT id, page, title, description, keywords, og_image, json_ld, updated_at FROM seo_settings WHERE page = ?",
        )
        .bind(page)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(seo_from_row))
    }

    /// Create the SEO record of a page that has none yet.
    pub async fn create_seo(&self, page: &str, request: &SeoRequest) -> Result<SeoRecord, AppError> {
        if self.get_seo(page).await?.is_some() {
            return Err(AppError::Conflict(
                "SEO settings already exist for this page".to_string(),
            ));
        }

        let record = seo_record(uuid::Uuid::new_v4().to_string(), page, request);
        let json_ld = encode_json_ld(&record)?;

        sqlx::query(
            "INSERT INTO seo_settings (id, page, title, description, keywords, og_image, json_ld, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.id)
        .bind(&record.page)
        .bind(&record.title)
        .bind(&record.description)
        .bind(&record.keywords)
        .bind(&record.og_image)
        .bind(&json_ld)
        .bind(&record.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    /// Replace the SEO record of a page, creating it when missing.
    pub async fn upsert_seo(&self, page: &str, request: &SeoRequest) -> Result<SeoRecord, AppError> {
        let id = self
            .get_seo(page)
            .await?
            .map(|existing| existing.id)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let record = seo_record(id, page, request);
        let json_ld = encode_json_ld(&record)?;

        sqlx::query(
            r#"
            INSERT INTO seo_settings (id, page, title, description, keywords, og_image, json_ld, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(page) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                keywords = excluded.keywords,
                og_image = excluded.og_image,
                json_ld = excluded.json_ld,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&record.id)
        .bind(&record.page)
        .bind(&record.title)
        .bind(&record.description)
        .bind(&record.keywords)
        .bind(&record.og_image)
        .bind(&json_ld)
        .bind(&record.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    // ==================== ROBOTS OPERATIONS ====================

    /// Get the stored robots.txt, if any.
    pub async fn get_robots(&self) -> Result<Option<RobotsTxt>, AppError> {
        let row = sqlx::query(
            "SELECT id, content, updated_at FROM robots_txt ORDER BY updated_at DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| RobotsTxt {
            id: row.get("id"),
            content: row.get("content"),
            updated_at: row.get("updated_at"),
        }))
    }

    /// Replace the stored robots.txt.
    pub async fn replace_robots(&self, content: &str) -> Result<RobotsTxt, AppError> {
        let robots = RobotsTxt {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.to_string(),
            updated_at: now_timestamp(),
        };

        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM robots_txt").execute(&mut *tx).await?;
        sqlx::query("INSERT INTO robots_txt (id, content, updated_at) VALUES (?, ?, ?)")
            .bind(&robots.id)
            .bind(&robots.content)
            .bind(&robots.updated_at)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(robots)
    }

    // ==================== BLOG OPERATIONS ====================

    /// List blog posts, newest first.
    pub async fn list_blogs(&self, published_only: bool) -> Result<Vec<BlogPost>, AppError> {
        let sql = if published_only {
            "SELECT * FROM blogs WHERE published = 1 ORDER BY created_at DESC, rowid DESC"
        } else {
            "SELECT * FROM blogs ORDER BY created_at DESC, rowid DESC"
        };

        let rows = sqlx::query(sql).fetch_all(&self.pool).await?;
        Ok(rows.iter().map(blog_from_row).collect())
    }

    /// Get a blog post by slug.
    pub async fn get_blog(&self, slug: &str) -> Result<Option<BlogPost>, AppError> {
        let row = sqlx::query("SELECT * FROM blogs WHERE slug = ?")
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(blog_from_row))
    }

    /// Create a blog post. Slugs are unique.
    pub async fn create_blog(&self, request: &CreateBlogRequest) -> Result<BlogPost, AppError> {
        if self.get_blog(&request.slug).await?.is_some() {
            return Err(AppError::Conflict(
                "Blog with this slug already exists".to_string(),
            ));
        }

        let now = now_timestamp();
        let post = BlogPost {
            id: uuid::Uuid::new_v4().to_string(),
            slug: request.slug.clone(),
            title: request.title.clone(),
            excerpt: request.excerpt.clone(),
            content: request.content.clone(),
            keywords: request.keywords.clone(),
            meta_description: request.meta_description.clone(),
            author: request
                .author
                .clone()
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
            published: request.published.unwrap_or(true),
            featured_image: request.featured_image.clone(),
            created_at: now.clone(),
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO blogs (id, slug, title, excerpt, content, keywords, meta_description, author, published, featured_image, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&post.id)
        .bind(&post.slug)
        .bind(&post.title)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(&post.keywords)
        .bind(&post.meta_description)
        .bind(&post.author)
        .bind(post.published as i32)
        .bind(&post.featured_image)
        .bind(&post.created_at)
        .bind(&post.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(post)
    }

    /// Apply a partial update to a blog post. Absent fields keep their value.
    pub async fn update_blog(
        &self,
        slug: &str,
        request: &UpdateBlogRequest,
    ) -> Result<BlogPost, AppError> {
        let existing = self
            .get_blog(slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Blog not found".to_string()))?;

        let updated = BlogPost {
            title: request.title.clone().unwrap_or(existing.title),
            excerpt: request.excerpt.clone().unwrap_or(existing.excerpt),
            content: request.content.clone().unwrap_or(existing.content),
            keywords: request.keywords.clone().unwrap_or(existing.keywords),
            meta_description: request
                .meta_description
                .clone()
                .unwrap_or(existing.meta_description),
            published: request.published.unwrap_or(existing.published),
            featured_image: request.featured_image.clone().or(existing.featured_image),
            updated_at: now_timestamp(),
            ..existing
        };

        sqlx::query(
            "UPDATE blogs SET title = ?, excerpt = ?, content = ?, keywords = ?, meta_description = ?, published = ?, featured_image = ?, updated_at = ? WHERE slug = ?",
        )
        .bind(&updated.title)
        .bind(&updated.excerpt)
        .bind(&updated.content)
        .bind(&updated.keywords)
        .bind(&updated.meta_description)
        .bind(updated.published as i32)
        .bind(&updated.featured_image)
        .bind(&updated.updated_at)
        .bind(slug)
        .execute(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Delete a blog post.
    pub async fn delete_blog(&self, slug: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM blogs WHERE slug = ?")
            .bind(slug)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Blog not found".to_string()));
        }
        Ok(())
    }

    // ==================== KEYWORD OPERATIONS ====================

    /// List all tracked keywords.
    pub async fn list_keywords(&self) -> Result<Vec<Keyword>, AppError> {
        let rows = sqlx::query(
            "SELECT id, keyword, page, ranking, search_volume, difficulty, tracked_at FROM keywords ORDER BY tracked_at DESC, rowid DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(keyword_from_row).collect())
    }

    /// Start tracking a keyword.
    pub async fn create_keyword(&self, request: &CreateKeywordRequest) -> Result<Keyword, AppError> {
        let keyword = Keyword {
            id: uuid::Uuid::new_v4().to_string(),
            keyword: request.keyword.trim().to_string(),
            page: request.page.trim().to_string(),
            ranking: request.ranking,
            search_volume: request.search_volume,
            difficulty: request.difficulty.clone(),
            tracked_at: now_timestamp(),
        };

        sqlx::query(
            "INSERT INTO keywords (id, keyword, page, ranking, search_volume, difficulty, tracked_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&keyword.id)
        .bind(&keyword.keyword)
        .bind(&keyword.page)
        .bind(keyword.ranking)
        .bind(keyword.search_volume)
        .bind(&keyword.difficulty)
        .bind(&keyword.tracked_at)
        .execute(&self.pool)
        .await?;

        Ok(keyword)
    }

    /// Stop tracking a keyword.
    pub async fn delete_keyword(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM keywords WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Keyword not found".to_string()));
        }
        Ok(())
    }

    // ==================== ANALYTICS ====================

    /// Counts and recent blog activity for the dashboard.
    pub async fn analytics(&self) -> Result<AnalyticsSummary, AppError> {
        let counts = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM seo_settings) AS total_pages,
                (SELECT COUNT(*) FROM blogs) AS total_blogs,
                (SELECT COUNT(*) FROM keywords) AS total_keywords
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let recent = sqlx::query("SELECT title FROM blogs ORDER BY updated_at DESC, rowid DESC LIMIT ?")
            .bind(RECENT_UPDATES_LIMIT)
            .fetch_all(&self.pool)
            .await?;

        Ok(AnalyticsSummary {
            total_pages: counts.get("total_pages"),
            total_blogs: counts.get("total_blogs"),
            total_keywords: counts.get("total_keywords"),
            recent_updates: recent.iter().map(|row| row.get("title")).collect(),
        })
    }
}

// Helper functions for row conversion

fn seo_record(id: String, page: &str, request: &SeoRequest) -> SeoRecord {
    SeoRecord {
        id,
        page: page.to_string(),
        title: request.title.clone(),
        description: request.description.clone(),
        keywords: request.keywords.clone(),
        og_image: request.og_image.clone(),
        json_ld: request.json_ld.clone(),
        updated_at: now_timestamp(),
    }
}

fn encode_json_ld(record: &SeoRecord) -> Result<Option<String>, AppError> {
    record
        .json_ld
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(AppError::from)
}

fn admin_from_row(row: &sqlx::sqlite::SqliteRow) -> Admin {
    Admin {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        created_at: row.get("created_at"),
    }
}

fn seo_from_row(row: &sqlx::sqlite::SqliteRow) -> SeoRecord {
    let json_ld_str: Option<String> = row.get("json_ld");
    SeoRecord {
        id: row.get("id"),
        page: row.get("page"),
        title: row.get("title"),
        description: row.get("description"),
        keywords: row.get("keywords"),
        og_image: row.get("og_image"),
        json_ld: json_ld_str.and_then(|s| serde_json::from_str(&s).ok()),
        updated_at: row.get("updated_at"),
    }
}

fn blog_from_row(row: &sqlx::sqlite::SqliteRow) -> BlogPost {
    let published: i32 = row.get("published");
    BlogPost {
        id: row.get("id"),
        slug: row.get("slug"),
        title: row.get("title"),
        excerpt: row.get("excerpt"),
        content: row.get("content"),
        keywords: row.get("keywords"),
        meta_description: row.get("meta_description"),
        author: row.get("author"),
        published: published != 0,
        featured_image: row.get("featured_image"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn keyword_from_row(row: &sqlx::sqlite::SqliteRow) -> Keyword {
    Keyword {
        id: row.get("id"),
        keyword: row.get("keyword"),
        page: row.get("page"),
        ranking: row.get("ranking"),
        search_volume: row.get("search_volume"),
        difficulty: row.get("difficulty"),
        tracked_at: row.get("tracked_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use serde_json::json;
    use tempfile::TempDir;

    async fn repo() -> (Repository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let pool = init_database(&temp_dir.path().join("repo.sqlite"))
            .await
            .unwrap();
        (Repository::new(pool), temp_dir)
    }

    fn blog(slug: &str, published: bool) -> CreateBlogRequest {
        CreateBlogRequest {
            slug: slug.to_string(),
            title: format!("Title of {}", slug),
            excerpt: "Excerpt".to_string(),
            content: "Body".to_string(),
            keywords: "azure, aws".to_string(),
            meta_description: "Meta".to_string(),
            author: None,
            published: Some(published),
            featured_image: None,
        }
    }

    #[test]
    fn test_timestamps_are_fixed_width() {
        let ts = now_timestamp();
        assert_eq!(ts.len(), "2025-01-01T00:00:00.000000Z".len());
        assert!(ts.ends_with('Z'));
    }

    #[tokio::test]
    async fn test_upsert_seo_keeps_id_and_replaces_fields() {
        let (repo, _dir) = repo().await;

        let first = repo
            .upsert_seo(
                "home",
                &SeoRequest {
                    title: Some("Home".into()),
                    description: Some("Desc".into()),
                    json_ld: Some(json!({"@type": "Organization"})),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let second = repo
            .upsert_seo(
                "home",
                &SeoRequest {
                    title: Some("Home v2".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        let stored = repo.get_seo("home").await.unwrap().unwrap();
        assert_eq!(stored.title.as_deref(), Some("Home v2"));
        assert!(stored.description.is_none());
        assert!(stored.json_ld.is_none());
    }

    #[tokio::test]
    async fn test_create_seo_rejects_duplicate_page() {
        let (repo, _dir) = repo().await;
        let request = SeoRequest::default();

        repo.create_seo("about", &request).await.unwrap();
        let err = repo.create_seo("about", &request).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_blog_listing_and_update() {
        let (repo, _dir) = repo().await;

        repo.create_blog(&blog("first-post", true)).await.unwrap();
        repo.create_blog(&blog("draft-post", false)).await.unwrap();
        repo.create_blog(&blog("second-post", true)).await.unwrap();

        let published: Vec<String> = repo
            .list_blogs(true)
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.slug)
            .collect();
        assert_eq!(published, vec!["second-post", "first-post"]);
        assert_eq!(repo.list_blogs(false).await.unwrap().len(), 3);

        let updated = repo
            .update_blog(
                "first-post",
                &UpdateBlogRequest {
                    title: Some("Renamed".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.slug, "first-post");
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.content, "Body");
        assert_eq!(updated.author, DEFAULT_AUTHOR);

        let summary = repo.analytics().await.unwrap();
        assert_eq!(summary.total_blogs, 3);
        assert_eq!(summary.recent_updates.first().map(String::as_str), Some("Renamed"));
    }

    #[tokio::test]
    async fn test_missing_rows_are_not_found() {
        let (repo, _dir) = repo().await;

        assert!(matches!(
            repo.delete_blog("nope").await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            repo.update_blog("nope", &UpdateBlogRequest::default()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            repo.delete_keyword("nope").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_admin_email_is_unique_case_insensitive() {
        let (repo, _dir) = repo().await;

        repo.create_admin("admin@techresona.com", "hash").await.unwrap();
        assert!(repo
            .find_admin_by_email("ADMIN@techresona.com")
            .await
            .unwrap()
            .is_some());
        assert!(matches!(
            repo.create_admin("Admin@TechResona.com", "hash").await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_replace_robots_keeps_single_row() {
        let (repo, _dir) = repo().await;
        assert!(repo.get_robots().await.unwrap().is_none());

        repo.replace_robots("User-agent: *").await.unwrap();
        repo.replace_robots("User-agent: *\nDisallow: /admin").await.unwrap();

        let robots = repo.get_robots().await.unwrap().unwrap();
        assert_eq!(robots.content, "User-agent: *\nDisallow: /admin");
    }
}
