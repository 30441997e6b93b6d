//! Routing surface of the public site and admin console.

/// Where unauthenticated admin navigations are sent.
pub const LOGIN_PATH: &str = "/admin/login";
/// Where a successful login lands, regardless of what was requested before.
pub const DEFAULT_ADMIN_PATH: &str = "/admin";
/// Blog listing, also the recovery link of a missing post.
pub const BLOG_PATH: &str = "/blog";

/// A parsed navigation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    About,
    Services,
    Contact,
    Blog,
    BlogPost(String),
    Terms,
    Privacy,
    AdminLogin,
    AdminDashboard,
    AdminSeo,
    AdminBlogs,
    AdminKeywords,
    NotFound(String),
}

impl Route {
    /// Parse a path (query string and fragment ignored, trailing slash tolerated).
    pub fn parse(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["about"] => Route::About,
            ["services"] => Route::Services,
            ["contact"] => Route::Contact,
            ["blog"] => Route::Blog,
            ["blog", slug] => Route::BlogPost((*slug).to_string()),
            ["terms"] => Route::Terms,
            ["privacy"] => Route::Privacy,
            ["admin"] => Route::AdminDashboard,
            ["admin", "login"] => Route::AdminLogin,
            ["admin", "seo"] => Route::AdminSeo,
            ["admin", "blogs"] => Route::AdminBlogs,
            ["admin", "keywords"] => Route::AdminKeywords,
            _ => Route::NotFound(path.to_string()),
        }
    }

    /// Canonical path of this route.
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::About => "/about".to_string(),
            Route::Services => "/services".to_string(),
            Route::Contact => "/contact".to_string(),
            Route::Blog => BLOG_PATH.to_string(),
            Route::BlogPost(slug) => format!("{}/{}", BLOG_PATH, slug),
            Route::Terms => "/terms".to_string(),
            Route::Privacy => "/privacy".to_string(),
            Route::AdminLogin => LOGIN_PATH.to_string(),
            Route::AdminDashboard => DEFAULT_ADMIN_PATH.to_string(),
            Route::AdminSeo => "/admin/seo".to_string(),
            Route::AdminBlogs => "/admin/blogs".to_string(),
            Route::AdminKeywords => "/admin/keywords".to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }

    /// Admin views that require a session token.
    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Route::AdminDashboard | Route::AdminSeo | Route::AdminBlogs | Route::AdminKeywords
        )
    }
}
