//! Content resolution for public pages.
//!
//! Each mounted page starts from its static state and fires exactly one fetch. The fetch runs
//! on its own task and publishes through a `watch` channel owned by the page handle; dropping
//! the handle aborts the task, so a late response can never touch a page that is gone.

use std::future::Future;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::client::{ApiClient, ClientError};
use super::meta::{PageKey, PageMeta};
use super::routes::BLOG_PATH;
use crate::models::BlogPost;

/// State of a mounted view plus the task that may still update it.
#[derive(Debug)]
pub struct Mounted<T> {
    state: watch::Receiver<T>,
    task: Option<JoinHandle<()>>,
}

impl<T> Mounted<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// A view with nothing to load.
    pub fn ready(value: T) -> Self {
        let (_tx, state) = watch::channel(value);
        Self { state, task: None }
    }

    /// Show `initial` now; replace it with whatever `load` yields, if anything.
    pub fn spawn<F>(initial: T, load: F) -> Self
    where
        F: Future<Output = Option<T>> + Send + 'static,
    {
        let (tx, state) = watch::channel(initial);
        let task = tokio::spawn(async move {
            if let Some(next) = load.await {
                tx.send_replace(next);
            }
        });
        Self {
            state,
            task: Some(task),
        }
    }

    /// What the view shows right now.
    pub fn current(&self) -> T {
        self.state.borrow().clone()
    }

    /// Wait for the load (if any) to finish, then return the final state.
    pub async fn settled(&mut self) -> T {
        if let Some(task) = self.task.as_mut() {
            if let Err(e) = task.await {
                if e.is_panic() {
                    tracing::error!("Content task panicked: {}", e);
                }
            }
            self.task = None;
        }
        self.current()
    }

    pub fn is_settled(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// A receiver that observes this view's state.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.state.clone()
    }
}

impl<T> Drop for Mounted<T> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// A fully loaded blog article.
#[derive(Debug, Clone, PartialEq)]
pub struct BlogArticle {
    pub post: BlogPost,
    pub meta: PageMeta,
    pub paragraphs: Vec<String>,
    pub keywords: Vec<String>,
}

/// What the blog detail page shows.
#[derive(Debug, Clone, PartialEq)]
pub enum BlogView {
    Loading,
    Loaded(Box<BlogArticle>),
    /// Missing or unreadable post. Rendered instead of falling back to defaults.
    NotFound,
}

impl BlogView {
    /// Link offered by the not-found state.
    pub fn back_link(&self) -> &'static str {
        BLOG_PATH
    }
}

/// What the blog listing shows.
#[derive(Debug, Clone, PartialEq)]
pub enum BlogListView {
    Loading,
    Loaded(Vec<BlogPost>),
}

/// Mounts public pages against the content API.
#[derive(Debug, Clone)]
pub struct ContentResolver {
    api: ApiClient,
    origin: String,
}

impl ContentResolver {
    pub fn new(api: ApiClient, origin: impl Into<String>) -> Self {
        Self {
            api,
            origin: origin.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Mount a static page: defaults first, then the page's SEO record if the API has one.
    pub fn mount_page(&self, page: PageKey) -> Mounted<PageMeta> {
        let defaults = PageMeta::defaults(page, &self.origin);
        let Some(seo_key) = page.seo_key() else {
            return Mounted::ready(defaults);
        };

        let api = self.api.clone();
        let mut resolved = defaults.clone();
        Mounted::spawn(defaults, async move {
            match api.fetch_seo(seo_key).await {
                Ok(record) => {
                    resolved.apply(&record);
                    Some(resolved)
                }
                Err(ClientError::NotFound) => {
                    tracing::debug!("No SEO record for {}; keeping defaults", seo_key);
                    None
                }
                Err(e) => {
                    tracing::warn!("SEO fetch for {} failed: {}", seo_key, e);
                    None
                }
            }
        })
    }

    /// Mount the blog detail page for `slug`.
    pub fn mount_blog_post(&self, slug: &str) -> Mounted<BlogView> {
        let api = self.api.clone();
        let origin = self.origin.clone();
        let slug = slug.to_string();

        Mounted::spawn(BlogView::Loading, async move {
            let view = match api.fetch_blog(&slug).await {
                Ok(post) if post.slug.is_empty() || post.title.is_empty() => {
                    tracing::warn!("Empty blog response for {}", slug);
                    BlogView::NotFound
                }
                Ok(post) => BlogView::Loaded(Box::new(article(post, &origin))),
                Err(e) => {
                    tracing::debug!("Blog {} unavailable: {}", slug, e);
                    BlogView::NotFound
                }
            };
            Some(view)
        })
    }

    /// Mount the blog listing. Failures show an empty list.
    pub fn mount_blog_list(&self) -> Mounted<BlogListView> {
        let api = self.api.clone();
        Mounted::spawn(BlogListView::Loading, async move {
            let posts = api.list_blogs().await.unwrap_or_else(|e| {
                tracing::warn!("Blog listing failed: {}", e);
                Vec::new()
            });
            Some(BlogListView::Loaded(posts))
        })
    }
}

fn article(post: BlogPost, origin: &str) -> BlogArticle {
    BlogArticle {
        meta: PageMeta::for_blog(&post, origin),
        paragraphs: post.paragraphs().into_iter().map(str::to_string).collect(),
        keywords: post.keyword_list(),
        post,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_ready_view_is_settled() {
        let mut view = Mounted::ready(1u32);
        assert!(view.is_settled());
        assert_eq!(view.settled().await, 1);
    }

    #[tokio::test]
    async fn test_spawned_view_updates_once_loaded() {
        let mut view = Mounted::spawn(0u32, async { Some(7) });
        assert_eq!(view.settled().await, 7);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_initial_state() {
        let mut view = Mounted::spawn(0u32, async { None });
        assert_eq!(view.settled().await, 0);
    }

    #[tokio::test]
    async fn test_dropping_view_discards_late_result() {
        let view = Mounted::spawn("initial".to_string(), async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Some("late".to_string())
        });
        let observer = view.subscribe();
        drop(view);

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(*observer.borrow(), "initial");
    }

    #[tokio::test]
    async fn test_pages_without_seo_key_do_not_fetch() {
        // Nothing listens on this port; a fetch would fail, but none should be attempted.
        let resolver = ContentResolver::new(ApiClient::new("http://127.0.0.1:9"), "https://techresona.com/");
        let view = resolver.mount_page(PageKey::Terms);
        assert!(view.is_settled());
        assert_eq!(resolver.origin(), "https://techresona.com");
    }

    #[tokio::test]
    async fn test_unreachable_api_falls_back_to_defaults() {
        let resolver = ContentResolver::new(ApiClient::new("http://127.0.0.1:9"), "https://techresona.com");
        let mut view = resolver.mount_page(PageKey::Home);
        let initial = view.current();
        assert_eq!(view.settled().await, initial);
        assert_eq!(initial, PageMeta::defaults(PageKey::Home, "https://techresona.com"));
    }

    #[tokio::test]
    async fn test_unreachable_api_shows_blog_not_found() {
        let resolver = ContentResolver::new(ApiClient::new("http://127.0.0.1:9"), "https://techresona.com");
        let mut view = resolver.mount_blog_post("anything");
        assert_eq!(view.current(), BlogView::Loading);
        let settled = view.settled().await;
        assert_eq!(settled, BlogView::NotFound);
        assert_eq!(settled.back_link(), "/blog");
    }
}
