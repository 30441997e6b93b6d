//! Navigation: parse, guard, unmount the previous view, mount the next.

use std::collections::VecDeque;

use super::admin::{
    ActionError, AdminConsole, AdminView, LoginForm, LoginOutcome, Notice, LOGIN_SUCCESS_NOTICE,
    LOGOUT_NOTICE, SESSION_EXPIRED_NOTICE,
};
use super::client::ApiClient;
use super::contact::ContactForm;
use super::guard::{self, Access};
use super::meta::{PageKey, PageMeta};
use super::resolver::{BlogListView, BlogView, ContentResolver, Mounted};
use super::routes::{Route, LOGIN_PATH};
use super::session::Session;
use crate::config::{Config, SiteLinks};
use crate::models::{AnalyticsSummary, BlogPost, Keyword, SeoRecord};

/// The mounted view. Replacing it drops the old handles, which aborts their fetches.
#[derive(Debug)]
pub enum View {
    /// Nothing mounted yet.
    Blank,
    Page {
        page: PageKey,
        meta: Mounted<PageMeta>,
    },
    BlogList {
        meta: PageMeta,
        posts: Mounted<BlogListView>,
    },
    BlogDetail {
        slug: String,
        article: Mounted<BlogView>,
    },
    Login(LoginForm),
    Dashboard(Mounted<AdminView<AnalyticsSummary>>),
    SeoManager(Mounted<AdminView<Vec<SeoRecord>>>),
    BlogManager(Mounted<AdminView<Vec<BlogPost>>>),
    KeywordManager(Mounted<AdminView<Vec<Keyword>>>),
    NotFound(String),
}

impl View {
    /// Head metadata of a public view, as currently resolved.
    pub fn page_meta(&self) -> Option<PageMeta> {
        match self {
            View::Page { meta, .. } => Some(meta.current()),
            View::BlogList { meta, .. } => Some(meta.clone()),
            View::BlogDetail { article, .. } => match article.current() {
                BlogView::Loaded(article) => Some(article.meta),
                BlogView::Loading | BlogView::NotFound => None,
            },
            _ => None,
        }
    }

    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            View::Dashboard(_) | View::SeoManager(_) | View::BlogManager(_) | View::KeywordManager(_)
        )
    }
}

/// Client-side router of the site and admin console.
///
/// Views load in the background. Call [`settle`](Navigator::settle) or
/// [`poll`](Navigator::poll) to apply the session-expired transition once a load has
/// finished.
#[derive(Debug)]
pub struct Navigator {
    resolver: ContentResolver,
    console: AdminConsole,
    api: ApiClient,
    session: Session,
    links: SiteLinks,
    location: Option<Route>,
    view: View,
    notices: VecDeque<Notice>,
}

impl Navigator {
    pub fn new(api: ApiClient, session: Session, origin: &str, links: SiteLinks) -> Self {
        Self {
            resolver: ContentResolver::new(api.clone(), origin),
            console: AdminConsole::new(api.clone(), session.clone()),
            api,
            session,
            links,
            location: None,
            view: View::Blank,
            notices: VecDeque::new(),
        }
    }

    /// Navigator for the site described by `config`: its public origin and link set.
    pub fn from_config(api: ApiClient, session: Session, config: &Config) -> Self {
        Self::new(api, session, &config.site_url, config.links.clone())
    }

    /// Navigate to `path`. Protected paths without a session land on the login view.
    pub fn navigate(&mut self, path: &str) -> &View {
        let route = match guard::check(Route::parse(path), &self.session) {
            Access::Allow(route) => route,
            Access::Deny { redirect } => Route::parse(redirect),
        };

        // Unmount first so the old fetch is aborted before the new one starts
        self.view = View::Blank;
        self.view = self.mount(&route);
        self.location = Some(route);
        &self.view
    }

    /// Remount the current location, firing fresh fetches.
    pub fn reload(&mut self) -> &View {
        let path = self
            .location
            .as_ref()
            .map_or_else(|| "/".to_string(), Route::path);
        self.navigate(&path)
    }

    fn mount(&self, route: &Route) -> View {
        match route {
            Route::Home => self.page(PageKey::Home),
            Route::About => self.page(PageKey::About),
            Route::Services => self.page(PageKey::Services),
            Route::Contact => self.page(PageKey::Contact),
            Route::Terms => self.page(PageKey::Terms),
            Route::Privacy => self.page(PageKey::Privacy),
            Route::Blog => View::BlogList {
                meta: PageMeta::defaults(PageKey::Blog, self.resolver.origin()),
                posts: self.resolver.mount_blog_list(),
            },
            Route::BlogPost(slug) => View::BlogDetail {
                slug: slug.clone(),
                article: self.resolver.mount_blog_post(slug),
            },
            Route::AdminLogin => View::Login(LoginForm::default()),
            Route::AdminDashboard => View::Dashboard(self.console.load_dashboard()),
            Route::AdminSeo => View::SeoManager(self.console.load_seo_records()),
            Route::AdminBlogs => View::BlogManager(self.console.load_blogs()),
            Route::AdminKeywords => View::KeywordManager(self.console.load_keywords()),
            Route::NotFound(path) => View::NotFound(path.clone()),
        }
    }

    fn page(&self, page: PageKey) -> View {
        View::Page {
            page,
            meta: self.resolver.mount_page(page),
        }
    }

    /// Wait for the current view's fetch to finish, then [`poll`](Self::poll).
    pub async fn settle(&mut self) -> &View {
        match &mut self.view {
            View::Page { meta, .. } => {
                meta.settled().await;
            }
            View::BlogList { posts, .. } => {
                posts.settled().await;
            }
            View::BlogDetail { article, .. } => {
                article.settled().await;
            }
            View::Dashboard(view) => {
                view.settled().await;
            }
            View::SeoManager(view) => {
                view.settled().await;
            }
            View::BlogManager(view) => {
                view.settled().await;
            }
            View::KeywordManager(view) => {
                view.settled().await;
            }
            View::Blank | View::Login(_) | View::NotFound(_) => {}
        }

        self.poll();
        &self.view
    }

    /// Apply state the mounted view has already reached without waiting. An admin view
    /// whose load saw a rejected token ends the session and lands on the login view.
    /// Returns whether that transition happened.
    ///
    /// Admin views only publish [`AdminView::SessionExpired`]; leaving them is this
    /// method's job (or [`settle`](Self::settle)'s), so event loops call it after each
    /// state change they observe.
    pub fn poll(&mut self) -> bool {
        let expired = match &self.view {
            View::Dashboard(view) => view.current().is_session_expired(),
            View::SeoManager(view) => view.current().is_session_expired(),
            View::BlogManager(view) => view.current().is_session_expired(),
            View::KeywordManager(view) => view.current().is_session_expired(),
            _ => false,
        };

        if expired {
            self.expire_session();
        }
        expired
    }

    fn expire_session(&mut self) {
        tracing::info!("Session token rejected; returning to login");
        self.notices
            .push_back(Notice::Error(SESSION_EXPIRED_NOTICE.to_string()));
        self.session.clear();
        self.navigate(LOGIN_PATH);
    }

    /// Submit the login view's form. Does nothing outside the login view.
    pub async fn submit_login(&mut self) -> Option<LoginOutcome> {
        let View::Login(form) = &mut self.view else {
            return None;
        };
        let outcome = form.submit(&self.api, &self.session).await;

        match &outcome {
            LoginOutcome::LoggedIn { redirect } => {
                self.notices
                    .push_back(Notice::Success(LOGIN_SUCCESS_NOTICE.to_string()));
                self.navigate(redirect);
            }
            LoginOutcome::Rejected { message } => {
                self.notices.push_back(Notice::Error(message.clone()));
            }
        }
        Some(outcome)
    }

    pub fn logout(&mut self) -> &View {
        self.session.clear();
        self.notices
            .push_back(Notice::Success(LOGOUT_NOTICE.to_string()));
        self.navigate(LOGIN_PATH)
    }

    /// Route the outcome of an admin mutation: failures become notices, a rejected token
    /// ends the session.
    pub fn handle_action<T>(&mut self, result: Result<T, ActionError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(ActionError::SessionExpired) => {
                self.expire_session();
                None
            }
            Err(ActionError::Failed(message)) => {
                self.notices.push_back(Notice::Error(message));
                None
            }
        }
    }

    pub fn submit_contact(&mut self, form: &mut ContactForm) -> bool {
        match form.submit() {
            Ok(notice) => {
                self.notices.push_back(Notice::Success(notice.to_string()));
                true
            }
            Err(e) => {
                self.notices.push_back(Notice::Error(e.to_string()));
                false
            }
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    /// The route actually rendered, after guarding.
    pub fn location(&self) -> Option<&Route> {
        self.location.as_ref()
    }

    pub fn console(&self) -> &AdminConsole {
        &self.console
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn links(&self) -> &SiteLinks {
        &self.links
    }

    /// Take every queued notice, oldest first.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline() -> Navigator {
        Navigator::new(
            ApiClient::new("http://127.0.0.1:9"),
            Session::in_memory(),
            "https://techresona.com",
            SiteLinks::default(),
        )
    }

    #[tokio::test]
    async fn test_protected_navigation_without_token_lands_on_login() {
        let mut nav = offline();
        assert!(matches!(nav.navigate("/admin/seo"), View::Login(_)));
        assert_eq!(nav.location(), Some(&Route::AdminLogin));
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let mut nav = offline();
        assert!(matches!(nav.navigate("/nowhere"), View::NotFound(p) if p == "/nowhere"));
    }

    #[tokio::test]
    async fn test_offline_page_keeps_defaults() {
        let mut nav = offline();
        nav.navigate("/services");
        let meta = nav.settle().await.page_meta().unwrap();
        assert_eq!(
            meta,
            PageMeta::defaults(PageKey::Services, "https://techresona.com")
        );
    }

    #[tokio::test]
    async fn test_logout_clears_token() {
        let mut nav = offline();
        nav.session().set("token");
        assert!(matches!(nav.logout(), View::Login(_)));
        assert!(!nav.session().is_present());
        assert_eq!(
            nav.drain_notices(),
            vec![Notice::Success("Logged out successfully".into())]
        );
        assert!(nav.drain_notices().is_empty());
    }

    #[tokio::test]
    async fn test_session_expired_action_redirects() {
        let mut nav = offline();
        nav.session().set("token");
        nav.navigate("/admin/keywords");
        let out: Option<()> = nav.handle_action(Err(ActionError::SessionExpired));
        assert!(out.is_none());
        assert!(matches!(nav.view(), View::Login(_)));
        assert!(!nav.session().is_present());
        assert_eq!(
            nav.drain_notices(),
            vec![Notice::Error("Session expired. Please login again.".into())]
        );
    }

    #[tokio::test]
    async fn test_poll_leaves_public_views_alone() {
        let mut nav = offline();
        nav.navigate("/about");
        assert!(!nav.poll());
        assert!(matches!(nav.view(), View::Page { .. }));
        assert!(nav.drain_notices().is_empty());
    }

    #[test]
    fn test_from_config_uses_configured_links() {
        let mut config = Config::for_tests("unused.sqlite".into());
        config.links.linkedin = "https://www.linkedin.com/company/example".to_string();
        let nav = Navigator::from_config(
            ApiClient::new("http://127.0.0.1:9"),
            Session::in_memory(),
            &config,
        );
        assert_eq!(nav.links().linkedin, "https://www.linkedin.com/company/example");
        assert_eq!(nav.links().view_website, "/");
    }

    #[tokio::test]
    async fn test_contact_notice() {
        let mut nav = offline();
        let mut form = ContactForm {
            name: "A".into(),
            email: "a@example.com".into(),
            message: "Hi".into(),
            ..Default::default()
        };
        assert!(nav.submit_contact(&mut form));
        assert_eq!(
            nav.drain_notices()[0].text(),
            "Message sent successfully! We'll get back to you soon."
        );
    }
}
