//! Admin console flows: login, logout, authenticated loads and mutations.
//!
//! Token validity is only ever learned from the API. Any 401 surfaces as
//! [`AdminView::SessionExpired`] or [`ActionError::SessionExpired`]; the navigator turns
//! either into the session-expired transition.

use std::future::Future;

use super::client::{ApiClient, ClientError};
use super::resolver::Mounted;
use super::routes::DEFAULT_ADMIN_PATH;
use super::session::Session;
use crate::models::{
    AnalyticsSummary, BlogPost, CreateBlogRequest, CreateKeywordRequest, Credentials, Keyword,
    RobotsTxt, SeoRecord, SeoRequest, UpdateBlogRequest,
};

pub const SESSION_EXPIRED_NOTICE: &str = "Session expired. Please login again.";
pub const LOGIN_SUCCESS_NOTICE: &str = "Login successful!";
pub const LOGOUT_NOTICE: &str = "Logged out successfully";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// User-visible notification (toast).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Success(text) | Notice::Error(text) => text,
        }
    }
}

/// Result of submitting the login form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Token stored; continue at `redirect`.
    LoggedIn { redirect: &'static str },
    /// Nothing stored; the form keeps its input.
    Rejected { message: String },
}

/// Login form state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub error: Option<String>,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            error: None,
        }
    }

    /// Exchange the credentials for a token and store it on success.
    pub async fn submit(&mut self, api: &ApiClient, session: &Session) -> LoginOutcome {
        let credentials = Credentials::new(self.email.trim(), self.password.clone());

        match api.login(&credentials).await {
            Ok(token) if !token.access_token.is_empty() => {
                session.set(&token.access_token);
                self.error = None;
                tracing::info!("Admin session started");
                LoginOutcome::LoggedIn {
                    redirect: DEFAULT_ADMIN_PATH,
                }
            }
            Ok(_) => self.reject(INVALID_CREDENTIALS.to_string()),
            Err(e) => {
                tracing::debug!("Login failed: {}", e);
                self.reject(e.detail().unwrap_or(INVALID_CREDENTIALS).to_string())
            }
        }
    }

    fn reject(&mut self, message: String) -> LoginOutcome {
        self.error = Some(message.clone());
        LoginOutcome::Rejected { message }
    }
}

/// State of an admin view that loads data with the session token.
#[derive(Debug, Clone, PartialEq)]
pub enum AdminView<T> {
    Loading,
    Ready(T),
    /// The load failed for a reason other than the session.
    Unavailable(String),
    /// The API rejected the token.
    SessionExpired,
}

impl<T> AdminView<T> {
    pub fn is_session_expired(&self) -> bool {
        matches!(self, AdminView::SessionExpired)
    }
}

/// Load `call` with the stored token. A missing token counts as an expired session.
pub fn load_authorized<T, F, Fut>(session: &Session, call: F) -> Mounted<AdminView<T>>
where
    T: Clone + Send + Sync + 'static,
    F: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<T, ClientError>> + Send + 'static,
{
    let Some(token) = session.get() else {
        return Mounted::ready(AdminView::SessionExpired);
    };

    let request = call(token);
    Mounted::spawn(AdminView::Loading, async move {
        let view = match request.await {
            Ok(data) => AdminView::Ready(data),
            Err(e) if e.is_unauthorized() => AdminView::SessionExpired,
            Err(e) => {
                tracing::warn!("Admin load failed: {}", e);
                AdminView::Unavailable(e.to_string())
            }
        };
        Some(view)
    })
}

/// Failure of an admin mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    SessionExpired,
    Failed(String),
}

impl From<ClientError> for ActionError {
    fn from(err: ClientError) -> Self {
        if err.is_unauthorized() {
            return ActionError::SessionExpired;
        }
        ActionError::Failed(err.detail().map(str::to_string).unwrap_or_else(|| err.to_string()))
    }
}

impl std::fmt::Display for ActionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionError::SessionExpired => f.write_str(SESSION_EXPIRED_NOTICE),
            ActionError::Failed(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for ActionError {}

/// Loads and mutations behind the admin views.
#[derive(Debug, Clone)]
pub struct AdminConsole {
    api: ApiClient,
    session: Session,
}

impl AdminConsole {
    pub fn new(api: ApiClient, session: Session) -> Self {
        Self { api, session }
    }

    fn token(&self) -> Result<String, ActionError> {
        self.session.get().ok_or(ActionError::SessionExpired)
    }

    pub fn load_dashboard(&self) -> Mounted<AdminView<AnalyticsSummary>> {
        let api = self.api.clone();
        load_authorized(&self.session, move |token| async move { api.analytics(&token).await })
    }

    /// SEO records are public; the view still needs a session to edit them.
    pub fn load_seo_records(&self) -> Mounted<AdminView<Vec<SeoRecord>>> {
        let api = self.api.clone();
        load_authorized(&self.session, move |_token| async move { api.list_seo().await })
    }

    pub fn load_blogs(&self) -> Mounted<AdminView<Vec<BlogPost>>> {
        let api = self.api.clone();
        load_authorized(&self.session, move |token| async move {
            api.list_all_blogs(&token).await
        })
    }

    pub fn load_keywords(&self) -> Mounted<AdminView<Vec<Keyword>>> {
        let api = self.api.clone();
        load_authorized(&self.session, move |token| async move {
            api.list_keywords(&token).await
        })
    }

    pub async fn save_seo(&self, page: &str, request: &SeoRequest) -> Result<SeoRecord, ActionError> {
        let token = self.token()?;
        Ok(self.api.upsert_seo(&token, page, request).await?)
    }

    pub async fn create_blog(&self, request: &CreateBlogRequest) -> Result<BlogPost, ActionError> {
        let token = self.token()?;
        Ok(self.api.create_blog(&token, request).await?)
    }

    pub async fn update_blog(
        &self,
        slug: &str,
        request: &UpdateBlogRequest,
    ) -> Result<BlogPost, ActionError> {
        let token = self.token()?;
        Ok(self.api.update_blog(&token, slug, request).await?)
    }

    pub async fn delete_blog(&self, slug: &str) -> Result<(), ActionError> {
        let token = self.token()?;
        self.api.delete_blog(&token, slug).await?;
        Ok(())
    }

    pub async fn track_keyword(&self, request: &CreateKeywordRequest) -> Result<Keyword, ActionError> {
        let token = self.token()?;
        Ok(self.api.create_keyword(&token, request).await?)
    }

    pub async fn delete_keyword(&self, id: &str) -> Result<(), ActionError> {
        let token = self.token()?;
        self.api.delete_keyword(&token, id).await?;
        Ok(())
    }

    pub async fn update_robots(&self, content: &str) -> Result<RobotsTxt, ActionError> {
        let token = self.token()?;
        Ok(self.api.update_robots(&token, content).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_without_token_is_session_expired() {
        let session = Session::in_memory();
        let mut view = load_authorized(&session, |_token| async { Ok::<u32, ClientError>(1) });
        assert!(view.settled().await.is_session_expired());
    }

    #[tokio::test]
    async fn test_load_maps_unauthorized() {
        let session = Session::in_memory();
        session.set("stale");
        let mut view = load_authorized(&session, |_token| async {
            Err::<u32, _>(ClientError::Unauthorized(None))
        });
        assert_eq!(view.settled().await, AdminView::SessionExpired);
    }

    #[tokio::test]
    async fn test_load_passes_token_through() {
        let session = Session::in_memory();
        session.set("abc");
        let mut view = load_authorized(&session, |token| async move { Ok::<_, ClientError>(token) });
        assert_eq!(view.settled().await, AdminView::Ready("abc".to_string()));
    }

    #[test]
    fn test_action_error_from_client_error() {
        assert_eq!(
            ActionError::from(ClientError::Unauthorized(Some("x".into()))),
            ActionError::SessionExpired
        );
        assert_eq!(
            ActionError::from(ClientError::Api {
                status: 400,
                detail: Some("Blog with this slug already exists".into())
            }),
            ActionError::Failed("Blog with this slug already exists".into())
        );
        assert_eq!(
            ActionError::from(ClientError::NotFound),
            ActionError::Failed("not found".into())
        );
    }

    #[tokio::test]
    async fn test_console_actions_need_a_token() {
        let console = AdminConsole::new(ApiClient::new("http://127.0.0.1:9"), Session::in_memory());
        assert_eq!(
            console.delete_keyword("k").await,
            Err(ActionError::SessionExpired)
        );
    }
}
