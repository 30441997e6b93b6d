//! HTTP client for the content API.

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::{
    AnalyticsSummary, BlogPost, CreateBlogRequest, CreateKeywordRequest, Credentials, Keyword,
    MessageResponse, RobotsContent, RobotsTxt, SeoRecord, SeoRequest, TokenResponse,
    UpdateBlogRequest,
};

/// Failure of one API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The API rejected the session token (HTTP 401).
    Unauthorized(Option<String>),
    /// The resource does not exist (HTTP 404).
    NotFound,
    /// Any other non-success status.
    Api { status: u16, detail: Option<String> },
    /// The request never produced a response.
    Transport(String),
    /// The response body did not match the expected shape.
    Decode(String),
}

impl ClientError {
    /// Server-provided explanation, when there is one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ClientError::Unauthorized(detail) | ClientError::Api { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized(_))
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Unauthorized(detail) => {
                write!(f, "unauthorized: {}", detail.as_deref().unwrap_or("no detail"))
            }
            ClientError::NotFound => write!(f, "not found"),
            ClientError::Api { status, detail } => write!(
                f,
                "API error {}: {}",
                status,
                detail.as_deref().unwrap_or("no detail")
            ),
            ClientError::Transport(msg) => write!(f, "transport error: {}", msg),
            ClientError::Decode(msg) => write!(f, "malformed response: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

/// Client for the `/api` surface.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    api_base: String,
}

impl ApiClient {
    /// `backend_url` is the server origin, e.g. `http://127.0.0.1:8001`.
    pub fn new(backend_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), backend_url)
    }

    pub fn with_client(http: reqwest::Client, backend_url: &str) -> Self {
        Self {
            http,
            api_base: format!("{}/api", backend_url.trim_end_matches('/')),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.api_base, path))
    }

    fn authorized(&self, method: Method, path: &str, token: &str) -> RequestBuilder {
        self.request(method, path).bearer_auth(token)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            return response.json::<T>().await.map_err(ClientError::from);
        }

        let detail = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| body.get("detail").and_then(|d| d.as_str()).map(str::to_string));

        Err(match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized(detail),
            StatusCode::NOT_FOUND => ClientError::NotFound,
            _ => ClientError::Api {
                status: status.as_u16(),
                detail,
            },
        })
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        body: &B,
    ) -> Result<T, ClientError> {
        self.send(request.json(body)).await
    }

    // Public content

    pub async fn fetch_seo(&self, page: &str) -> Result<SeoRecord, ClientError> {
        self.send(self.request(Method::GET, &format!("/seo/{}", page)))
            .await
    }

    pub async fn list_seo(&self) -> Result<Vec<SeoRecord>, ClientError> {
        self.send(self.request(Method::GET, "/seo")).await
    }

    pub async fn list_blogs(&self) -> Result<Vec<BlogPost>, ClientError> {
        self.send(self.request(Method::GET, "/blogs")).await
    }

    pub async fn fetch_blog(&self, slug: &str) -> Result<BlogPost, ClientError> {
        self.send(self.request(Method::GET, &format!("/blogs/{}", slug)))
            .await
    }

    pub async fn fetch_robots(&self) -> Result<RobotsContent, ClientError> {
        self.send(self.request(Method::GET, "/robots-txt")).await
    }

    // Auth

    pub async fn login(&self, credentials: &Credentials) -> Result<TokenResponse, ClientError> {
        self.send_json(self.request(Method::POST, "/auth/login"), credentials)
            .await
    }

    // Admin (bearer token)

    pub async fn analytics(&self, token: &str) -> Result<AnalyticsSummary, ClientError> {
        self.send(self.authorized(Method::GET, "/analytics", token))
            .await
    }

    pub async fn upsert_seo(
        &self,
        token: &str,
        page: &str,
        request: &SeoRequest,
    ) -> Result<SeoRecord, ClientError> {
        self.send_json(
            self.authorized(Method::PUT, &format!("/seo/{}", page), token),
            request,
        )
        .await
    }

    pub async fn list_all_blogs(&self, token: &str) -> Result<Vec<BlogPost>, ClientError> {
        self.send(
            self.authorized(Method::GET, "/blogs", token)
                .query(&[("published_only", "false")]),
        )
        .await
    }

    pub async fn create_blog(
        &self,
        token: &str,
        request: &CreateBlogRequest,
    ) -> Result<BlogPost, ClientError> {
        self.send_json(self.authorized(Method::POST, "/blogs", token), request)
            .await
    }

    pub async fn update_blog(
        &self,
        token: &str,
        slug: &str,
        request: &UpdateBlogRequest,
    ) -> Result<BlogPost, ClientError> {
        self.send_json(
            self.authorized(Method::PUT, &format!("/blogs/{}", slug), token),
            request,
        )
        .await
    }

    pub async fn delete_blog(&self, token: &str, slug: &str) -> Result<MessageResponse, ClientError> {
        self.send(self.authorized(Method::DELETE, &format!("/blogs/{}", slug), token))
            .await
    }

    pub async fn list_keywords(&self, token: &str) -> Result<Vec<Keyword>, ClientError> {
        self.send(self.authorized(Method::GET, "/keywords", token))
            .await
    }

    pub async fn create_keyword(
        &self,
        token: &str,
        request: &CreateKeywordRequest,
    ) -> Result<Keyword, ClientError> {
        self.send_json(self.authorized(Method::POST, "/keywords", token), request)
            .await
    }

    pub async fn delete_keyword(&self, token: &str, id: &str) -> Result<MessageResponse, ClientError> {
        self.send(self.authorized(Method::DELETE, &format!("/keywords/{}", id), token))
            .await
    }

    pub async fn update_robots(&self, token: &str, content: &str) -> Result<RobotsTxt, ClientError> {
        self.send_json(
            self.authorized(Method::PUT, "/robots-txt", token),
            &RobotsContent {
                content: content.to_string(),
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_base_is_normalized() {
        assert_eq!(
            ApiClient::new("http://localhost:8001/").api_base,
            "http://localhost:8001/api"
        );
    }

    #[test]
    fn test_error_detail() {
        let err = ClientError::Unauthorized(Some("Invalid email or password".into()));
        assert!(err.is_unauthorized());
        assert_eq!(err.detail(), Some("Invalid email or password"));
        assert_eq!(ClientError::NotFound.detail(), None);
        assert_eq!(
            ClientError::Api {
                status: 500,
                detail: None
            }
            .to_string(),
            "API error 500: no detail"
        );
    }
}
