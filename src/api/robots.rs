//! robots.txt and sitemap endpoints.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use super::ApiResult;
use crate::models::{BlogPost, RobotsContent, RobotsTxt};
use crate::sitemap::{build_sitemap, default_robots};
use crate::AppState;

/// GET /api/robots-txt - Current robots.txt as JSON.
pub async fn get_robots(State(state): State<AppState>) -> ApiResult<RobotsContent> {
    Ok(Json(RobotsContent {
        content: current_robots(&state).await?,
    }))
}

/// PUT /api/robots-txt - Replace robots.txt.
pub async fn update_robots(
    State(state): State<AppState>,
    Json(request): Json<RobotsContent>,
) -> ApiResult<RobotsTxt> {
    let robots = state.repo.replace_robots(&request.content).await?;
    tracing::info!("robots.txt updated");
    Ok(Json(robots))
}

/// GET /robots.txt - Plain-text robots.txt.
pub async fn robots_txt(State(state): State<AppState>) -> Result<Response, crate::errors::AppError> {
    let content = current_robots(&state).await?;
    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], content).into_response())
}

/// GET /sitemap.xml and GET /api/sitemap/generate - Sitemap of public pages and posts.
pub async fn sitemap_xml(State(state): State<AppState>) -> Result<Response, crate::errors::AppError> {
    let blogs: Vec<BlogPost> = state.repo.list_blogs(true).await?;
    let xml = build_sitemap(&state.config.site_url, &blogs);
    Ok(([(header::CONTENT_TYPE, "application/xml")], xml).into_response())
}

async fn current_robots(state: &AppState) -> Result<String, crate::errors::AppError> {
    Ok(state
        .repo
        .get_robots()
        .await?
        .map(|r| r.content)
        .unwrap_or_else(|| default_robots(&state.config.site_url)))
}
