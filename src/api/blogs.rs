//! Blog endpoints.

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};

use super::ApiResult;
use crate::auth::authenticate;
use crate::errors::AppError;
use crate::models::{BlogListQuery, BlogPost, CreateBlogRequest, MessageResponse, UpdateBlogRequest};
use crate::AppState;

/// GET /api/blogs - List posts, newest first. `published_only=false` includes drafts and
/// requires an admin token.
pub async fn list_blogs(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<BlogListQuery>,
) -> ApiResult<Vec<BlogPost>> {
    if !query.published_only {
        let admin = authenticate(&state, &headers).await?;
        tracing::debug!("Draft listing requested by {}", admin.email);
    }
    Ok(Json(state.repo.list_blogs(query.published_only).await?))
}

/// GET /api/blogs/{slug} - Get one post.
pub async fn get_blog(State(state): State<AppState>, Path(slug): Path<String>) -> ApiResult<BlogPost> {
    state
        .repo
        .get_blog(&slug)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Blog not found".to_string()))
}

/// POST /api/blogs - Create a post.
pub async fn create_blog(
    State(state): State<AppState>,
    Json(request): Json<CreateBlogRequest>,
) -> ApiResult<BlogPost> {
    request.validate().map_err(AppError::Validation)?;

    let post = state.repo.create_blog(&request).await?;
    tracing::info!("Created blog {}", post.slug);
    Ok(Json(post))
}

/// PUT /api/blogs/{slug} - Update a post. The slug cannot change.
pub async fn update_blog(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(request): Json<UpdateBlogRequest>,
) -> ApiResult<BlogPost> {
    request.validate().map_err(AppError::Validation)?;

    let post = state.repo.update_blog(&slug, &request).await?;
    tracing::info!("Updated blog {}", slug);
    Ok(Json(post))
}

/// DELETE /api/blogs/{slug} - Delete a post.
pub async fn delete_blog(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<MessageResponse> {
    state.repo.delete_blog(&slug).await?;
    tracing::info!("Deleted blog {}", slug);
    Ok(Json(MessageResponse::new("Blog deleted successfully")))
}
