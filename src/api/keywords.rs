//! Keyword tracking endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::ApiResult;
use crate::errors::AppError;
use crate::models::{CreateKeywordRequest, Keyword, MessageResponse};
use crate::AppState;

/// GET /api/keywords - List tracked keywords.
pub async fn list_keywords(State(state): State<AppState>) -> ApiResult<Vec<Keyword>> {
    Ok(Json(state.repo.list_keywords().await?))
}

/// POST /api/keywords - Track a keyword.
pub async fn create_keyword(
    State(state): State<AppState>,
    Json(request): Json<CreateKeywordRequest>,
) -> ApiResult<Keyword> {
    if request.keyword.trim().is_empty() {
        return Err(AppError::Validation("Keyword is required".to_string()));
    }
    if request.page.trim().is_empty() {
        return Err(AppError::Validation("Page is required".to_string()));
    }

    Ok(Json(state.repo.create_keyword(&request).await?))
}

/// DELETE /api/keywords/{id} - Stop tracking a keyword.
pub async fn delete_keyword(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<MessageResponse> {
    state.repo.delete_keyword(&id).await?;
    Ok(Json(MessageResponse::new("Keyword deleted successfully")))
}
