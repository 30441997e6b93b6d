//! SEO metadata endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::ApiResult;
use crate::errors::AppError;
use crate::models::{validate_json_ld, SeoRecord, SeoRequest};
use crate::AppState;

/// GET /api/seo - List all SEO records.
pub async fn list_seo(State(state): State<AppState>) -> ApiResult<Vec<SeoRecord>> {
    Ok(Json(state.repo.list_seo().await?))
}

/// GET /api/seo/{page} - Get the SEO record of one page.
pub async fn get_seo(State(state): State<AppState>, Path(page): Path<String>) -> ApiResult<SeoRecord> {
    state
        .repo
        .get_seo(&page)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("SEO settings not found".to_string()))
}

/// POST /api/seo - Create the SEO record of a page.
pub async fn create_seo(
    State(state): State<AppState>,
    Json(request): Json<SeoRequest>,
) -> ApiResult<SeoRecord> {
    let page = request
        .page
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::Validation("Page is required".to_string()))?
        .to_string();
    validate(&request)?;

    let record = state.repo.create_seo(&page, &request).await?;
    tracing::info!("Created SEO settings for {}", page);
    Ok(Json(record))
}

/// PUT /api/seo/{page} - Create or replace the SEO record of a page.
pub async fn update_seo(
    State(state): State<AppState>,
    Path(page): Path<String>,
    Json(request): Json<SeoRequest>,
) -> ApiResult<SeoRecord> {
    validate(&request)?;

    let record = state.repo.upsert_seo(&page, &request).await?;
    tracing::info!("Updated SEO settings for {}", page);
    Ok(Json(record))
}

fn validate(request: &SeoRequest) -> Result<(), AppError> {
    if let Some(json_ld) = &request.json_ld {
        validate_json_ld(json_ld).map_err(AppError::Validation)?;
    }
    Ok(())
}
