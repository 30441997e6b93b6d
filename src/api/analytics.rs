//! Dashboard analytics endpoint.

use axum::{extract::State, Extension, Json};

use super::ApiResult;
use crate::auth::AdminIdentity;
use crate::models::AnalyticsSummary;
use crate::AppState;

/// GET /api/analytics - Content counts and recent blog activity.
pub async fn get_analytics(
    State(state): State<AppState>,
    Extension(admin): Extension<AdminIdentity>,
) -> ApiResult<AnalyticsSummary> {
    tracing::debug!("Analytics requested by {}", admin.email);
    Ok(Json(state.repo.analytics().await?))
}
