//! Login and registration endpoints.

use axum::{extract::State, Json};

use super::ApiResult;
use crate::auth::{hash_password, issue_token, verify_password};
use crate::errors::AppError;
use crate::models::{is_plausible_email, Credentials, TokenResponse};
use crate::AppState;

/// Minimum accepted password length on registration.
const MIN_PASSWORD_LEN: usize = 8;

/// POST /api/auth/login - Exchange credentials for a session token.
pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> ApiResult<TokenResponse> {
    let invalid = || AppError::Unauthorized("Invalid email or password".to_string());

    let Some(admin) = state.repo.find_admin_by_email(&credentials.email).await? else {
        tracing::info!("Login attempt for unknown admin");
        return Err(invalid());
    };

    if !verify_password(&credentials.password, &admin.password_hash)? {
        tracing::info!("Login rejected for {}", admin.email);
        return Err(invalid());
    }

    let token = issue_token(
        &admin.email,
        &state.config.secret_key,
        state.config.token_ttl_minutes,
    )?;
    tracing::info!("Admin {} logged in", admin.email);

    Ok(Json(TokenResponse::bearer(token)))
}

/// POST /api/auth/register - Create an admin account (only when registration is enabled).
pub async fn register(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> ApiResult<TokenResponse> {
    if !state.config.allow_registration {
        return Err(AppError::Forbidden("Registration is disabled".to_string()));
    }
    if !is_plausible_email(&credentials.email) {
        return Err(AppError::Validation("A valid email is required".to_string()));
    }
    if credentials.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    let hash = hash_password(&credentials.password)?;
    let admin = state.repo.create_admin(&credentials.email, &hash).await?;
    tracing::info!("Registered admin {}", admin.email);

    let token = issue_token(
        &admin.email,
        &state.config.secret_key,
        state.config.token_ttl_minutes,
    )?;
    Ok(Json(TokenResponse::bearer(token)))
}
