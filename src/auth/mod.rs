//! Admin authentication.
//!
//! Passwords are stored as Argon2id PHC strings. Sessions are stateless HS256 tokens whose
//! subject is the admin e-mail; every protected request re-checks that the admin still exists.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::AppState;

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Admin e-mail
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// The authenticated admin, inserted into request extensions by [`require_admin`].
#[derive(Debug, Clone)]
pub struct AdminIdentity {
    pub email: String,
}

/// Hash a password using Argon2id. Returns a PHC-format string.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Verify a password against a PHC-format hash string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Issue a session token for `email`, valid for `ttl_minutes`.
pub fn issue_token(email: &str, secret: &str, ttl_minutes: i64) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = Duration::try_minutes(ttl_minutes)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| AppError::Internal(format!("Token lifetime out of range: {}", ttl_minutes)))?;
    let claims = Claims {
        sub: email.to_string(),
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to issue token: {}", e)))
}

/// Decode and validate a session token (signature and expiry).
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        tracing::debug!("Rejected session token: {}", e);
        AppError::Unauthorized("Invalid authentication credentials".to_string())
    })
}

/// Create the admin account if no admin with this e-mail exists yet.
pub async fn ensure_admin(
    repo: &crate::db::Repository,
    email: &str,
    password: &str,
) -> Result<bool, AppError> {
    if repo.find_admin_by_email(email).await?.is_some() {
        return Ok(false);
    }
    let hash = hash_password(password)?;
    repo.create_admin(email, &hash).await?;
    Ok(true)
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Resolve the admin behind the request's bearer token.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AdminIdentity, AppError> {
    let token = bearer_token(headers)
        .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()))?;
    let claims = verify_token(token, &state.config.secret_key)?;

    match state.repo.find_admin_by_email(&claims.sub).await? {
        Some(admin) => Ok(AdminIdentity { email: admin.email }),
        None => Err(AppError::Unauthorized("Admin not found".to_string())),
    }
}

/// Bearer authentication layer for admin-only routes.
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(&state, request.headers()).await {
        Ok(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(err) => err.into_response(),
    }
}
