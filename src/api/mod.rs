//! REST API module.
//!
//! Contains all `/api` handlers. Success bodies are the bare records; failures are
//! [`AppError`](crate::errors::AppError) bodies.

mod analytics;
mod auth;
mod blogs;
mod keywords;
mod robots;
mod seo;

pub use analytics::*;
pub use auth::*;
pub use blogs::*;
pub use keywords::*;
pub use robots::*;
pub use seo::*;

use axum::Json;

/// Response type of every API handler.
pub type ApiResult<T> = Result<Json<T>, crate::errors::AppError>;
