//! Data models for the site content API.
//!
//! The same types are used by the HTTP handlers and by the site client, so the wire format
//! is defined in exactly one place.

mod admin;
mod analytics;
mod blog;
mod keyword;
mod seo;

pub use admin::*;
pub use analytics::*;
pub use blog::*;
pub use keyword::*;
pub use seo::*;

use serde::{Deserialize, Serialize};

/// Plain acknowledgement returned by delete endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
