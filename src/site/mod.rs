//! Client side of the public site and admin console.
//!
//! Everything here talks to the backend through [`ApiClient`] only. Views are mounted by the
//! [`Navigator`]; each mount owns its fetch and cancels it when replaced.

pub mod admin;
pub mod client;
pub mod contact;
pub mod guard;
pub mod meta;
pub mod navigator;
pub mod resolver;
pub mod routes;
pub mod session;

pub use admin::{ActionError, AdminConsole, AdminView, LoginForm, LoginOutcome, Notice};
pub use client::{ApiClient, ClientError};
pub use contact::ContactForm;
pub use guard::Access;
pub use meta::{PageKey, PageMeta};
pub use navigator::{Navigator, View};
pub use resolver::{BlogListView, BlogView, ContentResolver, Mounted};
pub use routes::Route;
pub use session::{FileStore, KeyValueStore, MemoryStore, Session};
