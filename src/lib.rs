//! TechResona site backend and site client.
//!
//! The server half (`api`, `auth`, `db`) stores SEO records, blog posts and tracked keywords
//! behind an axum router. The `site` half is the client-side layer of the public site and admin
//! console: session store, route guard, content resolver and admin flows.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod site;
pub mod sitemap;

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    // Bearer-token gate for admin operations
    let admin_only = middleware::from_fn_with_state(state.clone(), auth::require_admin);

    let api_routes = Router::new()
        // Auth
        .route("/auth/login", post(api::login))
        .route("/auth/register", post(api::register))
        // SEO
        .route(
            "/seo",
            get(api::list_seo).merge(post(api::create_seo).route_layer(admin_only.clone())),
        )
        .route(
            "/seo/{page}",
            get(api::get_seo).merge(put(api::update_seo).route_layer(admin_only.clone())),
        )
        // Robots
        .route(
            "/robots-txt",
            get(api::get_robots).merge(put(api::update_robots).route_layer(admin_only.clone())),
        )
        // Blogs
        .route(
            "/blogs",
            get(api::list_blogs).merge(post(api::create_blog).route_layer(admin_only.clone())),
        )
        .route(
            "/blogs/{slug}",
            get(api::get_blog).merge(
                put(api::update_blog)
                    .delete(api::delete_blog)
                    .route_layer(admin_only.clone()),
            ),
        )
        // Keywords
        .route(
            "/keywords",
            get(api::list_keywords)
                .post(api::create_keyword)
                .route_layer(admin_only.clone()),
        )
        .route(
            "/keywords/{id}",
            delete(api::delete_keyword).route_layer(admin_only.clone()),
        )
        // Analytics
        .route(
            "/analytics",
            get(api::get_analytics).route_layer(admin_only),
        )
        // Sitemap
        .route("/sitemap/generate", get(api::sitemap_xml));

    // Crawler-facing and health routes (no auth required)
    let root_routes = Router::new()
        .route("/health", get(health_check))
        .route("/robots.txt", get(api::robots_txt))
        .route("/sitemap.xml", get(api::sitemap_xml));

    Router::new()
        .nest("/api", api_routes)
        .merge(root_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
