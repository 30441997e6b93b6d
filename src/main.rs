//! TechResona site backend.
//!
//! Serves the content API with SQLite persistence.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use resona_site::config::Config;
use resona_site::db::{self, Repository};
use resona_site::{auth, create_router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting TechResona site backend");
    for warning in &config.warnings {
        tracing::warn!("{}", warning);
    }
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);
    tracing::info!("Site URL: {}", config.site_url);

    if config.uses_dev_secret() {
        tracing::warn!("Using the development signing key (RESONA_SECRET_KEY is not set)!");
    }
    if config.allow_registration {
        tracing::warn!("Admin self-registration is enabled (RESONA_ALLOW_REGISTRATION)");
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Seed the bootstrap admin
    if let Some(admin) = &config.bootstrap_admin {
        if auth::ensure_admin(&repo, &admin.email, &admin.password).await? {
            tracing::info!("Created admin user: {}", admin.email);
        } else {
            tracing::info!("Admin user already exists: {}", admin.email);
        }
    }

    let state = AppState {
        repo,
        config: Arc::new(config.clone()),
    };

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
