//! Configuration module for the site backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Development signing key. Anything deployed must override it.
pub const DEV_SECRET_KEY: &str = "techresona-secret-key-change-in-production";

pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 30;
/// Thirty days.
pub const MAX_TOKEN_TTL_MINUTES: i64 = 30 * 24 * 60;

/// Public links rendered by the site chrome ("view website", social icons).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLinks {
    pub view_website: String,
    pub linkedin: String,
    pub twitter: String,
    pub facebook: String,
}

impl Default for SiteLinks {
    fn default() -> Self {
        Self {
            view_website: "/".to_string(),
            linkedin: "https://www.linkedin.com/company/techresona".to_string(),
            twitter: "https://twitter.com/techresona".to_string(),
            facebook: "https://www.facebook.com/techresona".to_string(),
        }
    }
}

impl SiteLinks {
    /// Load link overrides from the environment.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            view_website: env::var("RESONA_VIEW_SITE_URL").unwrap_or(defaults.view_website),
            linkedin: env::var("RESONA_SOCIAL_LINKEDIN").unwrap_or(defaults.linkedin),
            twitter: env::var("RESONA_SOCIAL_TWITTER").unwrap_or(defaults.twitter),
            facebook: env::var("RESONA_SOCIAL_FACEBOOK").unwrap_or(defaults.facebook),
        }
    }
}

/// Credentials for the admin account created at startup when missing.
#[derive(Debug, Clone)]
pub struct BootstrapAdmin {
    pub email: String,
    pub password: String,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// HMAC key used to sign session tokens
    pub secret_key: String,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Public base URL used in the sitemap and robots.txt
    pub site_url: String,
    /// Lifetime of issued session tokens
    pub token_ttl_minutes: i64,
    /// Allowed CORS origins; `["*"]` allows any
    pub cors_origins: Vec<String>,
    /// Whether `POST /api/auth/register` is open
    pub allow_registration: bool,
    /// Admin account to seed on startup
    pub bootstrap_admin: Option<BootstrapAdmin>,
    pub links: SiteLinks,
    /// Fallbacks taken while loading, logged once tracing is up
    pub warnings: Vec<String>,
}

/// Errors raised while reading configuration.
#[derive(Debug)]
pub enum ConfigError {
    InvalidBindAddr(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidBindAddr(addr) => {
                write!(f, "Invalid RESONA_BIND_ADDR format: {}", addr)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let secret_key =
            env::var("RESONA_SECRET_KEY").unwrap_or_else(|_| DEV_SECRET_KEY.to_string());

        let db_path = env::var("RESONA_DB_PATH")
            .unwrap_or_else(|_| "./data/site.sqlite".to_string())
            .into();

        let raw_addr =
            env::var("RESONA_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8001".to_string());
        let bind_addr = raw_addr
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr(raw_addr.clone()))?;

        let log_level = env::var("RESONA_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let site_url = env::var("RESONA_SITE_URL")
            .unwrap_or_else(|_| "https://techresona.com".to_string())
            .trim_end_matches('/')
            .to_string();

        let mut warnings = Vec::new();
        let token_ttl_minutes = parse_ttl(
            env::var("RESONA_TOKEN_TTL_MINUTES").ok().as_deref(),
            &mut warnings,
        );

        let cors_origins = parse_list(
            &env::var("RESONA_CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()),
        );

        let allow_registration = env::var("RESONA_ALLOW_REGISTRATION")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let bootstrap_admin = match (
            env::var("RESONA_ADMIN_EMAIL"),
            env::var("RESONA_ADMIN_PASSWORD"),
        ) {
            (Ok(email), Ok(password)) if !email.is_empty() && !password.is_empty() => {
                Some(BootstrapAdmin { email, password })
            }
            _ => None,
        };

        Ok(Self {
            secret_key,
            db_path,
            bind_addr,
            log_level,
            site_url,
            token_ttl_minutes,
            cors_origins,
            allow_registration,
            bootstrap_admin,
            links: SiteLinks::from_env(),
            warnings,
        })
    }

    /// Configuration suitable for tests: throwaway database, fixed key.
    pub fn for_tests(db_path: PathBuf) -> Self {
        Self {
            secret_key: "test-secret-key".to_string(),
            db_path,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            log_level: "warn".to_string(),
            site_url: "https://techresona.com".to_string(),
            token_ttl_minutes: DEFAULT_TOKEN_TTL_MINUTES,
            cors_origins: vec!["*".to_string()],
            allow_registration: false,
            bootstrap_admin: None,
            links: SiteLinks::default(),
            warnings: Vec::new(),
        }
    }

    pub fn uses_dev_secret(&self) -> bool {
        self.secret_key == DEV_SECRET_KEY
    }
}

/// Token lifetime in minutes: unset means the default, garbage or non-positive values fall
/// back to it, and anything above [`MAX_TOKEN_TTL_MINUTES`] is clamped.
fn parse_ttl(raw: Option<&str>, warnings: &mut Vec<String>) -> i64 {
    let Some(raw) = raw else {
        return DEFAULT_TOKEN_TTL_MINUTES;
    };
    match raw.trim().parse::<i64>() {
        Ok(ttl) if ttl > MAX_TOKEN_TTL_MINUTES => {
            warnings.push(format!(
                "RESONA_TOKEN_TTL_MINUTES={} exceeds {}; clamping",
                ttl, MAX_TOKEN_TTL_MINUTES
            ));
            MAX_TOKEN_TTL_MINUTES
        }
        Ok(ttl) if ttl > 0 => ttl,
        _ => {
            warnings.push(format!("Ignoring invalid RESONA_TOKEN_TTL_MINUTES: {}", raw));
            DEFAULT_TOKEN_TTL_MINUTES
        }
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        for key in [
            "RESONA_SECRET_KEY",
            "RESONA_DB_PATH",
            "RESONA_BIND_ADDR",
            "RESONA_LOG_LEVEL",
            "RESONA_SITE_URL",
            "RESONA_TOKEN_TTL_MINUTES",
            "RESONA_CORS_ORIGINS",
            "RESONA_ALLOW_REGISTRATION",
            "RESONA_ADMIN_EMAIL",
            "RESONA_ADMIN_PASSWORD",
            "RESONA_VIEW_SITE_URL",
        ] {
            env::remove_var(key);
        }

        let config = Config::from_env().unwrap();

        assert!(config.uses_dev_secret());
        assert_eq!(config.db_path, PathBuf::from("./data/site.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8001");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.site_url, "https://techresona.com");
        assert_eq!(config.token_ttl_minutes, 30);
        assert_eq!(config.cors_origins, vec!["*".to_string()]);
        assert!(!config.allow_registration);
        assert!(config.bootstrap_admin.is_none());
        assert_eq!(config.links.view_website, "/");
        assert!(config.warnings.is_empty());
    }

    #[test]
    fn test_parse_ttl() {
        let mut warnings = Vec::new();
        assert_eq!(parse_ttl(None, &mut warnings), 30);
        assert_eq!(parse_ttl(Some("90"), &mut warnings), 90);
        assert!(warnings.is_empty());

        assert_eq!(parse_ttl(Some("soon"), &mut warnings), 30);
        assert_eq!(parse_ttl(Some("0"), &mut warnings), 30);
        assert_eq!(parse_ttl(Some("-5"), &mut warnings), 30);
        assert_eq!(
            parse_ttl(Some(&(i64::MAX / 60).to_string()), &mut warnings),
            MAX_TOKEN_TTL_MINUTES
        );
        assert_eq!(warnings.len(), 4);
        assert!(warnings[3].contains("clamping"));
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(
            parse_list("https://a.com, https://b.com,,"),
            vec!["https://a.com".to_string(), "https://b.com".to_string()]
        );
        assert!(parse_list("").is_empty());
    }
}
