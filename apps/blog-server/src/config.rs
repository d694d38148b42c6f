//! Application configuration loaded from environment variables.

use std::env;

use blogicum_core::DEFAULT_PAGE_SIZE;
use blogicum_infra::JwtConfig;

#[cfg(feature = "postgres")]
use blogicum_infra::database::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
    /// Apply pending migrations before serving.
    pub run_migrations: bool,
    pub jwt: JwtConfig,
    pub site: SiteSettings,
}

/// Settings the handlers read on every request.
#[derive(Debug, Clone)]
pub struct SiteSettings {
    pub posts_per_page: u64,
    /// Mark the session cookie `Secure`.
    pub secure_cookies: bool,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            posts_per_page: DEFAULT_PAGE_SIZE,
            secure_cookies: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        #[cfg(feature = "postgres")]
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parse_var("DB_MAX_CONNECTIONS").unwrap_or(20),
            min_connections: parse_var("DB_MIN_CONNECTIONS").unwrap_or(2),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            #[cfg(feature = "postgres")]
            database,
            run_migrations: flag("RUN_MIGRATIONS", true),
            jwt: JwtConfig::from_env(),
            site: SiteSettings {
                posts_per_page: parse_var("POSTS_PER_PAGE")
                    .filter(|n| *n > 0)
                    .unwrap_or(DEFAULT_PAGE_SIZE),
                secure_cookies: flag("SESSION_COOKIE_SECURE", false),
            },
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.parse().ok())
}

fn flag(key: &str, default: bool) -> bool {
    env::var(key)
        .map(|v| !matches!(v.to_lowercase().as_str(), "false" | "0" | "no" | "off"))
        .unwrap_or(default)
}
