//! Application state - shared across all handlers.

use std::sync::Arc;

use blogicum_core::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PasswordService, PostRepository,
    TokenService, UserRepository,
};
use blogicum_infra::{Argon2PasswordService, InMemoryStore, JwtConfig, JwtTokenService};

use crate::config::{AppConfig, SiteSettings};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub locations: Arc<dyn LocationRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub site: SiteSettings,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        {
            if let Some(db_config) = &config.database {
                match postgres::open(db_config, config.run_migrations).await {
                    Ok(db) => {
                        tracing::info!("Application state initialized (postgres)");
                        return Self::postgres(db, config.jwt.clone(), config.site.clone());
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to prepare database: {}. Using in-memory fallback.",
                            e
                        );
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            }
        }

        #[cfg(not(feature = "postgres"))]
        tracing::info!("Running without postgres feature - using in-memory store");

        let state = Self::in_memory(
            Arc::new(InMemoryStore::new()),
            config.jwt.clone(),
            config.site.clone(),
        );
        tracing::info!("Application state initialized (in-memory)");
        state
    }

    /// State backed by a single in-memory store. Data is lost on restart.
    pub fn in_memory(store: Arc<InMemoryStore>, jwt: JwtConfig, site: SiteSettings) -> Self {
        Self {
            users: store.clone(),
            categories: store.clone(),
            locations: store.clone(),
            posts: store.clone(),
            comments: store,
            tokens: Arc::new(JwtTokenService::new(jwt)),
            passwords: Arc::new(Argon2PasswordService::new()),
            site,
        }
    }

    #[cfg(feature = "postgres")]
    fn postgres(db: sea_orm::DbConn, jwt: JwtConfig, site: SiteSettings) -> Self {
        use blogicum_infra::database::{
            PostgresCategoryRepository, PostgresCommentRepository, PostgresLocationRepository,
            PostgresPostRepository, PostgresUserRepository,
        };

        Self {
            users: Arc::new(PostgresUserRepository::new(db.clone())),
            categories: Arc::new(PostgresCategoryRepository::new(db.clone())),
            locations: Arc::new(PostgresLocationRepository::new(db.clone())),
            posts: Arc::new(PostgresPostRepository::new(db.clone())),
            comments: Arc::new(PostgresCommentRepository::new(db)),
            tokens: Arc::new(JwtTokenService::new(jwt)),
            passwords: Arc::new(Argon2PasswordService::new()),
            site,
        }
    }
}

#[cfg(feature = "postgres")]
mod postgres {
    use blogicum_infra::database::{DatabaseConfig, connect};
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{DbConn, DbErr};

    /// Connect and, when asked, bring the schema up to date.
    pub(super) async fn open(config: &DatabaseConfig, run_migrations: bool) -> Result<DbConn, DbErr> {
        let db = connect(config).await?;

        if run_migrations {
            Migrator::up(&db, None).await?;
            tracing::info!("Database migrations applied");
        }

        Ok(db)
    }
}
