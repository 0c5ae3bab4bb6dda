//! Database connection management

use std::time::Duration;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use crate::config::DatabaseConfig;
use crate::utils::errors::EventDeskError;

pub type DatabasePool = Pool<Postgres>;

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
        .idle_timeout(config.idle_timeout_seconds.map(Duration::from_secs))
        .max_lifetime(config.max_lifetime_seconds.map(Duration::from_secs))
}

/// Create the Postgres pool described by the `[database]` settings
pub async fn create_pool(config: &DatabaseConfig) -> Result<DatabasePool, EventDeskError> {
    let pool = pool_options(config).connect(&config.url).await?;

    health_check(&pool).await?;

    tracing::info!(
        max_connections = config.max_connections,
        acquire_timeout_seconds = config.acquire_timeout_seconds,
        "Database connection pool created"
    );
    Ok(pool)
}

/// Run database migrations
pub async fn run_migrations(pool: &DatabasePool) -> Result<(), EventDeskError> {
    tracing::info!("Running database migrations...");

    sqlx::migrate!("./migrations")
        .run(pool)
        .await?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}

/// Check database health
pub async fn health_check(pool: &DatabasePool) -> Result<(), EventDeskError> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    #[test]
    fn test_pool_options_follow_settings() {
        let mut settings = Settings::default();
        settings.database.max_connections = 4;
        settings.database.min_connections = 2;
        settings.database.acquire_timeout_seconds = 5;
        settings.database.idle_timeout_seconds = None;

        let options = pool_options(&settings.database);
        assert_eq!(options.get_max_connections(), 4);
        assert_eq!(options.get_min_connections(), 2);
        assert_eq!(options.get_acquire_timeout(), Duration::from_secs(5));
        assert_eq!(options.get_idle_timeout(), None);
        assert_eq!(options.get_max_lifetime(), Some(Duration::from_secs(1800)));
    }

    #[tokio::test]
    async fn test_create_pool_rejects_bad_url() {
        let mut settings = Settings::default();
        settings.database.url = "not-a-database-url".to_string();

        assert!(create_pool(&settings.database).await.is_err());
    }
}
