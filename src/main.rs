//! EventDesk
//!
//! Main application entry point

use anyhow::Context;
use tracing::{info, warn};

use EventDesk::{
    config::Settings,
    utils::logging,
    database::{DatabaseService, connection::{create_pool, health_check, run_migrations}},
    services::ServiceFactory,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let settings = Settings::new().context("failed to load configuration")?;
    settings.validate()?;

    // Keep the guard alive so the file writer flushes on exit
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", EventDesk::info());

    info!("Connecting to database...");
    let db_pool = create_pool(&settings.database).await?;

    info!("Running database migrations...");
    run_migrations(&db_pool).await?;
    health_check(&db_pool).await?;

    let database_service = DatabaseService::new(db_pool);

    info!("Initializing services...");
    let services = ServiceFactory::new(&settings, database_service)?;

    let health = services.health_check().await;
    for issue in health.get_issues() {
        warn!(issue = %issue, "Service degraded");
    }

    info!(
        ollama_model = %settings.ollama.model,
        mail_host = %settings.mail.host,
        "EventDesk is ready"
    );

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    let stats = services.notification_dispatcher.stats();
    info!(
        sent = stats.total_sent,
        failed = stats.total_failed,
        skipped = stats.total_skipped,
        "EventDesk has been shut down."
    );

    Ok(())
}
