//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the EventDesk application.

use tracing::{debug, error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::utils::errors::{EventDeskError, Result};

/// Initialize logging based on configuration
///
/// The returned guard flushes the file writer on drop and must be kept alive
/// for the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "eventdesk.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().json().with_writer(non_blocking))
        .try_init()
        .map_err(|e| EventDeskError::Config(format!("Failed to install subscriber: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log booking state machine actions
pub fn log_booking_action(attendee_id: i64, action: &str, event_id: Option<i64>, details: Option<&str>) {
    info!(
        attendee_id = attendee_id,
        action = action,
        event_id = event_id,
        details = details,
        "Booking action performed"
    );
}

/// Log event management actions
pub fn log_event_action(event_id: i64, action: &str, actor: Option<&str>, details: Option<&str>) {
    info!(
        event_id = event_id,
        action = action,
        actor = actor,
        details = details,
        "Event action performed"
    );
}

/// Log the outcome of a single notification delivery
pub fn log_notification(recipient: &str, subject: &str, delivered: bool, error: Option<&str>) {
    if delivered {
        info!(recipient = recipient, subject = subject, "Notification delivered");
    } else {
        warn!(
            recipient = recipient,
            subject = subject,
            error = error,
            "Notification delivery failed"
        );
    }
}

/// Log API errors with context
pub fn log_api_error(api: &str, error: &str, context: Option<&str>) {
    error!(
        api = api,
        error = error,
        context = context,
        "API error occurred"
    );
}

/// Log database operations
pub fn log_database_operation(operation: &str, table: &str, duration_ms: u64, success: bool) {
    if success {
        debug!(
            operation = operation,
            table = table,
            duration_ms = duration_ms,
            "Database operation completed"
        );
    } else {
        error!(
            operation = operation,
            table = table,
            duration_ms = duration_ms,
            "Database operation failed"
        );
    }
}
