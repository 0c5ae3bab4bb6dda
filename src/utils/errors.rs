//! Error handling for EventDesk
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for EventDesk application
#[derive(Error, Debug)]
pub enum EventDeskError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Text generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Mail error: {0}")]
    Mail(#[from] MailError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: i64 },

    #[error("Attendee not found: {attendee_id}")]
    AttendeeNotFound { attendee_id: i64 },

    #[error("Organizer profile not found for user {email}")]
    OrganizerNotFound { email: String },

    #[error("User not found: {email}")]
    UserNotFound { email: String },

    #[error("Attendee {attendee_id} is already assigned to event {event_id}")]
    AlreadyAssigned { attendee_id: i64, event_id: i64 },

    #[error("Event {event_id} is full ({max_attendees} attendees)")]
    CapacityExceeded { event_id: i64, max_attendees: i32 },

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Text-generation (Ollama) specific errors
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Generation request failed: {0}")]
    RequestFailed(String),

    #[error("Generation request timed out")]
    Timeout,

    #[error("Invalid generation response: {0}")]
    InvalidResponse(String),

    #[error("Generation service returned an empty response")]
    EmptyResponse,

    #[error("Generation service unavailable")]
    ServiceUnavailable,
}

/// Mail transport specific errors
#[derive(Error, Debug)]
pub enum MailError {
    #[error("Invalid mail address: {0}")]
    InvalidAddress(String),

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("Mail transport failed: {0}")]
    Transport(String),
}

/// Result type alias for EventDesk operations
pub type Result<T> = std::result::Result<T, EventDeskError>;

/// Result type alias for text-generation calls
pub type GenerationResult<T> = std::result::Result<T, GenerationError>;

/// Result type alias for mail transport calls
pub type MailResult<T> = std::result::Result<T, MailError>;

impl EventDeskError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            EventDeskError::Database(_) => false,
            EventDeskError::Migration(_) => false,
            EventDeskError::Generation(_) => true,
            EventDeskError::Mail(_) => true,
            EventDeskError::Config(_) => false,
            EventDeskError::Unauthenticated => false,
            EventDeskError::PermissionDenied(_) => false,
            EventDeskError::EventNotFound { .. } => false,
            EventDeskError::AttendeeNotFound { .. } => false,
            EventDeskError::OrganizerNotFound { .. } => false,
            EventDeskError::UserNotFound { .. } => false,
            EventDeskError::AlreadyAssigned { .. } => false,
            EventDeskError::CapacityExceeded { .. } => false,
            EventDeskError::InvalidStateTransition { .. } => false,
            EventDeskError::Http(_) => true,
            EventDeskError::Serialization(_) => false,
            EventDeskError::Io(_) => true,
            EventDeskError::UrlParse(_) => false,
            EventDeskError::InvalidInput(_) => false,
        }
    }

    /// Errors caused by the caller's request rather than by the system
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            EventDeskError::Unauthenticated
                | EventDeskError::PermissionDenied(_)
                | EventDeskError::EventNotFound { .. }
                | EventDeskError::AttendeeNotFound { .. }
                | EventDeskError::OrganizerNotFound { .. }
                | EventDeskError::UserNotFound { .. }
                | EventDeskError::AlreadyAssigned { .. }
                | EventDeskError::CapacityExceeded { .. }
                | EventDeskError::InvalidStateTransition { .. }
                | EventDeskError::InvalidInput(_)
        )
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EventDeskError::Database(_) => ErrorSeverity::Critical,
            EventDeskError::Migration(_) => ErrorSeverity::Critical,
            EventDeskError::Config(_) => ErrorSeverity::Critical,
            EventDeskError::Unauthenticated => ErrorSeverity::Warning,
            EventDeskError::PermissionDenied(_) => ErrorSeverity::Warning,
            EventDeskError::Generation(_) => ErrorSeverity::Warning,
            EventDeskError::Mail(_) => ErrorSeverity::Warning,
            err if err.is_client_error() => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_are_not_recoverable() {
        let err = EventDeskError::CapacityExceeded { event_id: 1, max_attendees: 10 };
        assert!(err.is_client_error());
        assert!(!err.is_recoverable());
        assert_eq!(err.severity(), ErrorSeverity::Info);
    }

    #[test]
    fn test_unauthenticated_and_forbidden_are_distinct() {
        let missing = EventDeskError::Unauthenticated;
        let denied = EventDeskError::PermissionDenied("not the owner".to_string());
        assert_ne!(missing.to_string(), denied.to_string());
        assert_eq!(missing.severity(), ErrorSeverity::Warning);
        assert_eq!(denied.severity(), ErrorSeverity::Warning);
    }

    #[test]
    fn test_collaborator_errors_are_recoverable() {
        let err: EventDeskError = GenerationError::Timeout.into();
        assert!(err.is_recoverable());
        assert!(!err.is_client_error());

        let err: EventDeskError = MailError::Transport("connection refused".to_string()).into();
        assert!(err.is_recoverable());
        assert_eq!(err.to_string(), "Mail error: Mail transport failed: connection refused");
    }
}
