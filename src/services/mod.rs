//! Services module
//!
//! This module contains business logic services

pub mod accounts;
pub mod auth;
pub mod booking;
pub mod composer;
pub mod events;
pub mod hooks;
pub mod mail;
pub mod notification;
pub mod ollama;
pub mod policy;

// Re-export commonly used services
pub use accounts::AccountService;
pub use auth::Identity;
pub use booking::BookingService;
pub use composer::{EmailComposer, NotificationKind, PreviousEventDetails};
pub use events::EventService;
pub use hooks::{BookingEffect, HookRunner, PostCommitHook};
pub use mail::{MailTransport, SmtpMailer};
pub use notification::{NotificationDispatcher, NotificationOutcome, NotificationStats};
pub use ollama::{DisabledGenerator, OllamaClient, TextGenerator};

use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub account_service: AccountService,
    pub booking_service: BookingService,
    pub event_service: EventService,
    pub notification_dispatcher: NotificationDispatcher,
    ollama_client: Option<OllamaClient>,
    notifications_enabled: bool,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with the Ollama and SMTP clients from settings
    pub fn new(settings: &Settings, db: DatabaseService) -> Result<Self> {
        let ollama_client = if settings.ollama.enabled {
            Some(OllamaClient::new(&settings.ollama)?)
        } else {
            None
        };
        let generator: Arc<dyn TextGenerator> = match &ollama_client {
            Some(client) => Arc::new(client.clone()),
            None => Arc::new(DisabledGenerator),
        };
        let mailer = Arc::new(SmtpMailer::new(&settings.mail)?);

        let mut factory = Self::with_collaborators(settings, db, generator, mailer);
        factory.ollama_client = ollama_client;
        Ok(factory)
    }

    /// Wire the services around caller-supplied generator and transport
    pub fn with_collaborators(
        settings: &Settings,
        db: DatabaseService,
        generator: Arc<dyn TextGenerator>,
        mailer: Arc<dyn MailTransport>,
    ) -> Self {
        let composer = EmailComposer::new(
            generator,
            settings.ollama.model.clone(),
            Duration::from_secs(settings.ollama.timeout_seconds),
        );
        let notification_dispatcher =
            NotificationDispatcher::new(db.users.clone(), db.attendees.clone(), composer, mailer);

        let mut hooks = HookRunner::new();
        if settings.notifications.enabled {
            hooks.register(Arc::new(notification_dispatcher.clone()));
        } else {
            info!("Notifications disabled, no emails will be sent");
        }

        Self {
            account_service: AccountService::new(db.clone()),
            booking_service: BookingService::new(db.clone(), hooks.clone()),
            event_service: EventService::new(db, hooks),
            notification_dispatcher,
            ollama_client: None,
            notifications_enabled: settings.notifications.enabled,
        }
    }

    /// Health check for all services
    pub async fn health_check(&self) -> ServiceHealthStatus {
        let ollama_healthy = match &self.ollama_client {
            Some(client) => client.health_check().await,
            None => false,
        };

        ServiceHealthStatus {
            ollama_enabled: self.ollama_client.is_some(),
            ollama_healthy,
            notifications_enabled: self.notifications_enabled,
        }
    }
}

/// Health status for all services
#[derive(Debug, Clone)]
pub struct ServiceHealthStatus {
    pub ollama_enabled: bool,
    pub ollama_healthy: bool,
    pub notifications_enabled: bool,
}

impl ServiceHealthStatus {
    /// Booking works without the generator; bodies fall back to templates
    pub fn is_healthy(&self) -> bool {
        true
    }

    /// Get list of degraded services
    pub fn get_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !self.ollama_enabled {
            issues.push("Ollama disabled, using fallback email templates".to_string());
        } else if !self.ollama_healthy {
            issues.push("Ollama unreachable, using fallback email templates".to_string());
        }
        if !self.notifications_enabled {
            issues.push("Notifications disabled".to_string());
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_features_reported() {
        let mut settings = Settings::default();
        settings.ollama.enabled = false;
        settings.notifications.enabled = false;

        let factory = ServiceFactory::new(&settings, DatabaseService::in_memory()).unwrap();
        let health = factory.health_check().await;

        assert!(health.is_healthy());
        assert!(!health.ollama_enabled);
        assert_eq!(health.get_issues().len(), 2);
    }
}
