//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub ollama: OllamaConfig,
    pub mail: MailConfig,
    pub logging: LoggingConfig,
    pub notifications: NotificationsConfig,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub idle_timeout_seconds: Option<u64>,
    pub max_lifetime_seconds: Option<u64>,
}

/// Ollama text-generation configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
    pub timeout_seconds: u64,
    /// When disabled, notification bodies always come from the fallback templates
    pub enabled: bool,
}

/// SMTP configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_address: String,
    pub from_name: String,
    pub starttls: bool,
    /// Bound on each SMTP command, connection included
    pub timeout_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
}

/// Notification dispatch configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotificationsConfig {
    pub enabled: bool,
}

impl Settings {
    /// Load settings from defaults, `config.toml` and `EVENTDESK__*` environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        Self::load(config::File::with_name("config").required(false))
    }

    /// Load settings layering the given file source over the defaults
    pub fn load<S>(file: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?)
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("EVENTDESK")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::EventDeskError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "postgresql://localhost/eventdesk".to_string(),
                max_connections: 10,
                min_connections: 1,
                acquire_timeout_seconds: 30,
                idle_timeout_seconds: Some(600),
                max_lifetime_seconds: Some(1800),
            },
            ollama: OllamaConfig {
                base_url: "http://localhost:11434".to_string(),
                model: "llama3.1".to_string(),
                timeout_seconds: 20,
                enabled: true,
            },
            mail: MailConfig {
                host: "sandbox.smtp.mailtrap.io".to_string(),
                port: 2525,
                username: None,
                password: None,
                from_address: "no-reply@eventdesk.local".to_string(),
                from_name: "EventDesk".to_string(),
                starttls: true,
                timeout_seconds: 10,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "logs".to_string(),
            },
            notifications: NotificationsConfig { enabled: true },
        }
    }
}
