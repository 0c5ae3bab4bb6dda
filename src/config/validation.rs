//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{EventDeskError, Result};
use crate::utils::helpers::is_valid_email;
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_database_config(&settings.database)?;
    validate_ollama_config(&settings.ollama)?;
    validate_mail_config(&settings.mail)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(EventDeskError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(EventDeskError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(EventDeskError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    if config.acquire_timeout_seconds == 0 {
        return Err(EventDeskError::Config(
            "Database acquire timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate Ollama configuration
fn validate_ollama_config(config: &super::OllamaConfig) -> Result<()> {
    if !config.enabled {
        return Ok(());
    }

    let url = url::Url::parse(&config.base_url)?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(EventDeskError::Config(
            format!("Ollama base URL must be http(s), got {}", url.scheme())
        ));
    }

    if config.model.trim().is_empty() {
        return Err(EventDeskError::Config(
            "Ollama model name is required".to_string()
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(EventDeskError::Config(
            "Ollama timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate SMTP configuration
fn validate_mail_config(config: &super::MailConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(EventDeskError::Config(
            "Mail host is required".to_string()
        ));
    }

    if config.port == 0 {
        return Err(EventDeskError::Config(
            "Mail port must be greater than 0".to_string()
        ));
    }

    if !is_valid_email(&config.from_address) {
        return Err(EventDeskError::Config(
            format!("Invalid mail sender address: {}", config.from_address)
        ));
    }

    if config.username.is_some() != config.password.is_some() {
        return Err(EventDeskError::Config(
            "Mail username and password must be set together".to_string()
        ));
    }

    if config.timeout_seconds == 0 {
        return Err(EventDeskError::Config(
            "Mail timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(EventDeskError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(EventDeskError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_default_settings_are_valid() {
        assert!(validate_settings(&Settings::default()).is_ok());
    }

    #[test]
    fn test_rejects_bad_ollama_url() {
        let mut settings = Settings::default();
        settings.ollama.base_url = "not a url".to_string();
        assert_matches!(validate_settings(&settings), Err(EventDeskError::UrlParse(_)));

        settings.ollama.base_url = "ftp://models.local".to_string();
        assert_matches!(validate_settings(&settings), Err(EventDeskError::Config(_)));
    }

    #[test]
    fn test_disabled_ollama_skips_checks() {
        let mut settings = Settings::default();
        settings.ollama.enabled = false;
        settings.ollama.model = String::new();
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_mail_credentials_must_be_paired() {
        let mut settings = Settings::default();
        settings.mail.username = Some("smtp-user".to_string());
        assert_matches!(validate_settings(&settings), Err(EventDeskError::Config(msg)) if msg.contains("together"));
    }

    #[test]
    fn test_zero_timeouts_rejected() {
        let mut settings = Settings::default();
        settings.mail.timeout_seconds = 0;
        assert_matches!(validate_settings(&settings), Err(EventDeskError::Config(msg)) if msg.contains("Mail timeout"));

        let mut settings = Settings::default();
        settings.database.acquire_timeout_seconds = 0;
        assert_matches!(validate_settings(&settings), Err(EventDeskError::Config(msg)) if msg.contains("acquire timeout"));
    }

    #[test]
    fn test_invalid_log_level() {
        let mut settings = Settings::default();
        settings.logging.level = "verbose".to_string();
        assert_matches!(validate_settings(&settings), Err(EventDeskError::Config(_)));
    }
}
