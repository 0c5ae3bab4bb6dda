//! Test context for unified test setup
//!
//! Wires the full service graph over the in-memory store with a recording
//! mailer and a caller-chosen text generator.

use std::sync::Arc;
use EventDesk::config::Settings;
use EventDesk::database::DatabaseService;
use EventDesk::services::{ServiceFactory, TextGenerator};

use super::recording::{RecordingMailer, ScriptedGenerator};

/// Unified test context that manages all test components
pub struct TestContext {
    pub db: DatabaseService,
    pub services: ServiceFactory,
    pub mailer: Arc<RecordingMailer>,
    pub settings: Settings,
}

impl TestContext {
    /// Context whose generator is always unavailable, so bodies come from templates
    pub fn new() -> Self {
        Self::with_generator(Arc::new(ScriptedGenerator::failing()))
    }

    pub fn with_generator(generator: Arc<dyn TextGenerator>) -> Self {
        Self::with_settings(test_settings(), generator)
    }

    pub fn with_settings(settings: Settings, generator: Arc<dyn TextGenerator>) -> Self {
        let _ = tracing_subscriber::fmt::try_init();

        let db = DatabaseService::in_memory();
        let mailer = Arc::new(RecordingMailer::new());
        let services = ServiceFactory::with_collaborators(&settings, db.clone(), generator, mailer.clone());

        Self {
            db,
            services,
            mailer,
            settings,
        }
    }
}

/// Default settings with a short generation timeout
pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.ollama.timeout_seconds = 1;
    settings
}
