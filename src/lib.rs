//! EventDesk
//!
//! Event booking workflow for organizers and attendees. Organizers publish
//! events with optional capacity limits, attendees request a place, and every
//! decision is followed by an email whose body is drafted by a local language
//! model, with static templates as the fallback.

#![allow(non_snake_case)]

pub mod config;
pub mod services;
pub mod models;
pub mod database;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{EventDeskError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use services::{BookingService, EventService, Identity, ServiceFactory};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
