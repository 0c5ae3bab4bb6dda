//! Database module
//!
//! This module handles database connections, the persistence contracts and
//! their implementations

pub mod connection;
pub mod memory;
pub mod repositories;
pub mod service;
pub mod store;

// Re-export commonly used database components
pub use connection::{DatabasePool, create_pool, run_migrations, health_check};
pub use memory::InMemoryStore;
pub use repositories::{UserRepository, OrganizerRepository, EventRepository, AttendeeRepository};
pub use service::DatabaseService;
pub use store::{AssignOutcome, AttendeeStore, EventStore, OrganizerStore, UserStore};
