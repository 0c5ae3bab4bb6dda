//! Database repositories module
//!
//! This module contains the Postgres implementations of the store traits

pub mod user;
pub mod organizer;
pub mod event;
pub mod attendee;

// Re-export repositories
pub use user::UserRepository;
pub use organizer::OrganizerRepository;
pub use event::EventRepository;
pub use attendee::AttendeeRepository;
