//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod user;
pub mod organizer;
pub mod event;
pub mod attendee;

// Re-export commonly used models
pub use user::{User, Role, CreateUserRequest};
pub use organizer::{Organizer, CreateOrganizerRequest};
pub use event::{Event, EventStats, CreateEventRequest, UpdateEventRequest};
pub use attendee::{Attendee, AttendanceStatus, CreateAttendeeRequest};
