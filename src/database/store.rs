//! Persistence contracts
//!
//! The booking workflow only talks to storage through these traits. Postgres
//! repositories and the in-memory store both implement them.

use async_trait::async_trait;
use crate::models::*;
use crate::utils::errors::Result;

/// Outcome of a conditional assignment attempt
#[derive(Debug, Clone, PartialEq)]
pub enum AssignOutcome {
    /// The link was written
    Assigned(Attendee),
    /// The attendee is already linked to some event (possibly the requested one)
    AlreadyLinked(Attendee),
    /// The event had no room left when the write was attempted
    Full,
}

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn create(&self, organizer_id: i64, request: CreateEventRequest) -> Result<Event>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Event>>;
    async fn save(&self, event: &Event) -> Result<Event>;
    async fn delete(&self, id: i64) -> Result<()>;
    async fn list(&self) -> Result<Vec<Event>>;
    async fn find_by_organizer(&self, organizer_id: i64) -> Result<Vec<Event>>;
    /// Events with at least one attendee, most attended first
    async fn most_attended(&self) -> Result<Vec<EventStats>>;
}

#[async_trait]
pub trait AttendeeStore: Send + Sync {
    async fn create(&self, request: CreateAttendeeRequest) -> Result<Attendee>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Attendee>>;
    async fn list(&self) -> Result<Vec<Attendee>>;
    async fn find_by_event(&self, event_id: i64) -> Result<Vec<Attendee>>;
    async fn find_by_event_and_status(&self, event_id: i64, status: AttendanceStatus) -> Result<Vec<Attendee>>;
    /// Attendees whose linked user account has this email
    async fn find_by_user_email(&self, email: &str) -> Result<Vec<Attendee>>;
    async fn count_by_event(&self, event_id: i64) -> Result<i64>;
    /// Link an unassigned attendee to an event if the event still has room.
    ///
    /// The event's current capacity, the attendee count and the link write
    /// are read and applied as one atomic step.
    async fn assign_if_room(&self, attendee_id: i64, event_id: i64) -> Result<AssignOutcome>;
    /// Write only the status column
    async fn set_status(&self, attendee_id: i64, status: AttendanceStatus) -> Result<Attendee>;
    /// Clear the event link if it still points at `expected_event_id`.
    ///
    /// `None` when the attendee was no longer linked to that event.
    async fn unlink(&self, attendee_id: i64, expected_event_id: i64) -> Result<Option<Attendee>>;
    /// Clear the event link of every attendee of the event, returning how many were cleared
    async fn clear_event(&self, event_id: i64) -> Result<u64>;
}

#[async_trait]
pub trait OrganizerStore: Send + Sync {
    async fn create(&self, request: CreateOrganizerRequest) -> Result<Organizer>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Organizer>>;
    async fn find_by_user_email(&self, email: &str) -> Result<Option<Organizer>>;
    async fn list(&self) -> Result<Vec<Organizer>>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, request: CreateUserRequest) -> Result<User>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
}
