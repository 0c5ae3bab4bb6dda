//! Booking service
//!
//! The attendee lifecycle: booking requests, approval and rejection, direct
//! assignment to an event and removal from it. State changes are persisted
//! first; notifications follow through the post-commit hooks.

use tracing::{debug, info};
use crate::database::store::AssignOutcome;
use crate::database::DatabaseService;
use crate::models::attendee::{AttendanceStatus, Attendee, CreateAttendeeRequest};
use crate::models::Event;
use crate::services::auth::Identity;
use crate::services::events::{load_event, owner_email};
use crate::services::hooks::{BookingEffect, HookRunner};
use crate::services::policy::ensure_can_manage;
use crate::utils::errors::{EventDeskError, Result};
use crate::utils::helpers::{is_blank, is_valid_email, name_from_email};
use crate::utils::logging::log_booking_action;

/// Decide whether `current` may move to `target`.
///
/// `Ok(false)` means the attendee already holds `target` and nothing changes.
fn check_transition(current: Option<AttendanceStatus>, target: AttendanceStatus) -> Result<bool> {
    match current {
        None | Some(AttendanceStatus::Pending) => Ok(true),
        Some(status) if status == target => Ok(false),
        Some(status) => Err(EventDeskError::InvalidStateTransition {
            from: status.to_string(),
            to: target.to_string(),
        }),
    }
}

/// Booking service for attendee operations
#[derive(Clone)]
pub struct BookingService {
    db: DatabaseService,
    hooks: HookRunner,
}

impl BookingService {
    /// Create a new BookingService instance
    pub fn new(db: DatabaseService, hooks: HookRunner) -> Self {
        Self { db, hooks }
    }

    async fn load_attendee(&self, attendee_id: i64) -> Result<Attendee> {
        self.db
            .attendees
            .find_by_id(attendee_id)
            .await?
            .ok_or(EventDeskError::AttendeeNotFound { attendee_id })
    }

    /// The event an attendee is linked to, if it still exists
    async fn linked_event(&self, attendee: &Attendee) -> Result<Option<Event>> {
        match attendee.event_id {
            Some(event_id) => self.db.events.find_by_id(event_id).await,
            None => Ok(None),
        }
    }

    /// Create a pending booking request for the acting user
    pub async fn request_to_attend(&self, identity: &Identity, event_id: i64, name: Option<&str>) -> Result<Attendee> {
        let email = identity.require_email()?;
        let event = load_event(&self.db, event_id).await?;
        let user = self
            .db
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| EventDeskError::UserNotFound { email: email.to_string() })?;

        let name = match name {
            Some(name) if !is_blank(Some(name)) => name.trim().to_string(),
            _ => name_from_email(&user.email),
        };

        let attendee = self
            .db
            .attendees
            .create(CreateAttendeeRequest {
                name,
                email: user.email.clone(),
                status: Some(AttendanceStatus::Pending),
                user_id: Some(user.id),
                event_id: Some(event.id),
            })
            .await?;

        log_booking_action(attendee.id, "requested", Some(event.id), Some(email));
        Ok(attendee)
    }

    /// Link an attendee to an event without changing their status
    pub async fn assign_directly(&self, attendee_id: i64, event_id: i64) -> Result<Attendee> {
        let attendee = self.load_attendee(attendee_id).await?;
        let event = load_event(&self.db, event_id).await?;

        match attendee.event_id {
            Some(current) if current == event_id => {
                debug!(attendee_id, event_id, "Attendee already assigned to this event");
                return Ok(attendee);
            }
            Some(current) => {
                return Err(EventDeskError::AlreadyAssigned { attendee_id, event_id: current });
            }
            None => {}
        }

        match self.db.attendees.assign_if_room(attendee_id, event_id).await? {
            AssignOutcome::Assigned(assigned) => {
                log_booking_action(attendee_id, "assigned", Some(event_id), None);
                Ok(assigned)
            }
            AssignOutcome::AlreadyLinked(linked) => match linked.event_id {
                Some(current) if current != event_id => {
                    Err(EventDeskError::AlreadyAssigned { attendee_id, event_id: current })
                }
                _ => Ok(linked),
            },
            AssignOutcome::Full => {
                // Report the capacity as it stands now, not as first read
                let event = load_event(&self.db, event_id).await.unwrap_or(event);
                Err(capacity_exceeded(&event))
            }
        }
    }

    /// Unlink an attendee from their event; status is left as it was
    pub async fn remove_from_event(&self, attendee_id: i64) -> Result<Attendee> {
        let attendee = self.load_attendee(attendee_id).await?;
        let Some(event_id) = attendee.event_id else {
            debug!(attendee_id, "Attendee is not assigned to any event");
            return Ok(attendee);
        };

        let event = self.linked_event(&attendee).await?;
        let Some(unlinked) = self.db.attendees.unlink(attendee_id, event_id).await? else {
            debug!(attendee_id, event_id, "Attendee link changed concurrently, nothing removed");
            return self.load_attendee(attendee_id).await;
        };
        log_booking_action(attendee_id, "removed", Some(event_id), None);

        if let Some(event) = event {
            self.hooks
                .run(BookingEffect::Removed { attendee: unlinked.clone(), event })
                .await;
        }

        Ok(unlinked)
    }

    pub async fn approve(&self, attendee_id: i64) -> Result<Attendee> {
        self.decide(attendee_id, AttendanceStatus::Approved).await
    }

    pub async fn reject(&self, attendee_id: i64) -> Result<Attendee> {
        self.decide(attendee_id, AttendanceStatus::Rejected).await
    }

    async fn decide(&self, attendee_id: i64, target: AttendanceStatus) -> Result<Attendee> {
        let attendee = self.load_attendee(attendee_id).await?;

        if !check_transition(attendee.status, target)? {
            debug!(attendee_id, status = %target, "Status already set, nothing to do");
            return Ok(attendee);
        }

        // Only the status column is written; the link comes back as stored now
        let saved = self.db.attendees.set_status(attendee_id, target).await?;
        log_booking_action(attendee_id, target.as_str(), saved.event_id, None);

        if let Some(event) = self.linked_event(&saved).await? {
            let effect = match target {
                AttendanceStatus::Approved => BookingEffect::Approved { attendee: saved.clone(), event },
                _ => BookingEffect::Rejected { attendee: saved.clone(), event },
            };
            self.hooks.run(effect).await;
        }

        Ok(saved)
    }

    /// Pending requests for an event
    pub async fn list_pending(&self, event_id: i64) -> Result<Vec<Attendee>> {
        self.db
            .attendees
            .find_by_event_and_status(event_id, AttendanceStatus::Pending)
            .await
    }

    /// Add an attendee record; a requested event goes through the capacity check
    pub async fn add_attendee(&self, request: CreateAttendeeRequest) -> Result<Attendee> {
        if is_blank(Some(&request.name)) {
            return Err(EventDeskError::InvalidInput("Attendee name must not be empty".to_string()));
        }
        if !is_blank(Some(&request.email)) && !is_valid_email(&request.email) {
            return Err(EventDeskError::InvalidInput(format!("Invalid email: {}", request.email)));
        }

        let event_id = request.event_id;
        let attendee = self
            .db
            .attendees
            .create(CreateAttendeeRequest { event_id: None, ..request })
            .await?;
        info!(attendee_id = attendee.id, "Attendee added");

        match event_id {
            Some(event_id) => self.assign_directly(attendee.id, event_id).await,
            None => Ok(attendee),
        }
    }

    /// Get attendee by ID
    pub async fn get_attendee(&self, attendee_id: i64) -> Result<Attendee> {
        self.load_attendee(attendee_id).await
    }

    pub async fn list_attendees(&self) -> Result<Vec<Attendee>> {
        self.db.attendees.list().await
    }

    /// Booking records linked to the acting user's account
    pub async fn my_requests(&self, identity: &Identity) -> Result<Vec<Attendee>> {
        let email = identity.require_email()?;
        self.db.attendees.find_by_user_email(email).await
    }

    /// Distinct events the acting user holds a booking record for
    pub async fn my_attending_events(&self, identity: &Identity) -> Result<Vec<Event>> {
        let mut event_ids: Vec<i64> = Vec::new();
        for event_id in self.my_requests(identity).await?.into_iter().filter_map(|a| a.event_id) {
            if !event_ids.contains(&event_id) {
                event_ids.push(event_id);
            }
        }

        let mut events = Vec::with_capacity(event_ids.len());
        for event_id in event_ids {
            if let Some(event) = self.db.events.find_by_id(event_id).await? {
                events.push(event);
            }
        }
        Ok(events)
    }

    /// Attendees of an event, for the people allowed to manage it
    pub async fn attendees_for_event(&self, identity: &Identity, event_id: i64) -> Result<Vec<Attendee>> {
        let event = load_event(&self.db, event_id).await?;
        let owner = owner_email(&self.db, &event).await?;
        ensure_can_manage(identity, owner.as_deref(), event_id)?;

        self.db.attendees.find_by_event(event_id).await
    }
}

fn capacity_exceeded(event: &Event) -> EventDeskError {
    EventDeskError::CapacityExceeded {
        event_id: event.id,
        max_attendees: event.max_attendees.unwrap_or_default(),
    }
}
