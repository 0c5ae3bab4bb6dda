//! Event management service
//!
//! This service handles creating, listing, updating and deleting events.
//! Every mutation is guarded by the ownership policy; updates notify the
//! event's attendees through the post-commit hooks.

use tracing::{debug, info};
use crate::database::DatabaseService;
use crate::models::event::{CreateEventRequest, Event, EventStats, UpdateEventRequest};
use crate::services::auth::Identity;
use crate::services::composer::PreviousEventDetails;
use crate::services::hooks::{BookingEffect, HookRunner};
use crate::services::policy::ensure_can_manage;
use crate::utils::errors::{EventDeskError, Result};
use crate::utils::logging::log_event_action;

/// Email of the user account linked to the event's organizer, if any
pub async fn owner_email(db: &DatabaseService, event: &Event) -> Result<Option<String>> {
    let Some(organizer) = db.organizers.find_by_id(event.organizer_id).await? else {
        return Ok(None);
    };
    let Some(user_id) = organizer.user_id else {
        return Ok(None);
    };

    Ok(db.users.find_by_id(user_id).await?.map(|user| user.email))
}

/// Load an event or fail with `EventNotFound`
pub async fn load_event(db: &DatabaseService, event_id: i64) -> Result<Event> {
    db.events
        .find_by_id(event_id)
        .await?
        .ok_or(EventDeskError::EventNotFound { event_id })
}

fn validate_event_fields(name: &str, max_attendees: Option<i32>) -> Result<()> {
    if name.trim().is_empty() {
        return Err(EventDeskError::InvalidInput("Event name must not be empty".to_string()));
    }
    if max_attendees.is_some_and(|max| max < 0) {
        return Err(EventDeskError::InvalidInput("max_attendees must not be negative".to_string()));
    }
    Ok(())
}

/// Event service for managing event operations
#[derive(Clone)]
pub struct EventService {
    db: DatabaseService,
    hooks: HookRunner,
}

impl EventService {
    /// Create a new EventService instance
    pub fn new(db: DatabaseService, hooks: HookRunner) -> Self {
        Self { db, hooks }
    }

    /// Create an event owned by the acting user's organizer profile
    pub async fn create_event(&self, identity: &Identity, request: CreateEventRequest) -> Result<Event> {
        let email = identity.require_email()?;
        validate_event_fields(&request.name, request.max_attendees)?;

        let organizer = self
            .db
            .organizers
            .find_by_user_email(email)
            .await?
            .ok_or_else(|| EventDeskError::OrganizerNotFound { email: email.to_string() })?;

        let event = self.db.events.create(organizer.id, request).await?;
        log_event_action(event.id, "created", Some(email), Some(&event.name));

        Ok(event)
    }

    /// Get event by ID
    pub async fn get_event(&self, event_id: i64) -> Result<Event> {
        debug!(event_id = event_id, "Getting event by ID");
        load_event(&self.db, event_id).await
    }

    pub async fn list_events(&self) -> Result<Vec<Event>> {
        self.db.events.list().await
    }

    /// Events owned by the acting user's organizer profile
    pub async fn my_events(&self, identity: &Identity) -> Result<Vec<Event>> {
        let email = identity.require_email()?;
        let organizer = self
            .db
            .organizers
            .find_by_user_email(email)
            .await?
            .ok_or_else(|| EventDeskError::OrganizerNotFound { email: email.to_string() })?;

        self.db.events.find_by_organizer(organizer.id).await
    }

    /// Events with at least one attendee, most attended first
    pub async fn most_attended(&self) -> Result<Vec<EventStats>> {
        self.db.events.most_attended().await
    }

    /// Replace the editable fields of an event and notify its attendees.
    ///
    /// Capacity is not re-validated against existing attendees.
    pub async fn update_event(&self, identity: &Identity, event_id: i64, update: UpdateEventRequest) -> Result<Event> {
        let mut event = load_event(&self.db, event_id).await?;
        let owner = owner_email(&self.db, &event).await?;
        ensure_can_manage(identity, owner.as_deref(), event_id)?;
        validate_event_fields(&update.name, update.max_attendees)?;

        let previous = PreviousEventDetails::capture(&event);
        event.apply(update);
        let saved = self.db.events.save(&event).await?;
        log_event_action(saved.id, "updated", identity.email.as_deref(), None);

        self.hooks
            .run(BookingEffect::EventUpdated { event: saved.clone(), previous })
            .await;

        Ok(saved)
    }

    /// Delete an event, unlinking its attendees first
    pub async fn delete_event(&self, identity: &Identity, event_id: i64) -> Result<()> {
        let event = load_event(&self.db, event_id).await?;
        let owner = owner_email(&self.db, &event).await?;
        ensure_can_manage(identity, owner.as_deref(), event_id)?;

        let unlinked = self.db.attendees.clear_event(event_id).await?;
        self.db.events.delete(event_id).await?;

        info!(event_id = event_id, unlinked = unlinked, "Event deleted");
        log_event_action(event_id, "deleted", identity.email.as_deref(), None);
        Ok(())
    }
}
