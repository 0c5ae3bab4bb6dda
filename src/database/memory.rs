//! In-memory store
//!
//! Implements every persistence contract over a single locked state. Used by
//! tests and for running the workflow without a database.

use std::collections::BTreeMap;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use crate::database::store::{AssignOutcome, AttendeeStore, EventStore, OrganizerStore, UserStore};
use crate::models::*;
use crate::services::policy::has_capacity;
use crate::utils::errors::{EventDeskError, Result};

#[derive(Default)]
struct State {
    next_id: i64,
    events: BTreeMap<i64, Event>,
    attendees: BTreeMap<i64, Attendee>,
    organizers: BTreeMap<i64, Organizer>,
    users: BTreeMap<i64, User>,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn count_by_event(&self, event_id: i64) -> i64 {
        self.attendees
            .values()
            .filter(|a| a.event_id == Some(event_id))
            .count() as i64
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventStore for InMemoryStore {
    async fn create(&self, organizer_id: i64, request: CreateEventRequest) -> Result<Event> {
        let mut state = self.state.write().await;
        let event = Event {
            id: state.next_id(),
            name: request.name,
            created_at: Utc::now(),
            date: request.date,
            location: request.location,
            description: request.description,
            image_url: request.image_url,
            max_attendees: request.max_attendees,
            organizer_id,
        };
        state.events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Event>> {
        Ok(self.state.read().await.events.get(&id).cloned())
    }

    async fn save(&self, event: &Event) -> Result<Event> {
        let mut state = self.state.write().await;
        let stored = state
            .events
            .get_mut(&event.id)
            .ok_or(EventDeskError::EventNotFound { event_id: event.id })?;
        let created_at = stored.created_at;
        *stored = Event { created_at, ..event.clone() };
        Ok(stored.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.state.write().await.events.remove(&id);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Event>> {
        Ok(self.state.read().await.events.values().cloned().collect())
    }

    async fn find_by_organizer(&self, organizer_id: i64) -> Result<Vec<Event>> {
        Ok(self
            .state
            .read()
            .await
            .events
            .values()
            .filter(|e| e.organizer_id == organizer_id)
            .cloned()
            .collect())
    }

    async fn most_attended(&self) -> Result<Vec<EventStats>> {
        let state = self.state.read().await;
        let mut stats: Vec<EventStats> = state
            .events
            .values()
            .map(|event| EventStats {
                event: event.clone(),
                attendee_count: state.count_by_event(event.id),
            })
            .filter(|s| s.attendee_count > 0)
            .collect();
        stats.sort_by(|a, b| b.attendee_count.cmp(&a.attendee_count));
        Ok(stats)
    }
}

#[async_trait]
impl AttendeeStore for InMemoryStore {
    async fn create(&self, request: CreateAttendeeRequest) -> Result<Attendee> {
        let mut state = self.state.write().await;
        let attendee = Attendee {
            id: state.next_id(),
            name: request.name,
            email: request.email,
            status: request.status,
            user_id: request.user_id,
            event_id: request.event_id,
        };
        state.attendees.insert(attendee.id, attendee.clone());
        Ok(attendee)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Attendee>> {
        Ok(self.state.read().await.attendees.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Attendee>> {
        Ok(self.state.read().await.attendees.values().cloned().collect())
    }

    async fn find_by_event(&self, event_id: i64) -> Result<Vec<Attendee>> {
        Ok(self
            .state
            .read()
            .await
            .attendees
            .values()
            .filter(|a| a.event_id == Some(event_id))
            .cloned()
            .collect())
    }

    async fn find_by_event_and_status(&self, event_id: i64, status: AttendanceStatus) -> Result<Vec<Attendee>> {
        Ok(self
            .state
            .read()
            .await
            .attendees
            .values()
            .filter(|a| a.event_id == Some(event_id) && a.status == Some(status))
            .cloned()
            .collect())
    }

    async fn find_by_user_email(&self, email: &str) -> Result<Vec<Attendee>> {
        let state = self.state.read().await;
        let user_ids: Vec<i64> = state
            .users
            .values()
            .filter(|u| u.email == email)
            .map(|u| u.id)
            .collect();
        Ok(state
            .attendees
            .values()
            .filter(|a| a.user_id.is_some_and(|id| user_ids.contains(&id)))
            .cloned()
            .collect())
    }

    async fn count_by_event(&self, event_id: i64) -> Result<i64> {
        Ok(self.state.read().await.count_by_event(event_id))
    }

    async fn assign_if_room(&self, attendee_id: i64, event_id: i64) -> Result<AssignOutcome> {
        let mut state = self.state.write().await;
        let event = state
            .events
            .get(&event_id)
            .ok_or(EventDeskError::EventNotFound { event_id })?;
        let room = has_capacity(event, state.count_by_event(event_id));
        let attendee = state
            .attendees
            .get_mut(&attendee_id)
            .ok_or(EventDeskError::AttendeeNotFound { attendee_id })?;

        if attendee.event_id.is_some() {
            return Ok(AssignOutcome::AlreadyLinked(attendee.clone()));
        }
        if !room {
            return Ok(AssignOutcome::Full);
        }

        attendee.event_id = Some(event_id);
        Ok(AssignOutcome::Assigned(attendee.clone()))
    }

    async fn set_status(&self, attendee_id: i64, status: AttendanceStatus) -> Result<Attendee> {
        let mut state = self.state.write().await;
        let attendee = state
            .attendees
            .get_mut(&attendee_id)
            .ok_or(EventDeskError::AttendeeNotFound { attendee_id })?;
        attendee.status = Some(status);
        Ok(attendee.clone())
    }

    async fn unlink(&self, attendee_id: i64, expected_event_id: i64) -> Result<Option<Attendee>> {
        let mut state = self.state.write().await;
        match state.attendees.get_mut(&attendee_id) {
            Some(attendee) if attendee.event_id == Some(expected_event_id) => {
                attendee.event_id = None;
                Ok(Some(attendee.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn clear_event(&self, event_id: i64) -> Result<u64> {
        let mut state = self.state.write().await;
        let mut cleared = 0;
        for attendee in state.attendees.values_mut().filter(|a| a.event_id == Some(event_id)) {
            attendee.event_id = None;
            cleared += 1;
        }
        Ok(cleared)
    }
}

#[async_trait]
impl OrganizerStore for InMemoryStore {
    async fn create(&self, request: CreateOrganizerRequest) -> Result<Organizer> {
        let mut state = self.state.write().await;
        let organizer = Organizer {
            id: state.next_id(),
            name: request.name,
            email: request.email,
            user_id: request.user_id,
        };
        state.organizers.insert(organizer.id, organizer.clone());
        Ok(organizer)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Organizer>> {
        Ok(self.state.read().await.organizers.get(&id).cloned())
    }

    async fn find_by_user_email(&self, email: &str) -> Result<Option<Organizer>> {
        let state = self.state.read().await;
        let user_id = state.users.values().find(|u| u.email == email).map(|u| u.id);
        Ok(user_id.and_then(|uid| {
            state
                .organizers
                .values()
                .find(|o| o.user_id == Some(uid))
                .cloned()
        }))
    }

    async fn list(&self) -> Result<Vec<Organizer>> {
        Ok(self.state.read().await.organizers.values().cloned().collect())
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn create(&self, request: CreateUserRequest) -> Result<User> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.email == request.email) {
            return Err(EventDeskError::InvalidInput(format!(
                "Email already registered: {}",
                request.email
            )));
        }
        let user = User {
            id: state.next_id(),
            email: request.email,
            password_hash: request.password_hash,
            role: request.role,
            created_at: Utc::now(),
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .state
            .read()
            .await
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }
}
