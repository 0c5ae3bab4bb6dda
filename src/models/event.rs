//! Event model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    /// `None` means unlimited
    pub max_attendees: Option<i32>,
    pub organizer_id: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub name: String,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub max_attendees: Option<i32>,
}

/// Full replacement of the editable event fields
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEventRequest {
    pub name: String,
    pub date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub max_attendees: Option<i32>,
}

impl Event {
    /// Apply an update in place; `id`, `created_at` and the owner never change
    pub fn apply(&mut self, update: UpdateEventRequest) {
        self.name = update.name;
        self.date = update.date;
        self.location = update.location;
        self.description = update.description;
        self.image_url = update.image_url;
        self.max_attendees = update.max_attendees;
    }
}

/// An event together with its live attendee count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventStats {
    pub event: Event,
    pub attendee_count: i64,
}
