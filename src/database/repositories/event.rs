//! Event repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use chrono::Utc;
use crate::database::store::EventStore;
use crate::models::event::{Event, EventStats, CreateEventRequest};
use crate::utils::errors::{EventDeskError, Result};

const EVENT_COLUMNS: &str =
    "id, name, created_at, date, location, description, image_url, max_attendees, organizer_id";

#[derive(Clone, Debug)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct EventCountRow {
    #[sqlx(flatten)]
    event: Event,
    attendee_count: i64,
}

#[async_trait]
impl EventStore for EventRepository {
    /// Create a new event
    async fn create(&self, organizer_id: i64, request: CreateEventRequest) -> Result<Event> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (name, created_at, date, location, description, image_url, max_attendees, organizer_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(request.name)
        .bind(Utc::now())
        .bind(request.date)
        .bind(request.location)
        .bind(request.description)
        .bind(request.image_url)
        .bind(request.max_attendees)
        .bind(organizer_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find event by ID
    async fn find_by_id(&self, id: i64) -> Result<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Persist the editable fields; `created_at` and the owner are left untouched
    async fn save(&self, event: &Event) -> Result<Event> {
        let saved = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET name = $2,
                date = $3,
                location = $4,
                description = $5,
                image_url = $6,
                max_attendees = $7
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(event.id)
        .bind(&event.name)
        .bind(event.date)
        .bind(&event.location)
        .bind(&event.description)
        .bind(&event.image_url)
        .bind(event.max_attendees)
        .fetch_optional(&self.pool)
        .await?;

        saved.ok_or(EventDeskError::EventNotFound { event_id: event.id })
    }

    /// Delete event
    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List all events by date
    async fn list(&self) -> Result<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY date ASC NULLS LAST, id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Get events owned by an organizer
    async fn find_by_organizer(&self, organizer_id: i64) -> Result<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE organizer_id = $1 ORDER BY date ASC NULLS LAST, id ASC"
        ))
        .bind(organizer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Events joined with their attendee count, most attended first
    async fn most_attended(&self) -> Result<Vec<EventStats>> {
        let rows = sqlx::query_as::<_, EventCountRow>(
            r#"
            SELECT e.id, e.name, e.created_at, e.date, e.location, e.description, e.image_url,
                   e.max_attendees, e.organizer_id, COUNT(a.id) AS attendee_count
            FROM events e
            INNER JOIN attendees a ON a.event_id = e.id
            GROUP BY e.id
            ORDER BY attendee_count DESC
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| EventStats { event: row.event, attendee_count: row.attendee_count })
            .collect())
    }
}
