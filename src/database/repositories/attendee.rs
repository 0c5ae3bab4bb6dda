//! Attendee repository implementation

use std::time::Instant;
use async_trait::async_trait;
use sqlx::PgPool;
use crate::database::store::{AssignOutcome, AttendeeStore};
use crate::models::attendee::{Attendee, AttendanceStatus, CreateAttendeeRequest};
use crate::utils::errors::{EventDeskError, Result};
use crate::utils::logging::log_database_operation;

const ATTENDEE_COLUMNS: &str = "id, name, email, status, user_id, event_id";

#[derive(Clone, Debug)]
pub struct AttendeeRepository {
    pool: PgPool,
}

impl AttendeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn assign_in_transaction(&self, attendee_id: i64, event_id: i64) -> Result<AssignOutcome> {
        let mut tx = self.pool.begin().await?;

        // Serializes concurrent assignments and capacity edits on the same event.
        let (max_attendees,): (Option<i32>,) =
            sqlx::query_as("SELECT max_attendees FROM events WHERE id = $1 FOR UPDATE")
                .bind(event_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or(EventDeskError::EventNotFound { event_id })?;

        let attendee = sqlx::query_as::<_, Attendee>(&format!(
            "SELECT {ATTENDEE_COLUMNS} FROM attendees WHERE id = $1 FOR UPDATE"
        ))
        .bind(attendee_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(EventDeskError::AttendeeNotFound { attendee_id })?;

        if attendee.event_id.is_some() {
            tx.rollback().await?;
            return Ok(AssignOutcome::AlreadyLinked(attendee));
        }

        let (current,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM attendees WHERE event_id = $1")
            .bind(event_id)
            .fetch_one(&mut *tx)
            .await?;

        if max_attendees.is_some_and(|max| current >= i64::from(max)) {
            tx.rollback().await?;
            return Ok(AssignOutcome::Full);
        }

        let assigned = sqlx::query_as::<_, Attendee>(&format!(
            "UPDATE attendees SET event_id = $2 WHERE id = $1 RETURNING {ATTENDEE_COLUMNS}"
        ))
        .bind(attendee_id)
        .bind(event_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(AssignOutcome::Assigned(assigned))
    }
}

#[async_trait]
impl AttendeeStore for AttendeeRepository {
    /// Create a new attendee
    async fn create(&self, request: CreateAttendeeRequest) -> Result<Attendee> {
        let attendee = sqlx::query_as::<_, Attendee>(&format!(
            r#"
            INSERT INTO attendees (name, email, status, user_id, event_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ATTENDEE_COLUMNS}
            "#
        ))
        .bind(request.name)
        .bind(request.email)
        .bind(request.status)
        .bind(request.user_id)
        .bind(request.event_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(attendee)
    }

    /// Find attendee by ID
    async fn find_by_id(&self, id: i64) -> Result<Option<Attendee>> {
        let attendee = sqlx::query_as::<_, Attendee>(&format!(
            "SELECT {ATTENDEE_COLUMNS} FROM attendees WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(attendee)
    }

    async fn list(&self) -> Result<Vec<Attendee>> {
        let attendees = sqlx::query_as::<_, Attendee>(&format!(
            "SELECT {ATTENDEE_COLUMNS} FROM attendees ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(attendees)
    }

    async fn find_by_event(&self, event_id: i64) -> Result<Vec<Attendee>> {
        let attendees = sqlx::query_as::<_, Attendee>(&format!(
            "SELECT {ATTENDEE_COLUMNS} FROM attendees WHERE event_id = $1 ORDER BY id ASC"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(attendees)
    }

    async fn find_by_event_and_status(&self, event_id: i64, status: AttendanceStatus) -> Result<Vec<Attendee>> {
        let attendees = sqlx::query_as::<_, Attendee>(&format!(
            "SELECT {ATTENDEE_COLUMNS} FROM attendees WHERE event_id = $1 AND status = $2 ORDER BY id ASC"
        ))
        .bind(event_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;

        Ok(attendees)
    }

    async fn find_by_user_email(&self, email: &str) -> Result<Vec<Attendee>> {
        let attendees = sqlx::query_as::<_, Attendee>(
            r#"
            SELECT a.id, a.name, a.email, a.status, a.user_id, a.event_id
            FROM attendees a
            INNER JOIN users u ON u.id = a.user_id
            WHERE u.email = $1
            ORDER BY a.id ASC
            "#
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        Ok(attendees)
    }

    async fn count_by_event(&self, event_id: i64) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM attendees WHERE event_id = $1")
            .bind(event_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    async fn assign_if_room(&self, attendee_id: i64, event_id: i64) -> Result<AssignOutcome> {
        let started = Instant::now();
        let outcome = self.assign_in_transaction(attendee_id, event_id).await;
        log_database_operation(
            "assign_if_room",
            "attendees",
            started.elapsed().as_millis() as u64,
            outcome.is_ok(),
        );
        outcome
    }

    async fn set_status(&self, attendee_id: i64, status: AttendanceStatus) -> Result<Attendee> {
        let updated = sqlx::query_as::<_, Attendee>(&format!(
            "UPDATE attendees SET status = $2 WHERE id = $1 RETURNING {ATTENDEE_COLUMNS}"
        ))
        .bind(attendee_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        updated.ok_or(EventDeskError::AttendeeNotFound { attendee_id })
    }

    async fn unlink(&self, attendee_id: i64, expected_event_id: i64) -> Result<Option<Attendee>> {
        let unlinked = sqlx::query_as::<_, Attendee>(&format!(
            "UPDATE attendees SET event_id = NULL WHERE id = $1 AND event_id = $2 RETURNING {ATTENDEE_COLUMNS}"
        ))
        .bind(attendee_id)
        .bind(expected_event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(unlinked)
    }

    async fn clear_event(&self, event_id: i64) -> Result<u64> {
        let result = sqlx::query("UPDATE attendees SET event_id = NULL WHERE event_id = $1")
            .bind(event_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
