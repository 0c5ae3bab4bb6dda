//! Organizer repository implementation

use async_trait::async_trait;
use sqlx::PgPool;
use crate::database::store::OrganizerStore;
use crate::models::organizer::{Organizer, CreateOrganizerRequest};
use crate::utils::errors::Result;

#[derive(Clone, Debug)]
pub struct OrganizerRepository {
    pool: PgPool,
}

impl OrganizerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrganizerStore for OrganizerRepository {
    /// Create a new organizer profile
    async fn create(&self, request: CreateOrganizerRequest) -> Result<Organizer> {
        let organizer = sqlx::query_as::<_, Organizer>(
            r#"
            INSERT INTO organizers (name, email, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, user_id
            "#
        )
        .bind(request.name)
        .bind(request.email)
        .bind(request.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(organizer)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Organizer>> {
        let organizer = sqlx::query_as::<_, Organizer>(
            "SELECT id, name, email, user_id FROM organizers WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(organizer)
    }

    /// Find the organizer profile claimed by the user with this email
    async fn find_by_user_email(&self, email: &str) -> Result<Option<Organizer>> {
        let organizer = sqlx::query_as::<_, Organizer>(
            r#"
            SELECT o.id, o.name, o.email, o.user_id
            FROM organizers o
            INNER JOIN users u ON u.id = o.user_id
            WHERE u.email = $1
            "#
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(organizer)
    }

    async fn list(&self) -> Result<Vec<Organizer>> {
        let organizers = sqlx::query_as::<_, Organizer>(
            "SELECT id, name, email, user_id FROM organizers ORDER BY id ASC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(organizers)
    }
}
