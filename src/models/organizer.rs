//! Organizer model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Organizer {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Unset until a user account claims the profile
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateOrganizerRequest {
    pub name: String,
    pub email: String,
    pub user_id: Option<i64>,
}
