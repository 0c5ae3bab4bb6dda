//! Attendee model

use std::fmt;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "attendance_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    Pending,
    Approved,
    Rejected,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Pending => "PENDING",
            AttendanceStatus::Approved => "APPROVED",
            AttendanceStatus::Rejected => "REJECTED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AttendanceStatus::Approved | AttendanceStatus::Rejected)
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A person's booking record for at most one event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Attendee {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Only meaningful while `event_id` is set
    pub status: Option<AttendanceStatus>,
    pub user_id: Option<i64>,
    pub event_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateAttendeeRequest {
    pub name: String,
    pub email: String,
    pub status: Option<AttendanceStatus>,
    pub user_id: Option<i64>,
    pub event_id: Option<i64>,
}
