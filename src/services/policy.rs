//! Capacity and ownership policy
//!
//! Pure decisions used by the booking and event services.

use crate::models::{Event, Role};
use crate::services::auth::Identity;
use crate::utils::errors::{EventDeskError, Result};

/// Whether `event` can take one more attendee given its live attendee count
pub fn has_capacity(event: &Event, current_attendees: i64) -> bool {
    match event.max_attendees {
        None => true,
        Some(max) => current_attendees < i64::from(max),
    }
}

/// Whether the acting identity may manage an event owned by `owner_email`.
///
/// Admins manage everything; organizers manage events whose organizer profile
/// is linked to their own account.
pub fn can_manage(identity: &Identity, owner_email: Option<&str>) -> bool {
    if identity.has_role(Role::Admin) {
        return true;
    }

    if identity.has_role(Role::Organizer) {
        if let (Some(acting), Some(owner)) = (identity.email.as_deref(), owner_email) {
            return acting == owner;
        }
    }

    false
}

/// `Unauthenticated` without an identity, `PermissionDenied` when not allowed
pub fn ensure_can_manage(identity: &Identity, owner_email: Option<&str>, event_id: i64) -> Result<()> {
    identity.require_email()?;

    if can_manage(identity, owner_email) {
        Ok(())
    } else {
        Err(EventDeskError::PermissionDenied(format!(
            "You are not allowed to manage event {}",
            event_id
        )))
    }
}
