//! Authentication context
//!
//! The identity of the acting user is passed explicitly into every operation
//! that needs it. It carries the user's email and the set of roles granted by
//! whatever authenticated the request.

use std::collections::HashSet;
use tracing::debug;
use crate::models::{Role, User};
use crate::utils::errors::{EventDeskError, Result};

/// Authentication context for a request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Identity {
    pub email: Option<String>,
    pub roles: HashSet<Role>,
}

impl Identity {
    /// A request with no authenticated user
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// An authenticated user holding a single role
    pub fn new(email: impl Into<String>, role: Role) -> Self {
        Self {
            email: Some(email.into()),
            roles: HashSet::from([role]),
        }
    }

    /// Context for a stored user account
    pub fn from_user(user: &User) -> Self {
        Self::new(user.email.clone(), user.role)
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.insert(role);
        self
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.email.as_deref().is_some_and(|e| !e.trim().is_empty())
    }

    /// The acting user's email, or `Unauthenticated`
    pub fn require_email(&self) -> Result<&str> {
        match self.email.as_deref() {
            Some(email) if !email.trim().is_empty() => Ok(email),
            _ => {
                debug!("Operation requires an authenticated user");
                Err(EventDeskError::Unauthenticated)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_anonymous_identity() {
        let identity = Identity::anonymous();
        assert!(!identity.is_authenticated());
        assert_matches!(identity.require_email(), Err(EventDeskError::Unauthenticated));
    }

    #[test]
    fn test_roles() {
        let identity = Identity::new("org@example.com", Role::Organizer).with_role(Role::Attendee);
        assert!(identity.has_role(Role::Organizer));
        assert!(identity.has_role(Role::Attendee));
        assert!(!identity.has_role(Role::Admin));
        assert_eq!(identity.require_email().unwrap(), "org@example.com");
    }

    #[test]
    fn test_blank_email_is_anonymous() {
        let identity = Identity::new("  ", Role::Admin);
        assert!(!identity.is_authenticated());
        assert!(identity.require_email().is_err());
    }
}
