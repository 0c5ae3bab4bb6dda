//! Account and organizer profile service
//!
//! Credentials are hashed elsewhere; this service only stores the opaque
//! hash together with the account's role.

use tracing::info;
use crate::database::DatabaseService;
use crate::models::{CreateOrganizerRequest, CreateUserRequest, Organizer, Role, User};
use crate::services::auth::Identity;
use crate::utils::errors::{EventDeskError, Result};
use crate::utils::helpers::{is_blank, is_valid_email, name_from_email};

#[derive(Clone)]
pub struct AccountService {
    db: DatabaseService,
}

impl AccountService {
    /// Create a new AccountService instance
    pub fn new(db: DatabaseService) -> Self {
        Self { db }
    }

    /// Register a user account; organizers also get an organizer profile
    pub async fn register(&self, email: &str, password_hash: &str, role: Role) -> Result<User> {
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(EventDeskError::InvalidInput(format!("Invalid email: {}", email)));
        }
        if self.db.users.find_by_email(email).await?.is_some() {
            return Err(EventDeskError::InvalidInput(format!("Email already registered: {}", email)));
        }

        let user = self
            .db
            .users
            .create(CreateUserRequest {
                email: email.to_string(),
                password_hash: password_hash.to_string(),
                role,
            })
            .await?;

        if role == Role::Organizer {
            let organizer = self
                .db
                .organizers
                .create(CreateOrganizerRequest {
                    name: name_from_email(email),
                    email: email.to_string(),
                    user_id: Some(user.id),
                })
                .await?;
            info!(user_id = user.id, organizer_id = organizer.id, "Organizer profile created on registration");
        }

        info!(user_id = user.id, role = %role, "User registered");
        Ok(user)
    }

    /// Create an organizer profile linked to the acting user's account
    pub async fn create_organizer_profile(&self, identity: &Identity, name: &str) -> Result<Organizer> {
        let email = identity.require_email()?;
        let user = self
            .db
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| EventDeskError::UserNotFound { email: email.to_string() })?;

        let name = if is_blank(Some(name)) { name_from_email(email) } else { name.trim().to_string() };
        self.db
            .organizers
            .create(CreateOrganizerRequest {
                name,
                email: user.email.clone(),
                user_id: Some(user.id),
            })
            .await
    }

    pub async fn my_organizer_profile(&self, identity: &Identity) -> Result<Organizer> {
        let email = identity.require_email()?;
        self.db
            .organizers
            .find_by_user_email(email)
            .await?
            .ok_or_else(|| EventDeskError::OrganizerNotFound { email: email.to_string() })
    }

    pub async fn list_organizers(&self) -> Result<Vec<Organizer>> {
        self.db.organizers.list().await
    }
}
