//! Test data helpers
//!
//! Fixture builders for accounts, organizer profiles and events. Names and
//! emails are generated with `fake` so tests never depend on fixed values.

use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use EventDesk::database::DatabaseService;
use EventDesk::models::{
    Attendee, CreateAttendeeRequest, CreateEventRequest, CreateOrganizerRequest, CreateUserRequest, Event, Role, User,
};
use EventDesk::services::Identity;

/// A random, unique-enough email address
pub fn random_email() -> String {
    let email: String = SafeEmail().fake();
    let suffix: u32 = (0..1_000_000).fake();
    format!("{}.{}", suffix, email)
}

pub fn random_name() -> String {
    Name().fake()
}

/// Create an account with the given role
pub async fn create_user(db: &DatabaseService, role: Role) -> User {
    db.users
        .create(CreateUserRequest {
            email: random_email(),
            password_hash: "$2b$12$opaque".to_string(),
            role,
        })
        .await
        .expect("Failed to create user")
}

/// Organizer account with a linked organizer profile
pub async fn create_organizer(db: &DatabaseService) -> (User, Identity, i64) {
    let user = create_user(db, Role::Organizer).await;
    let organizer = db
        .organizers
        .create(CreateOrganizerRequest {
            name: random_name(),
            email: user.email.clone(),
            user_id: Some(user.id),
        })
        .await
        .expect("Failed to create organizer");

    let identity = Identity::from_user(&user);
    (user, identity, organizer.id)
}

/// Attendee account and its identity
pub async fn create_attendee_user(db: &DatabaseService) -> (User, Identity) {
    let user = create_user(db, Role::Attendee).await;
    let identity = Identity::from_user(&user);
    (user, identity)
}

pub fn event_request(name: &str, max_attendees: Option<i32>) -> CreateEventRequest {
    CreateEventRequest {
        name: name.to_string(),
        date: None,
        location: Some("Blue Hall".to_string()),
        description: Some("Social dance night".to_string()),
        image_url: None,
        max_attendees,
    }
}

/// Event owned by `organizer_id`, created directly in the store
pub async fn create_event(db: &DatabaseService, organizer_id: i64, max_attendees: Option<i32>) -> Event {
    db.events
        .create(organizer_id, event_request("Lindy Fest", max_attendees))
        .await
        .expect("Failed to create event")
}

/// Unassigned attendee record with a random contact address
pub async fn create_unassigned_attendee(db: &DatabaseService) -> Attendee {
    db.attendees
        .create(CreateAttendeeRequest {
            name: random_name(),
            email: random_email(),
            ..Default::default()
        })
        .await
        .expect("Failed to create attendee")
}
