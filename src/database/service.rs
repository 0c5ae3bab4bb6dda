//! Database service layer
//!
//! Bundles one handle per store so services can be wired against Postgres or
//! the in-memory store interchangeably.

use std::sync::Arc;
use crate::database::memory::InMemoryStore;
use crate::database::store::{AttendeeStore, EventStore, OrganizerStore, UserStore};
use crate::database::{AttendeeRepository, DatabasePool, EventRepository, OrganizerRepository, UserRepository};

#[derive(Clone)]
pub struct DatabaseService {
    pub users: Arc<dyn UserStore>,
    pub organizers: Arc<dyn OrganizerStore>,
    pub events: Arc<dyn EventStore>,
    pub attendees: Arc<dyn AttendeeStore>,
}

impl DatabaseService {
    /// Postgres-backed stores sharing one pool
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: Arc::new(UserRepository::new(pool.clone())),
            organizers: Arc::new(OrganizerRepository::new(pool.clone())),
            events: Arc::new(EventRepository::new(pool.clone())),
            attendees: Arc::new(AttendeeRepository::new(pool)),
        }
    }

    /// Every store backed by one shared in-memory state
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            users: store.clone(),
            organizers: store.clone(),
            events: store.clone(),
            attendees: store,
        }
    }
}
