//! Post-commit hooks
//!
//! Side effects that run after a booking or event change has been persisted.
//! A failing hook is logged and never undoes the change that triggered it.

use std::sync::Arc;
use async_trait::async_trait;
use tracing::{debug, error};
use crate::models::{Attendee, Event};
use crate::services::composer::PreviousEventDetails;
use crate::utils::errors::Result;

/// A committed change that side effects may react to
#[derive(Debug, Clone, PartialEq)]
pub enum BookingEffect {
    Approved { attendee: Attendee, event: Event },
    Rejected { attendee: Attendee, event: Event },
    Removed { attendee: Attendee, event: Event },
    EventUpdated { event: Event, previous: PreviousEventDetails },
}

impl BookingEffect {
    pub fn name(&self) -> &'static str {
        match self {
            BookingEffect::Approved { .. } => "approved",
            BookingEffect::Rejected { .. } => "rejected",
            BookingEffect::Removed { .. } => "removed",
            BookingEffect::EventUpdated { .. } => "event_updated",
        }
    }

    pub fn event_id(&self) -> i64 {
        match self {
            BookingEffect::Approved { event, .. }
            | BookingEffect::Rejected { event, .. }
            | BookingEffect::Removed { event, .. }
            | BookingEffect::EventUpdated { event, .. } => event.id,
        }
    }
}

#[async_trait]
pub trait PostCommitHook: Send + Sync {
    fn name(&self) -> &str;

    async fn on_commit(&self, effect: &BookingEffect) -> Result<()>;
}

/// Ordered list of hooks run after each successful transition
#[derive(Clone, Default)]
pub struct HookRunner {
    hooks: Vec<Arc<dyn PostCommitHook>>,
}

impl HookRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, hook: Arc<dyn PostCommitHook>) {
        debug!(hook = hook.name(), "Registered post-commit hook");
        self.hooks.push(hook);
    }

    pub fn with_hook(mut self, hook: Arc<dyn PostCommitHook>) -> Self {
        self.register(hook);
        self
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run every hook in registration order
    pub async fn run(&self, effect: BookingEffect) {
        for hook in &self.hooks {
            if let Err(e) = hook.on_commit(&effect).await {
                error!(
                    hook = hook.name(),
                    effect = effect.name(),
                    event_id = effect.event_id(),
                    error = %e,
                    "Post-commit hook failed"
                );
            }
        }
    }
}
