//! Notification dispatcher
//!
//! This service resolves who should receive a booking notification, asks the
//! composer for a body and hands the email to the mail transport. Delivery
//! problems are logged and counted; they never reach the caller of the
//! booking operation that triggered them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use crate::database::store::{AttendeeStore, UserStore};
use crate::models::{Attendee, Event};
use crate::services::composer::{EmailComposer, NotificationKind, PreviousEventDetails};
use crate::services::hooks::{BookingEffect, PostCommitHook};
use crate::services::mail::MailTransport;
use crate::utils::errors::Result;
use crate::utils::helpers::{is_blank, safe_event_name};
use crate::utils::logging::log_notification;

/// What happened to a single notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationOutcome {
    Sent,
    /// No usable recipient address
    Skipped,
    Failed,
}

/// Notification statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationStats {
    pub total_sent: u64,
    pub total_failed: u64,
    pub total_skipped: u64,
    pub sent_by_kind: HashMap<String, u64>,
}

/// Email subject for a notification scenario
pub fn subject_for(kind: &NotificationKind, event: &Event) -> String {
    let name = safe_event_name(Some(&event.name));
    match kind {
        NotificationKind::Approved => format!("Your booking has been approved - {}", name),
        NotificationKind::Rejected => format!("Your booking has been rejected - {}", name),
        NotificationKind::Removed => format!("Update: you were removed from {}", name),
        NotificationKind::EventUpdated(_) => format!("Event updated: {}", name),
    }
}

/// Notification dispatcher for booking emails
#[derive(Clone)]
pub struct NotificationDispatcher {
    users: Arc<dyn UserStore>,
    attendees: Arc<dyn AttendeeStore>,
    composer: EmailComposer,
    mailer: Arc<dyn MailTransport>,
    stats: Arc<Mutex<NotificationStats>>,
}

impl NotificationDispatcher {
    /// Create a new NotificationDispatcher instance
    pub fn new(
        users: Arc<dyn UserStore>,
        attendees: Arc<dyn AttendeeStore>,
        composer: EmailComposer,
        mailer: Arc<dyn MailTransport>,
    ) -> Self {
        Self {
            users,
            attendees,
            composer,
            mailer,
            stats: Arc::new(Mutex::new(NotificationStats::default())),
        }
    }

    /// Address to notify: the linked account's email, else the attendee's own
    pub async fn resolve_recipient(&self, attendee: &Attendee) -> Option<String> {
        if let Some(user_id) = attendee.user_id {
            match self.users.find_by_id(user_id).await {
                Ok(Some(user)) if !is_blank(Some(&user.email)) => return Some(user.email.trim().to_string()),
                Ok(_) => debug!(attendee_id = attendee.id, user_id, "Linked user has no usable email"),
                Err(e) => warn!(attendee_id = attendee.id, user_id, error = %e, "Failed to load linked user"),
            }
        }

        if is_blank(Some(&attendee.email)) {
            None
        } else {
            Some(attendee.email.trim().to_string())
        }
    }

    pub async fn notify_approved(&self, attendee: &Attendee, event: &Event) -> NotificationOutcome {
        self.deliver(NotificationKind::Approved, attendee, event).await
    }

    pub async fn notify_rejected(&self, attendee: &Attendee, event: &Event) -> NotificationOutcome {
        self.deliver(NotificationKind::Rejected, attendee, event).await
    }

    pub async fn notify_removed(&self, attendee: &Attendee, event: &Event) -> NotificationOutcome {
        self.deliver(NotificationKind::Removed, attendee, event).await
    }

    /// Tell every attendee of `event` about a change, one independent send each
    pub async fn notify_event_updated(&self, event: &Event, previous: &PreviousEventDetails) -> Result<Vec<NotificationOutcome>> {
        let attendees = self.attendees.find_by_event(event.id).await?;
        info!(event_id = event.id, count = attendees.len(), "Sending event update notifications");

        let kind = NotificationKind::EventUpdated(previous.clone());
        let outcomes = join_all(
            attendees
                .iter()
                .map(|attendee| self.deliver(kind.clone(), attendee, event)),
        )
        .await;

        info!(
            event_id = event.id,
            total = outcomes.len(),
            successful = outcomes.iter().filter(|o| **o == NotificationOutcome::Sent).count(),
            "Event update notifications completed"
        );
        Ok(outcomes)
    }

    async fn deliver(&self, kind: NotificationKind, attendee: &Attendee, event: &Event) -> NotificationOutcome {
        let subject = subject_for(&kind, event);

        let Some(recipient) = self.resolve_recipient(attendee).await else {
            warn!(attendee_id = attendee.id, event_id = event.id, kind = kind.label(), "No recipient address, skipping notification");
            self.update_stats(&kind, NotificationOutcome::Skipped);
            return NotificationOutcome::Skipped;
        };

        let body = self.composer.compose(&kind, attendee, event).await;

        let outcome = match self.mailer.send(&recipient, &subject, &body).await {
            Ok(()) => {
                log_notification(&recipient, &subject, true, None);
                NotificationOutcome::Sent
            }
            Err(e) => {
                log_notification(&recipient, &subject, false, Some(&e.to_string()));
                NotificationOutcome::Failed
            }
        };

        self.update_stats(&kind, outcome);
        outcome
    }

    fn update_stats(&self, kind: &NotificationKind, outcome: NotificationOutcome) {
        let Ok(mut stats) = self.stats.lock() else {
            return;
        };
        match outcome {
            NotificationOutcome::Sent => {
                stats.total_sent += 1;
                *stats.sent_by_kind.entry(kind.label().to_string()).or_insert(0) += 1;
            }
            NotificationOutcome::Failed => stats.total_failed += 1,
            NotificationOutcome::Skipped => stats.total_skipped += 1,
        }
    }

    /// Get notification statistics
    pub fn stats(&self) -> NotificationStats {
        self.stats.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Reset statistics
    pub fn reset_stats(&self) {
        if let Ok(mut stats) = self.stats.lock() {
            *stats = NotificationStats::default();
        }
    }
}

#[async_trait]
impl PostCommitHook for NotificationDispatcher {
    fn name(&self) -> &str {
        "notification_dispatcher"
    }

    async fn on_commit(&self, effect: &BookingEffect) -> Result<()> {
        match effect {
            BookingEffect::Approved { attendee, event } => {
                self.notify_approved(attendee, event).await;
            }
            BookingEffect::Rejected { attendee, event } => {
                self.notify_rejected(attendee, event).await;
            }
            BookingEffect::Removed { attendee, event } => {
                self.notify_removed(attendee, event).await;
            }
            BookingEffect::EventUpdated { event, previous } => {
                self.notify_event_updated(event, previous).await?;
            }
        }
        Ok(())
    }
}
