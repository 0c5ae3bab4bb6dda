//! Notification body composer
//!
//! Drafts email bodies with the text generator and falls back to static
//! templates when the generator fails, times out or answers with blank text.
//! Every body, generated or not, leaves with the canonical sign-off.

use std::sync::{Arc, OnceLock};
use std::time::Duration;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use crate::models::{Attendee, Event};
use crate::services::ollama::TextGenerator;
use crate::utils::helpers::{format_event_date, safe_event_name, safe_field, safe_person_name};

/// Event fields as they were before an update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreviousEventDetails {
    pub name: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
}

impl PreviousEventDetails {
    /// Capture the notification-relevant fields of an event before it is edited
    pub fn capture(event: &Event) -> Self {
        Self {
            name: Some(event.name.clone()),
            date: format_event_date(event.date),
            location: event.location.clone(),
        }
    }
}

/// The four notification scenarios
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationKind {
    Approved,
    Rejected,
    Removed,
    EventUpdated(PreviousEventDetails),
}

impl NotificationKind {
    pub fn label(&self) -> &'static str {
        match self {
            NotificationKind::Approved => "approved",
            NotificationKind::Rejected => "rejected",
            NotificationKind::Removed => "removed",
            NotificationKind::EventUpdated(_) => "event_updated",
        }
    }
}

/// Substituted field values shared by prompts and templates
struct Fields {
    recipient: String,
    event_name: String,
    event_date: String,
    event_location: String,
}

impl Fields {
    fn new(attendee: &Attendee, event: &Event) -> Self {
        Self {
            recipient: safe_person_name(Some(&attendee.name)),
            event_name: safe_event_name(Some(&event.name)),
            event_date: format_event_date(event.date)
                .unwrap_or_else(|| "the scheduled time".to_string()),
            event_location: safe_field(event.location.as_deref(), "the updated location"),
        }
    }
}

struct Previous {
    name: String,
    date: String,
    location: String,
}

impl Previous {
    fn new(previous: &PreviousEventDetails) -> Self {
        Self {
            name: safe_field(previous.name.as_deref(), "the previous name"),
            date: safe_field(previous.date.as_deref(), "the previous date/time"),
            location: safe_field(previous.location.as_deref(), "the previous location"),
        }
    }
}

const PROMPT_PREAMBLE: &str = "You write short, friendly emails in English on behalf of an event team.";

fn prompt_rules(sentences: &str, tone: &str, event_name: &str) -> String {
    format!(
        "Rules:\n\
         - {tone}\n\
         - Keep it to {sentences} sentences.\n\
         - Reply with the email body only, no commentary.\n\
         - Never use placeholders such as [Event Name], [Your Name] or [Your Team Name].\n\
         - Finish with exactly this sign-off on two lines:\n\
         Best regards,\n\
         {event_name} Team"
    )
}

/// Build the generation prompt for a scenario
pub fn build_prompt(kind: &NotificationKind, attendee: &Attendee, event: &Event) -> String {
    let f = Fields::new(attendee, event);

    match kind {
        NotificationKind::Approved => format!(
            "{PROMPT_PREAMBLE}\n\n\
             Task: tell the recipient their booking request for an event was APPROVED.\n\n\
             Details:\n\
             - Recipient name: {}\n\
             - Event name: {}\n\
             - Event date/time: {}\n\n\
             {}",
            f.recipient,
            f.event_name,
            f.event_date,
            prompt_rules("5 to 7", "Warm and professional.", &f.event_name)
        ),
        NotificationKind::Rejected => format!(
            "{PROMPT_PREAMBLE}\n\n\
             Task: tell the recipient their booking request for an event was REJECTED.\n\n\
             Details:\n\
             - Recipient name: {}\n\
             - Event name: {}\n\
             - Event date/time: {}\n\n\
             {}",
            f.recipient,
            f.event_name,
            f.event_date,
            prompt_rules("4 to 6", "Polite and empathetic.", &f.event_name)
        ),
        NotificationKind::Removed => format!(
            "{PROMPT_PREAMBLE}\n\n\
             Task: tell the recipient they were removed from an event.\n\n\
             Details:\n\
             - Recipient name: {}\n\
             - Event name: {}\n\
             - Event date/time: {}\n\n\
             {}",
            f.recipient,
            f.event_name,
            f.event_date,
            prompt_rules("4 to 6", "Polite and brief.", &f.event_name)
        ),
        NotificationKind::EventUpdated(previous) => {
            let p = Previous::new(previous);
            format!(
                "{PROMPT_PREAMBLE}\n\n\
                 Task: tell the recipient that an event they joined was updated.\n\n\
                 Details:\n\
                 - Recipient name: {}\n\
                 - Old name: {}\n\
                 - New name: {}\n\
                 - Old date/time: {}\n\
                 - New date/time: {}\n\
                 - Old location: {}\n\
                 - New location: {}\n\n\
                 {}",
                f.recipient,
                p.name,
                f.event_name,
                p.date,
                f.event_date,
                p.location,
                f.event_location,
                prompt_rules("5 to 7", "Friendly and clear.", &f.event_name)
            )
        }
    }
}

/// Deterministic body used when generation is unusable
pub fn fallback_template(kind: &NotificationKind, attendee: &Attendee, event: &Event) -> String {
    let f = Fields::new(attendee, event);

    let middle = match kind {
        NotificationKind::Approved => format!(
            "Your booking request for the event \"{}\" has been approved.\n\
             The event is scheduled for {}.\n\n\
             We look forward to seeing you there!",
            f.event_name, f.event_date
        ),
        NotificationKind::Rejected => format!(
            "Unfortunately, your booking request for the event \"{}\" could not be approved.\n\
             We are sorry for the inconvenience and hope to see you at one of our other events.",
            f.event_name
        ),
        NotificationKind::Removed => format!(
            "You have been removed from the event \"{}\" scheduled for {}.\n\
             If you think this is a mistake, please contact the organizer.",
            f.event_name, f.event_date
        ),
        NotificationKind::EventUpdated(previous) => {
            let p = Previous::new(previous);
            format!(
                "An event you joined has been updated.\n\
                 Before: {} / {} / {}\n\
                 Now: {} / {} / {}\n\n\
                 Please review the new details. We hope to see you there!",
                p.name, p.date, p.location, f.event_name, f.event_date, f.event_location
            )
        }
    };

    format!(
        "Hi {},\n\n{}\n\nBest regards,\n{} Team",
        f.recipient, middle, f.event_name
    )
}

fn sign_off_regex() -> &'static Regex {
    static SIGN_OFF: OnceLock<Regex> = OnceLock::new();
    SIGN_OFF.get_or_init(|| Regex::new(r"(?i)best regards").expect("sign-off pattern is valid"))
}

/// Canonical closing block for an event
pub fn signature_block(event_name: &str) -> String {
    format!("\n\nBest regards,\n{} Team", event_name)
}

/// Replace whatever sign-off `text` carries with the canonical one.
///
/// Everything from the last case-insensitive "best regards" onwards is cut;
/// the canonical block is then appended.
pub fn enforce_signature(text: &str, event_name: &str) -> String {
    let signature = signature_block(event_name);
    let normalized = text.replace("\r\n", "\n");
    let normalized = normalized.trim();

    let body = match sign_off_regex().find_iter(normalized).last() {
        Some(sign_off) => normalized[..sign_off.start()].trim(),
        None => normalized,
    };

    if body.is_empty() {
        signature.trim_start().to_string()
    } else {
        format!("{}{}", body, signature)
    }
}

/// AI-assisted email body composer
#[derive(Clone)]
pub struct EmailComposer {
    generator: Arc<dyn TextGenerator>,
    model: String,
    timeout: Duration,
}

impl EmailComposer {
    pub fn new(generator: Arc<dyn TextGenerator>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            generator,
            model: model.into(),
            timeout,
        }
    }

    /// Compose a body for `kind`; never fails
    pub async fn compose(&self, kind: &NotificationKind, attendee: &Attendee, event: &Event) -> String {
        let prompt = build_prompt(kind, attendee, event);
        let text = match self.generate(&prompt).await {
            Some(text) => text,
            None => fallback_template(kind, attendee, event),
        };

        enforce_signature(&text, &safe_event_name(Some(&event.name)))
    }

    pub async fn compose_approved(&self, attendee: &Attendee, event: &Event) -> String {
        self.compose(&NotificationKind::Approved, attendee, event).await
    }

    pub async fn compose_rejected(&self, attendee: &Attendee, event: &Event) -> String {
        self.compose(&NotificationKind::Rejected, attendee, event).await
    }

    pub async fn compose_removed(&self, attendee: &Attendee, event: &Event) -> String {
        self.compose(&NotificationKind::Removed, attendee, event).await
    }

    pub async fn compose_event_updated(&self, attendee: &Attendee, event: &Event, previous: &PreviousEventDetails) -> String {
        self.compose(&NotificationKind::EventUpdated(previous.clone()), attendee, event).await
    }

    /// Generated text, or `None` when the fallback should be used
    async fn generate(&self, prompt: &str) -> Option<String> {
        match tokio::time::timeout(self.timeout, self.generator.generate(prompt, &self.model)).await {
            Ok(Ok(text)) if !text.trim().is_empty() => {
                debug!(model = %self.model, "Using generated notification body");
                Some(text)
            }
            Ok(Ok(_)) => {
                warn!(model = %self.model, "Generator returned blank text, using fallback template");
                None
            }
            Ok(Err(e)) => {
                warn!(model = %self.model, error = %e, "Generation failed, using fallback template");
                None
            }
            Err(_) => {
                warn!(model = %self.model, timeout_ms = self.timeout.as_millis() as u64, "Generation timed out, using fallback template");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;
    use crate::utils::errors::{GenerationError, GenerationResult};

    enum Reply {
        Text(&'static str),
        Fail,
        Hang,
    }

    struct StubGenerator(Reply);

    #[async_trait]
    impl TextGenerator for StubGenerator {
        async fn generate(&self, _prompt: &str, _model: &str) -> GenerationResult<String> {
            match self.0 {
                Reply::Text(text) => Ok(text.to_string()),
                Reply::Fail => Err(GenerationError::ServiceUnavailable),
                Reply::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok("too late".to_string())
                }
            }
        }
    }

    fn composer(reply: Reply) -> EmailComposer {
        EmailComposer::new(Arc::new(StubGenerator(reply)), "llama3.1", Duration::from_millis(50))
    }

    fn attendee(name: &str) -> Attendee {
        Attendee {
            id: 1,
            name: name.to_string(),
            email: "ana@example.com".to_string(),
            status: None,
            user_id: None,
            event_id: Some(1),
        }
    }

    fn event(name: &str) -> Event {
        Event {
            id: 1,
            name: name.to_string(),
            created_at: Utc::now(),
            date: Some(Utc.with_ymd_and_hms(2025, 6, 1, 20, 0, 0).unwrap()),
            location: Some("Blue Hall".to_string()),
            description: None,
            image_url: None,
            max_attendees: None,
            organizer_id: 1,
        }
    }

    #[test]
    fn test_enforce_signature_appends_when_missing() {
        let body = enforce_signature("Hello Ana,\r\nSee you soon.", "Lindy Fest");
        assert_eq!(body, "Hello Ana,\nSee you soon.\n\nBest regards,\nLindy Fest Team");
    }

    #[test]
    fn test_enforce_signature_replaces_last_sign_off() {
        let text = "Hi Ana,\nBest regards to your family!\nSee you.\n\nBEST REGARDS,\n[Your Team Name]";
        let body = enforce_signature(text, "Lindy Fest");
        assert_eq!(
            body,
            "Hi Ana,\nBest regards to your family!\nSee you.\n\nBest regards,\nLindy Fest Team"
        );
    }

    #[test]
    fn test_enforce_signature_on_blank_text() {
        assert_eq!(enforce_signature("   ", "Event"), "Best regards,\nEvent Team");
        assert_eq!(enforce_signature("Best regards, someone", "Event"), "Best regards,\nEvent Team");
    }

    #[test]
    fn test_prompt_uses_fallback_fields() {
        let mut event = event("  ");
        event.date = None;
        let prompt = build_prompt(&NotificationKind::Approved, &attendee(""), &event);
        assert!(prompt.contains("Recipient name: there"));
        assert!(prompt.contains("Event name: Event"));
        assert!(prompt.contains("Event date/time: the scheduled time"));
        assert!(prompt.contains("Event Team"));
    }

    #[test]
    fn test_update_prompt_lists_old_and_new_values() {
        let mut event = event("Lindy Fest");
        event.location = None;
        let previous = PreviousEventDetails {
            name: Some("Lindy Night".to_string()),
            date: None,
            location: Some(" ".to_string()),
        };
        let prompt = build_prompt(&NotificationKind::EventUpdated(previous), &attendee("Ana"), &event);
        assert!(prompt.contains("Old name: Lindy Night"));
        assert!(prompt.contains("New name: Lindy Fest"));
        assert!(prompt.contains("Old date/time: the previous date/time"));
        assert!(prompt.contains("New date/time: 2025-06-01 20:00"));
        assert!(prompt.contains("Old location: the previous location"));
        assert!(prompt.contains("New location: the updated location"));
    }

    #[test]
    fn test_fallback_templates_end_with_sign_off() {
        let kinds = [
            NotificationKind::Approved,
            NotificationKind::Rejected,
            NotificationKind::Removed,
            NotificationKind::EventUpdated(PreviousEventDetails::default()),
        ];
        for kind in kinds {
            let body = fallback_template(&kind, &attendee("Ana"), &event("Lindy Fest"));
            assert!(body.starts_with("Hi Ana,"), "{}", kind.label());
            assert!(body.ends_with("Best regards,\nLindy Fest Team"), "{}", kind.label());
        }
    }

    #[tokio::test]
    async fn test_generated_text_is_used() {
        let body = composer(Reply::Text("Dear Ana,\nYou're in!\n\nBest regards,\n[Event Name] Team"))
            .compose_approved(&attendee("Ana"), &event("Lindy Fest"))
            .await;
        assert_eq!(body, "Dear Ana,\nYou're in!\n\nBest regards,\nLindy Fest Team");
    }

    #[tokio::test]
    async fn test_failure_uses_fallback() {
        let body = composer(Reply::Fail)
            .compose_rejected(&attendee("Ana"), &event("Lindy Fest"))
            .await;
        assert!(body.contains("could not be approved"));
        assert!(body.ends_with("\n\nBest regards,\nLindy Fest Team"));
    }

    #[tokio::test]
    async fn test_blank_text_uses_fallback() {
        let body = composer(Reply::Text(" \n\t "))
            .compose_removed(&attendee("Ana"), &event("Lindy Fest"))
            .await;
        assert!(body.contains("removed from the event \"Lindy Fest\" scheduled for 2025-06-01 20:00"));
    }

    #[tokio::test]
    async fn test_timeout_uses_fallback() {
        let body = composer(Reply::Hang)
            .compose_event_updated(&attendee("Ana"), &event("Lindy Fest"), &PreviousEventDetails::default())
            .await;
        assert!(body.contains("An event you joined has been updated."));
        assert!(body.ends_with("Best regards,\nLindy Fest Team"));
    }

    proptest! {
        #[test]
        fn prop_signature_always_last(text in "(?s).{0,200}", name in "[A-Za-z][A-Za-z ]{0,20}") {
            prop_assume!(!name.to_lowercase().contains("best regards"));
            let event_name = name.trim().to_string();
            let body = enforce_signature(&text, &event_name);
            let tail = format!("Best regards,\n{} Team", event_name);
            prop_assert!(body.ends_with(&tail));

            let last = sign_off_regex().find_iter(&body).last().map(|m| m.start());
            prop_assert_eq!(last, Some(body.len() - tail.len()));
        }
    }
}
