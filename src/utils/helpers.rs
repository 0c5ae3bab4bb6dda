//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use std::sync::OnceLock;
use chrono::{DateTime, Utc};
use regex::Regex;

/// Display format used for event dates in notifications
pub const EVENT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Return the trimmed value, or `fallback` when it is missing or blank
pub fn safe_field(value: Option<&str>, fallback: &str) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => fallback.to_string(),
    }
}

/// Recipient name used in greetings
pub fn safe_person_name(value: Option<&str>) -> String {
    safe_field(value, "there")
}

/// Event name used in subjects, bodies and the sign-off
pub fn safe_event_name(value: Option<&str>) -> String {
    safe_field(value, "Event")
}

/// Format an event date for display, `None` when the event has no date
pub fn format_event_date(date: Option<DateTime<Utc>>) -> Option<String> {
    date.map(|d| d.format(EVENT_DATE_FORMAT).to_string())
}

/// Check if a string is missing or whitespace only
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
    })
}

/// Loose syntactic email check used for input validation
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email.trim())
}

/// Derive a display name from the local part of an email address
pub fn name_from_email(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}
