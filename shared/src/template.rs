//! Placeholder substitution for the status page template.
//!
//! The template is an HTML document containing `{placeholder}` markers. Each
//! placeholder in the [`RenderContext`] replaces the first occurrence of its
//! marker; values are inserted verbatim and never re-scanned, and markers
//! without a value are left as they are.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::HashMap;

use crate::models::Agenda;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Days before the meeting by which the agenda should be final
pub const AGENDA_DEADLINE_DAYS: u64 = 10;

/// The placeholders understood by the status page template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Placeholder {
    MeetingTime,
    MeetingDaysLeft,
    MeetingLocation,
    MeetingUrl,
    MeetingAgendaDaysLeft,
}

impl Placeholder {
    pub const ALL: [Placeholder; 5] = [
        Placeholder::MeetingTime,
        Placeholder::MeetingDaysLeft,
        Placeholder::MeetingLocation,
        Placeholder::MeetingUrl,
        Placeholder::MeetingAgendaDaysLeft,
    ];

    /// Name used inside the braces in the template
    pub fn key(self) -> &'static str {
        match self {
            Placeholder::MeetingTime => "meeting-time",
            Placeholder::MeetingDaysLeft => "meeting-days-left",
            Placeholder::MeetingLocation => "meeting-location",
            Placeholder::MeetingUrl => "meeting-url",
            Placeholder::MeetingAgendaDaysLeft => "meeting-agenda-days-left",
        }
    }
}

/// Ordered placeholder values for one render
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    entries: Vec<(Placeholder, String)>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Values for every placeholder, derived from the agenda and the
    /// current local time.
    pub fn for_agenda(agenda: &Agenda, now: NaiveDateTime) -> Self {
        let deadline = agenda.start_date - Days::new(AGENDA_DEADLINE_DAYS);

        Self::new()
            .with(
                Placeholder::MeetingTime,
                format_date_span(agenda.start_date, agenda.end_date),
            )
            .with(
                Placeholder::MeetingDaysLeft,
                days_until(agenda.start_date, now).to_string(),
            )
            .with(Placeholder::MeetingLocation, agenda.location.clone())
            .with(Placeholder::MeetingUrl, agenda.url.clone())
            .with(
                Placeholder::MeetingAgendaDaysLeft,
                days_until(deadline, now).to_string(),
            )
    }

    /// Set a value. Re-setting a placeholder keeps its original position.
    pub fn with(mut self, placeholder: Placeholder, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.entries.iter_mut().find(|(p, _)| *p == placeholder) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((placeholder, value)),
        }
        self
    }

    pub fn get(&self, placeholder: Placeholder) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| *p == placeholder)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Placeholder, &str)> {
        self.entries.iter().map(|(p, v)| (*p, v.as_str()))
    }
}

/// Substitute the context into `template` in a single pass.
pub fn render(context: &RenderContext, template: &str) -> String {
    let mut pending: HashMap<&str, &str> = context.iter().map(|(p, v)| (p.key(), v)).collect();
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        output.push_str(&rest[..open]);
        output.push('{');
        let after = &rest[open + 1..];

        // Marker names never contain braces, so stop at whichever comes first
        match after.find(['{', '}']) {
            Some(close) if after.as_bytes()[close] == b'}' => {
                match pending.remove(&after[..close]) {
                    Some(value) => {
                        output.pop();
                        output.push_str(value);
                    }
                    None => output.push_str(&after[..=close]),
                }
                rest = &after[close + 1..];
            }
            Some(next_open) => {
                output.push_str(&after[..next_open]);
                rest = &after[next_open..];
            }
            None => rest = after,
        }
    }

    output.push_str(rest);
    output
}

/// `"12-15 June 2024"`; month and year always come from `start`.
pub fn format_date_span(start: NaiveDate, end: NaiveDate) -> String {
    format!(
        "{}-{} {} {}",
        start.day(),
        end.day(),
        start.format("%B"),
        start.year()
    )
}

/// Whole days from `now` until midnight at the start of `date`, rounded
/// down. Negative once that midnight has passed.
pub fn days_until(date: NaiveDate, now: NaiveDateTime) -> i64 {
    let delta = date.and_time(NaiveTime::MIN) - now;
    delta.num_milliseconds().div_euclid(MILLIS_PER_DAY)
}
