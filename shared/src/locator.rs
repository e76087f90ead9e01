//! Finds the agenda document of the next meeting.
//!
//! The repository is laid out as `{year}/{MM}.md`. The search looks at the
//! current year first, keeping months from the current month onwards, and
//! falls back to the earliest document of the following year.
//!
//! Months are compared whole: a document for the current month is picked
//! even when its meeting already took place earlier in the month.

use anyhow::Result;
use chrono::{Datelike, NaiveDate};

use crate::error::{AgendaError, AgendaResult};
use crate::models::{MonthDocument, NextMeeting};
use crate::repository::DocumentSource;

/// Locate the next meeting document relative to `today`.
///
/// A failure listing the current year is returned as a transport error.
/// A failure listing the following year is logged and reported as
/// [`AgendaError::NotFound`].
pub async fn locate_next_meeting(
    source: &dyn DocumentSource,
    today: NaiveDate,
) -> AgendaResult<NextMeeting> {
    let year = today.year();
    let month = today.month();

    let months = list_year_months(source, year).await?;
    if let Some(doc) = months
        .iter()
        .copied()
        .filter(|m| *m >= month)
        .find_map(|m| MonthDocument::new(year, m))
    {
        tracing::debug!("Next meeting is later this year: {}", doc.path());
        return Ok(doc.into());
    }

    tracing::debug!(
        "No agenda in {} from month {} onwards, checking {}",
        year,
        month,
        year + 1
    );

    let next_year = year + 1;
    let months = match list_year_months(source, next_year).await {
        Ok(months) => months,
        Err(e) => {
            tracing::warn!("Failed to list agendas for {}: {:#}", next_year, e);
            return Err(AgendaError::NotFound);
        }
    };

    months
        .first()
        .and_then(|m| MonthDocument::new(next_year, *m))
        .map(NextMeeting::from)
        .ok_or(AgendaError::NotFound)
}

/// Months (1-12, ascending) that have an agenda document in `year`
async fn list_year_months(source: &dyn DocumentSource, year: i32) -> Result<Vec<u32>> {
    let entries = source.list_directory(&year.to_string()).await?;

    let mut months: Vec<u32> = entries
        .iter()
        .filter_map(|entry| month_from_file_name(&entry.name))
        .collect();
    months.sort_unstable();
    months.dedup();

    Ok(months)
}

/// Parse `MM.md` into its month number; anything else is not an agenda
fn month_from_file_name(name: &str) -> Option<u32> {
    let stem = name.strip_suffix(".md")?;
    if stem.len() != 2 || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    stem.parse().ok().filter(|m| (1..=12).contains(m))
}
