use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Converts a calendar month (1-12), as used in document file names, into
/// the zero-based month index the agenda parser expects.
///
/// The locator reports months in this form and the parser converts back when
/// building dates, so both sides must agree on the offset.
pub const fn zero_based_month(month: u32) -> u32 {
    month.saturating_sub(1)
}

/// A dated agenda document, stored at `{year}/{MM}.md` in the repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MonthDocument {
    pub year: i32,
    pub month: u32,
}

impl MonthDocument {
    /// Returns `None` unless `month` is in 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Repository path of this document, e.g. `2024/06.md`
    pub fn path(&self) -> String {
        format!("{}/{:02}.md", self.year, self.month)
    }
}

/// The document the locator picked as the upcoming meeting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextMeeting {
    pub path: String,
    pub year: i32,
    /// Zero-based month (January = 0)
    pub month_index: u32,
}

impl From<MonthDocument> for NextMeeting {
    fn from(doc: MonthDocument) -> Self {
        Self {
            path: doc.path(),
            year: doc.year,
            month_index: zero_based_month(doc.month),
        }
    }
}

/// Identifies the upstream agenda repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRepo {
    pub owner: String,
    pub name: String,
    /// Branch used when linking back to a document on the web
    pub branch: String,
}

impl SourceRepo {
    pub fn new(
        owner: impl Into<String>,
        name: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            branch: branch.into(),
        }
    }

    /// Web URL of the agenda document covering `date`'s year and month
    pub fn document_url(&self, date: NaiveDate) -> String {
        format!(
            "https://github.com/{}/{}/blob/{}/{}/{:02}.md",
            self.owner,
            self.name,
            self.branch,
            date.year(),
            date.month()
        )
    }
}

impl Default for SourceRepo {
    fn default() -> Self {
        Self::new("tc39", "agendas", "master")
    }
}

/// The next meeting as described by its agenda document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Agenda {
    pub location: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub url: String,
}
