//! Error types for the status page pipeline.
//!
//! Every failure of an invocation maps onto one of three cases: no upcoming
//! agenda could be located, the located agenda is malformed, or talking to
//! the repository or object storage failed. They are all handled the same
//! way at the top level, but keeping them distinct makes the logs useful.

use thiserror::Error;

/// Why an agenda document could not be turned into an [`crate::Agenda`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No `- **Location**: ...` line
    #[error("agenda has no location line")]
    MissingLocation,

    /// No `- **Dates**: ...` line
    #[error("agenda has no dates line")]
    MissingDates,

    /// A captured day or year does not fit in an integer
    #[error("invalid number in dates line: {0}")]
    InvalidNumber(String),

    /// Day/month/year do not describe a representable calendar date
    #[error("invalid date {year}-{month_index}-{day} (zero-based month)")]
    InvalidDate { year: i32, month_index: u32, day: u32 },
}

/// Unified error type for one publish invocation
#[derive(Debug, Error)]
pub enum AgendaError {
    /// Neither this year nor next year has an upcoming agenda document
    #[error("Failed to get meeting agenda: no upcoming agenda document found")]
    NotFound,

    /// The located document lacks the required fields
    #[error("Failed to parse agenda {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: ParseError,
    },

    /// Repository or object storage I/O failed
    #[error("{0:#}")]
    Transport(#[from] anyhow::Error),
}

impl AgendaError {
    pub fn parse(path: impl Into<String>, source: ParseError) -> Self {
        AgendaError::Parse {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for pipeline steps
pub type AgendaResult<T> = Result<T, AgendaError>;
