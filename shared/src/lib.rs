//! Core logic for the next-meeting status page.
//!
//! Finds the upcoming meeting's agenda in a `{year}/{MM}.md` repository,
//! parses its dates and location, and renders them into an HTML template.
//! The document repository and the object store are reached through the
//! traits in [`repository`]; concrete clients live in the publisher binary.

pub mod error;
pub mod locator;
pub mod memory;
pub mod models;
pub mod parser;
pub mod publisher;
pub mod repository;
pub mod template;

pub use error::{AgendaError, AgendaResult, ParseError};
pub use locator::locate_next_meeting;
pub use models::{zero_based_month, Agenda, MonthDocument, NextMeeting, SourceRepo};
pub use parser::parse_agenda;
pub use publisher::{
    PublishOutcome, RenderedPage, StatusPagePublisher, HTML_CONTENT_TYPE, OUTPUT_KEY,
    TEMPLATE_KEY,
};
pub use repository::{DirectoryEntry, DocumentSource, ObjectStore};
pub use template::{render, Placeholder, RenderContext};
