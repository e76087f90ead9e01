//! The publish pipeline: locate, parse, render, write.
//!
//! Each step needs the previous step's output, so the pipeline is a straight
//! line of fallible async calls. [`StatusPagePublisher::run`] is the entry
//! point for scheduled invocations: it never returns an error, it logs it and
//! leaves the previously published page in place.

use anyhow::Context;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::sync::Arc;

use crate::error::{AgendaError, AgendaResult};
use crate::locator::locate_next_meeting;
use crate::models::{Agenda, NextMeeting, SourceRepo};
use crate::parser::parse_agenda;
use crate::repository::{DocumentSource, ObjectStore};
use crate::template::{render, RenderContext};

/// Object holding the page template
pub const TEMPLATE_KEY: &str = "template.html";

/// Object the rendered page is published to
pub const OUTPUT_KEY: &str = "index.html";

pub const HTML_CONTENT_TYPE: &str = "text/html";

/// A rendered status page that has not been published yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub meeting: NextMeeting,
    pub agenda: Agenda,
    pub html: String,
}

/// Summary of a successful publish
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishOutcome {
    pub document_path: String,
    pub agenda: Agenda,
    pub output_key: String,
    pub bytes_written: usize,
}

pub struct StatusPagePublisher {
    source: Arc<dyn DocumentSource>,
    store: Arc<dyn ObjectStore>,
    repo: SourceRepo,
}

impl StatusPagePublisher {
    pub fn new(
        source: Arc<dyn DocumentSource>,
        store: Arc<dyn ObjectStore>,
        repo: SourceRepo,
    ) -> Self {
        Self {
            source,
            store,
            repo,
        }
    }

    /// Find and parse the agenda of the next meeting.
    pub async fn next_agenda(&self, now: NaiveDateTime) -> AgendaResult<(NextMeeting, Agenda)> {
        let meeting = locate_next_meeting(self.source.as_ref(), now.date()).await?;
        tracing::info!("Next meeting agenda: {}", meeting.path);

        let raw = self
            .source
            .read_file(&meeting.path)
            .await
            .with_context(|| format!("Failed to fetch agenda {}", meeting.path))?;
        let contents = String::from_utf8_lossy(&raw);

        let agenda = parse_agenda(&contents, meeting.month_index, &self.repo)
            .map_err(|e| AgendaError::parse(&meeting.path, e))?;

        Ok((meeting, agenda))
    }

    /// Everything up to, but not including, the write to storage.
    pub async fn render_page(&self, now: NaiveDateTime) -> AgendaResult<RenderedPage> {
        let (meeting, agenda) = self.next_agenda(now).await?;

        let template = self
            .store
            .read_text(TEMPLATE_KEY)
            .await
            .with_context(|| format!("Failed to read template {}", TEMPLATE_KEY))?;

        let context = RenderContext::for_agenda(&agenda, now);
        let html = render(&context, &template);

        Ok(RenderedPage {
            meeting,
            agenda,
            html,
        })
    }

    /// Render the page and overwrite the published copy.
    pub async fn publish(&self, now: NaiveDateTime) -> AgendaResult<PublishOutcome> {
        let page = self.render_page(now).await?;

        self.store
            .write_text(OUTPUT_KEY, &page.html, HTML_CONTENT_TYPE)
            .await
            .with_context(|| format!("Failed to write {}", OUTPUT_KEY))?;

        Ok(PublishOutcome {
            document_path: page.meeting.path,
            agenda: page.agenda,
            output_key: OUTPUT_KEY.to_string(),
            bytes_written: page.html.len(),
        })
    }

    /// One scheduled invocation. Failures are logged, never propagated.
    pub async fn run(&self, now: NaiveDateTime) -> Option<PublishOutcome> {
        match self.publish(now).await {
            Ok(outcome) => {
                tracing::info!(
                    "Published {} ({} bytes) from {}",
                    outcome.output_key,
                    outcome.bytes_written,
                    outcome.document_path
                );
                Some(outcome)
            }
            Err(e) => {
                tracing::error!("{}", failure_message(&e));
                None
            }
        }
    }
}

/// The line logged when a scheduled invocation fails
fn failure_message(error: &AgendaError) -> String {
    format!("ERROR: {}", error)
}
