use agenda_shared::memory::{InMemoryDocuments, InMemoryStore};
use agenda_shared::{
    locate_next_meeting, AgendaError, SourceRepo, StatusPagePublisher, HTML_CONTENT_TYPE,
    OUTPUT_KEY, TEMPLATE_KEY,
};
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Arc;

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<body>
  <h1>Next meeting: {meeting-time}</h1>
  <p>Location: {meeting-location}</p>
  <p>Starts in {meeting-days-left} days</p>
  <p>Agenda deadline in {meeting-agenda-days-left} days</p>
  <a href="{meeting-url}">Agenda</a>
</body>
</html>
"#;

fn june_agenda() -> &'static str {
    "# Agenda for the 102nd meeting of Ecma TC39\n\
     \n\
     1. **Host**: Online\n\
     - **Dates**: 12-15 June 2024\n\
     - **Times**: 10:00 to 16:00 EDT\n\
     - **Location**: Remote\n"
}

fn midnight(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid datetime")
}

#[tokio::test]
async fn publishes_next_meeting_page() {
    let docs = InMemoryDocuments::new()
        .with_file("2024/02.md", "- **Dates**: 6 - 8 February 2024\n- **Location**: San Diego\n")
        .with_file("2024/06.md", june_agenda())
        .with_file("2024/10.md", "- **Dates**: 8 - 10 October 2024\n- **Location**: Tokyo\n");
    let store = Arc::new(InMemoryStore::new().with_object(TEMPLATE_KEY, TEMPLATE));
    let publisher = StatusPagePublisher::new(Arc::new(docs), store.clone(), SourceRepo::default());

    let now = midnight(2024, 5, 1);
    let outcome = publisher.run(now).await.expect("publish should succeed");
    assert_eq!(outcome.document_path, "2024/06.md");

    let expected_days = (NaiveDate::from_ymd_opt(2024, 6, 12).expect("valid date")
        - now.date())
    .num_days();
    assert_eq!(expected_days, 42);

    let page = store.get(OUTPUT_KEY).expect("page should be published");
    assert_eq!(page.content_type, HTML_CONTENT_TYPE);
    assert!(page.content.contains("<h1>Next meeting: 12-15 June 2024</h1>"));
    assert!(page.content.contains("<p>Location: Remote</p>"));
    assert!(page
        .content
        .contains(&format!("<p>Starts in {} days</p>", expected_days)));
    assert!(page
        .content
        .contains(&format!("<p>Agenda deadline in {} days</p>", expected_days - 10)));
    assert!(page
        .content
        .contains("href=\"https://github.com/tc39/agendas/blob/master/2024/06.md\""));
    assert!(!page.content.contains("{meeting-"));
}

#[tokio::test]
async fn rolls_over_to_next_year() {
    let docs = InMemoryDocuments::new()
        .with_file("2024/11.md", "- **Dates**: 19 - 21 November 2024\n- **Location**: Remote\n")
        .with_file("2025/01.md", "- **Dates**: 4 - 6 January 2025\n- **Location**: Seattle\n");

    let next = locate_next_meeting(&docs, NaiveDate::from_ymd_opt(2024, 12, 20).expect("valid"))
        .await
        .expect("should find next year's meeting");
    assert_eq!(next.path, "2025/01.md");

    let store = Arc::new(InMemoryStore::new().with_object(TEMPLATE_KEY, TEMPLATE));
    let publisher = StatusPagePublisher::new(Arc::new(docs), store.clone(), SourceRepo::default());
    publisher
        .run(midnight(2024, 12, 20))
        .await
        .expect("publish should succeed");

    let page = store.get(OUTPUT_KEY).expect("page should be published");
    assert!(page.content.contains("4-6 January 2025"));
    assert!(page.content.contains("<p>Location: Seattle</p>"));
    assert!(page.content.contains("<p>Starts in 15 days</p>"));
}

#[tokio::test]
async fn nothing_upcoming_is_not_found() {
    let docs = InMemoryDocuments::new()
        .with_file("2024/03.md", "- **Dates**: 1 - 2 March 2024\n- **Location**: Remote\n");
    let store = Arc::new(
        InMemoryStore::new()
            .with_object(TEMPLATE_KEY, TEMPLATE)
            .with_object(OUTPUT_KEY, "stale"),
    );
    let publisher = StatusPagePublisher::new(Arc::new(docs), store.clone(), SourceRepo::default());

    let result = publisher.publish(midnight(2024, 4, 1)).await;
    assert!(matches!(result, Err(AgendaError::NotFound)));
    assert!(publisher.run(midnight(2024, 4, 1)).await.is_none());
    assert_eq!(store.get(OUTPUT_KEY).map(|o| o.content).as_deref(), Some("stale"));
}
