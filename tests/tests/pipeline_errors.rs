//! Failure-path tests: extraction errors, load errors, and batches
//! with missing session keys.

use chrono::NaiveDate;

use etl_core::Error;
use integration_tests::fixtures;
use integration_tests::mocks::{MockSink, MockSource};
use notify::{Notifier, NotifyConfig};
use pipeline::Pipeline;

fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
}

fn pipeline_with(
    source: MockSource,
    sink: MockSink,
) -> Pipeline<MockSource, MockSink> {
    Pipeline::new(source, sink, Notifier::new(NotifyConfig::default()))
}

#[tokio::test]
async fn source_failure_propagates() {
    let date = test_date();
    let source = MockSource::new();
    source.fail_on(date);
    let sink = MockSink::new();
    let result = pipeline_with(source, sink.clone()).run_date(date).await;

    assert!(matches!(result, Err(Error::Extract(_))));
    assert_eq!(sink.write_call_count(), 0);
}

#[tokio::test]
async fn sink_failure_propagates() {
    let date = test_date();
    let source = MockSource::new();
    source.stage(
        date,
        vec![fixtures::page_view("A", 1_000_000, 100, "https://example.com/")],
    );
    let sink = MockSink::new();
    sink.set_should_fail(true);

    let result = pipeline_with(source, sink).run_date(date).await;
    assert!(matches!(result, Err(Error::Load(_))));
}

#[tokio::test]
async fn batch_without_session_keys_still_writes_events_and_profiles() {
    let date = test_date();
    let source = MockSource::new();
    source.stage(
        date,
        vec![
            fixtures::keyless_event("A", "page_view", 1_000_000),
            fixtures::keyless_event("A", "click", 2_000_000),
        ],
    );
    let sink = MockSink::new();
    let stats = pipeline_with(source, sink.clone())
        .run_date(date)
        .await
        .unwrap();

    assert_eq!(stats.events, 2);
    assert_eq!(stats.sessions, 0);
    assert_eq!(stats.profiles_new, 1);
    assert!(sink.sessions_for(date).is_empty());
    assert_eq!(sink.events_for(date).len(), 2);
}

#[tokio::test]
async fn backfill_isolates_per_date_failures() {
    let day1 = NaiveDate::from_ymd_opt(2024, 1, 14).unwrap();
    let day2 = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    let day3 = NaiveDate::from_ymd_opt(2024, 1, 16).unwrap();

    let source = MockSource::new();
    source.stage(
        day1,
        vec![fixtures::page_view("A", 1_000_000, 100, "https://example.com/")],
    );
    source.fail_on(day2);
    source.stage(
        day3,
        vec![fixtures::page_view("B", 3_000_000, 200, "https://example.com/")],
    );

    let sink = MockSink::new();
    let summary = pipeline_with(source, sink.clone())
        .run_backfill(day1, day3)
        .await
        .unwrap();

    assert_eq!(summary.dates_processed, 2);
    assert_eq!(summary.dates_failed, 1);
    // The failed middle date did not stop the later one.
    assert_eq!(sink.events_for(day3).len(), 1);
}

#[tokio::test]
async fn backfill_with_inverted_range_is_a_config_error() {
    let source = MockSource::new();
    let sink = MockSink::new();
    let start = NaiveDate::from_ymd_opt(2024, 1, 16).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 1, 14).unwrap();
    let result = pipeline_with(source, sink).run_backfill(start, end).await;
    assert!(matches!(result, Err(Error::Config(_))));
}
