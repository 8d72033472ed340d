//! End-to-end pipeline tests over mock source and sink.
//!
//! The mocks implement the same EventSource/EventSink traits as the
//! ClickHouse client, so every production code path runs except the
//! actual warehouse transport.

use chrono::NaiveDate;

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
async fn three_event_session_end_to_end() {
    let date = test_date();
    let source = MockSource::new();
    source.stage(
        date,
        vec![
            fixtures::page_view("A", 1_000_000, 100, "https://example.com/"),
            fixtures::click("A", 1_002_000_000, 100, "https://other.example/"),
            fixtures::page_view("A", 1_005_000_000, 100, "https://example.com/about"),
        ],
    );
    let sink = MockSink::new();
    let stats = pipeline_with(source, sink.clone())
        .run_date(date)
        .await
        .unwrap();

    assert_eq!(stats.raw_events, 3);
    assert_eq!(stats.events, 3);
    assert_eq!(stats.sessions, 1);
    assert_eq!(stats.profiles_new, 1);

    let sessions = sink.sessions_for(date);
    let s = &sessions[0];
    assert_eq!(s.user_pseudo_id, "A");
    assert_eq!(s.ga_session_id, "100");
    assert_eq!(s.pageviews, 2);
    assert_eq!(s.session_start_time, 1_000_000);
    assert_eq!(s.session_end_time, 1_005_000_000);
    let expected = (1_005_000_000f64 - 1_000_000f64) / 1e6;
    assert!((s.session_duration_seconds - expected).abs() < f64::EPSILON);
    assert_eq!(s.engagement_time_msec, 1500 + 500 + 1500);
    assert_eq!(s.referrer.as_deref(), Some("https://google.com/"));
    assert_eq!(s.device_category.as_deref(), Some("desktop"));
    assert_eq!(s.country.as_deref(), Some("JP"));

    // Category columns stay mutually exclusive across the batch.
    let events = sink.events_for(date);
    let click = events.iter().find(|e| e.event_name == "click").unwrap();
    assert_eq!(click.link_url.as_deref(), Some("https://other.example/"));
    assert_eq!(click.outbound, Some(true));
    assert!(click.percent_scrolled.is_none());
    let pv = events.iter().find(|e| e.event_name == "page_view").unwrap();
    assert_eq!(pv.page_location.as_deref(), Some("https://example.com/"));
    assert!(pv.link_url.is_none());

    let profiles = sink.profile_writes();
    assert_eq!(profiles.len(), 1);
    let p = &profiles[0].new[0];
    assert_eq!(p.user_pseudo_id, "A");
    assert_eq!(p.first_seen, Some(1_000_000));
    assert_eq!(p.last_seen, 1_005_000_000);
    assert_eq!(p.session_count, 1);
    assert_eq!(p.event_count, 3);
    assert_eq!(p.most_used_device.as_deref(), Some("desktop"));
}

#[tokio::test]
async fn empty_batch_performs_no_writes() {
    let date = test_date();
    let source = MockSource::new();
    let sink = MockSink::new();
    let stats = pipeline_with(source, sink.clone())
        .run_date(date)
        .await
        .unwrap();

    assert_eq!(stats.events, 0);
    assert_eq!(sink.write_call_count(), 0);
}

#[tokio::test]
async fn commerce_event_surfaces_first_item_only() {
    let date = test_date();
    let source = MockSource::new();
    source.stage(date, vec![fixtures::purchase("B", 2_000_000, 300)]);
    let sink = MockSink::new();
    pipeline_with(source, sink.clone())
        .run_date(date)
        .await
        .unwrap();

    let events = sink.events_for(date);
    let e = &events[0];
    assert_eq!(e.currency.as_deref(), Some("JPY"));
    assert_eq!(e.value, Some(4200.0));
    assert_eq!(e.transaction_id.as_deref(), Some("T-0001"));
    assert_eq!(e.item_id.as_deref(), Some("SKU-1"));
    assert_eq!(e.item_name.as_deref(), Some("First"));
    assert_eq!(e.item_quantity, Some(2));
}

#[tokio::test]
async fn rerun_converges_to_same_partition_contents() {
    let date = test_date();
    let source = MockSource::new();
    source.stage(
        date,
        vec![
            fixtures::page_view("A", 1_000_000, 100, "https://example.com/"),
            fixtures::scroll("A", 2_000_000, 100, 90.0),
        ],
    );
    let sink = MockSink::new();
    let pipeline = pipeline_with(source, sink.clone());

    pipeline.run_date(date).await.unwrap();
    let first_events = sink.events_for(date);
    let first_sessions = sink.sessions_for(date);

    pipeline.run_date(date).await.unwrap();
    let second_events = sink.events_for(date);
    let second_sessions = sink.sessions_for(date);

    assert_eq!(first_events.len(), second_events.len());
    assert_eq!(first_sessions.len(), second_sessions.len());
    assert_eq!(
        serde_json::to_value(&first_sessions).unwrap(),
        serde_json::to_value(&second_sessions).unwrap()
    );
}

#[tokio::test]
async fn existing_profile_keeps_first_seen() {
    let date = test_date();
    let source = MockSource::new();
    source.stage(
        date,
        vec![fixtures::page_view("known", 9_000_000, 100, "https://example.com/")],
    );
    let sink = MockSink::new();
    sink.seed_profile("known");

    pipeline_with(source, sink.clone())
        .run_date(date)
        .await
        .unwrap();

    let writes = sink.profile_writes();
    assert!(writes[0].new.is_empty());
    let updated = &writes[0].updated[0];
    assert_eq!(updated.user_pseudo_id, "known");
    // Update payloads never carry first_seen, so the stored value
    // survives the merge.
    assert_eq!(updated.first_seen, None);
    assert_eq!(updated.last_seen, 9_000_000);
}

#[tokio::test]
async fn second_run_turns_new_profile_into_update() {
    let day1 = test_date();
    let day2 = NaiveDate::from_ymd_opt(2024, 1, 16).unwrap();
    let source = MockSource::new();
    source.stage(
        day1,
        vec![fixtures::page_view("A", 1_000_000, 100, "https://example.com/")],
    );
    source.stage(
        day2,
        vec![fixtures::page_view("A", 90_000_000_000, 200, "https://example.com/")],
    );
    let sink = MockSink::new();
    let pipeline = pipeline_with(source, sink.clone());

    pipeline.run_date(day1).await.unwrap();
    pipeline.run_date(day2).await.unwrap();

    let writes = sink.profile_writes();
    assert_eq!(writes[0].new.len(), 1);
    assert_eq!(writes[1].new.len(), 0);
    assert_eq!(writes[1].updated.len(), 1);
    assert_eq!(writes[1].updated[0].first_seen, None);
}

#[tokio::test]
async fn backfill_processes_each_date_in_range() {
    let source = MockSource::new();
    let day1 = NaiveDate::from_ymd_opt(2024, 1, 14).unwrap();
    let day2 = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    let day3 = NaiveDate::from_ymd_opt(2024, 1, 16).unwrap();
    source.stage(
        day1,
        vec![fixtures::page_view("A", 1_000_000, 100, "https://example.com/")],
    );
    source.stage(
        day3,
        vec![fixtures::page_view("B", 3_000_000, 200, "https://example.com/")],
    );
    let sink = MockSink::new();
    let summary = pipeline_with(source, sink.clone())
        .run_backfill(day1, day3)
        .await
        .unwrap();

    assert_eq!(summary.dates_processed, 3);
    assert_eq!(summary.dates_failed, 0);
    assert_eq!(summary.totals.events, 2);
    assert_eq!(sink.events_for(day1).len(), 1);
    // Day 2 had no data, so nothing was written for it.
    assert!(sink.events_for(day2).is_empty());
    assert_eq!(sink.events_for(day3).len(), 1);
}
