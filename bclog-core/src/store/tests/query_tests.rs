use super::{access, event_at, fatal};
use crate::correlate::Lookback;
use crate::store::{CategoryFilter, CategorySummary, EventStore, QueryError};
use pretty_assertions::assert_eq;
use std::time::Duration;

const HOUR: Duration = Duration::from_secs(3_600);

fn store_with_spread() -> EventStore {
    let store = EventStore::new();
    // 10:00 .. 10:50, last event at 10:50.
    store.record(access(0, 404), &Lookback::UNBOUNDED);
    store.record(fatal(10, 0), &Lookback::UNBOUNDED);
    store.record(access(20, 200), &Lookback::UNBOUNDED);
    store.record(access(40, 404), &Lookback::UNBOUNDED);
    store.record(event_at(50, 0, "kernel: eth0 up"), &Lookback::UNBOUNDED);
    store
}

#[test]
fn empty_store_yields_empty_results() {
    let store = EventStore::new();

    assert!(store.show(&CategoryFilter::All, HOUR).is_empty());
    assert!(store.summary(HOUR).is_empty());
    assert_eq!(store.last_timestamp(), None);
}

#[test]
fn show_all_lists_history_positions_in_order() {
    let store = store_with_spread();

    let indices: Vec<_> = store
        .show(&CategoryFilter::All, HOUR)
        .into_iter()
        .map(|e| e.index)
        .collect();

    assert_eq!(indices, vec![0, 1, 2, 3, 4]);
}

#[test]
fn show_window_is_relative_to_last_event() {
    let store = store_with_spread();

    let shown = store.show(&CategoryFilter::from("*"), Duration::from_secs(30 * 60));

    let indices: Vec<_> = shown.iter().map(|e| e.index).collect();
    assert_eq!(indices, vec![2, 3, 4]);
}

#[test]
fn show_exact_category() {
    let store = store_with_spread();

    let shown = store.show(&CategoryFilter::Exact("nginx-access-404".to_string()), HOUR);

    let indices: Vec<_> = shown.iter().map(|e| e.index).collect();
    assert_eq!(indices, vec![0, 3]);
    assert!(
        store
            .show(&CategoryFilter::Exact("nope".to_string()), HOUR)
            .is_empty()
    );
}

#[test]
fn summary_counts_match_show() {
    let store = store_with_spread();
    let window = Duration::from_secs(45 * 60);

    let summary = store.summary(window);

    assert_eq!(
        summary,
        vec![
            CategorySummary {
                category: "generic-kernel".to_string(),
                count: 1,
                since_last: Duration::ZERO,
            },
            CategorySummary {
                category: "nginx-access-200".to_string(),
                count: 1,
                since_last: Duration::from_secs(30 * 60),
            },
            CategorySummary {
                category: "nginx-access-404".to_string(),
                count: 1,
                since_last: Duration::from_secs(10 * 60),
            },
            CategorySummary {
                category: "php-Fatal error".to_string(),
                count: 1,
                since_last: Duration::from_secs(40 * 60),
            },
        ]
    );

    for row in &summary {
        let filter = CategoryFilter::Exact(row.category.clone());
        assert_eq!(store.show(&filter, window).len(), row.count);
    }
}

#[test]
fn summary_omits_categories_outside_window() {
    let store = store_with_spread();

    let categories: Vec<_> = store
        .summary(Duration::from_secs(5 * 60))
        .into_iter()
        .map(|row| row.category)
        .collect();

    assert_eq!(categories, vec!["generic-kernel".to_string()]);
}

#[test]
fn event_newer_than_last_counts_as_zero_elapsed() {
    let store = EventStore::new();
    store.record(access(30, 200), &Lookback::UNBOUNDED);
    // Out-of-order arrival: older timestamp appended last.
    store.record(access(0, 500), &Lookback::UNBOUNDED);

    let shown = store.show(&CategoryFilter::All, Duration::ZERO);

    let indices: Vec<_> = shown.iter().map(|e| e.index).collect();
    assert_eq!(indices, vec![0, 1]);
}

#[test]
fn detail_is_bounds_checked() {
    let store = store_with_spread();

    assert_eq!(store.detail(4).unwrap().category(), "generic-kernel");
    assert_eq!(
        store.detail(5),
        Err(QueryError::OutOfRange { index: 5, len: 5 })
    );
}
