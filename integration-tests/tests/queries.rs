use bclog_core::conf::BclogConfig;
use bclog_core::event::EventKind;
use bclog_core::repl::Flow;
use integration_tests::harness::{Output, TestSession};
use pretty_assertions::assert_eq;
use std::time::Duration;

fn loaded_session() -> TestSession {
    let session = TestSession::new(&BclogConfig::default());
    session.feed_fixture("logs/mixed.log");
    session.presenter.take();
    session
}

fn shown(outputs: &[Output]) -> Vec<usize> {
    match outputs {
        [Output::Show(events)] => events.iter().map(|e| e.index).collect(),
        other => panic!("expected one show report, got {other:?}"),
    }
}

#[test]
fn show_all_lists_history_in_arrival_order() {
    // Arrange
    let mut session = loaded_session();

    // Act
    let (flow, outputs) = session.command("show * 24h");

    // Assert
    assert_eq!(flow, Flow::Continue);
    assert_eq!(shown(&outputs), vec![0, 1, 2, 3, 4, 5, 6]);
}

#[test]
fn show_window_is_relative_to_the_newest_event() {
    // Arrange
    let mut session = loaded_session();

    // Act
    let (_, outputs) = session.command("show * 3s");

    // Assert
    // Newest event is 10:00:08; 10:00:05 is the cutoff.
    assert_eq!(shown(&outputs), vec![4, 5, 6]);
}

#[test]
fn show_unknown_category_is_empty() {
    // Arrange
    let mut session = loaded_session();

    // Act
    let (_, outputs) = session.command("show nginx-access-404 24h");

    // Assert
    assert_eq!(shown(&outputs), Vec::<usize>::new());
}

#[test]
fn summary_counts_match_show_counts() {
    // Arrange
    let mut session = loaded_session();
    let (_, outputs) = session.command("summary 24h");
    let Some(Output::Summary { rows, .. }) = outputs.into_iter().next() else {
        panic!("expected a summary");
    };

    for row in rows {
        // Act
        let (_, outputs) = session.command(&format!("show {} 24h", row.category));

        // Assert
        assert_eq!(shown(&outputs).len(), row.count, "category {}", row.category);
    }
}

#[test]
fn summary_reports_time_since_each_category_was_last_seen() {
    // Arrange
    let mut session = loaded_session();

    // Act
    let (_, outputs) = session.command("summary");

    // Assert
    let [Output::Summary { window, rows }] = outputs.as_slice() else {
        panic!("expected one summary, got {outputs:?}");
    };
    assert_eq!(*window, Duration::from_secs(86_400));

    let since: Vec<(&str, u64)> = rows
        .iter()
        .map(|row| (row.category.as_str(), row.since_last.as_secs()))
        .collect();
    assert_eq!(
        since,
        vec![
            ("bigcommerce-app-DEBUG", 0),
            ("generic-kernel", 1),
            ("nginx-access-200", 8),
            ("nginx-access-502", 2),
            ("php-Fatal error", 6),
            ("process", 5),
        ]
    );
}

#[test]
fn detail_shows_attached_stack_frames() {
    // Arrange
    let mut session = loaded_session();

    // Act
    let (_, outputs) = session.command("2");

    // Assert
    let [Output::Detail { index: 2, event }] = outputs.as_slice() else {
        panic!("expected detail for event 2, got {outputs:?}");
    };
    let EventKind::Php(php) = &event.kind else {
        panic!("expected a php event, got {:?}", event.kind);
    };
    let methods: Vec<&str> = php.frames.iter().map(|f| f.method.as_str()).collect();
    assert_eq!(methods, vec!["{main}", "Cart->load"]);
}

#[test]
fn detail_out_of_range_reports_an_error() {
    // Arrange
    let mut session = loaded_session();

    // Act
    let (flow, outputs) = session.command("42");

    // Assert
    assert_eq!(flow, Flow::Continue);
    assert_eq!(
        outputs,
        vec![Output::Error(
            "no event at index 42 (history has 7 events)".to_string()
        )]
    );
}

#[test]
fn unknown_command_is_reported_and_the_session_continues() {
    // Arrange
    let mut session = loaded_session();

    // Act
    let (flow, outputs) = session.command("frobnicate");

    // Assert
    assert_eq!(flow, Flow::Continue);
    assert_eq!(
        outputs,
        vec![Output::Error(
            "unknown command 'frobnicate' (try 'help')".to_string()
        )]
    );
}

#[test]
fn command_loop_stops_at_quit() {
    // Arrange
    let mut session = loaded_session();

    // Act
    session.type_lines("show * 1s\nquit\nshow * 24h\n");

    // Assert
    let outputs = session.presenter.take();
    assert_eq!(
        outputs
            .iter()
            .filter(|o| matches!(o, Output::Show(_)))
            .count(),
        1
    );
    assert_eq!(
        outputs.iter().filter(|o| **o == Output::Prompt).count(),
        2
    );
}

#[test]
fn undecodable_input_is_reported_and_the_session_continues() {
    // Arrange
    let mut session = loaded_session();

    // Act
    session.type_lines(b"\xff\nshow * 24h\nquit\n");

    // Assert
    let outputs = session.presenter.take();
    assert!(outputs.contains(&Output::Error(
        "unknown command '\u{fffd}' (try 'help')".to_string()
    )));
    assert_eq!(
        outputs
            .iter()
            .filter(|o| matches!(o, Output::Show(_)))
            .count(),
        1
    );
}
