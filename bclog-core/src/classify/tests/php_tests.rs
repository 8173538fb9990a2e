use super::{classifier, event, kind};
use crate::classify::Classification;
use crate::event::{EventKind, PhpEvent, PhpStackFrame};
use pretty_assertions::assert_eq;

fn php_event(line: &str) -> PhpEvent {
    match kind(line) {
        EventKind::Php(event) => event,
        other => panic!("expected php event, got {other:?}"),
    }
}

fn frame(line: &str) -> PhpStackFrame {
    match kind(line) {
        EventKind::PhpStackFrame(frame) => frame,
        other => panic!("expected php stack frame, got {other:?}"),
    }
}

#[test]
fn stack_trace_header_is_an_anchor() {
    let result = classifier()
        .classify("Mar  5 10:00:04 web01 php: PHP Stack trace:")
        .unwrap();

    assert_eq!(result, Some(Classification::StackTraceAnchor));
}

#[test]
fn sql_error_carries_store_id_in_content() {
    let event = php_event(
        "Mar  5 10:00:05 web01 php: SQL Error (store_42): Deadlock found in /var/www/lib/Db.php on line 88",
    );

    assert_eq!(event.level, "SQL Error");
    assert_eq!(event.content, "Deadlock found (store ID: 42)");
    assert_eq!(event.file, "/var/www/lib/Db.php");
    assert_eq!(event.line, 88);
}

#[test]
fn general_error_line() {
    let event = event(
        "Mar  5 10:00:06 web01 php: PHP Fatal error:  Call to undefined function foo() in /var/www/index.php on line 12",
    );

    assert_eq!(event.category(), "php-Fatal error");
    assert!(event.is_severe());

    let EventKind::Php(php) = event.kind else {
        panic!("expected php event");
    };
    assert_eq!(php.level, "Fatal error");
    assert_eq!(php.content, "Call to undefined function foo()");
    assert_eq!(php.file, "/var/www/index.php");
    assert_eq!(php.line, 12);
    assert!(php.frames.is_empty());
}

#[test]
fn warning_is_not_severe() {
    let event = event(
        "Mar  5 10:00:06 web01 php: PHP Warning:  Division by zero in /var/www/math.php on line 3",
    );

    assert_eq!(event.category(), "php-Warning");
    assert!(!event.is_severe());
}

#[test]
fn uncaught_exception_is_decomposed_with_inline_frames() {
    let line = concat!(
        "Mar  5 10:00:06 web01 php: PHP Fatal error:  Uncaught exception 'RuntimeException' ",
        "with message 'Boom' in /var/www/a.php:10#012Stack trace:",
        "#012#0 /var/www/b.php(20): A->run()",
        "#012#1 /var/www/index.php(5): B->go()",
        "#012#2 {main}#012  thrown in /var/www/a.php on line 10",
    );

    let event = php_event(line);

    assert_eq!(event.content, "RuntimeException: Boom");
    assert_eq!(event.file, "/var/www/a.php");
    assert_eq!(event.line, 10);
    assert_eq!(
        event.frames,
        vec![
            PhpStackFrame {
                number: 0,
                method: "A->run()".to_string(),
                file: "/var/www/b.php".to_string(),
                line: 20,
                ..Default::default()
            },
            PhpStackFrame {
                number: 1,
                method: "B->go()".to_string(),
                file: "/var/www/index.php".to_string(),
                line: 5,
                ..Default::default()
            },
        ]
    );
}

#[test]
fn standalone_frame() {
    let frame = frame(
        "Mar  5 10:00:07 web01 php: PHP   2. Controller->run($request = class Request { }) /var/www/app/Controller.php:45",
    );

    assert_eq!(frame.number, 2);
    assert_eq!(frame.method, "Controller->run");
    assert_eq!(frame.params, "$request = class Request { }");
    assert_eq!(frame.file, "/var/www/app/Controller.php");
    assert_eq!(frame.line, 45);
    assert_eq!(frame.eval_line, None);
}

#[test]
fn standalone_main_frame() {
    let event = event("Mar  5 10:00:07 web01 php: PHP   1. {main}() /var/www/index.php:0");

    assert_eq!(event.category(), "php-stack-trace");

    let EventKind::PhpStackFrame(frame) = event.kind else {
        panic!("expected php stack frame");
    };
    assert_eq!(frame.number, 1);
    assert_eq!(frame.method, "{main}");
    assert_eq!(frame.params, "");
    assert_eq!(frame.line, 0);
}

#[test]
fn eval_frame() {
    let frame = frame(
        "Mar  5 10:00:07 web01 php: PHP   3. include() /var/www/app/Loader.php(17) : eval()'d code:4",
    );

    assert_eq!(frame.number, 3);
    assert_eq!(frame.method, "include()");
    assert_eq!(frame.file, "/var/www/app/Loader.php");
    assert_eq!(frame.line, 17);
    assert_eq!(frame.eval_line, Some(4));
}
