//! End-to-end connection lifecycle scenarios against scripted collaborators.

use jfr_rs::testing::{
    CloseCounter, FakeSession, ManualClock, OpenOutcome, RecordingListener, RecordingSink,
    ScriptedTransport, StaticFactory,
};
use jfr_rs::{ConnectOptions, Connector, Error, RETRY_DELAY};
use jfr_runtime::{Clock, StatusSink, Transport};
use std::sync::Arc;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

#[tokio::test]
async fn connects_after_two_failures_and_reports_them() {
    init_tracing();

    let closes = CloseCounter::new();
    let transport = ScriptedTransport::new(vec![
        OpenOutcome::fail("connection refused"),
        OpenOutcome::fail("connection refused"),
        OpenOutcome::session(FakeSession::live(closes.clone())),
    ]);
    let clock = ManualClock::new(0);
    let sink = RecordingSink::new();

    let connector = Connector::new(
        Arc::clone(&transport) as Arc<dyn Transport>,
        StaticFactory::supported(),
    )
    .with_clock(Arc::clone(&clock) as Arc<dyn Clock>)
    .with_sink(Arc::clone(&sink) as Arc<dyn StatusSink>)
    .with_options(ConnectOptions::new().with_max_retry(3));

    let connection = connector
        .connect("localhost", 9091)
        .await
        .expect("third attempt succeeds");

    assert_eq!(connection.port(), 9091);
    assert_eq!(connection.host(), "localhost");
    assert_eq!(
        connection.url().as_str(),
        "service:jmx:rmi:///jndi/rmi://localhost:9091/jmxrmi"
    );

    let lines = sink.lines();
    assert!(lines.contains(&"Connection attempt 1 failed.".to_string()));
    assert!(lines.contains(&"Connection attempt 2 failed.".to_string()));
    assert!(!lines.iter().any(|line| line.contains("Aborting")));
    assert_eq!(clock.sleeps(), vec![RETRY_DELAY, RETRY_DELAY]);

    // Handle and service are present and consistent with the same session.
    let handle = connection.handle();
    assert_eq!(handle.display_name(), "localhost:9091");
    let _service = connection.service();

    drop(connection);
    assert_eq!(closes.count(), 1, "scope exit closes the session once");
}

#[tokio::test]
async fn unreachable_host_surfaces_the_transport_error() {
    init_tracing();

    let transport = ScriptedTransport::new(vec![OpenOutcome::fail("unknown host")]);
    let sink = RecordingSink::new();

    let connector = Connector::new(
        Arc::clone(&transport) as Arc<dyn Transport>,
        StaticFactory::supported(),
    )
    .with_clock(ManualClock::new(0))
    .with_sink(Arc::clone(&sink) as Arc<dyn StatusSink>)
    .with_options(ConnectOptions::new().with_max_retry(1));

    let err = connector
        .connect("unreachable.example", 9091)
        .await
        .expect_err("transport always fails");

    match err {
        Error::RetriesExhausted { attempts, source } => {
            assert_eq!(attempts, 1);
            assert_eq!(
                source.to_string(),
                "Failed to open management session: unknown host"
            );
        }
        other => panic!("expected RetriesExhausted, got {other:?}"),
    }

    assert_eq!(transport.open_calls(), 1);
    assert_eq!(
        sink.lines().last().map(String::as_str),
        Some("Too many failed connections. Aborting.")
    );
}

#[tokio::test]
async fn explicit_disconnect_notifies_listeners_and_closes_once() {
    init_tracing();

    let closes = CloseCounter::new();
    let transport = ScriptedTransport::new(vec![OpenOutcome::session(FakeSession::live(
        closes.clone(),
    ))]);

    let connector = Connector::new(transport, StaticFactory::supported())
        .with_clock(ManualClock::new(0))
        .with_sink(RecordingSink::new());

    let connection = connector.connect("localhost", 9091).await.unwrap();
    let handle = connection.handle();
    let listener = RecordingListener::new();
    handle.add_listener(listener.clone());

    connection.disconnect();

    assert_eq!(closes.count(), 1);
    assert_eq!(listener.closings(), 1);
    // The handle outlives the connection without re-closing the session.
    drop(handle);
    assert_eq!(closes.count(), 1);
}

#[tokio::test]
async fn server_time_estimate_uses_caller_clock() {
    init_tracing();

    let transport = ScriptedTransport::new(vec![OpenOutcome::session(FakeSession::with_skew(
        CloseCounter::new(),
        1_500,
    ))]);
    let clock = ManualClock::new(10_000);

    let connector = Connector::new(transport, StaticFactory::supported())
        .with_clock(Arc::clone(&clock) as Arc<dyn Clock>)
        .with_sink(RecordingSink::new());

    let connection = connector.connect("localhost", 9091).await.unwrap();

    let first = connection.approximate_server_time(clock.as_ref());
    clock.advance(250);
    let second = connection.approximate_server_time(clock.as_ref());

    assert_eq!(first, 11_500);
    assert_eq!(second, 11_750);
}
