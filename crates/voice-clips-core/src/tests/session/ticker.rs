use crate::{ClipEvent, session::Ticker, tests::support::Harness};

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use tokio::sync::broadcast;

/// WHAT: A running session publishes elapsed displays on each tick
/// WHY: The stopwatch face refreshes while recording
#[tokio::test]
async fn given_recording_session_when_ticker_runs_then_elapsed_published() {
    // Given: A recording session and a ticker
    let harness = Harness::new();
    let mut session = harness.session();
    session.begin().unwrap();
    let generation = session.generation();
    let session = Arc::new(Mutex::new(session));
    let (events, mut rx) = broadcast::channel(16);
    let mut ticker = Ticker::new(Duration::from_millis(5));

    // When: Starting the ticker
    ticker.start(generation, Arc::downgrade(&session), events);

    // Then: An elapsed event arrives
    let event = tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(matches!(event, ClipEvent::ElapsedChanged(_)));
    ticker.cancel();
}

/// WHAT: A stale generation ends the tick loop
/// WHY: Ticks must stop once the interval they belong to is closed
#[tokio::test]
async fn given_paused_session_when_ticker_runs_then_no_events() {
    // Given: A session paused after starting
    let harness = Harness::new();
    let mut session = harness.session();
    session.begin().unwrap();
    let generation = session.generation();
    session.stop().unwrap();
    let session = Arc::new(Mutex::new(session));
    let (events, mut rx) = broadcast::channel(16);
    let mut ticker = Ticker::new(Duration::from_millis(5));

    // When: Starting the ticker with the old generation
    ticker.start(generation, Arc::downgrade(&session), events);
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Then: Nothing was published
    assert!(rx.try_recv().is_err());
}

/// WHAT: Without a runtime the ticker does nothing
/// WHY: Synchronous callers compute the display on request instead
#[test]
fn given_no_runtime_when_starting_ticker_then_no_panic() {
    let harness = Harness::new();
    let session = Arc::new(Mutex::new(harness.session()));
    let (events, _rx) = broadcast::channel(16);
    let mut ticker = Ticker::new(Duration::from_millis(5));

    ticker.start(0, Arc::downgrade(&session), events);
    ticker.cancel();
}
