use application::{DispatchOutcome, InfraredDispatcher};
use domain::LogicalAction;
use infrastructure::{IrConfig, MockTransmitter};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Barrier;
use tokio::time::{Instant, sleep};

fn ir_config(cooldown_ms: u64) -> IrConfig {
    IrConfig {
        cooldown: Duration::from_millis(cooldown_ms),
        signals_dir: PathBuf::from("/opt/amp/signals"),
        ..IrConfig::default()
    }
}

fn dispatcher(mock: &MockTransmitter, cooldown_ms: u64) -> InfraredDispatcher {
    InfraredDispatcher::new(Arc::new(mock.clone()), ir_config(cooldown_ms))
}

#[tokio::test(start_paused = true)]
async fn dispatch_resolves_action_to_request() {
    let mock = MockTransmitter::new();
    let dispatcher = dispatcher(&mock, 120);

    assert_eq!(dispatcher.dispatch(LogicalAction::VolUp), DispatchOutcome::Started);
    dispatcher.drain().await;

    let sent = mock.recorded();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].request.device, "/dev/lirc0");
    assert_eq!(sent[0].request.carrier_hz, 36000);
    assert_eq!(
        sent[0].request.signal_file,
        PathBuf::from("/opt/amp/signals/vol_up.ir")
    );
    assert!(!dispatcher.is_busy());
}

#[tokio::test(start_paused = true)]
async fn second_dispatch_within_busy_window_is_dropped() {
    // cooldown = 1000 ms, transmission = 50 ms
    let mock = MockTransmitter::with_delay(Duration::from_millis(50));
    let dispatcher = dispatcher(&mock, 1000);

    assert_eq!(dispatcher.dispatch(LogicalAction::Power), DispatchOutcome::Started);
    sleep(Duration::from_millis(700)).await;
    assert_eq!(dispatcher.dispatch(LogicalAction::Power), DispatchOutcome::Busy);
    sleep(Duration::from_millis(300)).await;
    assert_eq!(dispatcher.dispatch(LogicalAction::Power), DispatchOutcome::Busy);

    dispatcher.drain().await;
    assert_eq!(mock.invocations(), 1);
    assert_eq!(mock.sent_files(), vec!["power.ir"]);

    // Window over: the transmitter accepts work again
    assert_eq!(dispatcher.dispatch(LogicalAction::Power), DispatchOutcome::Started);
    dispatcher.drain().await;
    assert_eq!(mock.invocations(), 2);
}

#[tokio::test(start_paused = true)]
async fn busy_window_covers_transmission_plus_cooldown() {
    let mock = MockTransmitter::with_delay(Duration::from_millis(50));
    let dispatcher = dispatcher(&mock, 1000);
    let started = Instant::now();

    dispatcher.dispatch(LogicalAction::VolDown);

    sleep(Duration::from_millis(1049)).await;
    assert!(dispatcher.is_busy(), "released before transmission + cooldown");

    while dispatcher.is_busy() {
        sleep(Duration::from_millis(1)).await;
    }
    let window = started.elapsed();
    assert!(window >= Duration::from_millis(1050), "window was {:?}", window);
    assert!(window <= Duration::from_millis(1052), "window was {:?}", window);

    let sent = mock.recorded();
    let finished = sent[0].finished_at.expect("transmission should have finished");
    assert!(started + window >= finished + dispatcher.cooldown());
}

#[tokio::test(start_paused = true)]
async fn failed_transmission_still_holds_cooldown() {
    let mock = MockTransmitter::with_delay(Duration::from_millis(20));
    mock.fail_next(true);
    let dispatcher = dispatcher(&mock, 500);

    assert_eq!(dispatcher.dispatch(LogicalAction::LineCd), DispatchOutcome::Started);
    sleep(Duration::from_millis(100)).await;
    assert!(dispatcher.is_busy());
    assert_eq!(dispatcher.dispatch(LogicalAction::LineCd), DispatchOutcome::Busy);

    sleep(Duration::from_millis(500)).await;
    assert!(!dispatcher.is_busy());
    assert_eq!(mock.invocations(), 1);
}

#[tokio::test(start_paused = true)]
async fn hung_transmission_is_cut_off_by_timeout() {
    let mock = MockTransmitter::with_delay(Duration::from_secs(30));
    let dispatcher = dispatcher(&mock, 200);
    let started = Instant::now();

    dispatcher.dispatch(LogicalAction::Power);
    dispatcher.drain().await;

    // 1500 ms timeout + 200 ms cooldown
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(1700), "elapsed {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(1710), "elapsed {:?}", elapsed);
    assert!(!dispatcher.is_busy());
    assert!(mock.recorded()[0].finished_at.is_none());
}

#[tokio::test(start_paused = true)]
async fn unmapped_and_unknown_actions_are_ignored() {
    let mock = MockTransmitter::new();
    let mut config = ir_config(120);
    config.command_map.remove(LogicalAction::LineTwo);
    let dispatcher = InfraredDispatcher::new(Arc::new(mock.clone()), config);

    assert_eq!(dispatcher.dispatch(LogicalAction::LineTwo), DispatchOutcome::Unmapped);
    assert_eq!(dispatcher.dispatch_named("unknownAction"), DispatchOutcome::Unmapped);
    assert_eq!(dispatcher.dispatch_named(""), DispatchOutcome::Unmapped);
    assert!(!dispatcher.is_busy());

    dispatcher.drain().await;
    assert_eq!(mock.invocations(), 0);
}

#[tokio::test(start_paused = true)]
async fn dispatch_named_uses_wire_names() {
    let mock = MockTransmitter::new();
    let dispatcher = dispatcher(&mock, 10);

    assert_eq!(dispatcher.dispatch_named("linePhono"), DispatchOutcome::Started);
    dispatcher.drain().await;
    assert_eq!(mock.sent_files(), vec!["line_phono.ir"]);
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_cooldown_and_releases_transmitter() {
    let mock = MockTransmitter::with_delay(Duration::from_millis(50));
    let dispatcher = dispatcher(&mock, 60_000);
    let started = Instant::now();

    dispatcher.dispatch(LogicalAction::Power);
    sleep(Duration::from_millis(100)).await;
    assert!(dispatcher.is_busy());

    dispatcher.shutdown().await;

    assert!(!dispatcher.is_busy());
    assert!(started.elapsed() < Duration::from_secs(1), "cooldown was not cancelled");
    assert_eq!(dispatcher.dispatch(LogicalAction::Power), DispatchOutcome::Closed);
    assert_eq!(mock.invocations(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_callers_start_exactly_one_transmission() {
    let mock = MockTransmitter::with_delay(Duration::from_millis(50));
    let dispatcher = Arc::new(dispatcher(&mock, 500));
    let barrier = Arc::new(Barrier::new(16));

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let dispatcher = dispatcher.clone();
            let barrier = barrier.clone();
            tokio::spawn(async move {
                barrier.wait().await;
                dispatcher.dispatch(LogicalAction::VolUp)
            })
        })
        .collect();

    let mut started = 0;
    for handle in handles {
        if handle.await.unwrap() == DispatchOutcome::Started {
            started += 1;
        }
    }

    dispatcher.drain().await;
    assert_eq!(started, 1);
    assert_eq!(mock.invocations(), 1);
}
