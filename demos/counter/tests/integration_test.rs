//! Integration tests for the counter demo

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use counter_demo::{CounterAction, CounterReactor, CounterState};
use reactor_rust_runtime::Store;
use reactor_rust_testing::StateRecorder;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(5);

/// One increase delivers the full mutation sequence: loading on, value
/// applied, loading off.
#[tokio::test(start_paused = true)]
async fn increase_walks_through_loading_states() {
    let store = Store::new(CounterReactor::with_step_delay(Duration::from_millis(100)));
    let recorder = StateRecorder::attach(&store);
    recorder.wait_for_with_timeout(1, WAIT).await.unwrap();

    store.send(CounterAction::Increase);
    recorder.wait_for_with_timeout(4, WAIT).await.unwrap();

    assert_eq!(
        recorder.recorded(),
        vec![
            CounterState { value: 0, is_loading: false },
            CounterState { value: 0, is_loading: true },
            CounterState { value: 1, is_loading: true },
            CounterState { value: 1, is_loading: false },
        ]
    );
}

/// Sequential increase/decrease steps land on the expected value.
#[tokio::test(start_paused = true)]
async fn steps_fold_to_the_expected_value() {
    let store = Store::new(CounterReactor::with_step_delay(Duration::ZERO));
    let recorder = StateRecorder::attach(&store);
    recorder.wait_for_with_timeout(1, WAIT).await.unwrap();

    let mut expected = 1;
    for action in [CounterAction::Increase, CounterAction::Increase, CounterAction::Decrease] {
        store.send(action);
        recorder.wait_for_with_timeout(expected * 3 + 1, WAIT).await.unwrap();
        expected += 1;
    }

    assert_eq!(store.current_state(), CounterState { value: 1, is_loading: false });
}
