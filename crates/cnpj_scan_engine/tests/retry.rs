use std::cell::Cell;
use std::sync::Mutex;
use std::time::Duration;

use cnpj_scan_engine::{retry_with_backoff, NullStatusSink, RetryPolicy, StatusSink};
use pretty_assertions::assert_eq;
use tokio::time::Instant;

#[derive(Default)]
struct RecordingSink {
    lines: Mutex<Vec<String>>,
}

impl StatusSink for RecordingSink {
    fn status(&self, text: String) {
        self.lines.lock().unwrap().push(text);
    }
}

fn policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        base_delay: Duration::from_millis(1000),
    }
}

#[tokio::test(start_paused = true)]
async fn always_failing_operation_runs_exactly_max_attempts() {
    let calls = Cell::new(0);
    let sink = RecordingSink::default();

    let result: Result<(), String> = retry_with_backoff(&policy(3), &sink, |attempt| {
        calls.set(calls.get() + 1);
        async move { Err(format!("boom {attempt}")) }
    })
    .await;

    assert_eq!(result, Err("boom 3".to_string()));
    assert_eq!(calls.get(), 3);
    assert_eq!(
        *sink.lines.lock().unwrap(),
        vec!["Attempt 2 of 3...".to_string(), "Attempt 3 of 3...".to_string()]
    );
}

#[tokio::test(start_paused = true)]
async fn backoff_grows_linearly() {
    let start = Instant::now();
    let _: Result<(), &str> =
        retry_with_backoff(&policy(3), &NullStatusSink, |_| async { Err("down") }).await;
    // 1s after the first failure, 2s after the second.
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(3000), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(3100), "{elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn success_after_one_failure_stops_retrying() {
    let calls = Cell::new(0);
    let result: Result<&str, &str> = retry_with_backoff(&policy(3), &NullStatusSink, |attempt| {
        calls.set(calls.get() + 1);
        async move {
            if attempt == 1 {
                Err("flaky")
            } else {
                Ok("done")
            }
        }
    })
    .await;

    assert_eq!(result, Ok("done"));
    assert_eq!(calls.get(), 2);
}

#[tokio::test(start_paused = true)]
async fn zero_attempts_still_tries_once() {
    let calls = Cell::new(0);
    let start = Instant::now();
    let result: Result<(), &str> = retry_with_backoff(&policy(0), &NullStatusSink, |_| {
        calls.set(calls.get() + 1);
        async { Err("nope") }
    })
    .await;

    assert!(result.is_err());
    assert_eq!(calls.get(), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
}
