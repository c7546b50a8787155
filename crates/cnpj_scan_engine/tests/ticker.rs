use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cnpj_scan_engine::Ticker;
use tokio::runtime::Handle;

fn counter() -> (Arc<AtomicUsize>, impl Fn() + Send + 'static) {
    let count = Arc::new(AtomicUsize::new(0));
    let inner = count.clone();
    (count, move || {
        inner.fetch_add(1, Ordering::SeqCst);
    })
}

#[tokio::test(start_paused = true)]
async fn ticks_once_per_interval() {
    let mut ticker = Ticker::new(Handle::current());
    let (count, on_tick) = counter();

    ticker.start(Duration::from_millis(300), on_tick);
    assert!(ticker.is_running());
    tokio::time::sleep(Duration::from_millis(950)).await;

    assert_eq!(count.load(Ordering::SeqCst), 3);
    ticker.stop();
}

#[tokio::test(start_paused = true)]
async fn restarting_replaces_the_previous_task() {
    let mut ticker = Ticker::new(Handle::current());
    let (first, first_tick) = counter();
    let (second, second_tick) = counter();

    ticker.start(Duration::from_millis(10), first_tick);
    ticker.start(Duration::from_millis(10), second_tick);
    tokio::time::sleep(Duration::from_millis(55)).await;

    assert_eq!(ticker.live_tasks(), 1);
    assert_eq!(first.load(Ordering::SeqCst), 0);
    assert!(second.load(Ordering::SeqCst) >= 4);
}

#[tokio::test(start_paused = true)]
async fn stop_releases_the_task_and_is_idempotent() {
    let mut ticker = Ticker::new(Handle::current());
    let (count, on_tick) = counter();

    ticker.start(Duration::from_millis(10), on_tick);
    tokio::time::sleep(Duration::from_millis(25)).await;
    ticker.stop();
    ticker.stop();
    let seen = count.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert!(!ticker.is_running());
    assert_eq!(ticker.live_tasks(), 0);
    assert_eq!(count.load(Ordering::SeqCst), seen);
}

#[tokio::test(start_paused = true)]
async fn stop_on_a_due_tick_delivers_nothing_more() {
    let mut ticker = Ticker::new(Handle::current());
    let (count, on_tick) = counter();

    ticker.start(Duration::from_millis(10), on_tick);
    // Wakes exactly when the second tick is due.
    tokio::time::sleep(Duration::from_millis(20)).await;
    let seen = count.load(Ordering::SeqCst);
    ticker.stop();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(count.load(Ordering::SeqCst), seen);
    assert_eq!(ticker.live_tasks(), 0);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_ticker_stops_it() {
    let (count, on_tick) = counter();
    {
        let mut ticker = Ticker::new(Handle::current());
        ticker.start(Duration::from_millis(10), on_tick);
    }
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(count.load(Ordering::SeqCst), 0);
}
