use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use labdash::poll::Poller;

const PERIOD: Duration = Duration::from_secs(30);

fn counting_poller(count: Arc<AtomicUsize>) -> Poller {
    Poller::spawn(PERIOD, move || {
        let count = count.clone();
        async move {
            count.fetch_add(1, Ordering::SeqCst);
        }
    })
}

async fn settle() {
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn ticks_once_per_period_after_the_first_wait() {
    let count = Arc::new(AtomicUsize::new(0));
    let _poller = counting_poller(count.clone());

    tokio::time::sleep(Duration::from_secs(29)).await;
    settle().await;
    assert_eq!(count.load(Ordering::SeqCst), 0);

    tokio::time::sleep(Duration::from_secs(2)).await;
    settle().await;
    assert_eq!(count.load(Ordering::SeqCst), 1);

    tokio::time::sleep(Duration::from_secs(30)).await;
    settle().await;
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn slow_fetch_does_not_hold_back_the_next_tick() {
    let started = Arc::new(AtomicUsize::new(0));
    let finished = Arc::new(AtomicUsize::new(0));
    let (s, f) = (started.clone(), finished.clone());
    let _poller = Poller::spawn(PERIOD, move || {
        let (s, f) = (s.clone(), f.clone());
        async move {
            s.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_secs(45)).await;
            f.fetch_add(1, Ordering::SeqCst);
        }
    });

    tokio::time::sleep(Duration::from_secs(61)).await;
    settle().await;
    assert_eq!(started.load(Ordering::SeqCst), 2);
    assert_eq!(finished.load(Ordering::SeqCst), 0);

    tokio::time::sleep(Duration::from_secs(15)).await;
    settle().await;
    assert_eq!(finished.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_poller_stops_ticks() {
    let count = Arc::new(AtomicUsize::new(0));
    let poller = counting_poller(count.clone());

    tokio::time::sleep(Duration::from_secs(31)).await;
    settle().await;
    assert!(poller.is_running());
    assert_eq!(count.load(Ordering::SeqCst), 1);

    drop(poller);
    tokio::time::sleep(Duration::from_secs(120)).await;
    settle().await;
    assert_eq!(count.load(Ordering::SeqCst), 1);
}
