use chronicle_types::{HybridClock, HybridTimestamp};
use std::sync::Arc;
use std::thread;

#[test]
fn update_is_strictly_increasing() {
    let clock = HybridClock::new();
    let mut prev = clock.update();
    for _ in 0..1000 {
        let next = clock.update();
        assert!(next > prev);
        prev = next;
    }
}

#[test]
fn update_with_exceeds_received() {
    let clock = HybridClock::new();
    let received = HybridTimestamp::new(u64::MAX / 2, 17);
    let next = clock.update_with(&received);
    assert!(next > received);
}

#[test]
fn update_with_exceeds_own_state() {
    let clock = HybridClock::starting_at(HybridTimestamp::new(u64::MAX / 2, 99));
    let before = clock.peek();
    let next = clock.update_with(&HybridTimestamp::new(5, 0));
    assert!(next > before);
}

#[test]
fn peek_does_not_advance() {
    let clock = HybridClock::new();
    let issued = clock.update();
    assert_eq!(clock.peek(), issued);
    assert_eq!(clock.peek(), issued);
}

#[test]
fn starting_at_issues_after_start() {
    let start = HybridTimestamp::new(u64::MAX / 2, 3);
    let clock = HybridClock::starting_at(start);
    assert!(clock.update() > start);
}

#[test]
fn concurrent_updates_never_duplicate() {
    let clock = Arc::new(HybridClock::new());
    let mut handles = Vec::new();
    for _ in 0..8 {
        let clock = Arc::clone(&clock);
        handles.push(thread::spawn(move || {
            (0..500).map(|_| clock.update()).collect::<Vec<_>>()
        }));
    }

    let mut all: Vec<_> = handles
        .into_iter()
        .flat_map(|h| h.join().expect("worker panicked"))
        .collect();
    let total = all.len();
    all.sort();
    all.dedup();
    assert_eq!(all.len(), total, "clock issued a duplicate timestamp");
}
