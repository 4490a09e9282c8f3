use std::num::NonZeroU32;
use std::sync::Arc;

use chrono::NaiveDate;
use futures::future::join_all;

use slotfit::board::BoardManager;
use slotfit::engine::{EngineError, SearchScope};
use slotfit::estimate::{Catalog, OrderLine};
use slotfit::model::*;

// ── Test infrastructure ──────────────────────────────────────

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

fn manager() -> Arc<BoardManager> {
    Arc::new(BoardManager::new(WorkingHours::default(), 0))
}

fn record(date: &str, start: &str, end: &str, label: &str) -> BookingRecord {
    BookingRecord {
        date: date.into(),
        start: start.into(),
        end: end.into(),
        label: label.into(),
    }
}

fn assert_disjoint(bookings: &[Booking]) {
    for (i, a) in bookings.iter().enumerate() {
        for b in &bookings[i + 1..] {
            assert!(
                a.day != b.day || !a.span.overlaps(&b.span),
                "double booking: {a:?} / {b:?}"
            );
        }
    }
}

// ── Tests ────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_searches_never_claim_the_same_slot() {
    let bm = manager();
    let engine = bm.get_or_create("assembly").unwrap();
    let scope = SearchScope::Horizon { start_day: day(), days: 5 };
    let hour = NonZeroU32::new(60).unwrap();

    let tasks = (0..20).map(|i| {
        let engine = engine.clone();
        tokio::spawn(async move { engine.book_next_slot(hour, scope, &format!("Order {i}")).await })
    });
    let results = join_all(tasks).await;

    let booked: Vec<Booking> = results
        .into_iter()
        .map(|r| r.unwrap().unwrap().expect("20 hours fit in 5 days of 9 hours"))
        .collect();
    assert_eq!(booked.len(), 20);
    assert_disjoint(&engine.bookings().await);

    // 9 one-hour slots per day: days 1 and 2 are full, day 3 holds the rest.
    let on_first_day = booked.iter().filter(|b| b.day == day()).count();
    assert_eq!(on_first_day, 9);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_commits_of_one_found_slot_only_one_wins() {
    let bm = manager();
    let engine = bm.get_or_create("assembly").unwrap();
    let scope = SearchScope::Horizon { start_day: day(), days: 1 };
    let slot = engine
        .find_next_slot(NonZeroU32::new(30).unwrap(), scope)
        .await
        .unwrap()
        .unwrap();

    let tasks = (0..8).map(|i| {
        let engine = engine.clone();
        tokio::spawn(async move { engine.commit_slot(slot, &format!("Client {i}")).await })
    });
    let results: Vec<_> = join_all(tasks).await.into_iter().map(|r| r.unwrap()).collect();

    let wins = results.iter().filter(|r| r.is_ok()).count();
    let conflicts = results
        .iter()
        .filter(|r| matches!(r, Err(EngineError::Conflict(_))))
        .count();
    assert_eq!(wins, 1);
    assert_eq!(conflicts, 7);
    assert_eq!(engine.booking_count().await, 1);
}

#[tokio::test]
async fn subscriber_sees_committed_booking() {
    let bm = manager();
    let engine = bm.get_or_create("assembly").unwrap();
    let mut rx = engine.notify.subscribe();

    let skipped = engine
        .replace_from_records(vec![
            record("2025-03-10", "08:00", "12:00", "Line maintenance"),
            record("2025-03-10", "12:00", "", "Broken row"),
        ])
        .await
        .unwrap();
    assert_eq!(skipped.len(), 1);

    let scope = SearchScope::Horizon { start_day: day(), days: 30 };
    let booked = engine
        .book_next_slot(NonZeroU32::new(45).unwrap(), scope, "Montage Poste Client")
        .await
        .unwrap()
        .unwrap();

    match rx.recv().await.unwrap() {
        StoreEvent::StoreReplaced { bookings } => assert_eq!(bookings.len(), 1),
        other => panic!("unexpected event: {other:?}"),
    }
    assert_eq!(
        rx.recv().await.unwrap(),
        StoreEvent::BookingAdded { booking: booked.clone() }
    );
    assert_eq!(booked.to_record().start, "12:00");
    assert_eq!(booked.to_record().end, "12:45");
}

#[tokio::test]
async fn order_estimate_drives_booking() {
    let catalog: Catalog = [("REF-100".to_string(), 20), ("REF-200".to_string(), 35)]
        .into_iter()
        .collect();
    let estimate = catalog.estimate(&[
        OrderLine { reference: "REF-100".into(), quantity: 3 },
        OrderLine { reference: "REF-200".into(), quantity: 2 },
        OrderLine { reference: "REF-999".into(), quantity: 1 },
    ]);
    assert_eq!(estimate.total_minutes, 130);
    assert_eq!(estimate.issues.len(), 1);

    let bm = manager();
    let engine = bm.get_or_create("assembly").unwrap();
    engine
        .add_booking(day(), Span::new(8 * 60, 15 * 60), "Morning run")
        .await
        .unwrap();

    let scope = SearchScope::Horizon { start_day: day(), days: 30 };
    let booked = engine
        .book_next_slot(estimate.duration().unwrap(), scope, "Order 42")
        .await
        .unwrap()
        .unwrap();
    // 15:00-17:00 holds 120 minutes, not 130.
    assert_eq!(booked.day, day().succ_opt().unwrap());
    assert_eq!(booked.span, Span::new(8 * 60, 8 * 60 + 130));
}
