//! Tests for the in-memory repository's storage-level guarantees.

mod support;

use support::*;

use std::sync::Arc;

use venue_scheduler::api::{RenterId, VenueId};
use venue_scheduler::db::repository::{
    AvailabilityRepository, BookingRepository, NewBooking, SyncQueueRepository,
};
use venue_scheduler::db::LocalRepository;
use venue_scheduler::models::{BlockSource, BookingStatus, RecurringType, ScheduleMode, SyncStatus};

fn new_booking(venue: VenueId, d: &str, start: &str, end: &str) -> NewBooking {
    NewBooking {
        venue_id: venue,
        renter_id: RenterId::new(1),
        date: date(d),
        start_time: time(start),
        end_time: time(end),
        status: BookingStatus::Pending,
        recurring_type: RecurringType::None,
        recurring_end_date: None,
        parent_booking_id: None,
        payment_id: None,
        price_cents: None,
    }
}

#[tokio::test]
async fn test_insert_rejects_overlap_at_storage_level() {
    let repo = LocalRepository::new();
    let venue = VenueId::new(1);
    repo.insert_booking(new_booking(venue, "2026-03-02", "10:00", "12:00"))
        .await
        .unwrap();

    let overlapping = repo
        .insert_booking(new_booking(venue, "2026-03-02", "11:00", "13:00"))
        .await;
    assert!(overlapping.unwrap_err().is_constraint_violation());

    let touching = repo
        .insert_booking(new_booking(venue, "2026-03-02", "12:00", "13:00"))
        .await;
    assert!(touching.is_ok());
}

#[tokio::test]
async fn test_concurrent_overlapping_inserts_only_one_wins() {
    let repo = Arc::new(LocalRepository::new());
    let venue = VenueId::new(1);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let repo = Arc::clone(&repo);
        handles.push(tokio::spawn(async move {
            repo.insert_booking(new_booking(venue, "2026-03-02", "10:00", "12:00"))
                .await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            successes += 1;
        }
    }
    assert_eq!(successes, 1);

    let bookings = repo
        .find_bookings_by_venue_and_date(venue, date("2026-03-02"))
        .await
        .unwrap();
    assert_eq!(bookings.len(), 1);
}

#[tokio::test]
async fn test_cancelled_rows_do_not_block_inserts() {
    let repo = LocalRepository::new();
    let venue = VenueId::new(1);
    let first = repo
        .insert_booking(new_booking(venue, "2026-03-02", "10:00", "12:00"))
        .await
        .unwrap();
    repo.update_booking_status(first.id, BookingStatus::Cancelled)
        .await
        .unwrap();

    let second = repo
        .insert_booking(new_booking(venue, "2026-03-02", "10:00", "12:00"))
        .await;
    assert!(second.is_ok());
}

#[tokio::test]
async fn test_date_range_query_is_inclusive_and_sorted() {
    let repo = LocalRepository::new();
    let venue = VenueId::new(1);
    for (d, s, e) in [
        ("2026-03-04", "10:00", "11:00"),
        ("2026-03-02", "15:00", "16:00"),
        ("2026-03-02", "09:00", "10:00"),
        ("2026-03-06", "09:00", "10:00"),
    ] {
        repo.insert_booking(new_booking(venue, d, s, e)).await.unwrap();
    }

    let rows = repo
        .find_bookings_by_venue_and_date_range(venue, date("2026-03-02"), date("2026-03-04"))
        .await
        .unwrap();
    let keys: Vec<_> = rows.iter().map(|b| (b.date, b.start_time)).collect();
    assert_eq!(
        keys,
        vec![
            (date("2026-03-02"), time("09:00")),
            (date("2026-03-02"), time("15:00")),
            (date("2026-03-04"), time("10:00")),
        ]
    );
}

#[tokio::test]
async fn test_replace_window_preserves_legacy_rows() {
    let repo = LocalRepository::new();
    let venue = seed_venue(&repo, 1, ScheduleMode::Template).await;
    seed_legacy_block(&repo, venue, "2026-03-02", "09:00", "17:00").await;

    repo.replace_materialized_window(venue, date("2026-03-01"), date("2026-03-31"), vec![])
        .await
        .unwrap();

    let legacy = repo
        .find_availability_blocks(
            venue,
            date("2026-03-01"),
            date("2026-03-31"),
            BlockSource::Legacy,
        )
        .await
        .unwrap();
    assert_eq!(legacy.len(), 1);
}

#[tokio::test]
async fn test_replace_window_scoped_to_venue_and_range() {
    let repo = LocalRepository::new();
    let venue_a = VenueId::new(1);
    let venue_b = VenueId::new(2);

    let row = |venue, d: &str| venue_scheduler::models::AvailabilityBlock {
        venue_id: venue,
        date: date(d),
        start_time: time("09:00"),
        end_time: time("17:00"),
        is_available: true,
        source: BlockSource::Template,
    };
    repo.insert_availability_block(row(venue_a, "2026-03-02")).await.unwrap();
    repo.insert_availability_block(row(venue_a, "2026-05-01")).await.unwrap();
    repo.insert_availability_block(row(venue_b, "2026-03-02")).await.unwrap();

    // Overwrite venue A's March window with nothing.
    repo.replace_materialized_window(venue_a, date("2026-03-01"), date("2026-03-31"), vec![])
        .await
        .unwrap();

    let a_rows = repo
        .find_availability_blocks(
            venue_a,
            date("2026-01-01"),
            date("2026-12-31"),
            BlockSource::Template,
        )
        .await
        .unwrap();
    assert_eq!(a_rows.len(), 1);
    assert_eq!(a_rows[0].date, date("2026-05-01"));

    let b_rows = repo
        .find_availability_blocks(
            venue_b,
            date("2026-01-01"),
            date("2026-12-31"),
            BlockSource::Template,
        )
        .await
        .unwrap();
    assert_eq!(b_rows.len(), 1);
}

#[tokio::test]
async fn test_claim_skips_venue_already_processing() {
    let repo = LocalRepository::new();
    let venue = VenueId::new(1);
    repo.enqueue_sync(venue).await.unwrap();

    let first = repo.claim_pending_entries(10).await.unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].status, SyncStatus::Processing);

    // Same venue requests again while the first claim is in flight.
    repo.enqueue_sync(venue).await.unwrap();
    let second = repo.claim_pending_entries(10).await.unwrap();
    assert!(second.is_empty());

    // Once released, the venue can be claimed again.
    repo.mark_done(first[0].id).await.unwrap();
    let third = repo.claim_pending_entries(10).await.unwrap();
    assert_eq!(third.len(), 1);
}

#[tokio::test]
async fn test_claim_orders_oldest_first() {
    let repo = LocalRepository::new();
    let entry_a = repo.enqueue_sync(VenueId::new(3)).await.unwrap();
    let entry_b = repo.enqueue_sync(VenueId::new(1)).await.unwrap();

    let claimed = repo.claim_pending_entries(1).await.unwrap();
    assert_eq!(claimed.len(), 1);
    // Oldest request wins regardless of venue id.
    assert!(claimed[0].id == entry_a.id || entry_a.requested_at == entry_b.requested_at);
}

#[tokio::test]
async fn test_mark_failed_records_error() {
    let repo = LocalRepository::new();
    let entry = repo.enqueue_sync(VenueId::new(1)).await.unwrap();
    repo.claim_pending_entries(1).await.unwrap();
    repo.mark_failed(entry.id, "disk full").await.unwrap();

    let entries = repo.queue_entries();
    assert_eq!(entries[0].status, SyncStatus::Failed);
    assert_eq!(entries[0].last_error.as_deref(), Some("disk full"));
}
