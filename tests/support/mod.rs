//! Shared fixtures for integration tests.
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime, Weekday};

use venue_scheduler::api::{PaymentId, RenterId, TemplateId, VenueId};
use venue_scheduler::db::repository::{
    AvailabilityRepository, BookingRepository, NewBooking, PaymentRepository,
};
use venue_scheduler::db::LocalRepository;
use venue_scheduler::models::{
    AvailabilityBlock, BlockSource, Booking, BookingStatus, Payment, PaymentStatus,
    RecurringTemplate, RecurringType, ScheduleMode, Venue,
};

pub fn date(s: &str) -> NaiveDate {
    s.parse().expect("invalid date literal")
}

pub fn time(s: &str) -> NaiveTime {
    s.parse().expect("invalid time literal")
}

pub async fn seed_venue(repo: &LocalRepository, id: i64, mode: ScheduleMode) -> VenueId {
    let venue_id = VenueId::new(id);
    repo.insert_venue(Venue {
        id: venue_id,
        name: format!("Venue {}", id),
        schedule_mode: mode,
    })
    .await
    .expect("insert venue");
    venue_id
}

pub async fn seed_legacy_block(
    repo: &LocalRepository,
    venue_id: VenueId,
    d: &str,
    start: &str,
    end: &str,
) {
    repo.insert_availability_block(AvailabilityBlock {
        venue_id,
        date: date(d),
        start_time: time(start),
        end_time: time(end),
        is_available: true,
        source: BlockSource::Legacy,
    })
    .await
    .expect("insert block");
}

pub async fn seed_template(
    repo: &LocalRepository,
    id: i64,
    venue_id: VenueId,
    weekday: Weekday,
    start: &str,
    end: &str,
    enabled: bool,
) {
    repo.insert_recurring_template(RecurringTemplate {
        id: TemplateId::new(id),
        venue_id,
        weekday,
        start_time: time(start),
        end_time: time(end),
        enabled,
        drop_in_price_cents: None,
    })
    .await
    .expect("insert template");
}

pub async fn seed_booking(
    repo: &LocalRepository,
    venue_id: VenueId,
    d: &str,
    start: &str,
    end: &str,
    status: BookingStatus,
) -> Booking {
    repo.insert_booking(NewBooking {
        venue_id,
        renter_id: RenterId::new(1),
        date: date(d),
        start_time: time(start),
        end_time: time(end),
        status,
        recurring_type: RecurringType::None,
        recurring_end_date: None,
        parent_booking_id: None,
        payment_id: None,
        price_cents: Some(10_000),
    })
    .await
    .expect("insert booking")
}

pub async fn seed_payment(repo: &LocalRepository, id: i64, amount_cents: i64) -> PaymentId {
    let payment_id = PaymentId::new(id);
    repo.insert_payment(Payment {
        id: payment_id,
        amount_cents,
        status: PaymentStatus::Captured,
    })
    .await
    .expect("insert payment");
    payment_id
}
