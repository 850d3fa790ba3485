//! Booking domain model.
//!
//! A booking occupies one half-open interval on one date for one venue.
//! Bookings are never physically deleted; cancellation is a status
//! transition, and a cancelled booking stops blocking the schedule.

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::api::{BookingId, PaymentId, RenterId, VenueId};
use crate::models::interval::TimeInterval;

/// Booking lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    /// A booking blocks the schedule unless it has been cancelled.
    pub fn is_blocking(self) -> bool {
        self != Self::Cancelled
    }

    /// Static name used in error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }
}

/// Recurrence pattern for a parent booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurringType {
    None,
    Daily,
    Weekly,
    Monthly,
}

impl RecurringType {
    /// Advance `date` by one recurrence step.
    ///
    /// Monthly recurrence keeps the day-of-month, clamped to the last valid
    /// day when the next month is shorter (Jan 31 -> Feb 28/29). Returns
    /// `None` for [`RecurringType::None`] or when chrono cannot represent
    /// the resulting date.
    pub fn next_date(self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::None => None,
            Self::Daily => date.succ_opt(),
            Self::Weekly => date.checked_add_days(chrono::Days::new(7)),
            Self::Monthly => {
                let (year, month) = if date.month() == 12 {
                    (date.year() + 1, 1)
                } else {
                    (date.year(), date.month() + 1)
                };
                let day = date.day().min(days_in_month(year, month));
                NaiveDate::from_ymd_opt(year, month, day)
            }
        }
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let first = NaiveDate::from_ymd_opt(year, month, 1);
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match (first, next) {
        (Some(first), Some(next)) => next.signed_duration_since(first).num_days() as u32,
        _ => 28,
    }
}

/// A persisted booking row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: BookingId,
    pub venue_id: VenueId,
    pub renter_id: RenterId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: BookingStatus,
    pub recurring_type: RecurringType,
    pub recurring_end_date: Option<NaiveDate>,
    pub parent_booking_id: Option<BookingId>,
    pub payment_id: Option<PaymentId>,
    pub price_cents: Option<i64>,
}

impl Booking {
    /// The interval this booking occupies.
    pub fn interval(&self) -> TimeInterval {
        TimeInterval {
            date: self.date,
            start: self.start_time,
            end: self.end_time,
        }
    }

    /// Whether this booking blocks other bookings on its venue.
    pub fn is_blocking(&self) -> bool {
        self.status.is_blocking()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_daily_step() {
        assert_eq!(
            RecurringType::Daily.next_date(date("2026-03-31")),
            Some(date("2026-04-01"))
        );
    }

    #[test]
    fn test_weekly_step() {
        assert_eq!(
            RecurringType::Weekly.next_date(date("2026-03-02")),
            Some(date("2026-03-09"))
        );
    }

    #[test]
    fn test_monthly_step_same_day() {
        assert_eq!(
            RecurringType::Monthly.next_date(date("2026-03-15")),
            Some(date("2026-04-15"))
        );
    }

    #[test]
    fn test_monthly_step_clamps_to_shorter_month() {
        assert_eq!(
            RecurringType::Monthly.next_date(date("2026-01-31")),
            Some(date("2026-02-28"))
        );
        // Leap year keeps the 29th.
        assert_eq!(
            RecurringType::Monthly.next_date(date("2028-01-31")),
            Some(date("2028-02-29"))
        );
    }

    #[test]
    fn test_monthly_step_year_rollover() {
        assert_eq!(
            RecurringType::Monthly.next_date(date("2026-12-31")),
            Some(date("2027-01-31"))
        );
    }

    #[test]
    fn test_none_has_no_step() {
        assert_eq!(RecurringType::None.next_date(date("2026-03-02")), None);
    }

    #[test]
    fn test_cancelled_is_not_blocking() {
        assert!(BookingStatus::Pending.is_blocking());
        assert!(BookingStatus::Confirmed.is_blocking());
        assert!(BookingStatus::Completed.is_blocking());
        assert!(!BookingStatus::Cancelled.is_blocking());
    }
}
