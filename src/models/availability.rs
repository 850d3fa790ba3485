//! Availability domain model: venues, base-schedule blocks, recurring
//! templates and the materialization sync queue.
//!
//! A venue's base schedule comes from exactly one source, selected by its
//! [`ScheduleMode`]: hand-authored legacy rows, or rows materialized from a
//! [`RecurringTemplate`] by the background materializer. Materialized rows
//! are disposable and regenerable; they are never a system of record for
//! historical bookings.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::api::{QueueEntryId, TemplateId, VenueId};
use crate::models::interval::TimeInterval;

/// Which base-schedule source is authoritative for a venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleMode {
    Legacy,
    Template,
}

/// Origin of an availability block row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockSource {
    /// Hand-authored explicit row, one per date.
    Legacy,
    /// Generated by the template materializer; disposable.
    Template,
}

impl ScheduleMode {
    /// The block source this mode reads from.
    pub fn block_source(self) -> BlockSource {
        match self {
            Self::Legacy => BlockSource::Legacy,
            Self::Template => BlockSource::Template,
        }
    }
}

/// A bookable venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    pub id: VenueId,
    pub name: String,
    pub schedule_mode: ScheduleMode,
}

/// A base-schedule interval for one venue on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityBlock {
    pub venue_id: VenueId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_available: bool,
    pub source: BlockSource,
}

impl AvailabilityBlock {
    /// The interval this block covers.
    pub fn interval(&self) -> TimeInterval {
        TimeInterval {
            date: self.date,
            start: self.start_time,
            end: self.end_time,
        }
    }
}

/// A venue-scoped weekly recurrence rule for open hours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringTemplate {
    pub id: TemplateId,
    pub venue_id: VenueId,
    pub weekday: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub enabled: bool,
    /// Optional ad-hoc single-session price; carried on materialized rows'
    /// consumers, not interpreted by this engine.
    pub drop_in_price_cents: Option<i64>,
}

impl RecurringTemplate {
    /// Whether this template opens the given date.
    pub fn matches_date(&self, date: NaiveDate) -> bool {
        chrono::Datelike::weekday(&date) == self.weekday
    }
}

/// Materialization request state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Pending,
    Processing,
    Done,
    Failed,
}

/// A queued request to (re-)materialize one venue's template window.
///
/// Invariant: at most one entry per venue is in `Processing` at a time;
/// duplicate pending entries for a venue collapse to the oldest when
/// claimed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncQueueEntry {
    pub id: QueueEntryId,
    pub venue_id: VenueId,
    pub requested_at: DateTime<Utc>,
    pub status: SyncStatus,
    pub last_error: Option<String>,
}
