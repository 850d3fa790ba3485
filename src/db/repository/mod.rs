//! Repository traits: the storage boundary of the scheduling engine.
//!
//! Persistent storage is an external collaborator. The engine only assumes
//! these interfaces, split per concern; `FullRepository` ties them together
//! for callers that need the whole store. Implementations must be
//! `Send + Sync` and are expected to provide at least read-committed
//! isolation.

pub mod error;

use async_trait::async_trait;
use chrono::NaiveDate;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use crate::api::{BookingId, PaymentId, QueueEntryId, VenueId};
use crate::models::{
    AvailabilityBlock, BlockSource, Booking, BookingStatus, Payment, RecurringTemplate,
    SyncQueueEntry, Venue,
};

/// A booking row as submitted for insertion; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub venue_id: VenueId,
    pub renter_id: crate::api::RenterId,
    pub date: NaiveDate,
    pub start_time: chrono::NaiveTime,
    pub end_time: chrono::NaiveTime,
    pub status: BookingStatus,
    pub recurring_type: crate::models::RecurringType,
    pub recurring_end_date: Option<NaiveDate>,
    pub parent_booking_id: Option<BookingId>,
    pub payment_id: Option<PaymentId>,
    pub price_cents: Option<i64>,
}

/// Repository trait for booking storage.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Fetch all bookings for a venue whose date falls in `[from, to]`.
    async fn find_bookings_by_venue_and_date_range(
        &self,
        venue_id: VenueId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepositoryResult<Vec<Booking>>;

    /// Fetch all bookings for a venue on one date.
    async fn find_bookings_by_venue_and_date(
        &self,
        venue_id: VenueId,
        date: NaiveDate,
    ) -> RepositoryResult<Vec<Booking>>;

    /// Fetch a booking by id.
    async fn find_booking_by_id(&self, id: BookingId) -> RepositoryResult<Option<Booking>>;

    /// Insert a booking atomically.
    ///
    /// The store re-checks the no-overlap invariant against non-cancelled
    /// bookings under its own write serialization and rejects the insert
    /// with [`RepositoryError::ConstraintViolation`] when a concurrent
    /// writer won the slot. The caller's pre-flight conflict check is
    /// optimistically racing against this.
    async fn insert_booking(&self, booking: NewBooking) -> RepositoryResult<Booking>;

    /// Update a booking's status, returning the updated row.
    async fn update_booking_status(
        &self,
        id: BookingId,
        status: BookingStatus,
    ) -> RepositoryResult<Booking>;
}

/// Repository trait for venues, base-schedule blocks and templates.
#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    /// Fetch a venue by id.
    async fn find_venue_by_id(&self, venue_id: VenueId) -> RepositoryResult<Option<Venue>>;

    /// Fetch availability blocks from one source for a venue in `[from, to]`.
    async fn find_availability_blocks(
        &self,
        venue_id: VenueId,
        from: NaiveDate,
        to: NaiveDate,
        source: BlockSource,
    ) -> RepositoryResult<Vec<AvailabilityBlock>>;

    /// Fetch all recurring templates for a venue.
    async fn find_recurring_templates(
        &self,
        venue_id: VenueId,
    ) -> RepositoryResult<Vec<RecurringTemplate>>;

    /// Replace every materialized (template-sourced) block for a venue in
    /// `[from, to]` with `rows`, as one atomic swap. Returns the number of
    /// rows written. Legacy rows are untouched.
    async fn replace_materialized_window(
        &self,
        venue_id: VenueId,
        from: NaiveDate,
        to: NaiveDate,
        rows: Vec<AvailabilityBlock>,
    ) -> RepositoryResult<usize>;

    /// Insert a venue (fixtures and admin tooling).
    async fn insert_venue(&self, venue: Venue) -> RepositoryResult<()>;

    /// Insert an availability block (fixtures and admin tooling).
    async fn insert_availability_block(&self, block: AvailabilityBlock) -> RepositoryResult<()>;

    /// Insert a recurring template (fixtures and admin tooling).
    async fn insert_recurring_template(
        &self,
        template: RecurringTemplate,
    ) -> RepositoryResult<()>;
}

/// Repository trait for the materialization sync queue.
#[async_trait]
pub trait SyncQueueRepository: Send + Sync {
    /// Enqueue a materialization request for a venue.
    async fn enqueue_sync(&self, venue_id: VenueId) -> RepositoryResult<SyncQueueEntry>;

    /// Claim up to `limit` pending entries and mark them `Processing`.
    ///
    /// Entries are claimed oldest first with venue id as tie-break. At most
    /// one entry per venue is returned per claim; a venue that already has
    /// an entry in `Processing` is skipped so per-venue materialization
    /// stays serialized.
    async fn claim_pending_entries(&self, limit: usize) -> RepositoryResult<Vec<SyncQueueEntry>>;

    /// Mark a claimed entry as successfully processed.
    async fn mark_done(&self, id: QueueEntryId) -> RepositoryResult<()>;

    /// Mark a claimed entry as failed, recording the error for retry.
    async fn mark_failed(&self, id: QueueEntryId, error: &str) -> RepositoryResult<()>;
}

/// Repository trait for payment records.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Fetch a payment by id.
    async fn find_payment_by_id(&self, id: PaymentId) -> RepositoryResult<Option<Payment>>;

    /// Insert a payment (fixtures and capture webhooks).
    async fn insert_payment(&self, payment: Payment) -> RepositoryResult<()>;

    /// Record that a payment was refunded.
    async fn mark_payment_refunded(&self, id: PaymentId) -> RepositoryResult<()>;
}

/// Convenience supertrait for callers that need the whole store.
pub trait FullRepository:
    BookingRepository + AvailabilityRepository + SyncQueueRepository + PaymentRepository
{
}

impl<T> FullRepository for T where
    T: BookingRepository + AvailabilityRepository + SyncQueueRepository + PaymentRepository
{
}
