//! Service layer for the scheduling engine.
//!
//! This module contains the six engine components as service functions over
//! the repository traits: availability resolution, conflict detection, the
//! booking write path, recurring generation, cancellation policy and the
//! template materializer. Each operation is an independent unit of work;
//! reads run fully in parallel, and the write-path atomicity lives in the
//! storage layer.

pub mod availability;
pub mod booking;
pub mod cancellation;
pub mod conflicts;
pub mod materializer;
pub mod payments;
pub mod recurring;

pub use availability::{get_available_slots, legacy_block_covers};
pub use booking::{confirm_booking, create_booking};
pub use cancellation::cancel_booking;
pub use conflicts::check_conflicts;
pub use materializer::process_sync_queue;
pub use payments::{GatewayError, LoggingGateway, PaymentGateway};
pub use recurring::generate_recurring_bookings;
