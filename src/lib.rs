//! # Venue Scheduler
//!
//! Availability and conflict scheduling engine for a venue-booking
//! platform.
//!
//! This crate materializes concrete bookable time slots from recurring
//! schedule templates, reconciles base availability against existing
//! bookings, detects time-overlap conflicts on the booking write path,
//! generates recurring booking series, and enforces the cancellation/refund
//! policy.
//!
//! ## Features
//!
//! - **Interval Model**: half-open dated time ranges with exact-boundary
//!   overlap and subtraction semantics
//! - **Template Materializer**: idempotent, queue-driven expansion of
//!   recurring templates into per-date rows within a rolling horizon
//! - **Availability Resolver**: slot splitting of base availability against
//!   non-cancelled bookings (legacy and template sources, single-path)
//! - **Conflict Detector**: pure read-path overlap checks for candidate
//!   bookings
//! - **Recurring Generator**: daily/weekly/monthly series with
//!   skip-on-conflict semantics
//! - **Cancellation Policy**: 48-hour cutoff refund decisions over an
//!   injected clock
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: identifier newtypes and plain-data request/result types
//! - [`models`]: domain value types and the interval algebra
//! - [`db`]: repository traits and the in-memory backend
//! - [`services`]: the engine components as service functions
//! - [`config`]: engine settings from TOML or environment
//! - [`error`]: the engine error taxonomy

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
