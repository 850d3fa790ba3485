//! Storage boundary of the scheduling engine.
//!
//! This module provides abstractions for storage operations via the
//! Repository pattern, allowing different backends to be swapped easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (HTTP API, batch worker)             │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services/) - Scheduling Logic           │
//! │  - Availability resolution & slot splitting             │
//! │  - Conflict detection & booking writes                  │
//! │  - Materialization & cancellation policy                │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/) - Abstract Interface   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌──────────────────────────────────────────────┐
//!     │             Local Repository                  │
//!     │               (in-memory)                     │
//!     └──────────────────────────────────────────────┘
//! ```
//!
//! The module includes:
//! - `repository`: trait definitions and `RepositoryError`
//! - `repositories::local`: in-memory implementation for unit testing and
//!   local development
//! - `factory`: factory for creating repository instances

#[cfg(not(feature = "local-repo"))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repositories;
pub mod repository;

pub use factory::{RepositoryFactory, RepositoryType};
pub use repositories::LocalRepository;
pub use repository::{
    AvailabilityRepository, BookingRepository, ErrorContext, FullRepository, NewBooking,
    PaymentRepository, RepositoryError, RepositoryResult, SyncQueueRepository,
};
