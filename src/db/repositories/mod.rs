//! Repository implementations module.
//!
//! The engine treats persistent storage as an external collaborator; the
//! only implementation shipped here is `local`, the in-memory backend used
//! for unit testing and local development. Production SQL backends live
//! behind the same traits, outside this crate.
pub mod local;

pub use local::LocalRepository;
