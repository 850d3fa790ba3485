//! Payment state as seen by the cancellation policy.
//!
//! Capture and refund execution live in the external payment processor;
//! this engine only reads the captured amount to size a refund and records
//! that a refund was issued.

use serde::{Deserialize, Serialize};

use crate::api::PaymentId;

/// Payment lifecycle as relevant to refund decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Authorized,
    Captured,
    Refunded,
}

/// A payment tied to a booking.
///
/// `amount_cents` is the captured amount, which may differ from the
/// booking's nominal price after partial captures or adjustments; refunds
/// always use the captured amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub amount_cents: i64,
    pub status: PaymentStatus,
}

impl Payment {
    /// Whether money was actually captured and not yet returned.
    pub fn is_refundable(&self) -> bool {
        self.status == PaymentStatus::Captured
    }
}
