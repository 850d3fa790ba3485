//! Payment collaborator interface.
//!
//! Refund execution belongs to the external payment processor; the engine
//! only decides whether a refund is owed and hands the instruction over
//! this trait. A gateway failure is non-fatal to cancellation.

use async_trait::async_trait;
use tracing::info;

use crate::api::PaymentId;

/// Error from the external payment processor.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Refund failed for payment {payment_id}: {message}")]
pub struct GatewayError {
    pub payment_id: PaymentId,
    pub message: String,
    /// Timeouts and transient processor errors may be retried by the
    /// reconciliation job; policy rejections may not.
    pub retryable: bool,
}

/// Handle to the external payment processor.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Instruct the processor to refund `amount_cents` of the payment.
    async fn issue_refund(
        &self,
        payment_id: PaymentId,
        amount_cents: i64,
    ) -> Result<(), GatewayError>;
}

/// Gateway that records refund intent in the log and reports success.
///
/// Stands in for the external processor in local wiring; production wiring
/// provides a real client behind the same trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingGateway;

#[async_trait]
impl PaymentGateway for LoggingGateway {
    async fn issue_refund(
        &self,
        payment_id: PaymentId,
        amount_cents: i64,
    ) -> Result<(), GatewayError> {
        info!(
            payment = payment_id.value(),
            amount_cents, "refund instruction issued"
        );
        Ok(())
    }
}
