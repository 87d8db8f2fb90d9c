//! Applies gateway notifications to orders.
//!
//! Gateways redeliver until they get an acknowledgement, so every outcome except a
//! malformed payload or an unknown order is reported as success.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument, warn};

use super::PaymentGateway;
use crate::clients::OrderClient;
use crate::domain::OrderStatus;
use crate::order_actor::{OrderError, TransitionOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ReconcileOutcome {
    /// The order moved from `PENDING_PAYMENT` to `PAID`.
    Confirmed,
    /// Redelivery; the order had already been paid.
    AlreadyConfirmed { status: OrderStatus },
    /// The provider reported a failed payment. The order is untouched.
    PaymentFailed,
    /// Money arrived for an order that can no longer be paid. Needs a manual refund.
    Rejected { status: OrderStatus },
}

pub struct PaymentReconciler {
    gateway: Arc<dyn PaymentGateway>,
    orders: OrderClient,
}

impl PaymentReconciler {
    pub fn new(gateway: Arc<dyn PaymentGateway>, orders: OrderClient) -> Self {
        Self { gateway, orders }
    }

    #[instrument(name = "payment_callback", skip(self, payload), fields(provider = self.gateway.provider(), bytes = payload.len()))]
    pub async fn handle_callback(&self, payload: &[u8]) -> Result<ReconcileOutcome, OrderError> {
        let callback = self.gateway.parse_callback(payload).inspect_err(|e| {
            warn!(error = %e, "Rejected callback payload");
        })?;
        let order_id = callback.order_id;

        if !callback.success {
            info!(%order_id, "Payment failed, order left unchanged");
            return Ok(ReconcileOutcome::PaymentFailed);
        }

        match self.orders.mark_paid(&order_id).await {
            Ok(TransitionOutcome::Applied { .. }) => {
                info!(%order_id, "Payment confirmed");
                Ok(ReconcileOutcome::Confirmed)
            }
            Ok(TransitionOutcome::Unchanged { status }) => {
                info!(%order_id, %status, "Duplicate payment callback");
                Ok(ReconcileOutcome::AlreadyConfirmed { status })
            }
            Err(OrderError::InvalidTransition { from, .. }) => {
                warn!(%order_id, status = %from, "Payment received for unpayable order, refund required");
                Ok(ReconcileOutcome::Rejected { status: from })
            }
            Err(e) => Err(e),
        }
    }
}
