use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::CallbackResult;
use crate::error::ErrorKind;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum GatewayError {
    #[error("Payment gateway unavailable: {0}")]
    Unavailable(String),
    #[error("Malformed payment callback: {0}")]
    MalformedCallback(String),
}

impl GatewayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::Unavailable(_) => ErrorKind::GatewayUnavailable,
            GatewayError::MalformedCallback(_) => ErrorKind::MalformedCallback,
        }
    }
}

/// Everything a provider needs to open a payment for one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    pub order_id: String,
    /// Amount in minor units (cents).
    pub amount_minor: i64,
    pub subject: String,
}

/// External payment provider, reduced to the two calls the order core needs.
///
/// Implementations translate at the boundary and keep no state about orders.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Provider name reported in a [`PaymentIntent`](crate::domain::PaymentIntent).
    fn provider(&self) -> &str;

    /// Open a payment and return the credential bundle the client completes it with.
    async fn create_payment_intent(
        &self,
        request: &PaymentRequest,
    ) -> Result<BTreeMap<String, String>, GatewayError>;

    /// Decode a provider notification.
    fn parse_callback(&self, payload: &[u8]) -> Result<CallbackResult, GatewayError>;
}
