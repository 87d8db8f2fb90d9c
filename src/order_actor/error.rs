use thiserror::Error;

use crate::actor_framework::FrameworkError;
use crate::domain::OrderStatus;
use crate::error::ErrorKind;
use crate::payment::GatewayError;
use crate::product_actor::ProductError;
use crate::storage::StorageError;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Order validation error: {0}")]
    InvalidInput(String),
    #[error("Product not found: {0}")]
    ProductNotFound(String),
    #[error("Order not found: {0}")]
    OrderNotFound(String),
    #[error("Illegal order transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
    #[error("Order {order_id} cannot be paid in status {status}")]
    NotPayable {
        order_id: String,
        status: OrderStatus,
    },
    #[error("Payment gateway unavailable: {0}")]
    GatewayUnavailable(String),
    #[error("Malformed payment callback: {0}")]
    MalformedCallback(String),
    #[error("Order storage failure: {0}")]
    StorageFailure(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl OrderError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrderError::InvalidInput(_) => ErrorKind::InvalidInput,
            OrderError::ProductNotFound(_) | OrderError::OrderNotFound(_) => ErrorKind::NotFound,
            OrderError::InvalidTransition { .. } | OrderError::NotPayable { .. } => {
                ErrorKind::InvalidTransition
            }
            OrderError::GatewayUnavailable(_) => ErrorKind::GatewayUnavailable,
            OrderError::MalformedCallback(_) => ErrorKind::MalformedCallback,
            OrderError::StorageFailure(_) | OrderError::ActorCommunicationError(_) => {
                ErrorKind::StorageFailure
            }
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }
}

impl From<FrameworkError> for OrderError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(id) => OrderError::OrderNotFound(id),
            other => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl From<StorageError> for OrderError {
    fn from(err: StorageError) -> Self {
        OrderError::StorageFailure(err.to_string())
    }
}

impl From<ProductError> for OrderError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => OrderError::ProductNotFound(id),
            ProductError::InvalidInput(msg) => OrderError::InvalidInput(msg),
            ProductError::StorageFailure(msg) => OrderError::StorageFailure(msg),
            ProductError::ActorCommunicationError(msg) => OrderError::ActorCommunicationError(msg),
        }
    }
}

impl From<GatewayError> for OrderError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Unavailable(msg) => OrderError::GatewayUnavailable(msg),
            GatewayError::MalformedCallback(msg) => OrderError::MalformedCallback(msg),
        }
    }
}
