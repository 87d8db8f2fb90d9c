use thiserror::Error;

use crate::actor_framework::FrameworkError;
use crate::error::ErrorKind;
use crate::product_actor::ProductError;
use crate::storage::StorageError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    #[error("Cart validation error: {0}")]
    InvalidInput(String),
    #[error("Product not found: {0}")]
    ProductNotFound(String),
    #[error("Cart item not found: {0}")]
    ItemNotFound(String),
    #[error("Cart storage failure: {0}")]
    StorageFailure(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl CartError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CartError::InvalidInput(_) => ErrorKind::InvalidInput,
            CartError::ProductNotFound(_) | CartError::ItemNotFound(_) => ErrorKind::NotFound,
            CartError::StorageFailure(_) | CartError::ActorCommunicationError(_) => {
                ErrorKind::StorageFailure
            }
        }
    }
}

impl From<FrameworkError> for CartError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(id) => CartError::ItemNotFound(id),
            other => CartError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl From<StorageError> for CartError {
    fn from(err: StorageError) -> Self {
        CartError::StorageFailure(err.to_string())
    }
}

impl From<ProductError> for CartError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(id) => CartError::ProductNotFound(id),
            ProductError::InvalidInput(msg) => CartError::InvalidInput(msg),
            ProductError::StorageFailure(msg) => CartError::StorageFailure(msg),
            ProductError::ActorCommunicationError(msg) => CartError::ActorCommunicationError(msg),
        }
    }
}
