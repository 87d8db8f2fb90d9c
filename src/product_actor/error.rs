use thiserror::Error;

use crate::actor_framework::FrameworkError;
use crate::error::ErrorKind;
use crate::storage::StorageError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(String),
    #[error("Product validation error: {0}")]
    InvalidInput(String),
    #[error("Product storage failure: {0}")]
    StorageFailure(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl ProductError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProductError::NotFound(_) => ErrorKind::NotFound,
            ProductError::InvalidInput(_) => ErrorKind::InvalidInput,
            ProductError::StorageFailure(_) | ProductError::ActorCommunicationError(_) => {
                ErrorKind::StorageFailure
            }
        }
    }
}

impl From<FrameworkError> for ProductError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(id) => ProductError::NotFound(id),
            other => ProductError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl From<StorageError> for ProductError {
    fn from(err: StorageError) -> Self {
        ProductError::StorageFailure(err.to_string())
    }
}
