use crate::domain::{Isbn, ValidationError};
use crate::ports::StoreError;
use thiserror::Error;

use super::operation_result::ErrorKind;

/// Inventory application-layer error
#[derive(Debug, Error)]
pub enum InventoryApplicationError {
    /// Malformed input, rejected before reaching the store
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("no book with ISBN {0}")]
    NotFound(Isbn),

    /// Lend requested while no copy is left
    #[error("book {0} is out of stock")]
    OutOfStock(Isbn),

    /// Copy count would exceed the storable maximum
    #[error("copy count for book {0} would exceed the maximum")]
    OutOfRange(Isbn),

    #[error("inventory store unavailable")]
    StoreUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl InventoryApplicationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            InventoryApplicationError::Validation(_) => ErrorKind::Validation,
            InventoryApplicationError::NotFound(_) => ErrorKind::NotFound,
            InventoryApplicationError::OutOfStock(_) => ErrorKind::OutOfStock,
            InventoryApplicationError::OutOfRange(_) => ErrorKind::OutOfRange,
            InventoryApplicationError::StoreUnavailable(_) => ErrorKind::StoreUnavailable,
        }
    }
}

impl From<StoreError> for InventoryApplicationError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(isbn) => InventoryApplicationError::NotFound(isbn),
            StoreError::OutOfRange(isbn) => InventoryApplicationError::OutOfRange(isbn),
            StoreError::Unavailable(source) => InventoryApplicationError::StoreUnavailable(source),
            // add_or_merge absorbs duplicates; anywhere else a duplicate
            // means the store broke its contract.
            StoreError::DuplicateKey(isbn) => InventoryApplicationError::StoreUnavailable(Box::new(
                StoreError::DuplicateKey(isbn),
            )),
        }
    }
}

/// Application-layer Result type
pub type Result<T> = std::result::Result<T, InventoryApplicationError>;
