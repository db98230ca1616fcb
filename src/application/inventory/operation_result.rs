use serde::{Deserialize, Serialize};

use super::errors::InventoryApplicationError;

/// Failure class carried by a failed OperationResult.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    NotFound,
    OutOfStock,
    OutOfRange,
    StoreUnavailable,
}

/// Uniform envelope returned by every inventory operation.
///
/// Callers never see an `Err`: failures come back as `success == false`
/// with a human-readable message and the failure class in `error`.
/// `error` is present exactly when `success` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult<T> {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    payload: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorKind>,
}

impl<T> OperationResult<T> {
    pub fn ok(message: impl Into<String>, payload: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            payload: Some(payload),
            error: None,
        }
    }

    pub fn failed(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            payload: None,
            error: Some(kind),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    pub fn into_payload(self) -> Option<T> {
        self.payload
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error
    }

    /// Convert the payload, keeping status and message.
    pub fn map_payload<U>(self, f: impl FnOnce(T) -> U) -> OperationResult<U> {
        OperationResult {
            success: self.success,
            message: self.message,
            payload: self.payload.map(f),
            error: self.error,
        }
    }
}

impl<T> From<&InventoryApplicationError> for OperationResult<T> {
    fn from(err: &InventoryApplicationError) -> Self {
        Self::failed(err.kind(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Isbn, ValidationError};

    #[test]
    fn test_ok_carries_payload() {
        let result = OperationResult::ok("2 results", vec![1, 2]);
        assert!(result.is_success());
        assert_eq!(result.message(), "2 results");
        assert_eq!(result.payload(), Some(&vec![1, 2]));
        assert_eq!(result.error_kind(), None);
    }

    #[test]
    fn test_from_error_sets_kind_and_message() {
        let err = InventoryApplicationError::OutOfStock(Isbn::parse("111").unwrap());
        let result: OperationResult<()> = OperationResult::from(&err);

        assert!(!result.is_success());
        assert_eq!(result.error_kind(), Some(ErrorKind::OutOfStock));
        assert!(result.message().contains("out of stock"));
        assert!(result.payload().is_none());
    }

    #[test]
    fn test_validation_message_is_human_readable() {
        let err = InventoryApplicationError::from(ValidationError::EmptySearchTerm);
        let result: OperationResult<()> = OperationResult::from(&err);
        assert_eq!(result.message(), "search term must not be empty");
        assert_eq!(result.error_kind(), Some(ErrorKind::Validation));
    }

    #[test]
    fn test_map_payload_keeps_status() {
        let result = OperationResult::ok("done", 21).map_payload(|n| n * 2);
        assert!(result.is_success());
        assert_eq!(result.into_payload(), Some(42));

        let failed: OperationResult<i32> = OperationResult::failed(ErrorKind::NotFound, "missing");
        let mapped = failed.map_payload(|n| n.to_string());
        assert_eq!(mapped.error_kind(), Some(ErrorKind::NotFound));
        assert_eq!(mapped.message(), "missing");
    }

    #[test]
    fn test_serialized_failure_omits_payload() {
        let result: OperationResult<u64> =
            OperationResult::failed(ErrorKind::StoreUnavailable, "down");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": false,
                "message": "down",
                "error": "store_unavailable"
            })
        );
    }
}
