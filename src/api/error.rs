use crate::application::inventory::{ErrorKind, OperationResult};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// HTTP status for a failure class.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        // 400 Bad Request - malformed input
        ErrorKind::Validation => StatusCode::BAD_REQUEST,

        // 404 Not Found - unknown ISBN
        ErrorKind::NotFound => StatusCode::NOT_FOUND,

        // 409 Conflict - the entry's current state forbids the operation
        ErrorKind::OutOfStock => StatusCode::CONFLICT,

        // 422 Unprocessable Entity - count would leave the storable range
        ErrorKind::OutOfRange => StatusCode::UNPROCESSABLE_ENTITY,

        // 503 Service Unavailable - storage failure; already logged by the service
        ErrorKind::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// An OperationResult rendered as JSON with a status derived from it.
///
/// The body is the serialized OperationResult in every case, so clients
/// read `success`/`message` the same way for successes and failures.
#[derive(Debug)]
pub struct ApiResponse<T> {
    success_status: StatusCode,
    result: OperationResult<T>,
}

impl<T> ApiResponse<T> {
    pub fn new(result: OperationResult<T>) -> Self {
        Self {
            success_status: StatusCode::OK,
            result,
        }
    }

    /// Use `status` instead of 200 when the operation succeeds.
    pub fn with_success_status(mut self, status: StatusCode) -> Self {
        self.success_status = status;
        self
    }

    pub fn status(&self) -> StatusCode {
        match self.result.error_kind() {
            None => self.success_status,
            Some(kind) => status_for(kind),
        }
    }
}

impl<T> From<OperationResult<T>> for ApiResponse<T> {
    fn from(result: OperationResult<T>) -> Self {
        Self::new(result)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(self.result)).into_response()
    }
}
