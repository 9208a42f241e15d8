//! Error types for the employee API
//!
//! Maps handler outcomes onto HTTP status codes using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::{EmployeeId, ErrorResponse};
use crate::store::StoreError;

// == API Error Enum ==
/// Unified error type for the employee handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Request body missing, null, or unparseable
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// No employee with the requested id
    #[error("Employee not found: {0}")]
    NotFound(EmployeeId),

    /// The store raised a fault
    #[error(transparent)]
    Store(#[from] StoreError),
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            // Client errors carry no body
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST.into_response(),
            ApiError::NotFound(_) => StatusCode::NOT_FOUND.into_response(),
            ApiError::Store(err) => {
                tracing::error!("Store failure: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(err.to_string())),
                )
                    .into_response()
            }
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the employee handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
