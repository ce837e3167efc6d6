use crate::common::validation::ValidationErrors;
use crate::error::AppError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Standard API response envelope
///
/// Every endpoint answers with the same shape:
/// `{ message, success, data?, error?, stack? }`.
///
/// # Example
/// ```
/// use axum::http::StatusCode;
/// use bike_shop::common::ApiResponse;
///
/// let response = ApiResponse::success(StatusCode::OK, "Bike retrieved successfully", 42);
/// assert!(response.success);
///
/// let missing: ApiResponse<()> = ApiResponse::not_found("Bike not found");
/// assert_eq!(missing.http_status, StatusCode::NOT_FOUND);
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub message: String,

    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,

    #[serde(skip)]
    pub http_status: StatusCode,
}

/// The `error` object of a failure envelope
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
}

impl From<&AppError> for ApiError {
    /// Validation failures carry their field map, everything else its message.
    fn from(err: &AppError) -> Self {
        match err.field_errors() {
            Some(errors) => ApiError {
                name: err.name().to_string(),
                message: None,
                errors: Some(errors.clone()),
            },
            None => ApiError {
                name: err.name().to_string(),
                message: Some(err.to_string()),
                errors: None,
            },
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(status: StatusCode, message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            success: true,
            data: Some(data),
            error: None,
            stack: None,
            http_status: status,
        }
    }

    /// A 404 carrying only the message
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
            data: None,
            error: None,
            stack: None,
            http_status: StatusCode::NOT_FOUND,
        }
    }

    /// A failure envelope describing `err`, including its debug trace
    pub fn failure(status: StatusCode, message: impl Into<String>, err: &AppError) -> Self {
        Self {
            message: message.into(),
            success: false,
            data: None,
            error: Some(ApiError::from(err)),
            stack: Some(format!("Error: Something went wrong! \n {:?}", err)),
            http_status: status,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.http_status, Json(self)).into_response()
    }
}
