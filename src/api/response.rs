//! Response types for the claim service.
//!
//! Errors are returned as a JSON [`ApiError`] body; [`ApiErrorResponse`]
//! pairs the body with its status code.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::ClaimError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a missing field error response.
    pub fn missing_field(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::with_details(
            "MISSING_FIELD",
            format!("missing field: {}", field),
            format!("Required value '{}' was not provided in the request", field),
        )
    }

    /// Creates a missing header error response.
    pub fn missing_header(name: &str) -> Self {
        Self::with_details(
            "MISSING_HEADER",
            format!("missing header: {}", name),
            format!("Required header '{}' was not provided in the request", name),
        )
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response carrying `error`.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<ClaimError> for ApiErrorResponse {
    fn from(error: ClaimError) -> Self {
        let message = error.to_string();
        let (status, code) = match &error {
            ClaimError::InvalidTimeExpression { .. } => {
                (StatusCode::BAD_REQUEST, "INVALID_TIME_EXPRESSION")
            }
            ClaimError::TimestampParse { .. } => (StatusCode::BAD_GATEWAY, "INVALID_SCHEDULE_DATA"),
            ClaimError::ScheduleNotFound { .. } => (StatusCode::NOT_FOUND, "SCHEDULE_NOT_FOUND"),
            ClaimError::ScheduleSource { .. } => (StatusCode::BAD_GATEWAY, "SCHEDULE_SOURCE_ERROR"),
            ClaimError::TemplateDownload { .. } => {
                (StatusCode::BAD_GATEWAY, "TEMPLATE_DOWNLOAD_ERROR")
            }
            ClaimError::Upload { .. } => (StatusCode::BAD_GATEWAY, "UPLOAD_ERROR"),
            ClaimError::Template { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "TEMPLATE_ERROR"),
            ClaimError::OutputDirectory { .. } | ClaimError::DocumentWrite { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "OUTPUT_ERROR")
            }
            ClaimError::ConfigNotFound { .. } | ClaimError::ConfigParseError { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR")
            }
        };

        ApiErrorResponse {
            status,
            error: ApiError::new(code, message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_missing_header_names_header() {
        let error = ApiError::missing_header("x-pagerduty-auth-token");
        assert_eq!(error.code, "MISSING_HEADER");
        assert!(error.message.contains("x-pagerduty-auth-token"));
    }

    #[test]
    fn test_time_expression_error_is_bad_request() {
        let response: ApiErrorResponse = ClaimError::InvalidTimeExpression {
            expression: "soon".to_string(),
            message: "unknown".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error.code, "INVALID_TIME_EXPRESSION");
    }

    #[test]
    fn test_schedule_not_found_is_404() {
        let response: ApiErrorResponse = ClaimError::ScheduleNotFound {
            query: "orion".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert!(response.error.message.contains("orion"));
    }
}
