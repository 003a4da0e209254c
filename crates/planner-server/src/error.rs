//! HTTP error responses.

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use planner_core::error::PlannerError;
use serde::Serialize;

/// Error returned by handlers and extractors.
///
/// Serialised as `{ "code": ..., "message": ... }`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    message: &'a str,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }
}

impl From<PlannerError> for ApiError {
    fn from(err: PlannerError) -> Self {
        match err {
            PlannerError::NotFound { .. } => {
                Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
            }
            PlannerError::AlreadyExists { .. } => {
                Self::new(StatusCode::CONFLICT, "CONFLICT", err.to_string())
            }
            PlannerError::AuthenticationFailed { .. } => Self::unauthorized(err.to_string()),
            PlannerError::AuthorizationDenied { .. } => {
                Self::new(StatusCode::FORBIDDEN, "FORBIDDEN", err.to_string())
            }
            PlannerError::Validation { message } => Self::validation(message),
            PlannerError::Database(_) | PlannerError::Crypto(_) | PlannerError::Internal(_) => {
                tracing::error!(error = %err, "Request failed");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_SERVER_ERROR",
                    "internal server error",
                )
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let status = rejection.status();
        let code = match status {
            StatusCode::UNPROCESSABLE_ENTITY => "VALIDATION_ERROR",
            StatusCode::UNSUPPORTED_MEDIA_TYPE => "UNSUPPORTED_MEDIA_TYPE",
            StatusCode::PAYLOAD_TOO_LARGE => "PAYLOAD_TOO_LARGE",
            _ => "BAD_REQUEST",
        };
        Self::new(status, code, rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        let status = rejection.status();
        let code = if status.is_server_error() {
            "INTERNAL_SERVER_ERROR"
        } else {
            "BAD_REQUEST"
        };
        Self::new(status, code, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code,
            message: &self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: PlannerError) -> StatusCode {
        ApiError::from(err).status()
    }

    #[test]
    fn planner_errors_map_to_statuses() {
        assert_eq!(
            status_of(PlannerError::NotFound {
                entity: "event".into(),
                id: "x".into(),
            }),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(PlannerError::AlreadyExists {
                entity: "user".into()
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(PlannerError::AuthenticationFailed {
                reason: "r".into()
            }),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(PlannerError::AuthorizationDenied {
                reason: "r".into()
            }),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of(PlannerError::Validation {
                message: "m".into()
            }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(PlannerError::Database("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_details_are_not_exposed() {
        let err = ApiError::from(PlannerError::Database("table user: secret".into()));
        assert_eq!(err.code(), "INTERNAL_SERVER_ERROR");
        assert!(!err.message.contains("secret"));
    }
}
