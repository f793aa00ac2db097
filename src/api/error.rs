use axum::extract::rejection::JsonRejection;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::config::RunMode;
use crate::models::ValidationError;
use crate::query::{allowed_commands, QueryError};
use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or malformed request input, caught before storage is used.
    #[error("{0}")]
    InvalidInput(String),

    /// Statement rejected by the query allow-list.
    #[error("{0}")]
    Forbidden(String),

    /// SQLite rejected an allowed console statement.
    #[error("Query execution failed")]
    Execution(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Database constraint violation")]
    Constraint(String),

    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) | ApiError::Execution(_) | ApiError::Constraint(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody<'a> {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    allowed_commands: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl ErrorBody<'_> {
    fn new(message: String) -> Self {
        Self {
            success: false,
            message,
            allowed_commands: None,
            error: None,
        }
    }
}

/// Internal failure detail attached to a response. Only sent to clients
/// when [`expose_error_detail`] runs in development mode.
#[derive(Debug, Clone)]
pub struct ErrorDetail {
    message: String,
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        match self {
            ApiError::InvalidInput(_) | ApiError::NotFound(_) => {
                (status, Json(ErrorBody::new(message))).into_response()
            }
            ApiError::Forbidden(_) => {
                let body = ErrorBody {
                    allowed_commands: Some(allowed_commands()),
                    ..ErrorBody::new(message)
                };
                (status, Json(body)).into_response()
            }
            ApiError::Execution(detail) => {
                let body = ErrorBody {
                    error: Some(&detail),
                    ..ErrorBody::new(message)
                };
                (status, Json(body)).into_response()
            }
            ApiError::Constraint(detail) | ApiError::Internal(detail) => {
                error!(status = status.as_u16(), %detail, "{}", message);
                let mut response = (status, Json(ErrorBody::new(message.clone()))).into_response();
                response
                    .extensions_mut()
                    .insert(ErrorDetail { message, detail });
                response
            }
        }
    }
}

/// Re-renders internal error responses with their `error` detail when the
/// server runs in development mode.
pub async fn expose_error_detail(
    State(mode): State<RunMode>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let Some(detail) = response.extensions_mut().remove::<ErrorDetail>() else {
        return response;
    };
    if !mode.exposes_error_detail() {
        return response;
    }

    let body = ErrorBody {
        error: Some(&detail.detail),
        ..ErrorBody::new(detail.message.clone())
    };
    (response.status(), Json(body)).into_response()
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::Missing => ApiError::InvalidInput(QueryError::Missing.to_string()),
            QueryError::Forbidden { reason, .. } => ApiError::Forbidden(reason.to_string()),
            QueryError::Execution(message) => ApiError::Execution(message),
            QueryError::Storage(err) => ApiError::from(err),
        }
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        if err.is_constraint_violation() {
            ApiError::Constraint(err.to_string())
        } else {
            ApiError::Internal(err.to_string())
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::InvalidInput(err.0)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidInput(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::InvalidInput(String::new()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Forbidden(String::new()).status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::Execution(String::new()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound(String::new()).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Constraint(String::new()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::Internal(String::new()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_query_errors_map_to_distinct_kinds() {
        assert!(matches!(ApiError::from(QueryError::Missing), ApiError::InvalidInput(m) if m == "Query is required"));
        assert!(matches!(
            ApiError::from(QueryError::Forbidden { keyword: "drop".to_string(), reason: "nope" }),
            ApiError::Forbidden(m) if m == "nope"
        ));
        assert!(matches!(
            ApiError::from(QueryError::Execution("no such table: x".to_string())),
            ApiError::Execution(m) if m == "no such table: x"
        ));
    }

    #[test]
    fn test_internal_detail_is_attached_not_rendered() {
        let response = ApiError::Internal("disk I/O error".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let detail = response.extensions().get::<ErrorDetail>().unwrap();
        assert_eq!(detail.detail, "disk I/O error");
    }
}
