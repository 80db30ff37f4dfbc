//! # REST Errors
//!
//! Every failure that reaches a client goes through [`ApiError`], which is
//! rendered as `{"status": <code>, "message": <text>}`. Handler panics and
//! unknown routes are rendered the same way.

use std::any::Any;

use axum::{
    body::Bytes,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::ErrorResponse;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The requested record does not exist
    #[error("{0}")]
    NotFound(String),

    /// Any store failure, reported with a fixed per-operation message
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Log `source` and hide it behind the operation's message
    pub fn internal(message: &str, source: anyhow::Error) -> Self {
        error!("{}: {:#}", message, source);
        ApiError::Internal(message.to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            status: status.as_u16(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Decode a record body. A request without a JSON content type, or with an
/// empty body, is treated as `{}`. Anything but a JSON object, or an object
/// whose fields cannot be coerced, is reported as the operation's internal
/// error.
pub fn body_or_default<T>(headers: &HeaderMap, body: &Bytes, message: &str) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    if !has_json_content_type(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    let rejected = |reason: String| {
        warn!("Rejected request body: {}", reason);
        ApiError::Internal(message.to_string())
    };

    match serde_json::from_slice::<Value>(body) {
        Ok(object @ Value::Object(_)) => serde_json::from_value(object).map_err(|e| rejected(e.to_string())),
        Ok(other) => Err(rejected(format!("expected a JSON object, got {}", other))),
        Err(e) => Err(rejected(e.to_string())),
    }
}

// `application/json` or any `application/*+json`
fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let essence = content_type.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    match essence.strip_prefix("application/") {
        Some(subtype) => subtype == "json" || subtype.ends_with("+json"),
        None => false,
    }
}

/// Fallback for requests that match no route
pub async fn route_not_found() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}

/// Response for a panicking handler, used with `CatchPanicLayer`
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic payload"
    };
    error!("Handler panicked: {}", detail);

    ApiError::Internal("Internal Server Error".to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    use shared::{AccountFields, TransactionFields};

    fn json_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "application/json; charset=utf-8".parse().unwrap());
        headers
    }

    async fn body_of(response: Response) -> ErrorResponse {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::NotFound("x".to_string()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Internal("x".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let response = ApiError::NotFound("Account not found".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_of(response).await;
        assert_eq!(
            body,
            ErrorResponse {
                status: 404,
                message: "Account not found".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_internal_hides_source() {
        let err = ApiError::internal("Error retrieving accounts", anyhow::anyhow!("disk on fire"));
        let body = body_of(err.into_response()).await;

        assert_eq!(body.status, 500);
        assert_eq!(body.message, "Error retrieving accounts");
    }

    #[tokio::test]
    async fn test_panic_becomes_json_500() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_of(response).await;
        assert_eq!(body.message, "Internal Server Error");
    }

    #[test]
    fn test_empty_json_body_is_empty_record() {
        for raw in ["", "  \n"] {
            let fields: AccountFields =
                body_or_default(&json_headers(), &Bytes::from(raw), "Error creating account").unwrap();
            assert_eq!(fields, AccountFields::default());
        }
    }

    #[test]
    fn test_non_json_content_type_is_empty_record() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "text/plain".parse().unwrap());
        let fields: TransactionFields =
            body_or_default(&headers, &Bytes::from(r#"{"amount": 5}"#), "Error creating transaction").unwrap();
        assert_eq!(fields, TransactionFields::default());

        let fields: TransactionFields =
            body_or_default(&HeaderMap::new(), &Bytes::from(r#"{"amount": 5}"#), "Error creating transaction")
                .unwrap();
        assert_eq!(fields, TransactionFields::default());
    }

    #[test]
    fn test_vendor_json_content_type_is_parsed() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "application/merge-patch+json".parse().unwrap());
        let fields: AccountFields =
            body_or_default(&headers, &Bytes::from(r#"{"name": "Alice"}"#), "Error updating account").unwrap();
        assert_eq!(fields.name.as_deref(), Some("Alice"));
    }

    #[test]
    fn test_only_objects_are_accepted() {
        for raw in ["[]", r#"["x", 5, "y"]"#, "null", "5", r#""name""#] {
            let result: Result<AccountFields, ApiError> =
                body_or_default(&json_headers(), &Bytes::from(raw), "Error creating account");
            assert_eq!(result, Err(ApiError::Internal("Error creating account".to_string())), "{}", raw);
        }
    }
}
