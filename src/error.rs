// SPDX-License-Identifier: AGPL-3.0-or-later

//! API error type.
//!
//! Every externally visible failure carries a stable machine-readable code
//! plus a human message. Validation errors raised by a sibling service may
//! additionally attach the upstream JSON body as `detail`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub detail: Option<Value>,
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            detail: None,
        }
    }

    /// Required field missing from the request payload.
    pub fn key_error() -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "KEY_ERROR",
            "Required field missing from request payload",
        )
    }

    /// Field present but malformed.
    pub fn value_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALUE_ERROR", message)
    }

    /// Field present but empty.
    pub fn all_fields_required() -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "ALL_FIELDS_REQUIRED",
            "All fields are required",
        )
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn permission_denied() -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            "PERMISSION_DENIED",
            "You do not have permission to perform this action",
        )
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE", message)
    }

    /// Validation failure reported by a downstream service, with the
    /// upstream JSON body attached.
    pub fn upstream_validation(detail: Value) -> Self {
        let mut err = Self::value_error("Upstream service rejected the request");
        err.detail = Some(detail);
        err
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            message: self.message,
            code: self.code.to_string(),
            detail: self.detail,
        });
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::json;

    #[test]
    fn constructors_set_status_and_code() {
        let key = ApiError::key_error();
        assert_eq!(key.status, StatusCode::BAD_REQUEST);
        assert_eq!(key.code, "KEY_ERROR");

        let value = ApiError::value_error("bad phone");
        assert_eq!(value.status, StatusCode::BAD_REQUEST);
        assert_eq!(value.code, "VALUE_ERROR");

        let nf = ApiError::not_found("missing");
        assert_eq!(nf.status, StatusCode::NOT_FOUND);

        let denied = ApiError::permission_denied();
        assert_eq!(denied.status, StatusCode::FORBIDDEN);

        let unavailable = ApiError::service_unavailable("down");
        assert_eq!(unavailable.status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn into_response_returns_json_body() {
        let response = ApiError::value_error("bad data").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["code"], "VALUE_ERROR");
        assert_eq!(body["message"], "bad data");
        assert!(body.get("detail").is_none());
    }

    #[tokio::test]
    async fn upstream_validation_attaches_detail() {
        let response =
            ApiError::upstream_validation(json!({"field": "role"})).into_response();
        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["detail"]["field"], "role");
    }
}
