// SPDX-License-Identifier: AGPL-3.0-or-later

//! Authentication and authorization errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authentication error type.
///
/// Credential checks run in a fixed order (existence, eligibility, blocked,
/// deactivated) so the reported variant is deterministic for any combination
/// of simultaneous violations. "User not found" and "wrong password" both
/// collapse to `InvalidCredentials` to avoid account enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// No credential supplied on a route that requires one.
    #[error("No authentication credentials were provided")]
    NoCredentials,
    /// Authorization header present but malformed (wrong token count or
    /// unexpected scheme prefix).
    #[error("Invalid Authorization header format, expecting: <prefix> <token>")]
    MalformedHeader,
    /// Credential failed signature or structural verification.
    #[error("Token is invalid")]
    TokenInvalid,
    /// Credential verified but past its expiry.
    #[error("Token has expired")]
    TokenExpired,
    /// Unknown user or wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,
    /// Account is not eligible for the password-grant path.
    #[error("Account is not a service user")]
    NotServiceUser,
    #[error("Account is blocked")]
    AccountBlocked,
    #[error("Account is deactivated")]
    AccountDeactivated,
    /// Token subject no longer resolves to a live user.
    #[error("User is inactive or no longer exists")]
    UserInactive,
    /// The identity provider could not resolve the decoded subject.
    #[error("Could not resolve the federated identity")]
    IdentityLookupFailed,
    #[error("You do not have permission to perform this action")]
    PermissionDenied,
    /// Downstream collaborator timed out or refused the connection.
    #[error("Downstream service unavailable: {0}")]
    ServiceUnavailable(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Stable machine-readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::NoCredentials => "NO_CREDENTIALS_PROVIDED",
            AuthError::MalformedHeader => "MALFORMED_AUTH_HEADER",
            AuthError::TokenInvalid => "TOKEN_INVALID",
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::InvalidCredentials => "USER_INVALID_CREDENTIALS",
            AuthError::NotServiceUser => "NOT_SERVICE_USER",
            AuthError::AccountBlocked => "USER_ACCOUNT_BLOCKED",
            AuthError::AccountDeactivated => "USER_ACCOUNT_DEACTIVATED",
            AuthError::UserInactive => "USER_INACTIVE",
            AuthError::IdentityLookupFailed => "IDENTITY_LOOKUP_FAILED",
            AuthError::PermissionDenied => "PERMISSION_DENIED",
            AuthError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }

    /// HTTP status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::NoCredentials
            | AuthError::MalformedHeader
            | AuthError::TokenInvalid
            | AuthError::TokenExpired
            | AuthError::InvalidCredentials
            | AuthError::AccountBlocked
            | AuthError::AccountDeactivated
            | AuthError::UserInactive
            | AuthError::IdentityLookupFailed => StatusCode::UNAUTHORIZED,
            AuthError::NotServiceUser | AuthError::PermissionDenied => StatusCode::FORBIDDEN,
            AuthError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}

impl From<AuthError> for crate::error::ApiError {
    fn from(err: AuthError) -> Self {
        crate::error::ApiError::new(err.status_code(), err.error_code(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn invalid_credentials_returns_401() {
        let response = AuthError::InvalidCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error_code"], "USER_INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn not_service_user_returns_403() {
        let response = AuthError::NotServiceUser.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn service_unavailable_maps_to_503() {
        let err = AuthError::ServiceUnavailable("timeout".into());
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn conversion_to_api_error_keeps_code_and_status() {
        let api: crate::error::ApiError = AuthError::TokenExpired.into();
        assert_eq!(api.status, StatusCode::UNAUTHORIZED);
        assert_eq!(api.code, "TOKEN_EXPIRED");
    }
}
