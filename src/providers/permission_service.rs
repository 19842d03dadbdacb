// SPDX-License-Identifier: AGPL-3.0-or-later

//! Outbound client for the central permission service.
//!
//! When a user is provisioned here the registration is mirrored to the
//! permission service so other backends can resolve the same account. The
//! upstream is authoritative for validation failures: a 4xx response is
//! surfaced to the caller verbatim rather than rewritten.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tracing::warn;

use crate::error::ApiError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(25);
const SERVICE_ID_HEADER: &str = "X-Service-Id";

pub struct PermissionServiceClient {
    client: Client,
    service_url: String,
}

impl PermissionServiceClient {
    pub fn new(service_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            service_url: service_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn service_url(&self) -> &str {
        &self.service_url
    }

    /// Registers `phone_number` with `role` at the permission service.
    ///
    /// Returns the upstream body on success. Upstream 4xx responses become
    /// validation errors carrying the upstream payload; transport failures
    /// and 5xx responses become `SERVICE_UNAVAILABLE`.
    pub async fn add_user_and_permission(
        &self,
        service_id: u32,
        phone_number: &str,
        role: &str,
    ) -> Result<Value, ApiError> {
        let url = format!("{}/api/v1/user-permission/", self.service_url);
        let payload = json!({
            "phone_number": phone_number,
            "role": role,
            "service_url": self.service_url,
        });

        let response = self
            .client
            .post(&url)
            .header(SERVICE_ID_HEADER, service_id)
            .json(&payload)
            .send()
            .await
            .map_err(|err| {
                warn!(error = %err, url = %url, "permission service unreachable");
                ApiError::service_unavailable("permission service unreachable")
            })?;

        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        map_upstream(status, body)
    }
}

/// Maps an upstream status and body to the caller-facing result.
fn map_upstream(status: StatusCode, body: Value) -> Result<Value, ApiError> {
    if status.is_success() {
        return Ok(body);
    }
    if status.is_client_error() {
        return Err(ApiError::upstream_validation(body));
    }
    warn!(status = %status, "permission service returned an error");
    Err(ApiError::service_unavailable(
        "permission service returned an error",
    ))
}
