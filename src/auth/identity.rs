// SPDX-License-Identifier: AGPL-3.0-or-later

//! Federated identity verification.
//!
//! The external provider validates an opaque bearer credential and resolves
//! the decoded subject to a verified identity (uid + phone number). It is a
//! trait so routes can select a provider without subclassing; the HTTP
//! implementation talks to the real service, the static implementation backs
//! development mode and tests.
//!
//! Provider failures never leak outward: credential verification collapses
//! transport and service errors to `TokenInvalid`, identity resolution to
//! `IdentityLookupFailed`.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::AuthError;

/// Request timeout for the identity provider.
const PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of verifying an opaque credential: the decoded subject id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCredential {
    pub uid: String,
}

/// An externally verified identity. Never persisted; used only to resolve a
/// local user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FederatedIdentity {
    pub uid: String,
    pub phone_number: String,
}

/// Pluggable external identity verifier.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Validate an opaque bearer credential and return the decoded subject.
    async fn verify_credential(&self, credential: &str) -> Result<DecodedCredential, AuthError>;

    /// Map a decoded subject id to a verified federated identity.
    async fn lookup_identity(&self, uid: &str) -> Result<FederatedIdentity, AuthError>;
}

// =============================================================================
// HTTP provider
// =============================================================================

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    uid: String,
}

/// Identity provider backed by an external HTTP verification service.
pub struct HttpIdentityProvider {
    base_url: String,
    client: reqwest::Client,
}

impl HttpIdentityProvider {
    pub fn new(base_url: impl Into<String>) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(PROVIDER_TIMEOUT)
            .build()
            .map_err(|e| AuthError::ServiceUnavailable(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn verify_credential(&self, credential: &str) -> Result<DecodedCredential, AuthError> {
        let response = self
            .client
            .post(format!("{}/v1/verify", self.base_url))
            .json(&json!({ "token": credential }))
            .send()
            .await
            .map_err(|_| AuthError::TokenInvalid)?;

        if !response.status().is_success() {
            return Err(AuthError::TokenInvalid);
        }

        let body: VerifyResponse = response.json().await.map_err(|_| AuthError::TokenInvalid)?;
        Ok(DecodedCredential { uid: body.uid })
    }

    async fn lookup_identity(&self, uid: &str) -> Result<FederatedIdentity, AuthError> {
        if uid.is_empty() {
            return Err(AuthError::IdentityLookupFailed);
        }

        let response = self
            .client
            .get(format!("{}/v1/identities/{uid}", self.base_url))
            .send()
            .await
            .map_err(|_| AuthError::IdentityLookupFailed)?;

        if !response.status().is_success() {
            return Err(AuthError::IdentityLookupFailed);
        }

        response
            .json::<FederatedIdentity>()
            .await
            .map_err(|_| AuthError::IdentityLookupFailed)
    }
}

// =============================================================================
// Static provider (development mode, tests)
// =============================================================================

/// Identity provider backed by a fixed credential and identity table.
///
/// Used when `IDENTITY_PROVIDER_URL` is unset; with an empty table every
/// federated credential is rejected, which is the safe default.
#[derive(Default)]
pub struct StaticIdentityProvider {
    /// credential -> uid
    credentials: HashMap<String, String>,
    /// uid -> identity
    identities: HashMap<String, FederatedIdentity>,
}

impl StaticIdentityProvider {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Register a credential that decodes to `uid` with the given verified
    /// phone number.
    pub fn with_identity(
        mut self,
        credential: impl Into<String>,
        uid: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        let uid = uid.into();
        self.credentials.insert(credential.into(), uid.clone());
        self.identities.insert(
            uid.clone(),
            FederatedIdentity {
                uid,
                phone_number: phone_number.into(),
            },
        );
        self
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn verify_credential(&self, credential: &str) -> Result<DecodedCredential, AuthError> {
        self.credentials
            .get(credential)
            .map(|uid| DecodedCredential { uid: uid.clone() })
            .ok_or(AuthError::TokenInvalid)
    }

    async fn lookup_identity(&self, uid: &str) -> Result<FederatedIdentity, AuthError> {
        self.identities
            .get(uid)
            .cloned()
            .ok_or(AuthError::IdentityLookupFailed)
    }
}
