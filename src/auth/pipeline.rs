// SPDX-License-Identifier: AGPL-3.0-or-later

//! Federated authentication pipeline.
//!
//! Steps over an inbound request:
//!
//! 1. Extract the bearer credential from the `Authorization` header,
//!    matching the configured scheme prefix case-insensitively.
//! 2. Verify the credential with the federated identity provider.
//! 3. Resolve the decoded subject to a federated identity.
//! 4. Materialize the local user by the identity's phone number and record
//!    the login.
//!
//! A request with no `Authorization` header at all is anonymous, not an
//! error; authorization happens at the capability level, not here.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use tokio::sync::RwLock;

use super::identity::IdentityProvider;
use super::AuthError;
use crate::models::User;
use crate::store::Store;

/// Parse the `Authorization` header.
///
/// Returns `None` when the header is absent. A present header must be
/// exactly `<prefix> <token>`, with the prefix compared case-insensitively.
pub fn extract_credential(headers: &HeaderMap, prefix: &str) -> Result<Option<String>, AuthError> {
    let Some(raw) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let value = raw.to_str().map_err(|_| AuthError::MalformedHeader)?;
    let mut parts = value.split_whitespace();
    let (Some(scheme), Some(token), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(AuthError::MalformedHeader);
    };

    if !scheme.eq_ignore_ascii_case(prefix) {
        return Err(AuthError::MalformedHeader);
    }

    Ok(Some(token.to_string()))
}

/// Run steps 2-4 of the pipeline for an extracted credential.
///
/// A federated identity whose phone number has no local user fails with
/// `InvalidCredentials`, the same error the password path reports for an
/// unknown account.
pub async fn authenticate_federated(
    provider: &dyn IdentityProvider,
    store: &RwLock<Store>,
    credential: &str,
) -> Result<User, AuthError> {
    let decoded = provider.verify_credential(credential).await?;
    let identity = provider.lookup_identity(&decoded.uid).await?;

    let mut store = store.write().await;
    let user = store
        .find_user(&identity.phone_number)
        .ok_or(AuthError::InvalidCredentials)?;
    if !user.is_active {
        return Err(AuthError::AccountDeactivated);
    }
    let user = user.clone();
    store.touch_last_login(&user.username);
    Ok(user)
}
