// SPDX-License-Identifier: AGPL-3.0-or-later

//! Axum extractors for authenticated users.
//!
//! Routes pick their authentication path by extractor:
//!
//! - [`Auth`] requires a locally issued access token (the password-grant
//!   family of internal endpoints).
//! - [`FederatedAuth`] requires a credential verified by the external
//!   identity provider.
//! - [`MaybeAuth`] runs the federated pipeline but allows anonymous
//!   requests; the handler decides what anonymous callers may do.

use axum::{extract::FromRequestParts, http::request::Parts};

use super::claims::{AuthenticatedUser, Principal};
use super::pipeline::{authenticate_federated, extract_credential};
use super::AuthError;
use crate::state::AppState;

/// Extractor requiring a valid local access token.
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_credential(&parts.headers, &state.settings.header_prefix)?
            .ok_or(AuthError::NoCredentials)?;

        let store = state.store.read().await;
        let user = state.tokens.verify(&store, &token)?;
        Ok(Auth(AuthenticatedUser::from(&user)))
    }
}

/// Extractor requiring a credential verified by the federated identity
/// provider.
pub struct FederatedAuth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for FederatedAuth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let credential = extract_credential(&parts.headers, &state.settings.header_prefix)?
            .ok_or(AuthError::NoCredentials)?;

        let user =
            authenticate_federated(state.identity.as_ref(), &state.store, &credential).await?;
        Ok(FederatedAuth(AuthenticatedUser::from(&user)))
    }
}

/// Auth-optional federated extractor.
///
/// No credential yields the anonymous principal; a supplied credential must
/// still be valid (a bad credential is rejected even on read-only routes).
pub struct MaybeAuth(pub Principal);

impl FromRequestParts<AppState> for MaybeAuth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(credential) =
            extract_credential(&parts.headers, &state.settings.header_prefix)?
        else {
            return Ok(MaybeAuth(Principal::Anonymous));
        };

        let user =
            authenticate_federated(state.identity.as_ref(), &state.store, &credential).await?;
        Ok(MaybeAuth(Principal::Authenticated(AuthenticatedUser::from(
            &user,
        ))))
    }
}
