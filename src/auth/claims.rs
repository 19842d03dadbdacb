// SPDX-License-Identifier: AGPL-3.0-or-later

//! JWT claims and request principals.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::User;

/// Claims carried by an access token.
///
/// The subject is the local username; liveness is deliberately *not* encoded
/// here — it is re-checked against the credential store on every
/// verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject: local username (phone number).
    pub sub: String,
    /// Issued-at, Unix timestamp.
    pub iat: i64,
    /// Expiry, Unix timestamp.
    pub exp: i64,
}

/// The authenticated user attached to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AuthenticatedUser {
    pub username: String,
    pub roles: Vec<String>,
    pub is_service_user: bool,
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            roles: user.roles.clone(),
            is_service_user: user.is_service_user,
        }
    }
}

/// Principal resolved by the authentication pipeline.
///
/// A request with no credential at all yields `Anonymous`; handlers decide
/// whether anonymous access is permitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    Anonymous,
    Authenticated(AuthenticatedUser),
}

impl Principal {
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Principal::Anonymous)
    }

    pub fn user(&self) -> Option<&AuthenticatedUser> {
        match self {
            Principal::Anonymous => None,
            Principal::Authenticated(user) => Some(user),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authenticated_user_from_user_record() {
        let mut user = User::new("+8801700000000");
        user.roles = vec!["Staff".to_string()];
        user.is_service_user = true;

        let principal = AuthenticatedUser::from(&user);
        assert_eq!(principal.username, "+8801700000000");
        assert_eq!(principal.roles, vec!["Staff".to_string()]);
        assert!(principal.is_service_user);
    }

    #[test]
    fn anonymous_principal_has_no_user() {
        assert!(Principal::Anonymous.is_anonymous());
        assert!(Principal::Anonymous.user().is_none());
    }
}
