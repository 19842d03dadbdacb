// SPDX-License-Identifier: AGPL-3.0-or-later

//! Token service: issuance, refresh, and verification of HS256 access
//! tokens.
//!
//! Issuance is restricted to service users (the password-grant path).
//! Verification re-resolves the subject against the credential store on
//! every call; token validity is never cached.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::claims::AccessClaims;
use super::password::verify_password;
use super::AuthError;
use crate::models::User;
use crate::store::Store;

/// A freshly minted token with its expiry.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub username: String,
    /// Expiry as a Unix timestamp.
    pub expires_at: i64,
}

pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::seconds(ttl_secs),
        }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl.num_seconds()
    }

    /// Issue a token for a service account.
    ///
    /// Checks run in a fixed order so the error is deterministic:
    /// existence/password (collapsed to `InvalidCredentials`), service
    /// eligibility, blocked, deactivated.
    pub fn issue(
        &self,
        store: &Store,
        username: &str,
        password: &str,
    ) -> Result<IssuedToken, AuthError> {
        self.issue_for_user(store.find_user(username), password)
    }

    /// Core of [`issue`](Self::issue) over an already-resolved user record.
    ///
    /// Password verification is CPU-bound; handlers clone the record out of
    /// the store lock and call this from a blocking task.
    pub fn issue_for_user(
        &self,
        user: Option<&User>,
        password: &str,
    ) -> Result<IssuedToken, AuthError> {
        let user = user.ok_or(AuthError::InvalidCredentials)?;

        let password_ok = user
            .password_hash
            .as_deref()
            .map(|hash| verify_password(password, hash))
            .unwrap_or(false);
        if !password_ok {
            return Err(AuthError::InvalidCredentials);
        }

        if !user.is_service_user {
            return Err(AuthError::NotServiceUser);
        }
        if user.is_blocked {
            return Err(AuthError::AccountBlocked);
        }
        if !user.is_active {
            return Err(AuthError::AccountDeactivated);
        }

        self.mint(&user.username)
    }

    /// Exchange a still-valid token for a fresh one.
    ///
    /// An expired token is never extended; the subject's liveness is
    /// re-checked before minting.
    pub fn refresh(&self, store: &Store, token: &str) -> Result<IssuedToken, AuthError> {
        let user = self.verify(store, token)?;
        self.mint(&user.username)
    }

    /// Verify a raw token and resolve its subject to a live user.
    pub fn verify(&self, store: &Store, token: &str) -> Result<User, AuthError> {
        let claims = self.decode_claims(token)?;

        let user = store
            .find_user(&claims.sub)
            .ok_or(AuthError::UserInactive)?;
        if user.is_blocked || !user.is_active {
            return Err(AuthError::UserInactive);
        }
        Ok(user.clone())
    }

    fn decode_claims(&self, token: &str) -> Result<AccessClaims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<AccessClaims>(token, &self.decoding_key, &validation).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::TokenInvalid,
            },
        )?;
        Ok(data.claims)
    }

    fn mint(&self, username: &str) -> Result<IssuedToken, AuthError> {
        let now = Utc::now();
        let expires_at = (now + self.ttl).timestamp();
        let claims = AccessClaims {
            sub: username.to_string(),
            iat: now.timestamp(),
            exp: expires_at,
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| AuthError::TokenInvalid)?;

        Ok(IssuedToken {
            token,
            username: username.to_string(),
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;

    const SECRET: &str = "test-secret";

    fn store_with_service_user(username: &str, password: &str) -> Store {
        let mut store = Store::new();
        store.seed_roles();
        store.insert_service_user(
            username,
            hash_password(password).unwrap(),
            vec!["Admin".to_string()],
        );
        store
    }

    fn service() -> TokenService {
        TokenService::new(SECRET, 3600)
    }

    #[test]
    fn unknown_user_fails_invalid_credentials() {
        let store = Store::new();
        let err = service().issue(&store, "tester", "pw").unwrap_err();
        assert_eq!(err, AuthError::InvalidCredentials);
    }

    #[test]
    fn wrong_password_fails_invalid_credentials() {
        let store = store_with_service_user("tester", "right");
        let err = service().issue(&store, "tester", "wrong").unwrap_err();
        // Indistinguishable from the unknown-user case.
        assert_eq!(err, AuthError::InvalidCredentials);
    }

    #[test]
    fn issue_then_verify_round_trip() {
        let store = store_with_service_user("tester", "pw");
        let tokens = service();

        let issued = tokens.issue(&store, "tester", "pw").unwrap();
        assert_eq!(issued.username, "tester");

        let user = tokens.verify(&store, &issued.token).unwrap();
        assert_eq!(user.username, "tester");
    }

    fn flagged_user(service_user: bool, blocked: bool, active: bool) -> Store {
        let mut store = Store::new();
        let mut user = crate::models::User::new("tester");
        user.password_hash = Some(hash_password("pw").unwrap());
        user.is_service_user = service_user;
        user.is_blocked = blocked;
        user.is_active = active;
        store.insert_user(user);
        store
    }

    #[test]
    fn eligibility_check_beats_blocked_and_deactivated() {
        let store = flagged_user(false, true, false);
        let err = service().issue(&store, "tester", "pw").unwrap_err();
        assert_eq!(err, AuthError::NotServiceUser);
    }

    #[test]
    fn blocked_check_beats_deactivated() {
        let store = flagged_user(true, true, false);
        let err = service().issue(&store, "tester", "pw").unwrap_err();
        assert_eq!(err, AuthError::AccountBlocked);
    }

    #[test]
    fn deactivated_account_cannot_obtain_a_token() {
        let store = flagged_user(true, false, false);
        let err = service().issue(&store, "tester", "pw").unwrap_err();
        assert_eq!(err, AuthError::AccountDeactivated);
    }

    #[test]
    fn expired_token_fails_verify_and_refresh() {
        let store = store_with_service_user("tester", "pw");
        let tokens = TokenService::new(SECRET, -7200);

        let issued = tokens.issue(&store, "tester", "pw").unwrap();

        let err = tokens.verify(&store, &issued.token).unwrap_err();
        assert_eq!(err, AuthError::TokenExpired);

        let err = tokens.refresh(&store, &issued.token).unwrap_err();
        assert_eq!(err, AuthError::TokenExpired);
    }

    #[test]
    fn refresh_mints_a_new_valid_token() {
        let store = store_with_service_user("tester", "pw");
        let tokens = service();

        let issued = tokens.issue(&store, "tester", "pw").unwrap();
        let refreshed = tokens.refresh(&store, &issued.token).unwrap();
        assert_eq!(refreshed.username, "tester");

        let user = tokens.verify(&store, &refreshed.token).unwrap();
        assert_eq!(user.username, "tester");
    }

    #[test]
    fn verify_rechecks_liveness_per_use() {
        let mut store = store_with_service_user("tester", "pw");
        let tokens = service();
        let issued = tokens.issue(&store, "tester", "pw").unwrap();

        store.set_active("tester", false).unwrap();
        let err = tokens.verify(&store, &issued.token).unwrap_err();
        assert_eq!(err, AuthError::UserInactive);
    }

    #[test]
    fn tampered_token_is_invalid() {
        let store = store_with_service_user("tester", "pw");
        let tokens = service();
        let issued = tokens.issue(&store, "tester", "pw").unwrap();

        let other = TokenService::new("other-secret", 3600);
        let err = other.verify(&store, &issued.token).unwrap_err();
        assert_eq!(err, AuthError::TokenInvalid);
    }
}
