// SPDX-License-Identifier: AGPL-3.0-or-later

//! # API Data Models
//!
//! Domain records plus the request and response structures used by the REST
//! API. API-facing types derive `Serialize`, `Deserialize`, and `ToSchema`
//! for automatic JSON handling and OpenAPI documentation.
//!
//! ## Model Categories
//!
//! - **Users**: credential-store records with role memberships
//! - **Roles**: named groups of `(module, code)` permissions (seed data)
//! - **Snippets**: user-owned code snippets with a soft live flag

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// =============================================================================
// User
// =============================================================================

/// A credential-store user record.
///
/// The identity key is a phone-number-like username. Users are never hard
/// deleted; `is_active` and `is_blocked` gate authentication instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Identity key (phone-number-like username).
    pub username: String,
    /// Argon2id PHC hash. Federated-only users may have no password.
    #[serde(default, skip_serializing)]
    pub password_hash: Option<String>,
    /// Soft enable/disable flag.
    pub is_active: bool,
    /// Hard block flag, checked at token issuance and verification.
    pub is_blocked: bool,
    /// Whether the account may obtain tokens via the password-grant path.
    pub is_service_user: bool,
    /// Role group memberships.
    pub roles: Vec<String>,
    /// Updated on every successful federated authentication.
    pub last_login: Option<DateTime<Utc>>,
    pub date_joined: DateTime<Utc>,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: None,
            is_active: true,
            is_blocked: false,
            is_service_user: false,
            roles: Vec::new(),
            last_login: None,
            date_joined: Utc::now(),
        }
    }
}

// =============================================================================
// Roles and Permissions
// =============================================================================

/// A `(module, code)` permission pair stored under a role.
///
/// `module` is a logical resource area ("snippets", "users"); `code` is the
/// raw action identifier ("add_snippet") translated for presentation via an
/// operation map.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Permission {
    pub module: String,
    pub code: String,
}

impl Permission {
    pub fn new(module: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            code: code.into(),
        }
    }
}

/// A named role group with its permission set. Seed data, read-only at
/// runtime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleGroup {
    pub name: String,
    pub permissions: Vec<Permission>,
}

// =============================================================================
// Snippet
// =============================================================================

/// Supported snippet languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Python,
    #[serde(rename = "c#")]
    CSharp,
    Java,
}

/// A user-owned code snippet.
///
/// Snippets carry a soft `status` flag; listings only show live snippets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct Snippet {
    /// Unique identifier.
    pub id: Uuid,
    /// Unique title.
    pub title: String,
    /// Owning user's username.
    pub owner: String,
    /// Snippet body.
    pub code: String,
    /// Whether to display line numbers.
    pub linenos: bool,
    pub language: Language,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    /// Live flag; dead snippets are hidden from listings.
    pub status: bool,
}

// =============================================================================
// Request / Response Models
// =============================================================================

/// Body for `POST /v1/users/token/`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

/// Body for `POST /v1/users/refresh-token/`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub token: String,
}

/// Successful token issuance or refresh.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
    pub username: String,
    /// Expiry as a Unix timestamp.
    pub expires_at: i64,
}

/// Body for `POST /v1/users/create/`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub phone_number: String,
    pub role: String,
    /// Only used when the user does not exist yet.
    pub password: Option<String>,
}

/// Body for `POST /v1/users/enable_disable/`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct EnableDisableRequest {
    pub phone_number: String,
    pub disable: bool,
}

/// Generic success acknowledgement.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AckResponse {
    pub message: String,
    pub code: String,
}

impl AckResponse {
    pub fn request_success() -> Self {
        Self {
            message: "Request successful".to_string(),
            code: "REQUEST_SUCCESS".to_string(),
        }
    }
}

/// Body for `POST /v1/snippets/`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateSnippetRequest {
    pub title: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub linenos: bool,
    #[serde(default)]
    pub language: Language,
}

/// Body for `PATCH /v1/snippets/{id}`. All fields optional.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateSnippetRequest {
    pub title: Option<String>,
    pub code: Option<String>,
    pub linenos: Option<bool>,
    pub language: Option<Language>,
    pub status: Option<bool>,
}
