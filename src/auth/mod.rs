// SPDX-License-Identifier: AGPL-3.0-or-later

//! Authentication and authorization.
//!
//! Two credential families are supported. Locally issued access tokens are
//! minted and verified by [`token::TokenService`]; federated credentials are
//! verified against an external identity provider and resolved to a local
//! account by [`pipeline::authenticate_federated`]. Role permissions are
//! aggregated into client-facing views by [`permissions`].

pub mod claims;
pub mod error;
pub mod extractor;
pub mod identity;
pub mod password;
pub mod permissions;
pub mod pipeline;
pub mod token;

pub use claims::{AuthenticatedUser, Principal};
pub use error::AuthError;
pub use extractor::{Auth, FederatedAuth, MaybeAuth};
pub use identity::{HttpIdentityProvider, IdentityProvider, StaticIdentityProvider};
pub use password::{hash_password, verify_password};
pub use permissions::{aggregate_role_permissions, OperationMap, RoleView};
pub use token::{IssuedToken, TokenService};
