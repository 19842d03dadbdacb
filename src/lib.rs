// SPDX-License-Identifier: AGPL-3.0-or-later

//! Snippet Server - Multi-tenant snippet backend
//!
//! An HTTP backend exposing a snippet CRUD resource and the internal user
//! and role management API shared by sibling services. Authentication is
//! JWT-based, with locally issued service tokens and federated credentials
//! verified against an external identity provider.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Tokens, federated authentication, role permissions
//! - `providers` - Clients for sibling services
//! - `store` - In-memory credential and snippet store

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod providers;
pub mod state;
pub mod store;
