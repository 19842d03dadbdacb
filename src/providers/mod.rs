// SPDX-License-Identifier: AGPL-3.0-or-later

//! Clients for sibling services.

pub mod permission_service;

pub use permission_service::PermissionServiceClient;
