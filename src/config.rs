// SPDX-License-Identifier: AGPL-3.0-or-later

//! # Runtime Configuration Constants
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `TOKEN_SECRET` | HS256 signing secret for access tokens | Dev-only fallback |
//! | `TOKEN_TTL_SECS` | Access token lifetime in seconds | `3600` |
//! | `AUTH_HEADER_PREFIX` | Bearer scheme keyword, compared case-insensitively | `JWT` |
//! | `AUTH_COOKIE` | Cookie name for token delivery (unset = no cookie) | Unset |
//! | `IDENTITY_PROVIDER_URL` | Base URL of the federated identity verifier | Unset (static mode) |
//! | `PERMISSION_SERVICE_URL` | Base URL of the sibling permission service | Unset (disabled) |
//! | `SERVICE_ID` | Numeric id reported by the role listing | `1` |
//! | `SEED_SERVICE_USER` | Phone number of a service account seeded at boot | Unset |
//! | `SEED_SERVICE_PASSWORD` | Password for the seeded service account | Unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

/// Environment variable name for the token signing secret.
pub const TOKEN_SECRET_ENV: &str = "TOKEN_SECRET";

/// Environment variable name for the token lifetime, in seconds.
pub const TOKEN_TTL_ENV: &str = "TOKEN_TTL_SECS";

/// Environment variable name for the bearer scheme keyword.
pub const AUTH_HEADER_PREFIX_ENV: &str = "AUTH_HEADER_PREFIX";

/// Environment variable name for the optional HTTP-only token cookie.
pub const AUTH_COOKIE_ENV: &str = "AUTH_COOKIE";

/// Environment variable name for the federated identity verifier base URL.
pub const IDENTITY_PROVIDER_URL_ENV: &str = "IDENTITY_PROVIDER_URL";

/// Environment variable name for the sibling permission-service base URL.
pub const PERMISSION_SERVICE_URL_ENV: &str = "PERMISSION_SERVICE_URL";

/// Environment variable name for the service id reported by role listings.
pub const SERVICE_ID_ENV: &str = "SERVICE_ID";

/// Environment variable name for the service account seeded at boot.
pub const SEED_SERVICE_USER_ENV: &str = "SEED_SERVICE_USER";

/// Environment variable name for the seeded service account's password.
pub const SEED_SERVICE_PASSWORD_ENV: &str = "SEED_SERVICE_PASSWORD";

/// Environment variable name for the logging format (`json` or `pretty`).
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default token lifetime when `TOKEN_TTL_SECS` is unset.
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 3600;

/// Default bearer scheme keyword when `AUTH_HEADER_PREFIX` is unset.
pub const DEFAULT_AUTH_HEADER_PREFIX: &str = "JWT";

/// Default service id when `SERVICE_ID` is unset.
pub const DEFAULT_SERVICE_ID: u32 = 1;
