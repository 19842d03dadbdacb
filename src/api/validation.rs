// SPDX-License-Identifier: AGPL-3.0-or-later

//! Request payload validation.
//!
//! Payloads arrive as raw JSON so a missing key, an empty value, and a
//! malformed value can be distinguished and reported under separate codes.
//! A missing key is `KEY_ERROR`, a present-but-empty value is
//! `ALL_FIELDS_REQUIRED` (the login endpoint reports empty credentials as
//! `NO_CREDENTIALS_PROVIDED`), and a malformed value is `VALUE_ERROR`.

use serde_json::Value;

use crate::auth::AuthError;
use crate::error::ApiError;
use crate::models::{CreateUserRequest, EnableDisableRequest, RefreshRequest, TokenRequest};

/// Phone-number usernames: leading `+` followed by 8 to 15 digits.
pub fn is_phone_valid(phone: &str) -> bool {
    let Some(digits) = phone.strip_prefix('+') else {
        return false;
    };
    (8..=15).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Normalize a role name: first letter uppercased, the rest lowercased, so
/// `"staff"` and `"STAFF"` both resolve the seeded `Staff` group.
fn capitalize(role: &str) -> String {
    let mut chars = role.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

fn string_field<'a>(payload: &'a Value, key: &str) -> Result<&'a str, ApiError> {
    payload
        .get(key)
        .ok_or_else(ApiError::key_error)?
        .as_str()
        .ok_or_else(|| ApiError::value_error(format!("Field '{key}' must be a string")))
}

pub fn validate_token_request(payload: &Value) -> Result<TokenRequest, ApiError> {
    let username = string_field(payload, "username")?;
    let password = string_field(payload, "password")?;
    if username.is_empty() || password.is_empty() {
        return Err(AuthError::NoCredentials.into());
    }
    Ok(TokenRequest {
        username: username.to_string(),
        password: password.to_string(),
    })
}

pub fn validate_refresh_request(payload: &Value) -> Result<RefreshRequest, ApiError> {
    let token = string_field(payload, "token")?;
    if token.is_empty() {
        return Err(ApiError::all_fields_required());
    }
    Ok(RefreshRequest {
        token: token.to_string(),
    })
}

pub fn validate_create_user(payload: &Value) -> Result<CreateUserRequest, ApiError> {
    let phone_number = string_field(payload, "phone_number")?;
    let role = string_field(payload, "role")?;
    if phone_number.is_empty() || role.is_empty() {
        return Err(ApiError::all_fields_required());
    }
    if !is_phone_valid(phone_number) {
        return Err(ApiError::value_error("Invalid phone number"));
    }

    // Optional; only used when the user does not exist yet.
    let password = match payload.get("password") {
        None | Some(Value::Null) => None,
        Some(value) => {
            let password = value
                .as_str()
                .ok_or_else(|| ApiError::value_error("Field 'password' must be a string"))?;
            if password.is_empty() {
                return Err(ApiError::all_fields_required());
            }
            Some(password.to_string())
        }
    };

    Ok(CreateUserRequest {
        phone_number: phone_number.to_string(),
        role: capitalize(role),
        password,
    })
}

pub fn validate_enable_disable(payload: &Value) -> Result<EnableDisableRequest, ApiError> {
    let phone_number = string_field(payload, "phone_number")?;
    if phone_number.is_empty() {
        return Err(ApiError::all_fields_required());
    }
    if !is_phone_valid(phone_number) {
        return Err(ApiError::value_error("Invalid phone number"));
    }
    let disable = payload
        .get("disable")
        .ok_or_else(ApiError::key_error)?
        .as_bool()
        .ok_or_else(|| ApiError::value_error("Field 'disable' must be a boolean"))?;

    Ok(EnableDisableRequest {
        phone_number: phone_number.to_string(),
        disable,
    })
}
