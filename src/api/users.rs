// SPDX-License-Identifier: AGPL-3.0-or-later

//! Token issuance and refresh endpoints.

use axum::{
    extract::State,
    http::header::SET_COOKIE,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use tracing::info;

use crate::api::validation::{validate_refresh_request, validate_token_request};
use crate::auth::token::IssuedToken;
use crate::error::ApiError;
use crate::models::{RefreshRequest, TokenRequest, TokenResponse};
use crate::state::AppState;

/// Renders an issued token, attaching an HTTP-only cookie when a cookie name
/// is configured.
fn token_response(state: &AppState, issued: IssuedToken) -> Response {
    let body = TokenResponse {
        token: issued.token.clone(),
        username: issued.username,
        expires_at: issued.expires_at,
    };

    match &state.settings.cookie {
        Some(name) => {
            let cookie = format!(
                "{name}={}; HttpOnly; Path=/; Max-Age={}",
                issued.token,
                state.tokens.ttl_secs()
            );
            ([(SET_COOKIE, cookie)], Json(body)).into_response()
        }
        None => Json(body).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/v1/users/token/",
    request_body = TokenRequest,
    tag = "Users",
    responses(
        (status = 200, body = TokenResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn obtain_token(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Response, ApiError> {
    let request = validate_token_request(&payload)?;

    // Argon2 verification is CPU-bound; clone the record out of the store
    // lock and verify on the blocking pool.
    let user = {
        let store = state.store.read().await;
        store.find_user(&request.username).cloned()
    };
    let tokens = state.tokens.clone();
    let issued = tokio::task::spawn_blocking(move || {
        tokens.issue_for_user(user.as_ref(), &request.password)
    })
    .await
    .map_err(|_| ApiError::service_unavailable("token issuance task failed"))??;

    info!(username = %issued.username, "issued access token");
    Ok(token_response(&state, issued))
}

#[utoipa::path(
    post,
    path = "/v1/users/refresh-token/",
    request_body = RefreshRequest,
    tag = "Users",
    responses(
        (status = 200, body = TokenResponse),
        (status = 401, description = "Token invalid or expired")
    )
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Response, ApiError> {
    let request = validate_refresh_request(&payload)?;

    let store = state.store.read().await;
    let issued = state.tokens.refresh(&store, &request.token)?;
    drop(store);

    info!(username = %issued.username, "refreshed access token");
    Ok(token_response(&state, issued))
}
