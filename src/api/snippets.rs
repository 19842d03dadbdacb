// SPDX-License-Identifier: AGPL-3.0-or-later

//! Snippet CRUD endpoints.
//!
//! Snippet traffic authenticates through the federated identity provider.
//! Listing and retrieval are open to anonymous callers. Creation requires an
//! authenticated user, who becomes the owner. Updates are allowed to the
//! owner, or to any caller whose roles grant the snippets change permission.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::auth::{FederatedAuth, MaybeAuth};
use crate::error::ApiError;
use crate::models::{CreateSnippetRequest, Snippet, UpdateSnippetRequest};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/v1/snippets/",
    tag = "Snippets",
    responses((status = 200, body = [Snippet]))
)]
pub async fn list_snippets(
    MaybeAuth(_principal): MaybeAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Snippet>>, ApiError> {
    let store = state.store.read().await;
    Ok(Json(store.list_live_snippets()))
}

#[utoipa::path(
    get,
    path = "/v1/snippets/{snippet_id}",
    params(("snippet_id" = Uuid, Path, description = "Snippet identifier")),
    tag = "Snippets",
    responses(
        (status = 200, body = Snippet),
        (status = 404, description = "Unknown snippet")
    )
)]
pub async fn get_snippet(
    MaybeAuth(_principal): MaybeAuth,
    Path(snippet_id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<Snippet>, ApiError> {
    let store = state.store.read().await;
    store
        .find_live_snippet(&snippet_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Snippet not found"))
}

#[utoipa::path(
    post,
    path = "/v1/snippets/",
    request_body = CreateSnippetRequest,
    tag = "Snippets",
    responses(
        (status = 201, body = Snippet),
        (status = 400, description = "Empty or duplicate title")
    )
)]
pub async fn create_snippet(
    FederatedAuth(actor): FederatedAuth,
    State(state): State<AppState>,
    Json(request): Json<CreateSnippetRequest>,
) -> Result<(StatusCode, Json<Snippet>), ApiError> {
    let mut store = state.store.write().await;
    let snippet = store.create_snippet(&actor.username, request)?;
    drop(store);

    info!(owner = %actor.username, snippet = %snippet.id, "created snippet");
    Ok((StatusCode::CREATED, Json(snippet)))
}

#[utoipa::path(
    patch,
    path = "/v1/snippets/{snippet_id}",
    params(("snippet_id" = Uuid, Path, description = "Snippet identifier")),
    request_body = UpdateSnippetRequest,
    tag = "Snippets",
    responses(
        (status = 200, body = Snippet),
        (status = 403, description = "Caller is neither owner nor editor"),
        (status = 404, description = "Unknown snippet")
    )
)]
pub async fn update_snippet(
    FederatedAuth(actor): FederatedAuth,
    Path(snippet_id): Path<Uuid>,
    State(state): State<AppState>,
    Json(request): Json<UpdateSnippetRequest>,
) -> Result<Json<Snippet>, ApiError> {
    let mut store = state.store.write().await;

    let owner = store
        .find_live_snippet(&snippet_id)
        .map(|s| s.owner.clone())
        .ok_or_else(|| ApiError::not_found("Snippet not found"))?;
    if owner != actor.username && !store.roles_grant(&actor.roles, "snippets", "change_snippet") {
        return Err(ApiError::permission_denied());
    }

    let snippet = store.update_snippet(&snippet_id, request)?;
    Ok(Json(snippet))
}
