// SPDX-License-Identifier: AGPL-3.0-or-later

//! User provisioning and role introspection endpoints.
//!
//! These routes are driven by sibling backend services holding a local
//! access token. Provisioning mirrors the registration to the central
//! permission service before the local store is touched, so an upstream
//! rejection leaves no half-created account behind.

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::Value;
use tracing::info;
use utoipa::ToSchema;

use crate::api::validation::{validate_create_user, validate_enable_disable};
use crate::auth::{aggregate_role_permissions, hash_password, Auth, RoleView};
use crate::error::ApiError;
use crate::models::{AckResponse, CreateUserRequest, EnableDisableRequest};
use crate::state::AppState;

/// Response for `GET /v1/users/get_role/`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoleListResponse {
    pub data: Vec<RoleView>,
    pub service_id: u32,
    pub message: String,
    pub code: String,
}

#[utoipa::path(
    post,
    path = "/v1/users/create/",
    request_body = CreateUserRequest,
    tag = "Users",
    responses(
        (status = 200, body = AckResponse),
        (status = 400, description = "Validation failure"),
        (status = 403, description = "Caller may not provision users")
    )
)]
pub async fn create_user(
    Auth(actor): Auth,
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<AckResponse>, ApiError> {
    let request = validate_create_user(&payload)?;

    {
        let store = state.store.read().await;
        if !store.roles_grant(&actor.roles, "users", "add_user") {
            return Err(ApiError::permission_denied());
        }
        // Unknown roles are rejected here, before the mirror call below can
        // touch the sibling service.
        if !store.role_exists(&request.role) {
            return Err(ApiError::value_error(format!(
                "Unknown role '{}'",
                request.role
            )));
        }
    }

    // Hash outside the store lock; argon2 is deliberately slow.
    let password_hash = match &request.password {
        Some(password) => Some(hash_password(password)?),
        None => None,
    };

    // Mirror to the permission service first. If the upstream rejects the
    // registration the local store is left untouched.
    if let Some(client) = &state.permission_service {
        client
            .add_user_and_permission(state.service_id, &request.phone_number, &request.role)
            .await?;
    }

    let mut store = state.store.write().await;
    store.create_or_update_user(&request.phone_number, &request.role, password_hash)?;
    drop(store);

    info!(
        actor = %actor.username,
        user = %request.phone_number,
        role = %request.role,
        "provisioned user"
    );
    Ok(Json(AckResponse::request_success()))
}

#[utoipa::path(
    post,
    path = "/v1/users/enable_disable/",
    request_body = EnableDisableRequest,
    tag = "Users",
    responses(
        (status = 200, body = AckResponse),
        (status = 404, description = "Unknown user")
    )
)]
pub async fn enable_disable(
    Auth(actor): Auth,
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<Json<AckResponse>, ApiError> {
    let request = validate_enable_disable(&payload)?;

    let mut store = state.store.write().await;
    if !store.roles_grant(&actor.roles, "users", "change_user") {
        return Err(ApiError::permission_denied());
    }
    store.set_active(&request.phone_number, !request.disable)?;
    drop(store);

    info!(
        actor = %actor.username,
        user = %request.phone_number,
        disabled = request.disable,
        "toggled user"
    );
    Ok(Json(AckResponse::request_success()))
}

#[utoipa::path(
    get,
    path = "/v1/users/get_role/",
    tag = "Users",
    responses((status = 200, body = RoleListResponse))
)]
pub async fn list_roles(
    Auth(actor): Auth,
    State(state): State<AppState>,
) -> Result<Json<RoleListResponse>, ApiError> {
    let store = state.store.read().await;
    if !store.roles_grant(&actor.roles, "users", "view_user") {
        return Err(ApiError::permission_denied());
    }
    let tuples = store.role_permission_tuples();
    drop(store);

    let data = aggregate_role_permissions(&tuples, &state.operations);
    Ok(Json(RoleListResponse {
        data,
        service_id: state.service_id,
        message: "Request successful".to_string(),
        code: "REQUEST_SUCCESS".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::TokenService;
    use crate::auth::AuthenticatedUser;
    use crate::providers::PermissionServiceClient;
    use crate::store::Store;
    use axum::http::StatusCode;
    use serde_json::json;

    fn test_state() -> AppState {
        let mut store = Store::new();
        store.seed_roles();
        AppState::new(store, TokenService::new("test-secret", 3600))
    }

    fn admin() -> AuthenticatedUser {
        AuthenticatedUser {
            username: "+8801700000000".to_string(),
            roles: vec!["Admin".to_string()],
            is_service_user: true,
        }
    }

    fn reader() -> AuthenticatedUser {
        AuthenticatedUser {
            username: "+8801700000009".to_string(),
            roles: vec!["Reader".to_string()],
            is_service_user: false,
        }
    }

    #[tokio::test]
    async fn create_user_provisions_and_acks() {
        let state = test_state();
        let Json(ack) = create_user(
            Auth(admin()),
            State(state.clone()),
            Json(json!({"phone_number": "+8801700000001", "role": "Staff"})),
        )
        .await
        .unwrap();

        assert_eq!(ack.code, "REQUEST_SUCCESS");

        let store = state.store.read().await;
        let user = store.find_user("+8801700000001").unwrap();
        assert_eq!(user.roles, vec!["Staff".to_string()]);
    }

    #[tokio::test]
    async fn create_user_is_idempotent() {
        let state = test_state();
        for role in ["Staff", "Reader"] {
            create_user(
                Auth(admin()),
                State(state.clone()),
                Json(json!({"phone_number": "+8801700000002", "role": role})),
            )
            .await
            .unwrap();
        }

        let store = state.store.read().await;
        let user = store.find_user("+8801700000002").unwrap();
        assert_eq!(user.roles, vec!["Reader".to_string()]);
    }

    #[tokio::test]
    async fn create_user_unknown_role_is_a_value_error() {
        let state = test_state();
        let err = create_user(
            Auth(admin()),
            State(state),
            Json(json!({"phone_number": "+8801700000003", "role": "Owner"})),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, "VALUE_ERROR");
    }

    #[tokio::test]
    async fn unknown_role_is_rejected_before_the_mirror_call() {
        // An unroutable mirror would surface SERVICE_UNAVAILABLE if it were
        // contacted; the unknown role must fail validation first.
        let state = test_state()
            .with_permission_service(PermissionServiceClient::new("http://127.0.0.1:1"));
        let err = create_user(
            Auth(admin()),
            State(state.clone()),
            Json(json!({"phone_number": "+8801700000006", "role": "Owner"})),
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, "VALUE_ERROR");
        assert!(state
            .store
            .read()
            .await
            .find_user("+8801700000006")
            .is_none());
    }

    #[tokio::test]
    async fn lowercase_role_name_resolves_the_seeded_group() {
        let state = test_state();
        create_user(
            Auth(admin()),
            State(state.clone()),
            Json(json!({"phone_number": "+8801700000007", "role": "reader"})),
        )
        .await
        .unwrap();

        let store = state.store.read().await;
        let user = store.find_user("+8801700000007").unwrap();
        assert_eq!(user.roles, vec!["Reader".to_string()]);
    }

    #[tokio::test]
    async fn create_user_requires_the_add_user_permission() {
        let state = test_state();
        let err = create_user(
            Auth(reader()),
            State(state),
            Json(json!({"phone_number": "+8801700000004", "role": "Reader"})),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn enable_disable_round_trip() {
        let state = test_state();
        create_user(
            Auth(admin()),
            State(state.clone()),
            Json(json!({"phone_number": "+8801700000005", "role": "Reader"})),
        )
        .await
        .unwrap();

        enable_disable(
            Auth(admin()),
            State(state.clone()),
            Json(json!({"phone_number": "+8801700000005", "disable": true})),
        )
        .await
        .unwrap();
        assert!(
            !state
                .store
                .read()
                .await
                .find_user("+8801700000005")
                .unwrap()
                .is_active
        );

        enable_disable(
            Auth(admin()),
            State(state.clone()),
            Json(json!({"phone_number": "+8801700000005", "disable": false})),
        )
        .await
        .unwrap();
        assert!(
            state
                .store
                .read()
                .await
                .find_user("+8801700000005")
                .unwrap()
                .is_active
        );
    }

    #[tokio::test]
    async fn enable_disable_unknown_user_is_not_found() {
        let state = test_state();
        let err = enable_disable(
            Auth(admin()),
            State(state),
            Json(json!({"phone_number": "+8801799999999", "disable": true})),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_roles_translates_operation_codes() {
        let state = test_state();
        let Json(response) = list_roles(Auth(admin()), State(state)).await.unwrap();

        assert_eq!(response.code, "REQUEST_SUCCESS");
        let admin_view = response
            .data
            .iter()
            .find(|view| view.name == "Admin")
            .unwrap();
        let snippets = admin_view
            .permissions
            .iter()
            .find(|m| m.module_name == "snippets")
            .unwrap();
        assert_eq!(
            snippets.operations,
            vec!["create", "view", "update", "delete"]
        );
    }

    #[tokio::test]
    async fn list_roles_requires_the_view_user_permission() {
        let state = test_state();
        let err = list_roles(Auth(reader()), State(state)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }
}
