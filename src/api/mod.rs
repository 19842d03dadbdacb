// SPDX-License-Identifier: AGPL-3.0-or-later

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::permissions::{ModulePermissions, RoleView},
    models::{
        AckResponse, CreateSnippetRequest, CreateUserRequest, EnableDisableRequest, Language,
        RefreshRequest, Snippet, TokenRequest, TokenResponse, UpdateSnippetRequest,
    },
    state::AppState,
};

pub mod admin;
pub mod health;
pub mod snippets;
pub mod users;
pub mod validation;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/users/token/", post(users::obtain_token))
        .route("/users/refresh-token/", post(users::refresh_token))
        .route("/users/create/", post(admin::create_user))
        .route("/users/enable_disable/", post(admin::enable_disable))
        .route("/users/get_role/", get(admin::list_roles))
        .route(
            "/snippets/",
            get(snippets::list_snippets).post(snippets::create_snippet),
        )
        .route(
            "/snippets/{snippet_id}",
            get(snippets::get_snippet).patch(snippets::update_snippet),
        );

    Router::new()
        .nest("/v1", v1_routes)
        .route("/health", get(health::health))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        users::obtain_token,
        users::refresh_token,
        admin::create_user,
        admin::enable_disable,
        admin::list_roles,
        snippets::list_snippets,
        snippets::get_snippet,
        snippets::create_snippet,
        snippets::update_snippet,
        health::health
    ),
    components(
        schemas(
            TokenRequest,
            RefreshRequest,
            TokenResponse,
            CreateUserRequest,
            EnableDisableRequest,
            AckResponse,
            RoleView,
            ModulePermissions,
            Snippet,
            Language,
            CreateSnippetRequest,
            UpdateSnippetRequest,
            admin::RoleListResponse,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Users", description = "Token issuance and user provisioning"),
        (name = "Snippets", description = "Snippet management"),
        (name = "Health", description = "Liveness probes")
    )
)]
struct ApiDoc;
