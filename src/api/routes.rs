//! Route definitions for the API.

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers;
use crate::auth::{authenticate, require_auth, AuthState};
use crate::AppState;

/// Security scheme modifier for OpenAPI.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::register,
        handlers::login,
        handlers::get_current_user,
        handlers::get_account,
        handlers::list_accounts,
        handlers::update_account,
        handlers::delete_account,
        handlers::toggle_account_status,
        handlers::health_check,
    ),
    components(schemas(
        crate::api::types::RegisterRequest,
        crate::api::types::LoginRequest,
        crate::api::types::LoginResponse,
        crate::api::types::AccountProfile,
        crate::api::types::UpdateAccountRequest,
        crate::api::types::MessageResponse,
        crate::api::types::HealthResponse,
        crate::domain::Role,
        crate::domain::AccountStatus,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "users", description = "Account profile management"),
        (name = "health", description = "Health and status endpoints")
    ),
    info(
        title = "UserHub API",
        version = "0.1.0",
        description = "User account microservice - registration, JWT authentication, and role-gated profile management",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Build the API router.
///
/// Every route is served both bare and under `/api` to match the
/// deployed front-end. The `authenticate` middleware wraps everything
/// and fails open; `/users` routes additionally require an identity.
pub fn build_router(state: AppState, auth_state: AuthState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/health", get(handlers::health_check));

    // Routes requiring an authenticated caller; admin checks live in
    // the individual handlers
    let user_routes = Router::new()
        .route("/users", get(handlers::list_accounts))
        .route("/users/me", get(handlers::get_current_user))
        .route(
            "/users/:id",
            get(handlers::get_account)
                .put(handlers::update_account)
                .delete(handlers::delete_account),
        )
        .route("/users/:id/status", patch(handlers::toggle_account_status))
        .route_layer(middleware::from_fn(require_auth));

    let api = Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .with_state(state);

    Router::new()
        .merge(api.clone())
        .nest("/api", api)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn_with_state(auth_state, authenticate))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
