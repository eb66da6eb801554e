//! HTTP request handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use crate::api::types::*;
use crate::auth::{hash_password, CurrentUser};
use crate::domain::{Account, AccountStatus, Role};
use crate::error::{UserHubError, UserHubResult};
use crate::AppState;

fn validate_registration(request: &RegisterRequest) -> UserHubResult<()> {
    if request.username.trim().is_empty() {
        return Err(UserHubError::Validation("Username is required".to_string()));
    }
    if request.email.trim().is_empty() || !request.email.contains('@') {
        return Err(UserHubError::Validation(
            "A valid email address is required".to_string(),
        ));
    }
    if request.password.is_empty() {
        return Err(UserHubError::Validation("Password is required".to_string()));
    }
    Ok(())
}

/// Register a new account.
///
/// POST /auth/register
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = MessageResponse),
        (status = 400, description = "Invalid fields or duplicate username/email")
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> UserHubResult<(StatusCode, Json<MessageResponse>)> {
    let Json(request) = payload?;
    validate_registration(&request)?;

    if state.repository.exists_by_username(&request.username).await? {
        return Err(UserHubError::Duplicate(
            "Username already in use".to_string(),
        ));
    }
    if state.repository.exists_by_email(&request.email).await? {
        return Err(UserHubError::Duplicate(
            "Email already registered".to_string(),
        ));
    }

    let password_hash = hash_password(&request.password, state.bcrypt_cost)?;
    let account = Account::new(
        request.username,
        request.email,
        password_hash,
        request.full_name,
        request.phone,
    );
    state.repository.create_account(&account).await?;

    tracing::info!(
        account_id = %account.id,
        username = %account.username,
        "Account registered"
    );

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Registration successful".to_string(),
        }),
    ))
}

/// Log in with username and password, returning a bearer token.
///
/// POST /auth/login
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal error")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> UserHubResult<Json<LoginResponse>> {
    let Json(request) = payload?;
    let account = state
        .verifier
        .verify(&request.username, &request.password)
        .await?;

    let token = state.jwt_manager.issue(&account.username)?;

    tracing::info!(
        account_id = %account.id,
        username = %account.username,
        "User logged in"
    );

    Ok(Json(LoginResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: state.jwt_manager.token_ttl_secs(),
        user: account.into(),
    }))
}

/// Get the current caller's profile.
///
/// GET /users/me
#[utoipa::path(
    get,
    path = "/users/me",
    responses(
        (status = 200, description = "Current account profile", body = AccountProfile),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> UserHubResult<Json<AccountProfile>> {
    let account = state.repository.find_by_id(current.id).await?;
    Ok(Json(account.into()))
}

/// Get an account's profile by ID.
///
/// GET /users/{id}
#[utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = Uuid, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account profile", body = AccountProfile),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Account not found")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> UserHubResult<Json<AccountProfile>> {
    let account = state.repository.find_by_id(id).await?;
    Ok(Json(account.into()))
}

/// List all accounts (admin only).
///
/// GET /users
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "List of account profiles", body = [AccountProfile]),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not an admin")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn list_accounts(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> UserHubResult<Json<Vec<AccountProfile>>> {
    current.require_admin()?;

    let accounts = state.repository.list_accounts().await?;
    Ok(Json(accounts.into_iter().map(Into::into).collect()))
}

/// Update an account (admin only).
///
/// PUT /users/{id}
#[utoipa::path(
    put,
    path = "/users/{id}",
    params(("id" = Uuid, Path, description = "Account ID")),
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Updated profile", body = AccountProfile),
        (status = 400, description = "Invalid fields or duplicate email"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Account not found")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn update_account(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdateAccountRequest>, JsonRejection>,
) -> UserHubResult<Json<AccountProfile>> {
    current.require_admin()?;

    let Json(request) = payload?;
    let role = request
        .role
        .as_deref()
        .map(|r| r.parse::<Role>().map_err(UserHubError::Validation))
        .transpose()?;
    let status = request
        .status
        .as_deref()
        .map(|s| s.parse::<AccountStatus>().map_err(UserHubError::Validation))
        .transpose()?;

    let existing = state.repository.find_by_id(id).await?;

    // Re-check email uniqueness only when it actually changes
    if let Some(ref email) = request.email {
        if *email != existing.email && state.repository.exists_by_email(email).await? {
            return Err(UserHubError::Duplicate(
                "Email already registered".to_string(),
            ));
        }
    }

    let account = state
        .repository
        .update_account(
            id,
            request.email.as_deref(),
            request.full_name.as_deref(),
            request.phone.as_deref(),
            role,
            status,
            request.avatar_url.as_deref(),
        )
        .await?;

    tracing::info!(
        account_id = %id,
        updated_by = %current.username,
        "Account updated"
    );

    Ok(Json(account.into()))
}

/// Delete an account (admin only; never your own).
///
/// DELETE /users/{id}
#[utoipa::path(
    delete,
    path = "/users/{id}",
    params(("id" = Uuid, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account deleted", body = MessageResponse),
        (status = 400, description = "Attempted self-deletion"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Account not found")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> UserHubResult<Json<MessageResponse>> {
    current.require_admin()?;

    let target = state.repository.find_by_id(id).await?;
    if target.id == current.id {
        return Err(UserHubError::SelfAction(
            "Cannot delete your own account".to_string(),
        ));
    }

    state.repository.delete_account(id).await?;

    tracing::info!(
        account_id = %id,
        username = %target.username,
        deleted_by = %current.username,
        "Account deleted"
    );

    Ok(Json(MessageResponse {
        message: "Account deleted".to_string(),
    }))
}

/// Flip an account between ACTIVE and INACTIVE (admin only; never your own).
///
/// PATCH /users/{id}/status
#[utoipa::path(
    patch,
    path = "/users/{id}/status",
    params(("id" = Uuid, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Status toggled", body = MessageResponse),
        (status = 400, description = "Attempted self-toggle"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Not an admin"),
        (status = 404, description = "Account not found")
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn toggle_account_status(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> UserHubResult<Json<MessageResponse>> {
    current.require_admin()?;

    let target = state.repository.find_by_id(id).await?;
    if target.id == current.id {
        return Err(UserHubError::SelfAction(
            "Cannot change the status of your own account".to_string(),
        ));
    }

    let new_status = target.status.toggled();
    state.repository.set_status(id, new_status).await?;

    tracing::info!(
        account_id = %id,
        username = %target.username,
        new_status = %new_status,
        toggled_by = %current.username,
        "Account status toggled"
    );

    let verb = match new_status {
        AccountStatus::Active => "enabled",
        AccountStatus::Inactive => "disabled",
    };
    Ok(Json(MessageResponse {
        message: format!("Account {}", verb),
    }))
}

/// Health check endpoint.
///
/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    // Check database connectivity
    let db_status = match sqlx::query("SELECT 1")
        .fetch_one(state.repository.pool())
        .await
    {
        Ok(_) => "connected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
