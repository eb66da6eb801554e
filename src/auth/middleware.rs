//! Authentication middleware for axum.
//!
//! `authenticate` runs on every request and fails open: a missing,
//! malformed, or expired token means the request carries no identity,
//! never an error response. Protected routes layer `require_auth` on
//! top; role checks happen per handler.

use axum::{
    body::Body,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::JwtManager;
use crate::domain::Role;
use crate::error::{UserHubError, UserHubResult};
use crate::storage::AccountRepository;

/// Per-request identity, derived from a validated token plus an account
/// lookup. Created at request entry, discarded at request exit. This is
/// deliberately not the `Account` record: handlers that need the full
/// profile fetch it themselves.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
}

impl CurrentUser {
    /// Reject with 403 unless this identity has the ADMIN role.
    pub fn require_admin(&self) -> UserHubResult<()> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(UserHubError::Forbidden(
                "Administrator privileges required".to_string(),
            ))
        }
    }
}

/// State needed to resolve a bearer token to an identity.
#[derive(Clone)]
pub struct AuthState {
    pub jwt_manager: JwtManager,
    pub repository: AccountRepository,
}

/// Extract the bearer token from the `Authorization` header, if any.
fn bearer_token(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// Establish the caller's identity for the rest of the pipeline.
///
/// State machine per request: no token -> proceed unauthenticated;
/// token present -> validate signature/expiry, resolve the subject to an
/// account, attach `CurrentUser`. Any failure along the way degrades to
/// "no identity" so downstream authorization can produce the 401/403,
/// and a broken token never takes down a public route.
pub async fn authenticate(
    State(auth): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(&request) {
        match auth.jwt_manager.validate(token) {
            Ok(claims) => match auth.repository.find_by_username(&claims.sub).await {
                Ok(Some(account)) => {
                    request.extensions_mut().insert(CurrentUser {
                        id: account.id,
                        username: account.username,
                        role: account.role,
                    });
                }
                Ok(None) => {
                    tracing::debug!(subject = %claims.sub, "Token subject no longer exists");
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to resolve token subject");
                }
            },
            Err(e) => {
                // Claimed subject is useful when chasing expired-token reports
                let subject = auth.jwt_manager.subject_of(token);
                tracing::debug!(error = %e, subject = ?subject, "Rejected bearer token");
            }
        }
    }

    next.run(request).await
}

/// Route layer for endpoints that need an authenticated caller.
pub async fn require_auth(
    request: Request<Body>,
    next: Next,
) -> Result<Response, UserHubError> {
    if request.extensions().get::<CurrentUser>().is_none() {
        return Err(UserHubError::Unauthorized(
            "Authentication required".to_string(),
        ));
    }

    Ok(next.run(request).await)
}
