//! UserHub - user account microservice.
//!
//! Provides registration, JWT-based login, and role-gated account
//! management over HTTP.

use sqlx::sqlite::SqlitePool;
use tokio::net::TcpListener;

mod api;
mod auth;
mod config;
mod domain;
mod error;
mod logging;
mod storage;

use crate::api::build_router;
use crate::auth::{hash_password, AuthState, CredentialVerifier, JwtManager};
use crate::config::Config;
use crate::domain::{Account, Role};
use crate::storage::AccountRepository;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database repository.
    pub repository: AccountRepository,
    /// JWT manager for token operations.
    pub jwt_manager: JwtManager,
    /// Credential verifier for login.
    pub verifier: CredentialVerifier,
    /// Bcrypt cost used when hashing new passwords.
    pub bcrypt_cost: u32,
}

/// Seed the configured admin account if its username is still free.
async fn bootstrap_admin(repository: &AccountRepository, config: &Config) -> anyhow::Result<()> {
    let Some(admin) = &config.auth.bootstrap_admin else {
        return Ok(());
    };

    if repository.exists_by_username(&admin.username).await? {
        tracing::debug!(username = %admin.username, "Bootstrap admin already exists");
        return Ok(());
    }

    let password_hash = hash_password(&admin.password, config.auth.bcrypt_cost)?;
    let mut account = Account::new(
        admin.username.clone(),
        admin.email.clone(),
        password_hash,
        None,
        None,
    );
    account.role = Role::Admin;
    repository.create_account(&account).await?;

    tracing::info!(username = %admin.username, "Bootstrap admin account created");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if present)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: No .env file loaded ({e})");
    }

    // Initialize logging
    logging::init();

    tracing::info!("Starting UserHub v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = Config::load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        database = %config.database.url,
        "Configuration loaded"
    );

    // Connect to database
    let pool = SqlitePool::connect(&config.database.url)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to database");
            anyhow::anyhow!("Database connection error: {}", e)
        })?;

    // Initialize repository and schema
    let repository = AccountRepository::new(pool);
    repository.init_schema().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to initialize database schema");
        anyhow::anyhow!("Schema initialization error: {}", e)
    })?;

    tracing::info!("Database connected and schema initialized");

    bootstrap_admin(&repository, &config).await?;

    // Build authentication components
    let jwt_manager = JwtManager::new(
        &config.auth.jwt_secret,
        config.auth.jwt_issuer.clone(),
        config.auth.token_ttl_secs,
    );
    let verifier = CredentialVerifier::new(repository.clone());

    // Build application state
    let state = AppState {
        repository: repository.clone(),
        jwt_manager: jwt_manager.clone(),
        verifier,
        bcrypt_cost: config.auth.bcrypt_cost,
    };
    let auth_state = AuthState {
        jwt_manager,
        repository,
    };

    // Build router
    let app = build_router(state, auth_state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(address = %addr, "Server listening");
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
