//! Credential verification.

use chrono::Utc;

use crate::auth::password::verify_password;
use crate::domain::Account;
use crate::error::{UserHubError, UserHubResult};
use crate::storage::AccountRepository;

/// Message returned for any credential failure. Unknown usernames and
/// wrong passwords are indistinguishable to the caller, so usernames
/// cannot be enumerated through the login endpoint.
const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Checks submitted credentials against stored bcrypt hashes.
#[derive(Clone)]
pub struct CredentialVerifier {
    repository: AccountRepository,
}

impl CredentialVerifier {
    pub fn new(repository: AccountRepository) -> Self {
        Self { repository }
    }

    /// Verify a username/password pair.
    ///
    /// On success, records the login time and returns the account.
    /// Inactive accounts are not barred from authenticating; status is
    /// only an admin-managed flag.
    pub async fn verify(&self, username: &str, password: &str) -> UserHubResult<Account> {
        let account = self
            .repository
            .find_by_username(username)
            .await?
            .ok_or_else(|| UserHubError::Unauthorized(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(password, &account.password_hash) {
            tracing::warn!(username = %username, "Failed login attempt");
            return Err(UserHubError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let now = Utc::now();
        self.repository.touch_last_login(account.id, now).await?;

        Ok(Account {
            last_login: Some(now),
            ..account
        })
    }
}
