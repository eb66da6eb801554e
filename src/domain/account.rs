//! Account domain types.
//!
//! The account is the persistent identity record. The per-request
//! authenticated identity is a separate projection (`auth::CurrentUser`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Account role gating administrative operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Regular account.
    User,
    /// Can list, update, delete, and toggle any account.
    Admin,
}

impl Role {
    /// Check if this role has admin privileges.
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "USER"),
            Role::Admin => write!(f, "ADMIN"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// Account usability flag. Inactive accounts are only toggled by admins;
/// they are not barred from authenticating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountStatus {
    Active,
    Inactive,
}

impl AccountStatus {
    /// The opposite status, used by the admin toggle endpoint.
    pub fn toggled(&self) -> Self {
        match self {
            AccountStatus::Active => AccountStatus::Inactive,
            AccountStatus::Inactive => AccountStatus::Active,
        }
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountStatus::Active => write!(f, "ACTIVE"),
            AccountStatus::Inactive => write!(f, "INACTIVE"),
        }
    }
}

impl std::str::FromStr for AccountStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ACTIVE" => Ok(AccountStatus::Active),
            "INACTIVE" => Ok(AccountStatus::Inactive),
            _ => Err(format!("Unknown status: {}", s)),
        }
    }
}

/// A user account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Account {
    /// Unique identifier.
    pub id: Uuid,
    /// Unique login name, also the token subject.
    pub username: String,
    /// Unique email address.
    pub email: String,
    /// bcrypt hash of the password. Never serialized.
    #[serde(skip)]
    pub password_hash: String,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Contact phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Permission tier.
    pub role: Role,
    /// Usability flag.
    pub status: AccountStatus,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
    /// When the account last logged in successfully.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
    /// Avatar image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl Account {
    /// Create a new account from a registration. New accounts start
    /// as ACTIVE regular users.
    pub fn new(
        username: String,
        email: String,
        password_hash: String,
        full_name: Option<String>,
        phone: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            full_name,
            phone,
            role: Role::User,
            status: AccountStatus::Active,
            created_at: now,
            updated_at: now,
            last_login: None,
            avatar_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        assert_eq!(Role::User.to_string(), "USER");
        assert_eq!(Role::Admin.to_string(), "ADMIN");
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_status_toggle() {
        assert_eq!(AccountStatus::Active.toggled(), AccountStatus::Inactive);
        assert_eq!(AccountStatus::Inactive.toggled(), AccountStatus::Active);
        assert_eq!(
            "inactive".parse::<AccountStatus>().unwrap(),
            AccountStatus::Inactive
        );
    }

    #[test]
    fn test_new_account_defaults() {
        let account = Account::new(
            "alice".to_string(),
            "alice@example.com".to_string(),
            "$2b$12$hash".to_string(),
            Some("Alice".to_string()),
            None,
        );
        assert_eq!(account.role, Role::User);
        assert_eq!(account.status, AccountStatus::Active);
        assert!(account.last_login.is_none());
        assert_eq!(account.created_at, account.updated_at);
    }
}
