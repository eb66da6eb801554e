//! Database models for UserHub.
//!
//! These are the row types returned by SQLx queries.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::Account;
use crate::error::UserHubError;

/// Database row for the accounts table.
#[derive(Debug, Clone, FromRow)]
pub struct AccountRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub role: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
    pub last_login: Option<String>,
    pub avatar_url: Option<String>,
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, UserHubError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| UserHubError::Internal(e.to_string()))
}

impl TryFrom<AccountRow> for Account {
    type Error = UserHubError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Account {
            id: Uuid::parse_str(&row.id).map_err(|e| UserHubError::Internal(e.to_string()))?,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            full_name: row.full_name,
            phone: row.phone,
            role: row.role.parse().map_err(UserHubError::Internal)?,
            status: row.status.parse().map_err(UserHubError::Internal)?,
            created_at: parse_timestamp(&row.created_at)?,
            updated_at: parse_timestamp(&row.updated_at)?,
            last_login: row.last_login.as_deref().map(parse_timestamp).transpose()?,
            avatar_url: row.avatar_url,
        })
    }
}
