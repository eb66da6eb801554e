//! Repository layer for database operations.

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePool;
use uuid::Uuid;

use crate::domain::{Account, AccountStatus, Role};
use crate::error::{UserHubError, UserHubResult};
use crate::storage::models::AccountRow;

/// Repository for all account database operations.
#[derive(Clone)]
pub struct AccountRepository {
    pool: SqlitePool,
}

impl AccountRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the database schema.
    pub async fn init_schema(&self) -> UserHubResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS accounts (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                full_name TEXT,
                phone TEXT,
                role TEXT NOT NULL DEFAULT 'USER',
                status TEXT NOT NULL DEFAULT 'ACTIVE',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                last_login TEXT,
                avatar_url TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_accounts_username ON accounts(username);
            CREATE INDEX IF NOT EXISTS idx_accounts_email ON accounts(email);
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a new account.
    pub async fn create_account(&self, account: &Account) -> UserHubResult<()> {
        sqlx::query(
            r#"
            INSERT INTO accounts (
                id, username, email, password_hash, full_name, phone,
                role, status, created_at, updated_at, last_login, avatar_url
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(account.id.to_string())
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.full_name)
        .bind(&account.phone)
        .bind(account.role.to_string())
        .bind(account.status.to_string())
        .bind(account.created_at.to_rfc3339())
        .bind(account.updated_at.to_rfc3339())
        .bind(account.last_login.map(|dt| dt.to_rfc3339()))
        .bind(&account.avatar_url)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            // Backstop for the race between the exists checks and the insert
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                UserHubError::Duplicate("Username or email already in use".to_string())
            }
            _ => UserHubError::Database(e),
        })?;

        Ok(())
    }

    /// Get an account by ID.
    pub async fn find_by_id(&self, id: Uuid) -> UserHubResult<Account> {
        let row: AccountRow = sqlx::query_as("SELECT * FROM accounts WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| UserHubError::NotFound(format!("Account {} not found", id)))?;

        row.try_into()
    }

    /// Get an account by username.
    pub async fn find_by_username(&self, username: &str) -> UserHubResult<Option<Account>> {
        let row: Option<AccountRow> = sqlx::query_as("SELECT * FROM accounts WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.try_into()).transpose()
    }

    /// Check whether a username is taken.
    pub async fn exists_by_username(&self, username: &str) -> UserHubResult<bool> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM accounts WHERE username = ?")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }

    /// Check whether an email is taken.
    pub async fn exists_by_email(&self, email: &str) -> UserHubResult<bool> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM accounts WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    /// List all accounts.
    pub async fn list_accounts(&self) -> UserHubResult<Vec<Account>> {
        let rows: Vec<AccountRow> =
            sqlx::query_as("SELECT * FROM accounts ORDER BY created_at ASC")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    /// Update an account's mutable fields. Only the provided fields change.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_account(
        &self,
        id: Uuid,
        email: Option<&str>,
        full_name: Option<&str>,
        phone: Option<&str>,
        role: Option<Role>,
        status: Option<AccountStatus>,
        avatar_url: Option<&str>,
    ) -> UserHubResult<Account> {
        let updated_at = Utc::now().to_rfc3339();

        if let Some(email) = email {
            sqlx::query("UPDATE accounts SET email = ?, updated_at = ? WHERE id = ?")
                .bind(email)
                .bind(&updated_at)
                .bind(id.to_string())
                .execute(&self.pool)
                .await
                .map_err(|e| match &e {
                    // Backstop for the race between the handler's email check and the update
                    sqlx::Error::Database(db) if db.is_unique_violation() => {
                        UserHubError::Duplicate("Email already registered".to_string())
                    }
                    _ => UserHubError::Database(e),
                })?;
        }

        if let Some(full_name) = full_name {
            sqlx::query("UPDATE accounts SET full_name = ?, updated_at = ? WHERE id = ?")
                .bind(full_name)
                .bind(&updated_at)
                .bind(id.to_string())
                .execute(&self.pool)
                .await?;
        }

        if let Some(phone) = phone {
            sqlx::query("UPDATE accounts SET phone = ?, updated_at = ? WHERE id = ?")
                .bind(phone)
                .bind(&updated_at)
                .bind(id.to_string())
                .execute(&self.pool)
                .await?;
        }

        if let Some(role) = role {
            sqlx::query("UPDATE accounts SET role = ?, updated_at = ? WHERE id = ?")
                .bind(role.to_string())
                .bind(&updated_at)
                .bind(id.to_string())
                .execute(&self.pool)
                .await?;
        }

        if let Some(status) = status {
            sqlx::query("UPDATE accounts SET status = ?, updated_at = ? WHERE id = ?")
                .bind(status.to_string())
                .bind(&updated_at)
                .bind(id.to_string())
                .execute(&self.pool)
                .await?;
        }

        if let Some(avatar_url) = avatar_url {
            sqlx::query("UPDATE accounts SET avatar_url = ?, updated_at = ? WHERE id = ?")
                .bind(avatar_url)
                .bind(&updated_at)
                .bind(id.to_string())
                .execute(&self.pool)
                .await?;
        }

        self.find_by_id(id).await
    }

    /// Set an account's status.
    pub async fn set_status(&self, id: Uuid, status: AccountStatus) -> UserHubResult<()> {
        let result = sqlx::query("UPDATE accounts SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.to_string())
            .bind(Utc::now().to_rfc3339())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(UserHubError::NotFound(format!("Account {} not found", id)));
        }

        Ok(())
    }

    /// Record a successful login.
    pub async fn touch_last_login(&self, id: Uuid, when: DateTime<Utc>) -> UserHubResult<()> {
        sqlx::query("UPDATE accounts SET last_login = ? WHERE id = ?")
            .bind(when.to_rfc3339())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete an account.
    pub async fn delete_account(&self, id: Uuid) -> UserHubResult<()> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(UserHubError::NotFound(format!("Account {} not found", id)));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup_test_db() -> AccountRepository {
        let pool = SqlitePool::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");
        let repo = AccountRepository::new(pool);
        repo.init_schema().await.expect("Failed to init schema");
        repo
    }

    fn sample_account(username: &str, email: &str) -> Account {
        Account::new(
            username.to_string(),
            email.to_string(),
            "$2b$04$placeholderhash".to_string(),
            Some("Test User".to_string()),
            Some("555-0100".to_string()),
        )
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = setup_test_db().await;
        let account = sample_account("alice", "alice@x.com");

        repo.create_account(&account).await.unwrap();

        let by_id = repo.find_by_id(account.id).await.unwrap();
        assert_eq!(by_id.username, "alice");
        assert_eq!(by_id.role, Role::User);
        assert_eq!(by_id.status, AccountStatus::Active);
        assert_eq!(by_id.full_name.as_deref(), Some("Test User"));

        let by_username = repo.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(by_username.id, account.id);

        assert!(repo.find_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_exists_checks() {
        let repo = setup_test_db().await;
        repo.create_account(&sample_account("alice", "alice@x.com"))
            .await
            .unwrap();

        assert!(repo.exists_by_username("alice").await.unwrap());
        assert!(!repo.exists_by_username("bob").await.unwrap());
        assert!(repo.exists_by_email("alice@x.com").await.unwrap());
        assert!(!repo.exists_by_email("bob@x.com").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let repo = setup_test_db().await;
        repo.create_account(&sample_account("alice", "alice@x.com"))
            .await
            .unwrap();

        let dup = sample_account("alice", "other@x.com");
        let err = repo.create_account(&dup).await.unwrap_err();
        assert!(matches!(err, UserHubError::Duplicate(_)));
    }

    #[tokio::test]
    async fn test_update_fields() {
        let repo = setup_test_db().await;
        let account = sample_account("alice", "alice@x.com");
        repo.create_account(&account).await.unwrap();

        let updated = repo
            .update_account(
                account.id,
                Some("new@x.com"),
                Some("Alice Liddell"),
                None,
                Some(Role::Admin),
                Some(AccountStatus::Inactive),
                None,
            )
            .await
            .unwrap();

        assert_eq!(updated.email, "new@x.com");
        assert_eq!(updated.full_name.as_deref(), Some("Alice Liddell"));
        assert_eq!(updated.phone.as_deref(), Some("555-0100"));
        assert_eq!(updated.role, Role::Admin);
        assert_eq!(updated.status, AccountStatus::Inactive);
        assert!(updated.updated_at >= updated.created_at);
    }

    #[tokio::test]
    async fn test_update_to_taken_email_rejected() {
        let repo = setup_test_db().await;
        let alice = sample_account("alice", "alice@x.com");
        let bob = sample_account("bob", "bob@x.com");
        repo.create_account(&alice).await.unwrap();
        repo.create_account(&bob).await.unwrap();

        let err = repo
            .update_account(bob.id, Some("alice@x.com"), None, None, None, None, None)
            .await
            .unwrap_err();
        assert!(matches!(err, UserHubError::Duplicate(_)));

        // Bob's record is untouched
        let reloaded = repo.find_by_id(bob.id).await.unwrap();
        assert_eq!(reloaded.email, "bob@x.com");
    }

    #[tokio::test]
    async fn test_set_status_and_last_login() {
        let repo = setup_test_db().await;
        let account = sample_account("alice", "alice@x.com");
        repo.create_account(&account).await.unwrap();

        repo.set_status(account.id, AccountStatus::Inactive)
            .await
            .unwrap();
        let reloaded = repo.find_by_id(account.id).await.unwrap();
        assert_eq!(reloaded.status, AccountStatus::Inactive);

        let when = Utc::now();
        repo.touch_last_login(account.id, when).await.unwrap();
        let reloaded = repo.find_by_id(account.id).await.unwrap();
        assert_eq!(
            reloaded.last_login.map(|dt| dt.timestamp()),
            Some(when.timestamp())
        );

        let missing = repo.set_status(Uuid::new_v4(), AccountStatus::Active).await;
        assert!(matches!(missing, Err(UserHubError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_and_list() {
        let repo = setup_test_db().await;
        let alice = sample_account("alice", "alice@x.com");
        let bob = sample_account("bob", "bob@x.com");
        repo.create_account(&alice).await.unwrap();
        repo.create_account(&bob).await.unwrap();

        assert_eq!(repo.list_accounts().await.unwrap().len(), 2);

        repo.delete_account(alice.id).await.unwrap();
        assert_eq!(repo.list_accounts().await.unwrap().len(), 1);

        let err = repo.delete_account(alice.id).await.unwrap_err();
        assert!(matches!(err, UserHubError::NotFound(_)));
    }
}
