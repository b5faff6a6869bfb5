//! PostgreSQL Store Implementations

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use platform::secret::HashedSecret;

use crate::domain::account::Account;
use crate::domain::repository::{
    AccountRepository, SessionStore, StoreInsert, VerificationCodeStore,
};
use crate::error::{AccountsError, AccountsResult};

/// PostgreSQL-backed store for accounts, verification codes, and
/// session entries
#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Remove session entries older than `max_age`
    pub async fn cleanup_expired_sessions(
        &self,
        max_age: std::time::Duration,
    ) -> AccountsResult<u64> {
        let cutoff = Utc::now()
            - chrono::Duration::from_std(max_age)
                .map_err(|e| AccountsError::Internal(e.to_string()))?;

        let deleted = sqlx::query("DELETE FROM session_entries WHERE created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(entries_deleted = deleted, "Cleaned up expired session entries");

        Ok(deleted)
    }
}

// ============================================================================
// Account Repository Implementation
// ============================================================================

impl AccountRepository for PgAccountStore {
    async fn insert(&self, account: &Account) -> AccountsResult<StoreInsert> {
        let result = sqlx::query(
            r#"
            INSERT INTO accounts (
                account_id,
                username,
                email,
                password_hash,
                active,
                deleted,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(account.account_id)
        .bind(&account.username)
        .bind(&account.email)
        .bind(account.password_hash.as_phc_string())
        .bind(account.active)
        .bind(account.deleted)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(StoreInsert::Inserted),
            // Either unique index (username or email) refusing the row
            // is the expected duplicate answer, not a failure.
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Ok(StoreInsert::Duplicate)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_username(&self, username: &str) -> AccountsResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT
                account_id,
                username,
                email,
                password_hash,
                active,
                deleted,
                created_at,
                updated_at
            FROM accounts
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_account()).transpose()
    }

    async fn find_by_email(&self, email: &str) -> AccountsResult<Option<Account>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT
                account_id,
                username,
                email,
                password_hash,
                active,
                deleted,
                created_at,
                updated_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_account()).transpose()
    }

    async fn update(&self, account: &Account) -> AccountsResult<()> {
        sqlx::query(
            r#"
            UPDATE accounts SET
                password_hash = $2,
                active = $3,
                deleted = $4,
                updated_at = $5
            WHERE account_id = $1
            "#,
        )
        .bind(account.account_id)
        .bind(account.password_hash.as_phc_string())
        .bind(account.active)
        .bind(account.deleted)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Verification Code Store Implementation
// ============================================================================

impl VerificationCodeStore for PgAccountStore {
    async fn insert_code(&self, email: &str, code_hash: &str) -> AccountsResult<StoreInsert> {
        let result = sqlx::query(
            r#"
            INSERT INTO verification_codes (email, code_hash, created_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(email)
        .bind(code_hash)
        .bind(Utc::now())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(StoreInsert::Inserted),
            // Primary key on email: a second live code for the same
            // address is refused atomically, even under concurrency.
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Ok(StoreInsert::Duplicate)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_code(&self, email: &str) -> AccountsResult<Option<String>> {
        let hash = sqlx::query_scalar::<_, String>(
            "SELECT code_hash FROM verification_codes WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(hash)
    }

    async fn delete_code(&self, email: &str) -> AccountsResult<bool> {
        let deleted = sqlx::query("DELETE FROM verification_codes WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

// ============================================================================
// Session Store Implementation
// ============================================================================

impl SessionStore for PgAccountStore {
    async fn get(&self, session_id: Uuid, key: &str) -> AccountsResult<Option<String>> {
        let value = sqlx::query_scalar::<_, String>(
            r#"
            SELECT entry_value FROM session_entries
            WHERE session_id = $1 AND entry_key = $2
            "#,
        )
        .bind(session_id)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(value)
    }

    async fn put(&self, session_id: Uuid, key: &str, value: &str) -> AccountsResult<()> {
        sqlx::query(
            r#"
            INSERT INTO session_entries (session_id, entry_key, entry_value, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (session_id, entry_key)
            DO UPDATE SET entry_value = EXCLUDED.entry_value
            "#,
        )
        .bind(session_id)
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn take(&self, session_id: Uuid, key: &str) -> AccountsResult<Option<String>> {
        // Read and clear in one statement so a notice can never be
        // shown twice, whatever the interleaving.
        let value = sqlx::query_scalar::<_, String>(
            r#"
            DELETE FROM session_entries
            WHERE session_id = $1 AND entry_key = $2
            RETURNING entry_value
            "#,
        )
        .bind(session_id)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(value)
    }

    async fn remove(&self, session_id: Uuid, key: &str) -> AccountsResult<()> {
        sqlx::query("DELETE FROM session_entries WHERE session_id = $1 AND entry_key = $2")
            .bind(session_id)
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn destroy(&self, session_id: Uuid) -> AccountsResult<()> {
        sqlx::query("DELETE FROM session_entries WHERE session_id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct AccountRow {
    account_id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    active: bool,
    deleted: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AccountRow {
    fn into_account(self) -> AccountsResult<Account> {
        let password_hash = HashedSecret::from_phc_string(self.password_hash)
            .map_err(|_| AccountsError::Internal("invalid password hash in database".into()))?;

        Ok(Account {
            account_id: self.account_id,
            username: self.username,
            email: self.email,
            password_hash,
            active: self.active,
            deleted: self.deleted,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
