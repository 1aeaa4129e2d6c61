//! Repository for the `users` table.

use ivv_core::roles::Role;
use ivv_core::types::{DbId, SENTINEL_USER_ID};
use sqlx::PgPool;

use crate::models::user::{CreateUser, ReassignedCounts, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, first_name, last_name, email, password_hash, role_id, created_at, updated_at";

/// Unique constraint on user email addresses.
pub const EMAIL_CONSTRAINT: &str = "uq_users_email";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (first_name, last_name, email, password_hash, role_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(input.role.id())
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE lower(email) = lower($1)");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List all real users (the sentinel is excluded), ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users WHERE id <> $1 ORDER BY last_name, first_name, id"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(SENTINEL_USER_ID)
            .fetch_all(pool)
            .await
    }

    /// Update a user's password hash. Returns `true` if the row was updated.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Change a user's role. Returns `None` if no row with the given `id` exists.
    pub async fn update_role(
        pool: &PgPool,
        id: DbId,
        role: Role,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("UPDATE users SET role_id = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(role.id())
            .fetch_optional(pool)
            .await
    }

    /// Hand every project, report, issue and comment owned by `id` over to
    /// the sentinel user, then delete the user, in one transaction.
    ///
    /// Returns `None` (and changes nothing) if the user does not exist.
    pub async fn delete_reassigning(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ReassignedCounts>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let mut counts = ReassignedCounts::default();
        for (table, column, slot) in [
            ("comments", "author_id", &mut counts.comments),
            ("issues", "creator_id", &mut counts.issues),
            ("reports", "creator_id", &mut counts.reports),
            ("projects", "creator_id", &mut counts.projects),
        ] {
            let result = sqlx::query(&format!(
                "UPDATE {table} SET {column} = $2 WHERE {column} = $1"
            ))
            .bind(id)
            .bind(SENTINEL_USER_ID)
            .execute(&mut *tx)
            .await?;
            *slot = result.rows_affected();
        }

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        tx.commit().await?;
        Ok(Some(counts))
    }
}
