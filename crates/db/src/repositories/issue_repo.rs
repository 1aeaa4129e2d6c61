//! Repository for the `issues` table.

use ivv_core::types::DbId;
use sqlx::PgPool;

use crate::models::issue::{CreateIssue, Issue, UpdateIssue};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, creator_id, title, description, remedy, severity_id, \
                       likelihood_id, status_id, first_raised, updated_at";

/// Provides CRUD operations for issues.
pub struct IssueRepo;

impl IssueRepo {
    /// Insert a new issue, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateIssue) -> Result<Issue, sqlx::Error> {
        let query = format!(
            "INSERT INTO issues
                (project_id, creator_id, title, description, remedy, severity_id, likelihood_id, status_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Issue>(&query)
            .bind(input.project_id)
            .bind(input.creator_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.remedy)
            .bind(input.severity.id())
            .bind(input.likelihood.id())
            .bind(input.status.id())
            .fetch_one(pool)
            .await
    }

    /// Find an issue by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Issue>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM issues WHERE id = $1");
        sqlx::query_as::<_, Issue>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a project's issues, most recently raised first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Issue>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM issues WHERE project_id = $1 ORDER BY first_raised DESC, id DESC"
        );
        sqlx::query_as::<_, Issue>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update an issue. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateIssue,
    ) -> Result<Option<Issue>, sqlx::Error> {
        let query = format!(
            "UPDATE issues SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                remedy = COALESCE($4, remedy),
                severity_id = COALESCE($5, severity_id),
                likelihood_id = COALESCE($6, likelihood_id),
                status_id = COALESCE($7, status_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Issue>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.remedy)
            .bind(input.severity.map(|s| s.id()))
            .bind(input.likelihood.map(|l| l.id()))
            .bind(input.status.map(|s| s.id()))
            .fetch_optional(pool)
            .await
    }

    /// Delete an issue. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM issues WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
