//! Repository for the `projects` table.

use ivv_core::review::ReviewStatus;
use ivv_core::types::DbId;
use sqlx::PgPool;

use crate::models::comment::{Comment, CreateComment};
use crate::models::project::{CascadeCounts, CreateProject, Project, UpdateProject};
use crate::repositories::CommentRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, original_contract_award_cents, creator_id, \
                       status_id, created_at, updated_at";

/// Provides CRUD and status-transition operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new PENDING project, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (name, description, original_contract_award_cents, creator_id, status_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.original_contract_award_cents)
            .bind(input.creator_id)
            .bind(ReviewStatus::Pending.id())
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all projects ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// List the projects created by one user, most recent first.
    pub async fn list_by_creator(
        pool: &PgPool,
        creator_id: DbId,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE creator_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(creator_id)
            .fetch_all(pool)
            .await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                original_contract_award_cents = COALESCE($4, original_contract_award_cents)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.original_contract_award_cents)
            .fetch_optional(pool)
            .await
    }

    /// Move a project from `expected` to `target` and append its audit
    /// comment, atomically.
    ///
    /// The update is conditional on the current status, so a concurrent
    /// transition that got there first makes this return `None` instead of
    /// overwriting it. Nothing is written in that case.
    pub async fn transition_status(
        pool: &PgPool,
        id: DbId,
        expected: ReviewStatus,
        target: ReviewStatus,
        audit: &CreateComment,
    ) -> Result<Option<(Project, Comment)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE projects SET status_id = $3
             WHERE id = $1 AND status_id = $2
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(expected.id())
            .bind(target.id())
            .fetch_optional(&mut *tx)
            .await?;

        let Some(project) = updated else {
            return Ok(None);
        };

        let comment = CommentRepo::create(&mut *tx, audit).await?;

        tx.commit().await?;
        Ok(Some((project, comment)))
    }

    /// Delete a project together with its reports, issues, events and
    /// comments in one transaction, children first.
    ///
    /// Returns `None` (and deletes nothing) if the project does not exist.
    pub async fn delete_cascade(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CascadeCounts>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let mut counts = CascadeCounts::default();
        for (table, slot) in [
            ("comments", &mut counts.comments),
            ("issues", &mut counts.issues),
            ("events", &mut counts.events),
            ("reports", &mut counts.reports),
        ] {
            let result = sqlx::query(&format!("DELETE FROM {table} WHERE project_id = $1"))
                .bind(id)
                .execute(&mut *tx)
                .await?;
            *slot = result.rows_affected();
        }

        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
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
