//! Repository for the `reports` table.

use ivv_core::review::ReviewStatus;
use ivv_core::types::DbId;
use sqlx::PgPool;

use crate::models::comment::{Comment, CreateComment};
use crate::models::report::{CreateReport, Report, ReportSearch, UpdateReport};
use crate::repositories::CommentRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, creator_id, year, month, paid_up_to_now_cents, progress, \
                       status_id, created_at, updated_at";

/// Unique constraint guarding one report per project and month.
pub const PERIOD_CONSTRAINT: &str = "uq_reports_project_period";

/// Search predicate over `reports r JOIN projects p`. `$1` is the ILIKE
/// pattern, `$2` the optional creator filter.
const SEARCH_FILTER: &str = "(p.name ILIKE $1
                              OR to_char(make_date(r.year, r.month, 1), 'FMMonth YYYY') ILIKE $1)
                             AND ($2::BIGINT IS NULL OR r.creator_id = $2)";

/// Wrap `term` in `%` for ILIKE, escaping the pattern metacharacters it holds.
pub fn contains_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Provides CRUD and status-transition operations for reports.
pub struct ReportRepo;

impl ReportRepo {
    /// Insert a new PENDING report, returning the created row.
    ///
    /// Fails with a unique violation on [`PERIOD_CONSTRAINT`] if the project
    /// already has a report for that month.
    pub async fn create(pool: &PgPool, input: &CreateReport) -> Result<Report, sqlx::Error> {
        let query = format!(
            "INSERT INTO reports
                (project_id, creator_id, year, month, paid_up_to_now_cents, progress, status_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Report>(&query)
            .bind(input.project_id)
            .bind(input.creator_id)
            .bind(input.year)
            .bind(input.month)
            .bind(input.paid_up_to_now_cents)
            .bind(input.progress)
            .bind(ReviewStatus::Pending.id())
            .fetch_one(pool)
            .await
    }

    /// Find a report by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Report>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM reports WHERE id = $1");
        sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the report covering `(year, month)` on a project, if any.
    pub async fn find_by_period(
        pool: &PgPool,
        project_id: DbId,
        year: i32,
        month: i16,
    ) -> Result<Option<Report>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reports WHERE project_id = $1 AND year = $2 AND month = $3"
        );
        sqlx::query_as::<_, Report>(&query)
            .bind(project_id)
            .bind(year)
            .bind(month)
            .fetch_optional(pool)
            .await
    }

    /// List a project's reports, most recent period first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Report>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reports WHERE project_id = $1 ORDER BY year DESC, month DESC"
        );
        sqlx::query_as::<_, Report>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// List every report, most recent period first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Report>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM reports ORDER BY year DESC, month DESC, project_id");
        sqlx::query_as::<_, Report>(&query).fetch_all(pool).await
    }

    /// List the reports created by one user, most recent period first.
    pub async fn list_by_creator(
        pool: &PgPool,
        creator_id: DbId,
    ) -> Result<Vec<Report>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM reports WHERE creator_id = $1
             ORDER BY year DESC, month DESC, project_id"
        );
        sqlx::query_as::<_, Report>(&query)
            .bind(creator_id)
            .fetch_all(pool)
            .await
    }

    /// One page of reports matching `search`, most recent period first.
    pub async fn search(pool: &PgPool, search: &ReportSearch) -> Result<Vec<Report>, sqlx::Error> {
        let columns = COLUMNS
            .split(',')
            .map(|c| format!("r.{}", c.trim()))
            .collect::<Vec<_>>()
            .join(", ");
        let query = format!(
            "SELECT {columns} FROM reports r JOIN projects p ON p.id = r.project_id
             WHERE {SEARCH_FILTER}
             ORDER BY r.year DESC, r.month DESC, r.project_id, r.id
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Report>(&query)
            .bind(contains_pattern(&search.term))
            .bind(search.creator_id)
            .bind(search.limit)
            .bind(search.offset)
            .fetch_all(pool)
            .await
    }

    /// Number of reports matching `search`, ignoring its window.
    pub async fn count_search(pool: &PgPool, search: &ReportSearch) -> Result<i64, sqlx::Error> {
        let query = format!(
            "SELECT COUNT(*) FROM reports r JOIN projects p ON p.id = r.project_id
             WHERE {SEARCH_FILTER}"
        );
        sqlx::query_scalar::<_, i64>(&query)
            .bind(contains_pattern(&search.term))
            .bind(search.creator_id)
            .fetch_one(pool)
            .await
    }

    /// Update a report. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateReport,
    ) -> Result<Option<Report>, sqlx::Error> {
        let query = format!(
            "UPDATE reports SET
                year = COALESCE($2, year),
                month = COALESCE($3, month),
                paid_up_to_now_cents = COALESCE($4, paid_up_to_now_cents),
                progress = COALESCE($5, progress)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .bind(input.year)
            .bind(input.month)
            .bind(input.paid_up_to_now_cents)
            .bind(input.progress)
            .fetch_optional(pool)
            .await
    }

    /// Delete a report. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reports WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Move a report from `expected` to `target` and append its audit
    /// comment to the parent project, atomically.
    ///
    /// Returns `None` without writing anything if the report's status is no
    /// longer `expected`.
    pub async fn transition_status(
        pool: &PgPool,
        id: DbId,
        expected: ReviewStatus,
        target: ReviewStatus,
        audit: &CreateComment,
    ) -> Result<Option<(Report, Comment)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE reports SET status_id = $3
             WHERE id = $1 AND status_id = $2
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Report>(&query)
            .bind(id)
            .bind(expected.id())
            .bind(target.id())
            .fetch_optional(&mut *tx)
            .await?;

        let Some(report) = updated else {
            return Ok(None);
        };

        let comment = CommentRepo::create(&mut *tx, audit).await?;

        tx.commit().await?;
        Ok(Some((report, comment)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("portal"), "%portal%");
        assert_eq!(contains_pattern("100%_done"), "%100\\%\\_done%");
    }
}
