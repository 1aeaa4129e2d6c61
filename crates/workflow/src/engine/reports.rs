use ivv_core::authz::{require_editable, require_owning_vendor};
use ivv_core::error::CoreError;
use ivv_core::period::Month;
use ivv_core::review::{plan_transition, ReviewStatus, Subject};
use ivv_core::roles::{Actor, Role};
use ivv_core::types::DbId;
use ivv_db::models::comment::CreateComment;
use ivv_db::models::report::{CreateReport, Report, ReportSearch, UpdateReport};
use ivv_db::repositories::report_repo::PERIOD_CONSTRAINT;
use serde::Serialize;

use super::{not_found, ProjectWorkflowEngine};
use crate::error::{StoreError, WorkflowError, WorkflowResult};
use crate::inputs::{NewReportInput, ReportPatch, ReportSearchInput, SEARCH_PAGE_SIZE};

fn duplicate_period(project_id: DbId, year: i32, month: Month) -> WorkflowError {
    CoreError::DuplicateReportPeriod {
        project_id,
        year,
        month,
    }
    .into()
}

/// Turn a lost race on the period constraint into the domain error.
fn map_period_violation(
    err: StoreError,
    project_id: DbId,
    year: i32,
    month: Month,
) -> WorkflowError {
    if err.violates(PERIOD_CONSTRAINT) {
        duplicate_period(project_id, year, month)
    } else {
        err.into()
    }
}

/// One page of report search results.
#[derive(Debug, Clone, Serialize)]
pub struct ReportPage {
    pub reports: Vec<Report>,
    /// Matches across all pages.
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

impl ProjectWorkflowEngine {
    /// ETS sees every report; a vendor sees the reports they created.
    pub async fn list_reports(&self, actor: &Actor) -> WorkflowResult<Vec<Report>> {
        let reports = match actor.role {
            Role::Ets => self.store.list_reports().await?,
            Role::Vendor => self.store.list_reports_by_creator(actor.id).await?,
        };
        Ok(reports)
    }

    /// Search reports by project name or period, within the same visibility
    /// as [`Self::list_reports`].
    pub async fn search_reports(
        &self,
        actor: &Actor,
        query: &ReportSearchInput,
    ) -> WorkflowResult<ReportPage> {
        let term = query.check()?;
        let search = ReportSearch {
            term: term.to_string(),
            creator_id: actor.is_vendor().then_some(actor.id),
            limit: SEARCH_PAGE_SIZE,
            offset: query.offset(),
        };
        let (reports, total) = self.store.search_reports(&search).await?;

        tracing::debug!(actor_id = actor.id, term, page = query.page, total, "Report search");
        Ok(ReportPage {
            reports,
            total,
            page: query.page,
            page_size: SEARCH_PAGE_SIZE,
        })
    }

    pub async fn list_project_reports(
        &self,
        actor: &Actor,
        project_id: DbId,
    ) -> WorkflowResult<Vec<Report>> {
        self.load_visible_project(actor, project_id).await?;
        Ok(self.store.list_reports_by_project(project_id).await?)
    }

    pub async fn get_report(&self, actor: &Actor, id: DbId) -> WorkflowResult<Report> {
        let report = self.load_report(id).await?;
        self.load_visible_project(actor, report.project_id).await?;
        Ok(report)
    }

    /// The report already covering `(year, month)` on a project, if any.
    pub async fn report_already_exists(
        &self,
        project_id: DbId,
        year: i32,
        month: Month,
    ) -> WorkflowResult<Option<Report>> {
        Ok(self
            .store
            .find_report_by_period(project_id, year, month)
            .await?)
    }

    /// Create a PENDING report. Only the project's creator may.
    pub async fn create_report(
        &self,
        actor: &Actor,
        input: NewReportInput,
    ) -> WorkflowResult<Report> {
        let project = self.load_project(input.project_id).await?;
        require_owning_vendor(actor, project.creator_id)?;
        let month = input.check()?;

        if self
            .report_already_exists(project.id, input.year, month)
            .await?
            .is_some()
        {
            return Err(duplicate_period(project.id, input.year, month));
        }

        let report = self
            .store
            .create_report(&CreateReport {
                project_id: project.id,
                creator_id: actor.id,
                year: input.year,
                month: month.id(),
                paid_up_to_now_cents: input.paid_up_to_now_cents,
                progress: input.progress,
            })
            .await
            .map_err(|e| map_period_violation(e, project.id, input.year, month))?;

        tracing::info!(
            actor_id = actor.id,
            project_id = project.id,
            report_id = report.id,
            period = %report.display_name(),
            "Report created",
        );
        Ok(report)
    }

    /// Edit a report. Only the project's creator may, and only until the
    /// report itself is approved.
    pub async fn edit_report(
        &self,
        actor: &Actor,
        id: DbId,
        patch: ReportPatch,
    ) -> WorkflowResult<Report> {
        let report = self.load_report(id).await?;
        let project = self.load_project(report.project_id).await?;
        require_owning_vendor(actor, project.creator_id)?;
        require_editable(report.status, &report.display_name())?;
        let month = patch.check()?;

        let year = patch.year.unwrap_or(report.year);
        let month = month.unwrap_or(report.month);
        if let Some(existing) = self
            .report_already_exists(project.id, year, month)
            .await?
        {
            if existing.id != id {
                return Err(duplicate_period(project.id, year, month));
            }
        }

        let update = UpdateReport {
            year: patch.year,
            month: patch.month.as_ref().map(|_| month.id()),
            paid_up_to_now_cents: patch.paid_up_to_now_cents,
            progress: patch.progress,
        };
        let report = self
            .store
            .update_report(id, &update)
            .await
            .map_err(|e| map_period_violation(e, project.id, year, month))?
            .ok_or_else(|| not_found("Report", id))?;

        tracing::info!(actor_id = actor.id, report_id = id, "Report updated");
        Ok(report)
    }

    /// Delete a report. Any authenticated actor may.
    pub async fn delete_report(&self, actor: &Actor, id: DbId) -> WorkflowResult<()> {
        if !self.store.delete_report(id).await? {
            return Err(not_found("Report", id));
        }
        tracing::info!(actor_id = actor.id, report_id = id, "Report deleted");
        Ok(())
    }

    /// Move a report to `target`. The audit comment lands on the parent
    /// project and names the report period.
    pub async fn change_report_status(
        &self,
        actor: &Actor,
        id: DbId,
        target: ReviewStatus,
    ) -> WorkflowResult<Report> {
        let report = self.load_report(id).await?;
        let project = self.load_project(report.project_id).await?;
        let name = report.display_name();

        let plan = plan_transition(
            actor,
            project.creator_id,
            report.status,
            target,
            Subject::Report(&name),
        )
        .inspect_err(|e| {
            tracing::warn!(
                actor_id = actor.id,
                report_id = id,
                error = %e,
                "Report transition rejected",
            );
        })?;

        let audit = CreateComment {
            project_id: report.project_id,
            author_id: actor.id,
            content: plan.audit_comment,
        };
        let Some((report, comment)) = self
            .store
            .transition_report_status(id, plan.from, plan.to, &audit)
            .await?
        else {
            let current = self.load_report(id).await?.status;
            return Err(CoreError::InvalidTransition {
                from: current,
                to: target,
            }
            .into());
        };

        tracing::info!(
            actor_id = actor.id,
            report_id = id,
            from = %plan.from,
            to = %plan.to,
            comment_id = comment.id,
            "Report status changed",
        );
        Ok(report)
    }
}
