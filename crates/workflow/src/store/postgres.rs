//! [`WorkflowStore`] over Postgres, delegating to the `ivv-db` repositories.

use async_trait::async_trait;
use ivv_core::period::Month;
use ivv_core::review::ReviewStatus;
use ivv_core::roles::Role;
use ivv_core::types::DbId;
use ivv_db::models::comment::{Comment, CreateComment};
use ivv_db::models::event::{CreateEvent, Event, UpdateEvent};
use ivv_db::models::issue::{CreateIssue, Issue, UpdateIssue};
use ivv_db::models::project::{CascadeCounts, CreateProject, Project, UpdateProject};
use ivv_db::models::report::{CreateReport, Report, ReportSearch, UpdateReport};
use ivv_db::models::user::{CreateUser, ReassignedCounts, User};
use ivv_db::repositories::{
    CommentRepo, EventRepo, IssueRepo, ProjectRepo, ReportRepo, UserRepo,
};
use ivv_db::DbPool;

use super::{StoreResult, WorkflowStore};

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl WorkflowStore for PgStore {
    async fn health_check(&self) -> StoreResult<()> {
        Ok(ivv_db::health_check(&self.pool).await?)
    }

    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>> {
        Ok(UserRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(UserRepo::find_by_email(&self.pool, email).await?)
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(UserRepo::list(&self.pool).await?)
    }

    async fn create_user(&self, input: &CreateUser) -> StoreResult<User> {
        Ok(UserRepo::create(&self.pool, input).await?)
    }

    async fn update_password(&self, id: DbId, password_hash: &str) -> StoreResult<bool> {
        Ok(UserRepo::update_password(&self.pool, id, password_hash).await?)
    }

    async fn update_user_role(&self, id: DbId, role: Role) -> StoreResult<Option<User>> {
        Ok(UserRepo::update_role(&self.pool, id, role).await?)
    }

    async fn delete_user_reassigning(&self, id: DbId) -> StoreResult<Option<ReassignedCounts>> {
        Ok(UserRepo::delete_reassigning(&self.pool, id).await?)
    }

    async fn find_project(&self, id: DbId) -> StoreResult<Option<Project>> {
        Ok(ProjectRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        Ok(ProjectRepo::list(&self.pool).await?)
    }

    async fn list_projects_by_creator(&self, creator_id: DbId) -> StoreResult<Vec<Project>> {
        Ok(ProjectRepo::list_by_creator(&self.pool, creator_id).await?)
    }

    async fn create_project(&self, input: &CreateProject) -> StoreResult<Project> {
        Ok(ProjectRepo::create(&self.pool, input).await?)
    }

    async fn update_project(
        &self,
        id: DbId,
        input: &UpdateProject,
    ) -> StoreResult<Option<Project>> {
        Ok(ProjectRepo::update(&self.pool, id, input).await?)
    }

    async fn delete_project_cascade(&self, id: DbId) -> StoreResult<Option<CascadeCounts>> {
        Ok(ProjectRepo::delete_cascade(&self.pool, id).await?)
    }

    async fn transition_project_status(
        &self,
        id: DbId,
        expected: ReviewStatus,
        target: ReviewStatus,
        audit: &CreateComment,
    ) -> StoreResult<Option<(Project, Comment)>> {
        Ok(ProjectRepo::transition_status(&self.pool, id, expected, target, audit).await?)
    }

    async fn find_report(&self, id: DbId) -> StoreResult<Option<Report>> {
        Ok(ReportRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_report_by_period(
        &self,
        project_id: DbId,
        year: i32,
        month: Month,
    ) -> StoreResult<Option<Report>> {
        Ok(ReportRepo::find_by_period(&self.pool, project_id, year, month.id()).await?)
    }

    async fn list_reports(&self) -> StoreResult<Vec<Report>> {
        Ok(ReportRepo::list(&self.pool).await?)
    }

    async fn list_reports_by_creator(&self, creator_id: DbId) -> StoreResult<Vec<Report>> {
        Ok(ReportRepo::list_by_creator(&self.pool, creator_id).await?)
    }

    async fn list_reports_by_project(&self, project_id: DbId) -> StoreResult<Vec<Report>> {
        Ok(ReportRepo::list_by_project(&self.pool, project_id).await?)
    }

    async fn search_reports(&self, search: &ReportSearch) -> StoreResult<(Vec<Report>, i64)> {
        let total = ReportRepo::count_search(&self.pool, search).await?;
        let reports = ReportRepo::search(&self.pool, search).await?;
        Ok((reports, total))
    }

    async fn create_report(&self, input: &CreateReport) -> StoreResult<Report> {
        Ok(ReportRepo::create(&self.pool, input).await?)
    }

    async fn update_report(&self, id: DbId, input: &UpdateReport) -> StoreResult<Option<Report>> {
        Ok(ReportRepo::update(&self.pool, id, input).await?)
    }

    async fn delete_report(&self, id: DbId) -> StoreResult<bool> {
        Ok(ReportRepo::delete(&self.pool, id).await?)
    }

    async fn transition_report_status(
        &self,
        id: DbId,
        expected: ReviewStatus,
        target: ReviewStatus,
        audit: &CreateComment,
    ) -> StoreResult<Option<(Report, Comment)>> {
        Ok(ReportRepo::transition_status(&self.pool, id, expected, target, audit).await?)
    }

    async fn find_issue(&self, id: DbId) -> StoreResult<Option<Issue>> {
        Ok(IssueRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_issues_by_project(&self, project_id: DbId) -> StoreResult<Vec<Issue>> {
        Ok(IssueRepo::list_by_project(&self.pool, project_id).await?)
    }

    async fn create_issue(&self, input: &CreateIssue) -> StoreResult<Issue> {
        Ok(IssueRepo::create(&self.pool, input).await?)
    }

    async fn update_issue(&self, id: DbId, input: &UpdateIssue) -> StoreResult<Option<Issue>> {
        Ok(IssueRepo::update(&self.pool, id, input).await?)
    }

    async fn delete_issue(&self, id: DbId) -> StoreResult<bool> {
        Ok(IssueRepo::delete(&self.pool, id).await?)
    }

    async fn find_event(&self, id: DbId) -> StoreResult<Option<Event>> {
        Ok(EventRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_events_by_project(&self, project_id: DbId) -> StoreResult<Vec<Event>> {
        Ok(EventRepo::list_by_project(&self.pool, project_id).await?)
    }

    async fn create_event(&self, input: &CreateEvent) -> StoreResult<Event> {
        Ok(EventRepo::create(&self.pool, input).await?)
    }

    async fn update_event(&self, id: DbId, input: &UpdateEvent) -> StoreResult<Option<Event>> {
        Ok(EventRepo::update(&self.pool, id, input).await?)
    }

    async fn delete_event(&self, id: DbId) -> StoreResult<bool> {
        Ok(EventRepo::delete(&self.pool, id).await?)
    }

    async fn find_comment(&self, id: DbId) -> StoreResult<Option<Comment>> {
        Ok(CommentRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_comments_by_project(&self, project_id: DbId) -> StoreResult<Vec<Comment>> {
        Ok(CommentRepo::list_by_project(&self.pool, project_id).await?)
    }

    async fn create_comment(&self, input: &CreateComment) -> StoreResult<Comment> {
        Ok(CommentRepo::create(&self.pool, input).await?)
    }

    async fn update_comment(&self, id: DbId, content: &str) -> StoreResult<Option<Comment>> {
        Ok(CommentRepo::update_content(&self.pool, id, content).await?)
    }

    async fn delete_comment(&self, id: DbId) -> StoreResult<bool> {
        Ok(CommentRepo::delete(&self.pool, id).await?)
    }
}
