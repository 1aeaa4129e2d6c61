//! In-process [`WorkflowStore`].
//!
//! All state lives behind one async mutex. Multi-step operations work on a
//! copy of the state and swap it in only once every step has succeeded, so
//! a failure part-way through leaves nothing behind, mirroring a rolled-back
//! transaction. The unique constraints of the Postgres schema (user email,
//! report period) are enforced the same way and reported with the same
//! constraint names.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use ivv_core::period::Month;
use ivv_core::review::ReviewStatus;
use ivv_core::roles::Role;
use ivv_core::types::{DbId, SENTINEL_USER_ID};
use ivv_db::models::comment::{Comment, CreateComment};
use ivv_db::models::event::{CreateEvent, Event, UpdateEvent};
use ivv_db::models::issue::{CreateIssue, Issue, UpdateIssue};
use ivv_db::models::project::{CascadeCounts, CreateProject, Project, UpdateProject};
use ivv_db::models::report::{CreateReport, Report, ReportSearch, UpdateReport};
use ivv_db::models::user::{CreateUser, ReassignedCounts, User};
use ivv_db::repositories::report_repo::PERIOD_CONSTRAINT;
use ivv_db::repositories::user_repo::EMAIL_CONSTRAINT;
use tokio::sync::Mutex;

use super::{StoreResult, WorkflowStore};
use crate::error::StoreError;

#[derive(Debug, Clone)]
struct State {
    next_id: DbId,
    users: BTreeMap<DbId, User>,
    projects: BTreeMap<DbId, Project>,
    reports: BTreeMap<DbId, Report>,
    issues: BTreeMap<DbId, Issue>,
    events: BTreeMap<DbId, Event>,
    comments: BTreeMap<DbId, Comment>,
}

impl State {
    fn seeded() -> Self {
        let now = Utc::now();
        let sentinel = User {
            id: SENTINEL_USER_ID,
            first_name: "Deleted".to_string(),
            last_name: "User".to_string(),
            email: "deleted-user@ivv.invalid".to_string(),
            password_hash: "!".to_string(),
            role: Role::Vendor,
            created_at: now,
            updated_at: now,
        };
        Self {
            next_id: 1,
            users: BTreeMap::from([(SENTINEL_USER_ID, sentinel)]),
            projects: BTreeMap::new(),
            reports: BTreeMap::new(),
            issues: BTreeMap::new(),
            events: BTreeMap::new(),
            comments: BTreeMap::new(),
        }
    }

    fn allocate_id(&mut self) -> DbId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn period_taken(&self, project_id: DbId, year: i32, month: Month, except: DbId) -> bool {
        self.reports.values().any(|r| {
            r.id != except && r.project_id == project_id && r.year == year && r.month == month
        })
    }

    fn insert_comment(&mut self, input: &CreateComment) -> Comment {
        let now = Utc::now();
        let comment = Comment {
            id: self.allocate_id(),
            project_id: input.project_id,
            author_id: input.author_id,
            content: input.content.clone(),
            created_at: now,
            updated_at: now,
        };
        self.comments.insert(comment.id, comment.clone());
        comment
    }
}

fn resolve_month(month: i16) -> StoreResult<Month> {
    Month::from_id(month)
        .ok_or_else(|| StoreError::Constraint(format!("month {month} out of range")))
}

fn duplicate_period() -> StoreError {
    StoreError::UniqueViolation {
        constraint: PERIOD_CONSTRAINT.to_string(),
    }
}

/// In-memory store seeded with the sentinel user.
pub struct MemoryStore {
    state: Mutex<State>,
    fail_next_comment: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::seeded()),
            fail_next_comment: AtomicBool::new(false),
        }
    }

    /// Make the next comment insert fail, including the audit comment of a
    /// status transition.
    pub fn fail_next_comment_insert(&self) {
        self.fail_next_comment.store(true, Ordering::SeqCst);
    }

    fn take_comment_fault(&self) -> StoreResult<()> {
        if self.fail_next_comment.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "injected failure on comment insert".to_string(),
            ));
        }
        Ok(())
    }
}

fn sorted<T>(
    items: impl Iterator<Item = T>,
    cmp: impl FnMut(&T, &T) -> std::cmp::Ordering,
) -> Vec<T> {
    let mut items: Vec<T> = items.collect();
    items.sort_by(cmp);
    items
}

/// Year and month descending, then project id, as the SQL listings order.
fn newest_reports_first(a: &Report, b: &Report) -> std::cmp::Ordering {
    (b.year, b.month.id(), a.project_id).cmp(&(a.year, a.month.id(), b.project_id))
}

#[async_trait]
impl WorkflowStore for MemoryStore {
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    // -- users --

    async fn find_user(&self, id: DbId) -> StoreResult<Option<User>> {
        Ok(self.state.lock().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let state = self.state.lock().await;
        Ok(sorted(
            state.users.values().filter(|u| u.id != SENTINEL_USER_ID).cloned(),
            |a, b| (&a.last_name, &a.first_name, a.id).cmp(&(&b.last_name, &b.first_name, b.id)),
        ))
    }

    async fn create_user(&self, input: &CreateUser) -> StoreResult<User> {
        let mut state = self.state.lock().await;
        if state.users.values().any(|u| u.email == input.email) {
            return Err(StoreError::UniqueViolation {
                constraint: EMAIL_CONSTRAINT.to_string(),
            });
        }
        let now = Utc::now();
        let user = User {
            id: state.allocate_id(),
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            email: input.email.clone(),
            password_hash: input.password_hash.clone(),
            role: input.role,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_password(&self, id: DbId, password_hash: &str) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        Ok(match state.users.get_mut(&id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                user.updated_at = Utc::now();
                true
            }
            None => false,
        })
    }

    async fn update_user_role(&self, id: DbId, role: Role) -> StoreResult<Option<User>> {
        let mut state = self.state.lock().await;
        Ok(state.users.get_mut(&id).map(|user| {
            user.role = role;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn delete_user_reassigning(&self, id: DbId) -> StoreResult<Option<ReassignedCounts>> {
        let mut state = self.state.lock().await;
        if !state.users.contains_key(&id) {
            return Ok(None);
        }
        let mut draft = state.clone();
        let mut counts = ReassignedCounts::default();
        for comment in draft.comments.values_mut().filter(|c| c.author_id == id) {
            comment.author_id = SENTINEL_USER_ID;
            counts.comments += 1;
        }
        for issue in draft.issues.values_mut().filter(|i| i.creator_id == id) {
            issue.creator_id = SENTINEL_USER_ID;
            counts.issues += 1;
        }
        for report in draft.reports.values_mut().filter(|r| r.creator_id == id) {
            report.creator_id = SENTINEL_USER_ID;
            counts.reports += 1;
        }
        for project in draft.projects.values_mut().filter(|p| p.creator_id == id) {
            project.creator_id = SENTINEL_USER_ID;
            counts.projects += 1;
        }
        draft.users.remove(&id);
        *state = draft;
        Ok(Some(counts))
    }

    // -- projects --

    async fn find_project(&self, id: DbId) -> StoreResult<Option<Project>> {
        Ok(self.state.lock().await.projects.get(&id).cloned())
    }

    async fn list_projects(&self) -> StoreResult<Vec<Project>> {
        let state = self.state.lock().await;
        Ok(state.projects.values().rev().cloned().collect())
    }

    async fn list_projects_by_creator(&self, creator_id: DbId) -> StoreResult<Vec<Project>> {
        let state = self.state.lock().await;
        Ok(state
            .projects
            .values()
            .rev()
            .filter(|p| p.creator_id == creator_id)
            .cloned()
            .collect())
    }

    async fn create_project(&self, input: &CreateProject) -> StoreResult<Project> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let project = Project {
            id: state.allocate_id(),
            name: input.name.clone(),
            description: input.description.clone(),
            original_contract_award_cents: input.original_contract_award_cents,
            creator_id: input.creator_id,
            status: ReviewStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        state.projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn update_project(
        &self,
        id: DbId,
        input: &UpdateProject,
    ) -> StoreResult<Option<Project>> {
        let mut state = self.state.lock().await;
        Ok(state.projects.get_mut(&id).map(|project| {
            if let Some(name) = &input.name {
                project.name = name.clone();
            }
            if let Some(description) = &input.description {
                project.description = description.clone();
            }
            if let Some(cents) = input.original_contract_award_cents {
                project.original_contract_award_cents = cents;
            }
            project.updated_at = Utc::now();
            project.clone()
        }))
    }

    async fn delete_project_cascade(&self, id: DbId) -> StoreResult<Option<CascadeCounts>> {
        let mut state = self.state.lock().await;
        if !state.projects.contains_key(&id) {
            return Ok(None);
        }
        let mut draft = state.clone();
        let mut counts = CascadeCounts::default();

        let before = draft.comments.len();
        draft.comments.retain(|_, c| c.project_id != id);
        counts.comments = (before - draft.comments.len()) as u64;

        let before = draft.issues.len();
        draft.issues.retain(|_, i| i.project_id != id);
        counts.issues = (before - draft.issues.len()) as u64;

        let before = draft.events.len();
        draft.events.retain(|_, e| e.project_id != id);
        counts.events = (before - draft.events.len()) as u64;

        let before = draft.reports.len();
        draft.reports.retain(|_, r| r.project_id != id);
        counts.reports = (before - draft.reports.len()) as u64;

        draft.projects.remove(&id);
        *state = draft;
        Ok(Some(counts))
    }

    async fn transition_project_status(
        &self,
        id: DbId,
        expected: ReviewStatus,
        target: ReviewStatus,
        audit: &CreateComment,
    ) -> StoreResult<Option<(Project, Comment)>> {
        let mut state = self.state.lock().await;
        let mut draft = state.clone();

        let Some(project) = draft
            .projects
            .get_mut(&id)
            .filter(|p| p.status == expected)
        else {
            return Ok(None);
        };
        project.status = target;
        project.updated_at = Utc::now();
        let project = project.clone();

        self.take_comment_fault()?;
        let comment = draft.insert_comment(audit);

        *state = draft;
        Ok(Some((project, comment)))
    }

    // -- reports --

    async fn find_report(&self, id: DbId) -> StoreResult<Option<Report>> {
        Ok(self.state.lock().await.reports.get(&id).cloned())
    }

    async fn find_report_by_period(
        &self,
        project_id: DbId,
        year: i32,
        month: Month,
    ) -> StoreResult<Option<Report>> {
        let state = self.state.lock().await;
        Ok(state
            .reports
            .values()
            .find(|r| r.project_id == project_id && r.year == year && r.month == month)
            .cloned())
    }

    async fn list_reports(&self) -> StoreResult<Vec<Report>> {
        let state = self.state.lock().await;
        Ok(sorted(state.reports.values().cloned(), newest_reports_first))
    }

    async fn list_reports_by_creator(&self, creator_id: DbId) -> StoreResult<Vec<Report>> {
        let state = self.state.lock().await;
        Ok(sorted(
            state
                .reports
                .values()
                .filter(|r| r.creator_id == creator_id)
                .cloned(),
            newest_reports_first,
        ))
    }

    async fn list_reports_by_project(&self, project_id: DbId) -> StoreResult<Vec<Report>> {
        let state = self.state.lock().await;
        Ok(sorted(
            state
                .reports
                .values()
                .filter(|r| r.project_id == project_id)
                .cloned(),
            newest_reports_first,
        ))
    }

    async fn search_reports(&self, search: &ReportSearch) -> StoreResult<(Vec<Report>, i64)> {
        let state = self.state.lock().await;
        let term = search.term.to_lowercase();
        let matches = sorted(
            state
                .reports
                .values()
                .filter(|r| search.creator_id.map_or(true, |id| r.creator_id == id))
                .filter(|r| {
                    let period = format!("{} {}", r.month.display_name(), r.year);
                    let project_name = state
                        .projects
                        .get(&r.project_id)
                        .map(|p| p.name.to_lowercase())
                        .unwrap_or_default();
                    project_name.contains(&term) || period.to_lowercase().contains(&term)
                })
                .cloned(),
            |a, b| newest_reports_first(a, b).then(a.id.cmp(&b.id)),
        );
        let total = matches.len() as i64;
        let window = matches
            .into_iter()
            .skip(search.offset.max(0) as usize)
            .take(search.limit.max(0) as usize)
            .collect();
        Ok((window, total))
    }

    async fn create_report(&self, input: &CreateReport) -> StoreResult<Report> {
        let mut state = self.state.lock().await;
        let month = resolve_month(input.month)?;
        if state.period_taken(input.project_id, input.year, month, 0) {
            return Err(duplicate_period());
        }
        let now = Utc::now();
        let report = Report {
            id: state.allocate_id(),
            project_id: input.project_id,
            creator_id: input.creator_id,
            year: input.year,
            month,
            paid_up_to_now_cents: input.paid_up_to_now_cents,
            progress: input.progress,
            status: ReviewStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        state.reports.insert(report.id, report.clone());
        Ok(report)
    }

    async fn update_report(&self, id: DbId, input: &UpdateReport) -> StoreResult<Option<Report>> {
        let mut state = self.state.lock().await;
        let Some(current) = state.reports.get(&id).cloned() else {
            return Ok(None);
        };
        let year = input.year.unwrap_or(current.year);
        let month = match input.month {
            Some(m) => resolve_month(m)?,
            None => current.month,
        };
        if state.period_taken(current.project_id, year, month, id) {
            return Err(duplicate_period());
        }
        let report = Report {
            year,
            month,
            paid_up_to_now_cents: input
                .paid_up_to_now_cents
                .unwrap_or(current.paid_up_to_now_cents),
            progress: input.progress.unwrap_or(current.progress),
            updated_at: Utc::now(),
            ..current
        };
        state.reports.insert(id, report.clone());
        Ok(Some(report))
    }

    async fn delete_report(&self, id: DbId) -> StoreResult<bool> {
        Ok(self.state.lock().await.reports.remove(&id).is_some())
    }

    async fn transition_report_status(
        &self,
        id: DbId,
        expected: ReviewStatus,
        target: ReviewStatus,
        audit: &CreateComment,
    ) -> StoreResult<Option<(Report, Comment)>> {
        let mut state = self.state.lock().await;
        let mut draft = state.clone();

        let Some(report) = draft.reports.get_mut(&id).filter(|r| r.status == expected) else {
            return Ok(None);
        };
        report.status = target;
        report.updated_at = Utc::now();
        let report = report.clone();

        self.take_comment_fault()?;
        let comment = draft.insert_comment(audit);

        *state = draft;
        Ok(Some((report, comment)))
    }

    // -- issues --

    async fn find_issue(&self, id: DbId) -> StoreResult<Option<Issue>> {
        Ok(self.state.lock().await.issues.get(&id).cloned())
    }

    async fn list_issues_by_project(&self, project_id: DbId) -> StoreResult<Vec<Issue>> {
        let state = self.state.lock().await;
        Ok(state
            .issues
            .values()
            .rev()
            .filter(|i| i.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn create_issue(&self, input: &CreateIssue) -> StoreResult<Issue> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let issue = Issue {
            id: state.allocate_id(),
            project_id: input.project_id,
            creator_id: input.creator_id,
            title: input.title.clone(),
            description: input.description.clone(),
            remedy: input.remedy.clone(),
            severity: input.severity,
            likelihood: input.likelihood,
            status: input.status,
            first_raised: now,
            updated_at: now,
        };
        state.issues.insert(issue.id, issue.clone());
        Ok(issue)
    }

    async fn update_issue(&self, id: DbId, input: &UpdateIssue) -> StoreResult<Option<Issue>> {
        let mut state = self.state.lock().await;
        Ok(state.issues.get_mut(&id).map(|issue| {
            if let Some(title) = &input.title {
                issue.title = title.clone();
            }
            if let Some(description) = &input.description {
                issue.description = description.clone();
            }
            if let Some(remedy) = &input.remedy {
                issue.remedy = remedy.clone();
            }
            if let Some(severity) = input.severity {
                issue.severity = severity;
            }
            if let Some(likelihood) = input.likelihood {
                issue.likelihood = likelihood;
            }
            if let Some(status) = input.status {
                issue.status = status;
            }
            issue.updated_at = Utc::now();
            issue.clone()
        }))
    }

    async fn delete_issue(&self, id: DbId) -> StoreResult<bool> {
        Ok(self.state.lock().await.issues.remove(&id).is_some())
    }

    // -- events --

    async fn find_event(&self, id: DbId) -> StoreResult<Option<Event>> {
        Ok(self.state.lock().await.events.get(&id).cloned())
    }

    async fn list_events_by_project(&self, project_id: DbId) -> StoreResult<Vec<Event>> {
        let state = self.state.lock().await;
        Ok(sorted(
            state
                .events
                .values()
                .filter(|e| e.project_id == project_id)
                .cloned(),
            |a, b| (a.planned_start, a.id).cmp(&(b.planned_start, b.id)),
        ))
    }

    async fn create_event(&self, input: &CreateEvent) -> StoreResult<Event> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let event = Event {
            id: state.allocate_id(),
            project_id: input.project_id,
            name: input.name.clone(),
            description: input.description.clone(),
            planned_start: input.planned_start,
            planned_end: input.planned_end,
            completed: input.completed,
            actual_start: input.actual_start,
            actual_end: input.actual_end,
            created_at: now,
            updated_at: now,
        };
        state.events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn update_event(&self, id: DbId, input: &UpdateEvent) -> StoreResult<Option<Event>> {
        let mut state = self.state.lock().await;
        Ok(state.events.get_mut(&id).map(|event| {
            event.name = input.name.clone();
            event.description = input.description.clone();
            event.planned_start = input.planned_start;
            event.planned_end = input.planned_end;
            event.completed = input.completed;
            event.actual_start = input.actual_start;
            event.actual_end = input.actual_end;
            event.updated_at = Utc::now();
            event.clone()
        }))
    }

    async fn delete_event(&self, id: DbId) -> StoreResult<bool> {
        Ok(self.state.lock().await.events.remove(&id).is_some())
    }

    // -- comments --

    async fn find_comment(&self, id: DbId) -> StoreResult<Option<Comment>> {
        Ok(self.state.lock().await.comments.get(&id).cloned())
    }

    async fn list_comments_by_project(&self, project_id: DbId) -> StoreResult<Vec<Comment>> {
        let state = self.state.lock().await;
        Ok(state
            .comments
            .values()
            .filter(|c| c.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn create_comment(&self, input: &CreateComment) -> StoreResult<Comment> {
        self.take_comment_fault()?;
        Ok(self.state.lock().await.insert_comment(input))
    }

    async fn update_comment(&self, id: DbId, content: &str) -> StoreResult<Option<Comment>> {
        let mut state = self.state.lock().await;
        Ok(state.comments.get_mut(&id).map(|comment| {
            comment.content = content.to_string();
            comment.updated_at = Utc::now();
            comment.clone()
        }))
    }

    async fn delete_comment(&self, id: DbId) -> StoreResult<bool> {
        Ok(self.state.lock().await.comments.remove(&id).is_some())
    }
}
