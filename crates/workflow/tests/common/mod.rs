#![allow(dead_code)]

use std::sync::Arc;

use ivv_core::roles::{Actor, Role};
use ivv_db::models::project::Project;
use ivv_db::models::report::Report;
use ivv_db::models::user::CreateUser;
use ivv_workflow::inputs::{NewProjectInput, NewReportInput};
use ivv_workflow::{EngineConfig, MemoryStore, ProjectWorkflowEngine, WorkflowStore};

/// An engine over a fresh in-memory store with one ETS user and two vendors.
pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub engine: ProjectWorkflowEngine,
    pub ets: Actor,
    pub vendor: Actor,
    pub other_vendor: Actor,
}

impl Fixture {
    pub async fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let ets = seed_user(&store, "ets@example.com", Role::Ets).await;
        let vendor = seed_user(&store, "vendor@example.com", Role::Vendor).await;
        let other_vendor = seed_user(&store, "other@example.com", Role::Vendor).await;
        let engine = ProjectWorkflowEngine::new(store.clone(), EngineConfig::default());
        Self {
            store,
            engine,
            ets,
            vendor,
            other_vendor,
        }
    }

    /// A PENDING project owned by `self.vendor`.
    pub async fn project(&self) -> Project {
        self.engine
            .create_project(&self.vendor, project_input("Eligibility Modernization"))
            .await
            .unwrap()
    }

    /// A PENDING report on `project` for the given month of 2024.
    pub async fn report(&self, project: &Project, month: &str) -> Report {
        self.engine
            .create_report(&self.vendor, report_input(project.id, 2024, month))
            .await
            .unwrap()
    }
}

/// Insert a user directly into the store. The password hash is a placeholder
/// that never verifies.
pub async fn seed_user(store: &MemoryStore, email: &str, role: Role) -> Actor {
    store
        .create_user(&CreateUser {
            first_name: "Test".to_string(),
            last_name: email.to_string(),
            email: email.to_string(),
            password_hash: "!".to_string(),
            role,
        })
        .await
        .unwrap()
        .actor()
}

pub fn project_input(name: &str) -> NewProjectInput {
    NewProjectInput {
        name: name.to_string(),
        description: "State IV&V engagement".to_string(),
        original_contract_award_cents: 250_000_000,
    }
}

pub fn report_input(project_id: i64, year: i32, month: &str) -> NewReportInput {
    NewReportInput {
        project_id,
        year,
        month: month.to_string(),
        paid_up_to_now_cents: 1_000_000,
        progress: 25.0,
    }
}
