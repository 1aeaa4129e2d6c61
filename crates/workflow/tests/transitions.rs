//! Status transitions for projects and reports: who may move what where,
//! and the audit comment each accepted move leaves behind.

mod common;

use assert_matches::assert_matches;
use ivv_core::error::CoreError;
use ivv_core::review::ReviewStatus;
use ivv_workflow::{WorkflowError, WorkflowStore};

use common::Fixture;

const ALL: [ReviewStatus; 3] = [
    ReviewStatus::Pending,
    ReviewStatus::Approved,
    ReviewStatus::Denied,
];

/// Walk a fresh project to `status` using ETS moves.
async fn project_in(fx: &Fixture, status: ReviewStatus) -> i64 {
    let project = fx.project().await;
    if status != ReviewStatus::Pending {
        fx.engine
            .change_project_status(&fx.ets, project.id, status)
            .await
            .unwrap();
    }
    project.id
}

#[tokio::test]
async fn approve_then_approve_again_is_invalid() {
    let fx = Fixture::new().await;
    let project = fx.project().await;

    let approved = fx
        .engine
        .change_project_status(&fx.ets, project.id, ReviewStatus::Approved)
        .await
        .unwrap();
    assert_eq!(approved.status, ReviewStatus::Approved);

    let comments = fx.store.list_comments_by_project(project.id).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].content, "Approved project");
    assert_eq!(comments[0].author_id, fx.ets.id);

    let err = fx
        .engine
        .change_project_status(&fx.ets, project.id, ReviewStatus::Approved)
        .await
        .unwrap_err();
    assert_matches!(
        err,
        WorkflowError::Core(CoreError::InvalidTransition {
            from: ReviewStatus::Approved,
            to: ReviewStatus::Approved
        })
    );
    assert_eq!(
        fx.store
            .list_comments_by_project(project.id)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn ets_transition_table() {
    for from in ALL {
        for to in ALL {
            let fx = Fixture::new().await;
            let id = project_in(&fx, from).await;
            let result = fx.engine.change_project_status(&fx.ets, id, to).await;

            let legal = matches!(
                (from, to),
                (ReviewStatus::Pending, ReviewStatus::Approved)
                    | (ReviewStatus::Pending, ReviewStatus::Denied)
                    | (ReviewStatus::Approved, ReviewStatus::Pending)
                    | (ReviewStatus::Denied, ReviewStatus::Pending)
            );
            if legal {
                assert_eq!(result.unwrap().status, to, "{from} -> {to}");
            } else {
                assert_matches!(
                    result,
                    Err(WorkflowError::Core(CoreError::InvalidTransition { .. })),
                    "{from} -> {to}"
                );
            }
        }
    }
}

#[tokio::test]
async fn vendor_can_never_approve_or_deny() {
    for from in ALL {
        let fx = Fixture::new().await;
        let id = project_in(&fx, from).await;
        for to in [ReviewStatus::Approved, ReviewStatus::Denied] {
            for actor in [fx.vendor, fx.other_vendor] {
                assert_matches!(
                    fx.engine.change_project_status(&actor, id, to).await,
                    Err(WorkflowError::Core(CoreError::PermissionDenied(_)))
                );
            }
        }
        let project = fx.engine.get_project(&fx.ets, id).await.unwrap();
        assert_eq!(project.status, from);
    }
}

#[tokio::test]
async fn owner_requests_re_review_from_every_state() {
    for from in ALL {
        let fx = Fixture::new().await;
        let id = project_in(&fx, from).await;

        let project = fx
            .engine
            .change_project_status(&fx.vendor, id, ReviewStatus::Pending)
            .await
            .unwrap();
        assert_eq!(project.status, ReviewStatus::Pending);

        let comments = fx.store.list_comments_by_project(id).await.unwrap();
        let last = comments.last().unwrap();
        assert_eq!(last.content, "Requesting re-review");
        assert_eq!(last.author_id, fx.vendor.id);
    }
}

#[tokio::test]
async fn denied_then_re_review_leaves_both_comments() {
    let fx = Fixture::new().await;
    let project = fx.project().await;
    fx.engine
        .change_project_status(&fx.ets, project.id, ReviewStatus::Denied)
        .await
        .unwrap();
    fx.engine
        .change_project_status(&fx.vendor, project.id, ReviewStatus::Pending)
        .await
        .unwrap();

    let comments = fx.store.list_comments_by_project(project.id).await.unwrap();
    let trail: Vec<(i64, &str)> = comments
        .iter()
        .map(|c| (c.author_id, c.content.as_str()))
        .collect();
    assert_eq!(
        trail,
        vec![
            (fx.ets.id, "Denied project"),
            (fx.vendor.id, "Requesting re-review"),
        ]
    );
}

#[tokio::test]
async fn non_owner_cannot_request_re_review() {
    let fx = Fixture::new().await;
    let id = project_in(&fx, ReviewStatus::Denied).await;
    assert_matches!(
        fx.engine
            .change_project_status(&fx.other_vendor, id, ReviewStatus::Pending)
            .await,
        Err(WorkflowError::Core(CoreError::PermissionDenied(_)))
    );
}

#[tokio::test]
async fn ets_reopen_and_deny_comments() {
    let fx = Fixture::new().await;
    let id = project_in(&fx, ReviewStatus::Denied).await;
    fx.engine
        .change_project_status(&fx.ets, id, ReviewStatus::Pending)
        .await
        .unwrap();

    let contents: Vec<String> = fx
        .store
        .list_comments_by_project(id)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.content)
        .collect();
    assert_eq!(contents, vec!["Denied project", "Moved project back to pending"]);
}

#[tokio::test]
async fn report_transitions_name_the_period() {
    let fx = Fixture::new().await;
    let project = fx.project().await;
    let report = fx.report(&project, "January").await;

    let approved = fx
        .engine
        .change_report_status(&fx.ets, report.id, ReviewStatus::Approved)
        .await
        .unwrap();
    assert_eq!(approved.status, ReviewStatus::Approved);

    fx.engine
        .change_report_status(&fx.vendor, report.id, ReviewStatus::Pending)
        .await
        .unwrap();

    let contents: Vec<String> = fx
        .store
        .list_comments_by_project(project.id)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.content)
        .collect();
    assert_eq!(
        contents,
        vec![
            "Approved January 2024 Report",
            "Requested a re-review of January 2024 Report",
        ]
    );

    // The project's own status is untouched.
    let project = fx.engine.get_project(&fx.ets, project.id).await.unwrap();
    assert_eq!(project.status, ReviewStatus::Pending);
}

#[tokio::test]
async fn vendor_cannot_approve_report() {
    let fx = Fixture::new().await;
    let project = fx.project().await;
    let report = fx.report(&project, "February").await;

    assert_matches!(
        fx.engine
            .change_report_status(&fx.vendor, report.id, ReviewStatus::Approved)
            .await,
        Err(WorkflowError::Core(CoreError::PermissionDenied(_)))
    );
}

#[tokio::test]
async fn failed_audit_comment_leaves_status_unchanged() {
    let fx = Fixture::new().await;
    let project = fx.project().await;
    let report = fx.report(&project, "March").await;

    fx.store.fail_next_comment_insert();
    assert_matches!(
        fx.engine
            .change_project_status(&fx.ets, project.id, ReviewStatus::Approved)
            .await,
        Err(WorkflowError::Store(_))
    );
    let unchanged = fx.engine.get_project(&fx.ets, project.id).await.unwrap();
    assert_eq!(unchanged.status, ReviewStatus::Pending);

    fx.store.fail_next_comment_insert();
    assert_matches!(
        fx.engine
            .change_report_status(&fx.ets, report.id, ReviewStatus::Denied)
            .await,
        Err(WorkflowError::Store(_))
    );
    let unchanged = fx.engine.get_report(&fx.ets, report.id).await.unwrap();
    assert_eq!(unchanged.status, ReviewStatus::Pending);

    assert!(fx
        .store
        .list_comments_by_project(project.id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn missing_project_is_not_found() {
    let fx = Fixture::new().await;
    assert_matches!(
        fx.engine
            .change_project_status(&fx.ets, 9_999, ReviewStatus::Approved)
            .await,
        Err(WorkflowError::Core(CoreError::NotFound {
            entity: "Project",
            id: 9_999
        }))
    );
}
