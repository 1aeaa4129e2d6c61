//! Review status lifecycle shared by projects and reports.
//!
//! ```text
//!            ETS approve            ETS reopen / vendor re-review
//!   PENDING ─────────────> APPROVED ─────────────┐
//!      │  │                                      │
//!      │  └──────────────> DENIED ───────────────┤
//!      │     ETS deny                            v
//!      └──── vendor re-review (no state change) PENDING
//! ```
//!
//! Only ETS actors grant or withhold approval. Either side can send an item
//! back to review: ETS by reopening it, the owning vendor by requesting a
//! re-review. Every accepted transition produces an audit comment that must be
//! persisted together with the status change.

use std::fmt;

use crate::error::CoreError;
use crate::lookup::define_lookup_enum;
use crate::roles::{Actor, Role};
use crate::types::DbId;

define_lookup_enum! {
    /// Approval status of a project or a report.
    ReviewStatus (field = "status") {
        Pending = 1 => "PENDING",
        Approved = 2 => "APPROVED",
        Denied = 3 => "DENIED",
    }
}

/// The edge of the lifecycle a request maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// ETS: PENDING -> APPROVED.
    Approve,
    /// ETS: PENDING -> DENIED.
    Deny,
    /// ETS: APPROVED/DENIED -> PENDING.
    Reopen,
    /// Owning vendor: any state -> PENDING.
    ReReview,
}

/// The item a transition applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject<'a> {
    Project,
    /// A report, named by its period (`"January 2024 Report"`).
    Report(&'a str),
}

impl fmt::Display for Subject<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Project => f.write_str("project"),
            Subject::Report(name) => f.write_str(name),
        }
    }
}

/// An accepted transition together with the audit comment it must emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPlan {
    pub from: ReviewStatus,
    pub to: ReviewStatus,
    pub kind: TransitionKind,
    pub audit_comment: String,
}

/// Decide whether `actor` may move an item owned by `owner_id` from `from`
/// to `to`.
///
/// Authorization is checked before edge legality: a vendor asking for
/// APPROVED or DENIED, or a vendor who does not own the item, gets
/// [`CoreError::PermissionDenied`] whatever the current state is.
///
/// `subject` names the item in the audit comment and error messages.
pub fn plan_transition(
    actor: &Actor,
    owner_id: DbId,
    from: ReviewStatus,
    to: ReviewStatus,
    subject: Subject<'_>,
) -> Result<TransitionPlan, CoreError> {
    let kind = match actor.role {
        Role::Ets => match (from, to) {
            (ReviewStatus::Pending, ReviewStatus::Approved) => TransitionKind::Approve,
            (ReviewStatus::Pending, ReviewStatus::Denied) => TransitionKind::Deny,
            (ReviewStatus::Approved | ReviewStatus::Denied, ReviewStatus::Pending) => {
                TransitionKind::Reopen
            }
            _ => return Err(CoreError::InvalidTransition { from, to }),
        },
        Role::Vendor => {
            if to != ReviewStatus::Pending {
                return Err(CoreError::permission_denied(format!(
                    "Only ETS may move a {subject} to {to}"
                )));
            }
            if actor.id != owner_id {
                return Err(CoreError::permission_denied(format!(
                    "Only the owning vendor may request a re-review of this {subject}"
                )));
            }
            TransitionKind::ReReview
        }
    };

    Ok(TransitionPlan {
        from,
        to,
        kind,
        audit_comment: audit_comment(kind, subject),
    })
}

/// Audit comment text for a transition. A vendor re-review of a project
/// carries no subject.
pub fn audit_comment(kind: TransitionKind, subject: Subject<'_>) -> String {
    match (kind, subject) {
        (TransitionKind::Approve, _) => format!("Approved {subject}"),
        (TransitionKind::Deny, _) => format!("Denied {subject}"),
        (TransitionKind::Reopen, _) => format!("Moved {subject} back to pending"),
        (TransitionKind::ReReview, Subject::Project) => "Requesting re-review".to_string(),
        (TransitionKind::ReReview, Subject::Report(name)) => {
            format!("Requested a re-review of {name}")
        }
    }
}

/// Whether `(from, to)` is an edge of the lifecycle for any actor.
pub fn is_legal_edge(from: ReviewStatus, to: ReviewStatus) -> bool {
    matches!(
        (from, to),
        (ReviewStatus::Pending, ReviewStatus::Approved)
            | (ReviewStatus::Pending, ReviewStatus::Denied)
            | (ReviewStatus::Approved, ReviewStatus::Pending)
            | (ReviewStatus::Denied, ReviewStatus::Pending)
            | (ReviewStatus::Pending, ReviewStatus::Pending)
    )
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    const OWNER: DbId = 10;

    fn ets() -> Actor {
        Actor::new(1, Role::Ets)
    }

    fn owner() -> Actor {
        Actor::new(OWNER, Role::Vendor)
    }

    fn other_vendor() -> Actor {
        Actor::new(11, Role::Vendor)
    }

    #[test]
    fn status_ids_match_seed_data() {
        assert_eq!(ReviewStatus::Pending.id(), 1);
        assert_eq!(ReviewStatus::Approved.id(), 2);
        assert_eq!(ReviewStatus::Denied.id(), 3);
    }

    #[test]
    fn ets_approves_pending_project() {
        let plan = plan_transition(
            &ets(),
            OWNER,
            ReviewStatus::Pending,
            ReviewStatus::Approved,
            Subject::Project,
        )
        .unwrap();
        assert_eq!(plan.kind, TransitionKind::Approve);
        assert_eq!(plan.audit_comment, "Approved project");
    }

    #[test]
    fn ets_denies_pending_report() {
        let plan = plan_transition(
            &ets(),
            OWNER,
            ReviewStatus::Pending,
            ReviewStatus::Denied,
            Subject::Report("March 2024 Report"),
        )
        .unwrap();
        assert_eq!(plan.audit_comment, "Denied March 2024 Report");
    }

    #[test]
    fn ets_reopens_terminal_states() {
        for from in [ReviewStatus::Approved, ReviewStatus::Denied] {
            let plan = plan_transition(&ets(), OWNER, from, ReviewStatus::Pending, Subject::Project)
                .unwrap();
            assert_eq!(plan.kind, TransitionKind::Reopen);
            assert_eq!(plan.audit_comment, "Moved project back to pending");
        }
    }

    #[test]
    fn ets_cannot_repeat_or_flip_a_decision() {
        let illegal = [
            (ReviewStatus::Approved, ReviewStatus::Approved),
            (ReviewStatus::Approved, ReviewStatus::Denied),
            (ReviewStatus::Denied, ReviewStatus::Denied),
            (ReviewStatus::Denied, ReviewStatus::Approved),
            (ReviewStatus::Pending, ReviewStatus::Pending),
        ];
        for (from, to) in illegal {
            assert_matches!(
                plan_transition(&ets(), OWNER, from, to, Subject::Project),
                Err(CoreError::InvalidTransition { from: f, to: t }) if f == from && t == to
            );
        }
    }

    #[test]
    fn vendor_can_never_approve_or_deny() {
        for vendor in [owner(), other_vendor()] {
            for from in ReviewStatus::ALL.iter().copied() {
                for to in [ReviewStatus::Approved, ReviewStatus::Denied] {
                    assert_matches!(
                        plan_transition(&vendor, OWNER, from, to, Subject::Project),
                        Err(CoreError::PermissionDenied(_))
                    );
                }
            }
        }
    }

    #[test]
    fn owner_requests_re_review_from_any_state() {
        for from in ReviewStatus::ALL.iter().copied() {
            let plan =
                plan_transition(&owner(), OWNER, from, ReviewStatus::Pending, Subject::Project)
                    .unwrap();
            assert_eq!(plan.kind, TransitionKind::ReReview);
            assert_eq!(plan.audit_comment, "Requesting re-review");
        }
    }

    #[test]
    fn report_re_review_names_the_period() {
        let plan = plan_transition(
            &owner(),
            OWNER,
            ReviewStatus::Denied,
            ReviewStatus::Pending,
            Subject::Report("May 2024 Report"),
        )
        .unwrap();
        assert_eq!(plan.audit_comment, "Requested a re-review of May 2024 Report");
    }

    #[test]
    fn non_owner_vendor_cannot_request_re_review() {
        assert_matches!(
            plan_transition(
                &other_vendor(),
                OWNER,
                ReviewStatus::Denied,
                ReviewStatus::Pending,
                Subject::Project
            ),
            Err(CoreError::PermissionDenied(_))
        );
    }

    #[test]
    fn every_accepted_plan_is_a_legal_edge() {
        for actor in [ets(), owner(), other_vendor()] {
            for from in ReviewStatus::ALL.iter().copied() {
                for to in ReviewStatus::ALL.iter().copied() {
                    if plan_transition(&actor, OWNER, from, to, Subject::Project).is_ok() {
                        assert!(is_legal_edge(from, to), "{from} -> {to} accepted");
                    }
                }
            }
        }
    }
}
