//! Authorization primitives used by every mutating engine operation.

use crate::error::CoreError;
use crate::review::ReviewStatus;
use crate::roles::{Actor, Role};
use crate::types::DbId;

/// Resolve an optional actor, failing with [`CoreError::NotAuthenticated`]
/// when the identity provider supplied none.
pub fn require_actor(actor: Option<&Actor>) -> Result<&Actor, CoreError> {
    actor.ok_or(CoreError::NotAuthenticated)
}

/// Fail with [`CoreError::PermissionDenied`] unless the actor holds one of `allowed`.
pub fn require_role(actor: &Actor, allowed: &[Role]) -> Result<(), CoreError> {
    if allowed.contains(&actor.role) {
        return Ok(());
    }
    let names: Vec<&str> = allowed.iter().map(|r| r.as_str()).collect();
    Err(CoreError::permission_denied(format!(
        "Requires role {}",
        names.join(" or ")
    )))
}

/// Succeed if the actor owns the resource or holds one of `allowed`.
pub fn require_owner_or_role(
    actor: &Actor,
    owner_id: DbId,
    allowed: &[Role],
) -> Result<(), CoreError> {
    if actor.id == owner_id || allowed.contains(&actor.role) {
        return Ok(());
    }
    Err(CoreError::permission_denied(
        "Only the author or an ETS user may do this",
    ))
}

/// Succeed only for a vendor who is also the owner.
pub fn require_owning_vendor(actor: &Actor, owner_id: DbId) -> Result<(), CoreError> {
    require_role(actor, &[Role::Vendor])?;
    if actor.id != owner_id {
        return Err(CoreError::permission_denied(
            "Only the vendor who created this project may do this",
        ));
    }
    Ok(())
}

/// Fail with [`CoreError::ProjectLocked`] once an item is approved.
///
/// `what` names the locked item in the error message.
pub fn require_editable(status: ReviewStatus, what: &str) -> Result<(), CoreError> {
    if status == ReviewStatus::Approved {
        return Err(CoreError::ProjectLocked(format!(
            "{what} is approved and can no longer be changed"
        )));
    }
    Ok(())
}

/// Project-flavoured [`require_editable`].
pub fn require_project_editable(status: ReviewStatus) -> Result<(), CoreError> {
    require_editable(status, "Project")
}

/// Whether the actor may read items belonging to a project owned by `owner_id`.
pub fn require_visible(actor: &Actor, owner_id: DbId) -> Result<(), CoreError> {
    require_owner_or_role(actor, owner_id, &[Role::Ets]).map_err(|_| {
        CoreError::permission_denied("Vendors may only view their own projects")
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn missing_actor_is_not_authenticated() {
        assert_matches!(require_actor(None), Err(CoreError::NotAuthenticated));
        let actor = Actor::new(3, Role::Vendor);
        assert_eq!(require_actor(Some(&actor)).unwrap().id, 3);
    }

    #[test]
    fn role_outside_allowed_set_is_denied() {
        let vendor = Actor::new(1, Role::Vendor);
        assert!(require_role(&vendor, &[Role::Vendor, Role::Ets]).is_ok());
        assert_matches!(
            require_role(&vendor, &[Role::Ets]),
            Err(CoreError::PermissionDenied(msg)) if msg == "Requires role ETS"
        );
    }

    #[test]
    fn owner_or_role() {
        let author = Actor::new(5, Role::Vendor);
        let stranger = Actor::new(6, Role::Vendor);
        let ets = Actor::new(7, Role::Ets);
        assert!(require_owner_or_role(&author, 5, &[Role::Ets]).is_ok());
        assert!(require_owner_or_role(&ets, 5, &[Role::Ets]).is_ok());
        assert_matches!(
            require_owner_or_role(&stranger, 5, &[Role::Ets]),
            Err(CoreError::PermissionDenied(_))
        );
    }

    #[test]
    fn owning_vendor_requires_both_role_and_identity() {
        let ets_with_same_id = Actor::new(5, Role::Ets);
        assert!(require_owning_vendor(&Actor::new(5, Role::Vendor), 5).is_ok());
        assert!(require_owning_vendor(&Actor::new(6, Role::Vendor), 5).is_err());
        assert!(require_owning_vendor(&ets_with_same_id, 5).is_err());
    }

    #[test]
    fn only_approved_is_locked() {
        assert!(require_project_editable(ReviewStatus::Pending).is_ok());
        assert!(require_project_editable(ReviewStatus::Denied).is_ok());
        assert_matches!(
            require_project_editable(ReviewStatus::Approved),
            Err(CoreError::ProjectLocked(_))
        );
    }
}
