use ivv_core::authz::require_role;
use ivv_core::error::CoreError;
use ivv_core::roles::{Actor, Role};
use ivv_core::types::{DbId, SENTINEL_USER_ID};
use ivv_db::models::user::{CreateUser, User, UserResponse};
use ivv_db::repositories::user_repo::EMAIL_CONSTRAINT;
use serde::Serialize;

use super::{not_found, ProjectWorkflowEngine};
use crate::credentials::{
    generate_password, hash_password, validate_password_strength, verify_password,
};
use crate::error::{WorkflowError, WorkflowResult};
use crate::inputs::{ChangePasswordInput, NewUserInput};

/// A freshly created account and its one-time password.
///
/// The plaintext password exists only in this value; the store keeps the hash.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedUser {
    pub user: UserResponse,
    pub generated_password: String,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn sentinel_is_immutable() -> WorkflowError {
    CoreError::invalid_field("user_id", "The deleted-user placeholder cannot be modified").into()
}

impl ProjectWorkflowEngine {
    /// Check a login. Any mismatch, including an unknown email, is
    /// [`CoreError::NotAuthenticated`].
    pub async fn authenticate(&self, email: &str, password: &str) -> WorkflowResult<User> {
        let user = self
            .store
            .find_user_by_email(&normalize_email(email))
            .await?
            .filter(|u| u.id != SENTINEL_USER_ID)
            .ok_or(CoreError::NotAuthenticated)?;

        if !verify_password(password, &user.password_hash) {
            tracing::warn!(user_id = user.id, "Login rejected");
            return Err(CoreError::NotAuthenticated.into());
        }

        tracing::info!(user_id = user.id, role = %user.role, "User authenticated");
        Ok(user)
    }

    /// Resolve an authenticated user id to the acting [`Actor`] with the
    /// role currently on record. A deleted user no longer resolves.
    pub async fn resolve_actor(&self, user_id: DbId) -> WorkflowResult<Actor> {
        let user = self
            .store
            .find_user(user_id)
            .await?
            .filter(|u| u.id != SENTINEL_USER_ID)
            .ok_or(CoreError::NotAuthenticated)?;
        Ok(user.actor())
    }

    /// The actor's own account.
    pub async fn current_user(&self, actor: &Actor) -> WorkflowResult<UserResponse> {
        let user = self
            .store
            .find_user(actor.id)
            .await?
            .ok_or(CoreError::NotAuthenticated)?;
        Ok(UserResponse::from(&user))
    }

    /// Self-service password change. The old password must verify.
    pub async fn change_password(
        &self,
        actor: &Actor,
        input: ChangePasswordInput,
    ) -> WorkflowResult<()> {
        let user = self
            .store
            .find_user(actor.id)
            .await?
            .ok_or(CoreError::NotAuthenticated)?;
        if !verify_password(&input.old_password, &user.password_hash) {
            return Err(CoreError::permission_denied("Current password is incorrect").into());
        }
        validate_password_strength(&input.new_password)?;

        let hash = hash_password(&input.new_password)?;
        self.store.update_password(user.id, &hash).await?;

        tracing::info!(user_id = user.id, "Password changed");
        Ok(())
    }

    /// ETS only. Lists every account except the deleted-user placeholder.
    pub async fn list_users(&self, actor: &Actor) -> WorkflowResult<Vec<UserResponse>> {
        require_role(actor, &[Role::Ets])?;
        let users = self.store.list_users().await?;
        Ok(users.iter().map(UserResponse::from).collect())
    }

    /// Create an account with a generated one-time password. ETS only.
    pub async fn create_user(
        &self,
        actor: &Actor,
        input: NewUserInput,
    ) -> WorkflowResult<CreatedUser> {
        require_role(actor, &[Role::Ets])?;
        let role = input.check()?;
        let email = normalize_email(&input.email);

        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(email_taken().into());
        }

        let password = generate_password(self.config.generated_password_length);
        let user = self
            .store
            .create_user(&CreateUser {
                first_name: input.first_name.trim().to_string(),
                last_name: input.last_name.trim().to_string(),
                email,
                password_hash: hash_password(&password)?,
                role,
            })
            .await
            .map_err(|e| {
                if e.violates(EMAIL_CONSTRAINT) {
                    email_taken().into()
                } else {
                    WorkflowError::from(e)
                }
            })?;

        tracing::info!(actor_id = actor.id, user_id = user.id, role = %role, "User created");
        Ok(CreatedUser {
            user: UserResponse::from(&user),
            generated_password: password,
        })
    }

    /// Replace a user's password with a generated one and return it. ETS only.
    pub async fn reset_password(&self, actor: &Actor, user_id: DbId) -> WorkflowResult<String> {
        require_role(actor, &[Role::Ets])?;
        if user_id == SENTINEL_USER_ID {
            return Err(sentinel_is_immutable());
        }

        let password = generate_password(self.config.generated_password_length);
        let hash = hash_password(&password)?;
        if !self.store.update_password(user_id, &hash).await? {
            return Err(not_found("User", user_id));
        }

        tracing::info!(actor_id = actor.id, user_id, "Password reset");
        Ok(password)
    }

    /// Change a user's role. ETS only.
    pub async fn change_user_role(
        &self,
        actor: &Actor,
        user_id: DbId,
        role: Role,
    ) -> WorkflowResult<UserResponse> {
        require_role(actor, &[Role::Ets])?;
        if user_id == SENTINEL_USER_ID {
            return Err(sentinel_is_immutable());
        }

        let user = self
            .store
            .update_user_role(user_id, role)
            .await?
            .ok_or_else(|| not_found("User", user_id))?;

        tracing::info!(actor_id = actor.id, user_id, role = %role, "User role changed");
        Ok(UserResponse::from(&user))
    }

    /// Delete a user, handing their projects, reports, issues and comments
    /// to the deleted-user placeholder. ETS only.
    pub async fn delete_user(&self, actor: &Actor, user_id: DbId) -> WorkflowResult<()> {
        require_role(actor, &[Role::Ets])?;
        if user_id == SENTINEL_USER_ID {
            return Err(sentinel_is_immutable());
        }

        let counts = self
            .store
            .delete_user_reassigning(user_id)
            .await?
            .ok_or_else(|| not_found("User", user_id))?;

        tracing::info!(
            actor_id = actor.id,
            user_id,
            projects = counts.projects,
            reports = counts.reports,
            issues = counts.issues,
            comments = counts.comments,
            "User deleted",
        );
        Ok(())
    }

    /// Create the first ETS account if no user has `email` yet.
    ///
    /// Returns the new account, or `None` when it already existed.
    pub async fn bootstrap_admin(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> WorkflowResult<Option<UserResponse>> {
        let email = normalize_email(email);
        if self.store.find_user_by_email(&email).await?.is_some() {
            return Ok(None);
        }
        validate_password_strength(password)?;

        let user = self
            .store
            .create_user(&CreateUser {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                email,
                password_hash: hash_password(password)?,
                role: Role::Ets,
            })
            .await?;

        tracing::info!(user_id = user.id, "Bootstrap ETS account created");
        Ok(Some(UserResponse::from(&user)))
    }
}

fn email_taken() -> CoreError {
    CoreError::invalid_field("email", "is already in use")
}
