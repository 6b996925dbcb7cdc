// src/services/member_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{RbacRepository, UserRepository},
    models::{auth::User, rbac::Role},
};

#[derive(Clone)]
pub struct MemberService {
    user_repo: UserRepository,
    rbac_repo: RbacRepository,
    app_url: String,
}

impl MemberService {
    pub fn new(user_repo: UserRepository, rbac_repo: RbacRepository, app_url: String) -> Self {
        Self { user_repo, rbac_repo, app_url }
    }

    /// Any account by id; the gate decides whether it is reachable.
    pub async fn find_member(&self, id: Uuid) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::ResourceNotFound("Member"))
    }

    /// Creates a pending member of `captain_id` and logs the join link in
    /// place of the invitation e-mail.
    pub async fn invite(
        &self,
        captain_id: Uuid,
        name: &str,
        email: &str,
        role_id: Uuid,
    ) -> Result<User, AppError> {
        self.assignable_role(captain_id, role_id).await?;

        let member = self.user_repo.create_member(captain_id, name, email, role_id).await?;

        if let Some(token) = member.invitation_token {
            tracing::info!(
                user_id = %member.id,
                %captain_id,
                link = %format!("{}/members/join/{}", self.app_url.trim_end_matches('/'), token),
                "member invited"
            );
        }

        Ok(member)
    }

    pub async fn update(&self, member: &User, name: Option<&str>, role_id: Option<Uuid>) -> Result<User, AppError> {
        let captain_id = member.captain_id.ok_or(AppError::ResourceNotFound("Member"))?;

        if let Some(role_id) = role_id {
            self.assignable_role(captain_id, role_id).await?;
        }

        self.user_repo.update_member(member.id, name, role_id).await
    }

    pub async fn delete(&self, member: &User) -> Result<(), AppError> {
        self.user_repo.delete_member(member.id).await?;
        tracing::info!(user_id = %member.id, captain_id = ?member.captain_id, "member removed");
        Ok(())
    }

    // Only the captain's own roles can be handed out.
    async fn assignable_role(&self, captain_id: Uuid, role_id: Uuid) -> Result<Role, AppError> {
        self.rbac_repo
            .find_by_id(role_id)
            .await?
            .filter(|role| role.captain_id == captain_id)
            .ok_or_else(|| AppError::field("role_id", "exists", "The selected role is invalid."))
    }
}
