// src/services/rbac_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    authz::{Permission, RoleDraft},
    common::error::AppError,
    db::RbacRepository,
    models::rbac::{PermissionInfo, Role},
};

// Role CRUD. Authorization happens before any of these are called.
#[derive(Clone)]
pub struct RbacService {
    repo: RbacRepository,
    pool: PgPool,
}

impl RbacService {
    pub fn new(repo: RbacRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn find_role(&self, id: Uuid) -> Result<Role, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::ResourceNotFound("Role"))
    }

    pub async fn create_role(
        &self,
        captain_id: Uuid,
        name: &str,
        permissions: &[String],
    ) -> Result<Role, AppError> {
        let draft = RoleDraft::new(name, permissions)?;

        let role = self
            .repo
            .create_role(&self.pool, captain_id, &draft.name, &draft.permissions)
            .await?;

        tracing::info!(role_id = %role.id, %captain_id, "role created");
        Ok(role)
    }

    pub async fn update_role(&self, role: &Role, name: &str, permissions: &[String]) -> Result<Role, AppError> {
        let draft = RoleDraft::new(name, permissions)?;
        self.repo.update_role(role.id, &draft.name, &draft.permissions).await
    }

    pub async fn delete_role(&self, role: &Role) -> Result<(), AppError> {
        self.repo.delete_role(role.id).await?;
        tracing::info!(role_id = %role.id, captain_id = %role.captain_id, "role deleted");
        Ok(())
    }

    /// The catalog, for role-building screens.
    pub fn list_permissions(&self) -> Vec<PermissionInfo> {
        Permission::ALL
            .iter()
            .map(|p| PermissionInfo {
                slug: p.as_str(),
                area: p.area().as_str(),
                resource_scoped: p.is_resource_scoped(),
            })
            .collect()
    }
}
