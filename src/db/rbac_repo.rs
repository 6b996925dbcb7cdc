// src/db/rbac_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::rbac::Role};

fn map_name_conflict(e: sqlx::Error, name: &str) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() && db_err.constraint() == Some("roles_captain_name_key") {
            return AppError::RoleNameTaken(name.to_string());
        }
    }
    e.into()
}

#[derive(Clone)]
pub struct RbacRepository {
    pool: PgPool,
}

impl RbacRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // 1. Create a role (takes an executor so signup can run it inside its transaction)
    pub async fn create_role<'e, E>(
        &self,
        executor: E,
        captain_id: Uuid,
        name: &str,
        permissions: &[String],
    ) -> Result<Role, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Role>(
            r#"
            INSERT INTO roles (captain_id, name, permissions)
            VALUES ($1, $2, $3)
            RETURNING id, captain_id, name, permissions, created_at, updated_at
            "#,
        )
        .bind(captain_id)
        .bind(name)
        .bind(permissions)
        .fetch_one(executor)
        .await
        .map_err(|e| map_name_conflict(e, name))
    }

    // 2. Replace name and permission set
    pub async fn update_role(
        &self,
        id: Uuid,
        name: &str,
        permissions: &[String],
    ) -> Result<Role, AppError> {
        sqlx::query_as::<_, Role>(
            r#"
            UPDATE roles
            SET name = $2, permissions = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, captain_id, name, permissions, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(permissions)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_name_conflict(e, name))?
        .ok_or(AppError::ResourceNotFound("Role"))
    }

    // 3. Delete. Accounts holding the role keep a dangling role_id and lose every permission.
    pub async fn delete_role(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound("Role"));
        }
        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Role>, AppError> {
        let role = sqlx::query_as::<_, Role>(
            "SELECT id, captain_id, name, permissions, created_at, updated_at FROM roles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(role)
    }

    // 4. Roles of one captain, for listing and for assignment checks
    pub async fn list_roles(&self, captain_id: Uuid) -> Result<Vec<Role>, AppError> {
        let roles = sqlx::query_as::<_, Role>(
            r#"
            SELECT id, captain_id, name, permissions, created_at, updated_at
            FROM roles
            WHERE captain_id = $1
            ORDER BY name
            "#,
        )
        .bind(captain_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(roles)
    }
}
