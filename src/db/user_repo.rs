// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::auth::User};

const USER_COLUMNS: &str = r#"
    id, name, email, password_hash, email_verified_at, captain_id, role_id,
    plan, plan_overrides, invitation_token, created_at, updated_at
"#;

// Duplicate e-mail → friendly 409
fn map_email_conflict(e: sqlx::Error) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() && db_err.constraint() == Some("users_email_key") {
            return AppError::EmailAlreadyExists;
        }
    }
    e.into()
}

// Every read/write on the 'users' table: captains and members alike
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    // Only pending members still hold a token
    pub async fn find_by_invitation_token(&self, token: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS} FROM users
            WHERE invitation_token = $1
              AND email_verified_at IS NULL
              AND captain_id IS NOT NULL
            "#
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// A captain signs up verified, on the basic plan.
    pub async fn create_captain<'e, E>(
        &self,
        executor: E,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, email, password_hash, email_verified_at, plan)
            VALUES ($1, $2, $3, NOW(), 'basic')
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(executor)
        .await
        .map_err(map_email_conflict)
    }

    pub async fn assign_role<'e, E>(&self, executor: E, user_id: Uuid, role_id: Uuid) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET role_id = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(role_id)
        .fetch_one(executor)
        .await?;
        Ok(user)
    }

    /// Pending member: no password, unverified, fresh join token.
    pub async fn create_member(
        &self,
        captain_id: Uuid,
        name: &str,
        email: &str,
        role_id: Uuid,
    ) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, email, captain_id, role_id, invitation_token)
            VALUES ($1, $2, $3, $4, gen_random_uuid())
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(email)
        .bind(captain_id)
        .bind(role_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_email_conflict)
    }

    // Fields left as None keep their current value
    pub async fn update_member(
        &self,
        id: Uuid,
        name: Option<&str>,
        role_id: Option<Uuid>,
    ) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                role_id = COALESCE($3, role_id),
                updated_at = NOW()
            WHERE id = $1 AND captain_id IS NOT NULL
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(role_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::ResourceNotFound("Member"))
    }

    /// Closes the invitation: sets the credentials, verifies, burns the token.
    /// Returns `None` when the invitation was already used.
    pub async fn complete_invitation(
        &self,
        id: Uuid,
        name: &str,
        password_hash: &str,
    ) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET name = $2,
                password_hash = $3,
                email_verified_at = NOW(),
                invitation_token = NULL,
                updated_at = NOW()
            WHERE id = $1 AND email_verified_at IS NULL
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn delete_member(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1 AND captain_id IS NOT NULL")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound("Member"));
        }
        Ok(())
    }

    pub async fn list_members(&self, captain_id: Uuid) -> Result<Vec<User>, AppError> {
        let members = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE captain_id = $1 ORDER BY name"
        ))
        .bind(captain_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(members)
    }

    // Pending invitations count too: they occupy a seat.
    pub async fn count_members(&self, captain_id: Uuid) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE captain_id = $1")
            .bind(captain_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Subset of `ids` that are verified members of `captain_id`.
    pub async fn find_verified_members(
        &self,
        captain_id: Uuid,
        ids: &[Uuid],
    ) -> Result<Vec<User>, AppError> {
        let members = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS} FROM users
            WHERE captain_id = $1
              AND id = ANY($2)
              AND email_verified_at IS NOT NULL
            "#
        ))
        .bind(captain_id)
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(members)
    }
}
