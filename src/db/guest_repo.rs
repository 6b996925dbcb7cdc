// src/db/guest_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::guests::{Guest, GuestRelation, GuestStatus},
};

const GUEST_COLUMNS: &str = "id, event_id, name, email, relation, status, rsvp_token, created_at";

fn map_email_conflict(e: sqlx::Error) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() && db_err.constraint() == Some("guests_event_email_key") {
            return AppError::field("email", "unique", "This email has already been invited.");
        }
    }
    e.into()
}

#[derive(Clone)]
pub struct GuestRepository {
    pool: PgPool,
}

impl GuestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Guest>, AppError> {
        let guest = sqlx::query_as::<_, Guest>(&format!("SELECT {GUEST_COLUMNS} FROM guests WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(guest)
    }

    pub async fn list_for_event(&self, event_id: Uuid) -> Result<Vec<Guest>, AppError> {
        let guests = sqlx::query_as::<_, Guest>(&format!(
            "SELECT {GUEST_COLUMNS} FROM guests WHERE event_id = $1 ORDER BY name"
        ))
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(guests)
    }

    pub async fn create(
        &self,
        event_id: Uuid,
        name: &str,
        email: &str,
        relation: GuestRelation,
    ) -> Result<Guest, AppError> {
        sqlx::query_as::<_, Guest>(&format!(
            r#"
            INSERT INTO guests (event_id, name, email, relation)
            VALUES ($1, $2, $3, $4)
            RETURNING {GUEST_COLUMNS}
            "#
        ))
        .bind(event_id)
        .bind(name)
        .bind(email)
        .bind(relation)
        .fetch_one(&self.pool)
        .await
        .map_err(map_email_conflict)
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: Option<&str>,
        relation: Option<GuestRelation>,
    ) -> Result<Guest, AppError> {
        sqlx::query_as::<_, Guest>(&format!(
            r#"
            UPDATE guests
            SET name = COALESCE($2, name),
                relation = COALESCE($3, relation)
            WHERE id = $1
            RETURNING {GUEST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(name)
        .bind(relation)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::ResourceNotFound("Guest"))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM guests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound("Guest"));
        }
        Ok(())
    }

    /// Moves a pending guest to `status`. Answered invitations are left
    /// untouched and yield `None`.
    pub async fn answer_pending(&self, rsvp_token: Uuid, status: GuestStatus) -> Result<Option<Guest>, AppError> {
        let guest = sqlx::query_as::<_, Guest>(&format!(
            r#"
            UPDATE guests SET status = $2
            WHERE rsvp_token = $1 AND status = 'pending'
            RETURNING {GUEST_COLUMNS}
            "#
        ))
        .bind(rsvp_token)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(guest)
    }
}
