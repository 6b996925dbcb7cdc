// src/db/event_repo.rs

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        auth::User,
        events::{AgendaItem, Event},
    },
};

const EVENT_COLUMNS: &str = "id, owner_id, title, attending_date, budget, created_at, updated_at";

fn map_title_conflict(e: sqlx::Error, title: &str) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() && db_err.constraint() == Some("events_owner_title_key") {
            return AppError::EventTitleTaken(title.to_string());
        }
    }
    e.into()
}

#[derive(Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Events
    // ---

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Event>, AppError> {
        let event = sqlx::query_as::<_, Event>(&format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(event)
    }

    pub async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<Event>, AppError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE owner_id = $1 ORDER BY attending_date"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(events)
    }

    pub async fn count_for_owner(&self, owner_id: Uuid) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        title: &str,
        attending_date: DateTime<Utc>,
        budget: Decimal,
    ) -> Result<Event, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (owner_id, title, attending_date, budget)
            VALUES ($1, $2, $3, $4)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(owner_id)
        .bind(title)
        .bind(attending_date)
        .bind(budget)
        .fetch_one(executor)
        .await
        .map_err(|e| map_title_conflict(e, title))
    }

    pub async fn update(
        &self,
        id: Uuid,
        title: &str,
        attending_date: DateTime<Utc>,
        budget: Decimal,
    ) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET title = $2, attending_date = $3, budget = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(title)
        .bind(attending_date)
        .bind(budget)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_title_conflict(e, title))?
        .ok_or(AppError::ResourceNotFound("Event"))
    }

    // Categories, suppliers, installments, guests and agenda go with it (ON DELETE CASCADE)
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound("Event"));
        }
        Ok(())
    }

    // ---
    // Assignees
    // ---

    pub async fn add_assignees<'e, E>(&self, executor: E, event_id: Uuid, user_ids: &[Uuid]) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            INSERT INTO event_assignees (event_id, user_id)
            SELECT $1, unnest($2::uuid[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(event_id)
        .bind(user_ids)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Returns false when the member was already assigned.
    pub async fn add_assignee(&self, event_id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "INSERT INTO event_assignees (event_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(event_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Returns false when the member was not assigned to begin with.
    pub async fn remove_assignee(&self, event_id: Uuid, user_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM event_assignees WHERE event_id = $1 AND user_id = $2")
            .bind(event_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_assignees(&self, event_id: Uuid) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.name, u.email, u.password_hash, u.email_verified_at, u.captain_id,
                   u.role_id, u.plan, u.plan_overrides, u.invitation_token,
                   u.created_at, u.updated_at
            FROM event_assignees ea
            JOIN users u ON u.id = ea.user_id
            WHERE ea.event_id = $1
            ORDER BY u.name
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    // ---
    // Agenda
    // ---

    pub async fn find_agenda_item(&self, id: Uuid) -> Result<Option<AgendaItem>, AppError> {
        let item = sqlx::query_as::<_, AgendaItem>(
            "SELECT id, event_id, title, date, time FROM agenda_items WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    pub async fn list_agenda(&self, event_id: Uuid) -> Result<Vec<AgendaItem>, AppError> {
        let items = sqlx::query_as::<_, AgendaItem>(
            r#"
            SELECT id, event_id, title, date, time
            FROM agenda_items
            WHERE event_id = $1
            ORDER BY date, time
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(items)
    }

    pub async fn create_agenda_item(
        &self,
        event_id: Uuid,
        title: &str,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<AgendaItem, AppError> {
        let item = sqlx::query_as::<_, AgendaItem>(
            r#"
            INSERT INTO agenda_items (event_id, title, date, time)
            VALUES ($1, $2, $3, $4)
            RETURNING id, event_id, title, date, time
            "#,
        )
        .bind(event_id)
        .bind(title)
        .bind(date)
        .bind(time)
        .fetch_one(&self.pool)
        .await?;
        Ok(item)
    }

    pub async fn update_agenda_item(
        &self,
        id: Uuid,
        title: &str,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<AgendaItem, AppError> {
        sqlx::query_as::<_, AgendaItem>(
            r#"
            UPDATE agenda_items SET title = $2, date = $3, time = $4
            WHERE id = $1
            RETURNING id, event_id, title, date, time
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(date)
        .bind(time)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::ResourceNotFound("Agenda item"))
    }

    pub async fn delete_agenda_item(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM agenda_items WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound("Agenda item"));
        }
        Ok(())
    }
}
