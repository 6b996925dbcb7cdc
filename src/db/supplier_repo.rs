// src/db/supplier_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, FromRow, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::suppliers::{
        ContractFile, EventCategory, EventSupplier, Installment, InstallmentStatus, Supplier,
        SupplierCategory, SupplierStatus,
    },
};

// Per-event rows joined with their catalog name, for the event page
#[derive(Debug, FromRow)]
pub struct NamedEventCategory {
    #[sqlx(flatten)]
    pub category: EventCategory,
    pub name: String,
}

#[derive(Debug, FromRow)]
pub struct NamedEventSupplier {
    #[sqlx(flatten)]
    pub supplier: EventSupplier,
    pub name: String,
}

#[derive(Clone)]
pub struct SupplierRepository {
    pool: PgPool,
}

impl SupplierRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // 1. Global catalog
    // ---

    pub async fn list_categories(&self) -> Result<Vec<SupplierCategory>, AppError> {
        let categories = sqlx::query_as::<_, SupplierCategory>(
            "SELECT id, name FROM supplier_categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    pub async fn list_suppliers(&self) -> Result<Vec<Supplier>, AppError> {
        let suppliers = sqlx::query_as::<_, Supplier>(
            "SELECT id, category_id, name FROM suppliers ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(suppliers)
    }

    pub async fn find_category(&self, id: Uuid) -> Result<Option<SupplierCategory>, AppError> {
        let category = sqlx::query_as::<_, SupplierCategory>(
            "SELECT id, name FROM supplier_categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(category)
    }

    pub async fn find_supplier(&self, id: Uuid) -> Result<Option<Supplier>, AppError> {
        let supplier = sqlx::query_as::<_, Supplier>(
            "SELECT id, category_id, name FROM suppliers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(supplier)
    }

    // ---
    // 2. Event categories
    // ---

    pub async fn find_event_category(&self, id: Uuid) -> Result<Option<EventCategory>, AppError> {
        let category = sqlx::query_as::<_, EventCategory>(
            "SELECT id, event_id, supplier_category_id, budget FROM event_categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(category)
    }

    /// `None` when the category is already attached to the event.
    pub async fn attach_category(
        &self,
        event_id: Uuid,
        supplier_category_id: Uuid,
        budget: Decimal,
    ) -> Result<Option<EventCategory>, AppError> {
        let category = sqlx::query_as::<_, EventCategory>(
            r#"
            INSERT INTO event_categories (event_id, supplier_category_id, budget)
            VALUES ($1, $2, $3)
            ON CONFLICT (event_id, supplier_category_id) DO NOTHING
            RETURNING id, event_id, supplier_category_id, budget
            "#,
        )
        .bind(event_id)
        .bind(supplier_category_id)
        .bind(budget)
        .fetch_optional(&self.pool)
        .await?;
        Ok(category)
    }

    // Suppliers under it (and their installments and files) cascade
    pub async fn delete_event_category(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM event_categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound("Event category"));
        }
        Ok(())
    }

    pub async fn list_event_categories(&self, event_id: Uuid) -> Result<Vec<NamedEventCategory>, AppError> {
        let rows = sqlx::query_as::<_, NamedEventCategory>(
            r#"
            SELECT ec.id, ec.event_id, ec.supplier_category_id, ec.budget, sc.name
            FROM event_categories ec
            JOIN supplier_categories sc ON sc.id = ec.supplier_category_id
            WHERE ec.event_id = $1
            ORDER BY sc.name
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // ---
    // 3. Event suppliers
    // ---

    pub async fn find_event_supplier(&self, id: Uuid) -> Result<Option<EventSupplier>, AppError> {
        let supplier = sqlx::query_as::<_, EventSupplier>(
            "SELECT id, event_category_id, supplier_id, value, status FROM event_suppliers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(supplier)
    }

    // Row lock so concurrent installment writes see a consistent total
    pub async fn lock_event_supplier<'e, E>(&self, executor: E, id: Uuid) -> Result<EventSupplier, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, EventSupplier>(
            r#"
            SELECT id, event_category_id, supplier_id, value, status
            FROM event_suppliers
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::ResourceNotFound("Event supplier"))
    }

    /// `None` when the supplier is already attached to the category.
    pub async fn attach_supplier(
        &self,
        event_category_id: Uuid,
        supplier_id: Uuid,
        value: Decimal,
        status: SupplierStatus,
    ) -> Result<Option<EventSupplier>, AppError> {
        let supplier = sqlx::query_as::<_, EventSupplier>(
            r#"
            INSERT INTO event_suppliers (event_category_id, supplier_id, value, status)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (event_category_id, supplier_id) DO NOTHING
            RETURNING id, event_category_id, supplier_id, value, status
            "#,
        )
        .bind(event_category_id)
        .bind(supplier_id)
        .bind(value)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(supplier)
    }

    pub async fn update_event_supplier<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        value: Decimal,
        status: SupplierStatus,
    ) -> Result<EventSupplier, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, EventSupplier>(
            r#"
            UPDATE event_suppliers SET value = $2, status = $3
            WHERE id = $1
            RETURNING id, event_category_id, supplier_id, value, status
            "#,
        )
        .bind(id)
        .bind(value)
        .bind(status)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::ResourceNotFound("Event supplier"))
    }

    pub async fn delete_event_supplier(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM event_suppliers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound("Event supplier"));
        }
        Ok(())
    }

    pub async fn list_event_suppliers(&self, event_id: Uuid) -> Result<Vec<NamedEventSupplier>, AppError> {
        let rows = sqlx::query_as::<_, NamedEventSupplier>(
            r#"
            SELECT es.id, es.event_category_id, es.supplier_id, es.value, es.status, s.name
            FROM event_suppliers es
            JOIN event_categories ec ON ec.id = es.event_category_id
            JOIN suppliers s ON s.id = es.supplier_id
            WHERE ec.event_id = $1
            ORDER BY s.name
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // ---
    // 4. Installments
    // ---

    pub async fn find_installment(&self, id: Uuid) -> Result<Option<Installment>, AppError> {
        let installment = sqlx::query_as::<_, Installment>(
            r#"
            SELECT id, event_supplier_id, value, due_date, status, created_at
            FROM installments WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(installment)
    }

    /// Total already scheduled for a supplier, optionally leaving one installment out.
    pub async fn sum_installments<'e, E>(
        &self,
        executor: E,
        event_supplier_id: Uuid,
        excluding: Option<Uuid>,
    ) -> Result<Decimal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(value), 0)
            FROM installments
            WHERE event_supplier_id = $1
              AND ($2::uuid IS NULL OR id <> $2)
            "#,
        )
        .bind(event_supplier_id)
        .bind(excluding)
        .fetch_one(executor)
        .await?;
        Ok(total)
    }

    pub async fn create_installment<'e, E>(
        &self,
        executor: E,
        event_supplier_id: Uuid,
        value: Decimal,
        due_date: NaiveDate,
        status: InstallmentStatus,
    ) -> Result<Installment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let installment = sqlx::query_as::<_, Installment>(
            r#"
            INSERT INTO installments (event_supplier_id, value, due_date, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, event_supplier_id, value, due_date, status, created_at
            "#,
        )
        .bind(event_supplier_id)
        .bind(value)
        .bind(due_date)
        .bind(status)
        .fetch_one(executor)
        .await?;
        Ok(installment)
    }

    pub async fn update_installment<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        value: Decimal,
        due_date: NaiveDate,
        status: InstallmentStatus,
    ) -> Result<Installment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Installment>(
            r#"
            UPDATE installments SET value = $2, due_date = $3, status = $4
            WHERE id = $1
            RETURNING id, event_supplier_id, value, due_date, status, created_at
            "#,
        )
        .bind(id)
        .bind(value)
        .bind(due_date)
        .bind(status)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::ResourceNotFound("Installment"))
    }

    pub async fn delete_installment(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM installments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound("Installment"));
        }
        Ok(())
    }

    pub async fn list_installments_for_event(&self, event_id: Uuid) -> Result<Vec<Installment>, AppError> {
        let rows = sqlx::query_as::<_, Installment>(
            r#"
            SELECT i.id, i.event_supplier_id, i.value, i.due_date, i.status, i.created_at
            FROM installments i
            JOIN event_suppliers es ON es.id = i.event_supplier_id
            JOIN event_categories ec ON ec.id = es.event_category_id
            WHERE ec.event_id = $1
            ORDER BY i.due_date
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // ---
    // 5. Contract files (paths only; the bytes live in external storage)
    // ---

    pub async fn find_contract_file(&self, id: Uuid) -> Result<Option<ContractFile>, AppError> {
        let file = sqlx::query_as::<_, ContractFile>(
            "SELECT id, event_supplier_id, path, created_at FROM contract_files WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(file)
    }

    pub async fn add_contract_file(&self, event_supplier_id: Uuid, path: &str) -> Result<ContractFile, AppError> {
        let file = sqlx::query_as::<_, ContractFile>(
            r#"
            INSERT INTO contract_files (event_supplier_id, path)
            VALUES ($1, $2)
            RETURNING id, event_supplier_id, path, created_at
            "#,
        )
        .bind(event_supplier_id)
        .bind(path)
        .fetch_one(&self.pool)
        .await?;
        Ok(file)
    }

    pub async fn delete_contract_file(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM contract_files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound("Contract file"));
        }
        Ok(())
    }

    pub async fn list_files_for_event(&self, event_id: Uuid) -> Result<Vec<ContractFile>, AppError> {
        let rows = sqlx::query_as::<_, ContractFile>(
            r#"
            SELECT cf.id, cf.event_supplier_id, cf.path, cf.created_at
            FROM contract_files cf
            JOIN event_suppliers es ON es.id = cf.event_supplier_id
            JOIN event_categories ec ON ec.id = es.event_category_id
            WHERE ec.event_id = $1
            ORDER BY cf.created_at
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
