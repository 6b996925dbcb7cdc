// src/services/supplier_service.rs

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::SupplierRepository,
    models::{
        events::Event,
        suppliers::{
            AttachCategoryPayload, AttachSupplierPayload, ContractFile, CreateInstallmentPayload,
            EventCategory, EventSupplier, Installment, SupplierCategoryWithSuppliers,
            UpdateInstallmentPayload, UpdateSupplierPayload,
        },
    },
};

/// Installments never add up to more than the value hired.
pub fn fits_hired_value(hired: Decimal, scheduled: Decimal, incoming: Decimal) -> bool {
    scheduled + incoming <= hired
}

#[derive(Clone)]
pub struct SupplierService {
    repo: SupplierRepository,
    pool: PgPool,
}

impl SupplierService {
    pub fn new(repo: SupplierRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    // ---
    // 1. Catalog
    // ---

    pub async fn catalog(&self) -> Result<Vec<SupplierCategoryWithSuppliers>, AppError> {
        let suppliers = self.repo.list_suppliers().await?;

        let catalog = self
            .repo
            .list_categories()
            .await?
            .into_iter()
            .map(|category| SupplierCategoryWithSuppliers {
                suppliers: suppliers
                    .iter()
                    .filter(|s| s.category_id == category.id)
                    .cloned()
                    .collect(),
                category,
            })
            .collect();

        Ok(catalog)
    }

    // ---
    // 2. Event categories
    // ---

    pub async fn find_event_category(&self, id: Uuid) -> Result<EventCategory, AppError> {
        self.repo
            .find_event_category(id)
            .await?
            .ok_or(AppError::ResourceNotFound("Event category"))
    }

    /// Attaching a category twice keeps the first one.
    pub async fn attach_category(&self, event: &Event, payload: &AttachCategoryPayload) -> Result<EventCategory, AppError> {
        if self.repo.find_category(payload.category_id).await?.is_none() {
            return Err(AppError::field("category_id", "exists", "The selected category is invalid."));
        }

        match self.repo.attach_category(event.id, payload.category_id, payload.budget).await? {
            Some(created) => Ok(created),
            None => {
                let existing = self
                    .repo
                    .list_event_categories(event.id)
                    .await?
                    .into_iter()
                    .map(|row| row.category)
                    .find(|c| c.supplier_category_id == payload.category_id)
                    .ok_or(AppError::ResourceNotFound("Event category"))?;
                Ok(existing)
            }
        }
    }

    /// `category` must hang off `event`; otherwise it is not there as far as this path goes.
    pub async fn detach_category(&self, event: &Event, category: &EventCategory) -> Result<(), AppError> {
        if category.event_id != event.id {
            return Err(AppError::ResourceNotFound("Event category"));
        }
        self.repo.delete_event_category(category.id).await
    }

    // ---
    // 3. Event suppliers
    // ---

    pub async fn find_event_supplier(&self, id: Uuid) -> Result<EventSupplier, AppError> {
        self.repo
            .find_event_supplier(id)
            .await?
            .ok_or(AppError::ResourceNotFound("Event supplier"))
    }

    /// The supplier has to be listed under the category's catalog entry.
    /// Attaching it twice keeps the first one.
    pub async fn attach_supplier(
        &self,
        category: &EventCategory,
        payload: &AttachSupplierPayload,
    ) -> Result<EventSupplier, AppError> {
        let supplier = self
            .repo
            .find_supplier(payload.supplier_id)
            .await?
            .filter(|s| s.category_id == category.supplier_category_id)
            .ok_or_else(|| AppError::field("supplier_id", "exists", "The selected supplier is invalid."))?;

        if let Some(created) = self
            .repo
            .attach_supplier(category.id, supplier.id, payload.value, payload.status)
            .await?
        {
            return Ok(created);
        }

        self.repo
            .list_event_suppliers(category.event_id)
            .await?
            .into_iter()
            .map(|row| row.supplier)
            .find(|s| s.event_category_id == category.id && s.supplier_id == supplier.id)
            .ok_or(AppError::ResourceNotFound("Event supplier"))
    }

    /// Lowering the value below what is already scheduled is refused.
    pub async fn update_supplier(
        &self,
        supplier: &EventSupplier,
        payload: &UpdateSupplierPayload,
    ) -> Result<EventSupplier, AppError> {
        let mut tx = self.pool.begin().await?;

        let locked = self.repo.lock_event_supplier(&mut *tx, supplier.id).await?;
        let scheduled = self.repo.sum_installments(&mut *tx, locked.id, None).await?;
        if !fits_hired_value(payload.value, scheduled, Decimal::ZERO) {
            return Err(AppError::InstallmentsExceedValue);
        }

        let updated = self
            .repo
            .update_event_supplier(&mut *tx, locked.id, payload.value, payload.status)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    // Installments and files cascade; the stored files themselves are external.
    pub async fn detach_supplier(&self, supplier: &EventSupplier) -> Result<(), AppError> {
        self.repo.delete_event_supplier(supplier.id).await
    }

    // ---
    // 4. Contract files
    // ---

    pub async fn find_contract_file(&self, id: Uuid) -> Result<ContractFile, AppError> {
        self.repo
            .find_contract_file(id)
            .await?
            .ok_or(AppError::ResourceNotFound("Contract file"))
    }

    pub async fn add_contract_file(&self, supplier: &EventSupplier, path: &str) -> Result<ContractFile, AppError> {
        self.repo.add_contract_file(supplier.id, path.trim()).await
    }

    pub async fn delete_contract_file(&self, file: &ContractFile) -> Result<(), AppError> {
        self.repo.delete_contract_file(file.id).await
    }

    // ---
    // 5. Installments
    // ---

    pub async fn find_installment(&self, id: Uuid) -> Result<Installment, AppError> {
        self.repo
            .find_installment(id)
            .await?
            .ok_or(AppError::ResourceNotFound("Installment"))
    }

    pub async fn add_installment(
        &self,
        supplier: &EventSupplier,
        payload: &CreateInstallmentPayload,
    ) -> Result<Installment, AppError> {
        let mut tx = self.pool.begin().await?;

        // 1. Lock the supplier so concurrent requests see the same total
        let locked = self.repo.lock_event_supplier(&mut *tx, supplier.id).await?;

        // 2. Sum rule
        let scheduled = self.repo.sum_installments(&mut *tx, locked.id, None).await?;
        if !fits_hired_value(locked.value, scheduled, payload.value) {
            return Err(AppError::InstallmentsExceedValue);
        }

        // 3. Insert
        let installment = self
            .repo
            .create_installment(&mut *tx, locked.id, payload.value, payload.due_date, payload.status)
            .await?;

        tx.commit().await?;
        Ok(installment)
    }

    pub async fn update_installment(
        &self,
        installment: &Installment,
        payload: &UpdateInstallmentPayload,
    ) -> Result<Installment, AppError> {
        let mut tx = self.pool.begin().await?;

        let value = payload.value.unwrap_or(installment.value);
        if value != installment.value {
            let locked = self
                .repo
                .lock_event_supplier(&mut *tx, installment.event_supplier_id)
                .await?;
            let others = self
                .repo
                .sum_installments(&mut *tx, locked.id, Some(installment.id))
                .await?;
            if !fits_hired_value(locked.value, others, value) {
                return Err(AppError::InstallmentsExceedValue);
            }
        }

        let updated = self
            .repo
            .update_installment(
                &mut *tx,
                installment.id,
                value,
                payload.due_date.unwrap_or(installment.due_date),
                payload.status.unwrap_or(installment.status),
            )
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    pub async fn delete_installment(&self, installment: &Installment) -> Result<(), AppError> {
        self.repo.delete_installment(installment.id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1000, 0, 1000, true)]
    #[case(1000, 600, 400, true)]
    #[case(1000, 600, 401, false)]
    #[case(1000, 1000, 1, false)]
    fn installment_sum_rule(
        #[case] hired: i64,
        #[case] scheduled: i64,
        #[case] incoming: i64,
        #[case] fits: bool,
    ) {
        assert_eq!(
            fits_hired_value(Decimal::from(hired), Decimal::from(scheduled), Decimal::from(incoming)),
            fits
        );
    }

    #[test]
    fn cents_count() {
        let hired = Decimal::new(10_000, 2); // 100.00
        let scheduled = Decimal::new(9_999, 2); // 99.99
        assert!(fits_hired_value(hired, scheduled, Decimal::new(1, 2)));
        assert!(!fits_hired_value(hired, scheduled, Decimal::new(2, 2)));
    }

    #[tokio::test]
    async fn category_under_another_event_is_not_found() {
        // Never connects: the mismatch is caught before any query.
        let pool = PgPool::connect_lazy("postgres://localhost/unused").unwrap();
        let service = SupplierService::new(SupplierRepository::new(pool.clone()), pool);

        let event = Event {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            title: "Wedding".into(),
            attending_date: chrono::Utc::now(),
            budget: Decimal::from(1000),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let category = EventCategory {
            id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            supplier_category_id: Uuid::new_v4(),
            budget: Decimal::from(100),
        };

        let err = service.detach_category(&event, &category).await.unwrap_err();
        assert!(matches!(err, AppError::ResourceNotFound("Event category")));
    }
}
