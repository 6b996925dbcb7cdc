// src/services/event_service.rs

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{EventRepository, GuestRepository, SupplierRepository, UserRepository},
    models::{
        events::{AgendaItem, CreateEventPayload, Event, EventDetail, SaveAgendaPayload, UpdateEventPayload},
        suppliers::{ContractFile, EventCategoryDetail, EventSupplierDetail, Installment},
    },
};

const NOT_ASSIGNABLE: &str = "Assignee is not a member or has not confirmed the invitation";

#[derive(Clone)]
pub struct EventService {
    event_repo: EventRepository,
    user_repo: UserRepository,
    supplier_repo: SupplierRepository,
    guest_repo: GuestRepository,
    pool: PgPool,
}

impl EventService {
    pub fn new(
        event_repo: EventRepository,
        user_repo: UserRepository,
        supplier_repo: SupplierRepository,
        guest_repo: GuestRepository,
        pool: PgPool,
    ) -> Self {
        Self { event_repo, user_repo, supplier_repo, guest_repo, pool }
    }

    pub async fn find_event(&self, id: Uuid) -> Result<Event, AppError> {
        self.event_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::ResourceNotFound("Event"))
    }

    /// Creates the event under the captain, assigning the listed members in
    /// the same transaction. Every assignee must be a verified member.
    pub async fn create_event(&self, captain_id: Uuid, payload: &CreateEventPayload) -> Result<Event, AppError> {
        // 1. Assignees
        let mut assignees = payload.assignees.clone();
        assignees.sort();
        assignees.dedup();

        if !assignees.is_empty() {
            let found = self.user_repo.find_verified_members(captain_id, &assignees).await?;
            if found.len() != assignees.len() {
                return Err(AppError::field("assignees", "invalid", NOT_ASSIGNABLE));
            }
        }

        // 2. Event + assignment
        let mut tx = self.pool.begin().await?;

        let event = self
            .event_repo
            .create(&mut *tx, captain_id, payload.title.trim(), payload.attending_date, payload.budget)
            .await?;

        if !assignees.is_empty() {
            self.event_repo.add_assignees(&mut *tx, event.id, &assignees).await?;
        }

        tx.commit().await?;

        tracing::info!(event_id = %event.id, %captain_id, "event created");
        Ok(event)
    }

    pub async fn update_event(&self, event: &Event, payload: &UpdateEventPayload) -> Result<Event, AppError> {
        self.event_repo
            .update(event.id, payload.title.trim(), payload.attending_date, payload.budget)
            .await
    }

    pub async fn delete_event(&self, event: &Event) -> Result<(), AppError> {
        self.event_repo.delete(event.id).await?;
        tracing::info!(event_id = %event.id, owner_id = %event.owner_id, "event deleted");
        Ok(())
    }

    /// Everything the event page shows, stitched from flat queries.
    pub async fn event_detail(&self, event: Event) -> Result<EventDetail, AppError> {
        let assignees = self.event_repo.list_assignees(event.id).await?;
        let guests = self.guest_repo.list_for_event(event.id).await?;
        let agenda = self.event_repo.list_agenda(event.id).await?;

        let mut installments: HashMap<Uuid, Vec<Installment>> = HashMap::new();
        for installment in self.supplier_repo.list_installments_for_event(event.id).await? {
            installments.entry(installment.event_supplier_id).or_default().push(installment);
        }

        let mut files: HashMap<Uuid, Vec<ContractFile>> = HashMap::new();
        for file in self.supplier_repo.list_files_for_event(event.id).await? {
            files.entry(file.event_supplier_id).or_default().push(file);
        }

        let mut suppliers: HashMap<Uuid, Vec<EventSupplierDetail>> = HashMap::new();
        for row in self.supplier_repo.list_event_suppliers(event.id).await? {
            let id = row.supplier.id;
            suppliers
                .entry(row.supplier.event_category_id)
                .or_default()
                .push(EventSupplierDetail {
                    installments: installments.remove(&id).unwrap_or_default(),
                    files: files.remove(&id).unwrap_or_default(),
                    supplier: row.supplier,
                    name: row.name,
                });
        }

        let categories = self
            .supplier_repo
            .list_event_categories(event.id)
            .await?
            .into_iter()
            .map(|row| EventCategoryDetail {
                suppliers: suppliers.remove(&row.category.id).unwrap_or_default(),
                category: row.category,
                name: row.name,
            })
            .collect();

        Ok(EventDetail { event, assignees, categories, guests, agenda })
    }

    // ---
    // Assignees
    // ---

    pub async fn assign_member(&self, event: &Event, member_id: Uuid) -> Result<(), AppError> {
        let found = self.user_repo.find_verified_members(event.owner_id, &[member_id]).await?;
        if found.is_empty() {
            return Err(AppError::Forbidden(NOT_ASSIGNABLE.to_string()));
        }

        self.event_repo.add_assignee(event.id, member_id).await?;
        Ok(())
    }

    pub async fn unassign_member(&self, event: &Event, member_id: Uuid) -> Result<(), AppError> {
        if !self.event_repo.remove_assignee(event.id, member_id).await? {
            return Err(AppError::ResourceNotFound("Assignee"));
        }
        Ok(())
    }

    // ---
    // Agenda
    // ---

    pub async fn find_agenda_item(&self, id: Uuid) -> Result<AgendaItem, AppError> {
        self.event_repo
            .find_agenda_item(id)
            .await?
            .ok_or(AppError::ResourceNotFound("Agenda item"))
    }

    pub async fn create_agenda_item(&self, event: &Event, payload: &SaveAgendaPayload) -> Result<AgendaItem, AppError> {
        self.event_repo
            .create_agenda_item(event.id, payload.title.trim(), payload.date, payload.time)
            .await
    }

    pub async fn update_agenda_item(&self, item: &AgendaItem, payload: &SaveAgendaPayload) -> Result<AgendaItem, AppError> {
        self.event_repo
            .update_agenda_item(item.id, payload.title.trim(), payload.date, payload.time)
            .await
    }

    pub async fn delete_agenda_item(&self, item: &AgendaItem) -> Result<(), AppError> {
        self.event_repo.delete_agenda_item(item.id).await
    }
}
