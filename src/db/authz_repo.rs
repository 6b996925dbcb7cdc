// src/db/authz_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    authz::AuthzStore,
    common::error::AppError,
    db::{EventRepository, RbacRepository, SupplierRepository, UserRepository},
    models::{
        auth::User,
        events::Event,
        rbac::Role,
        suppliers::{EventCategory, EventSupplier},
    },
};

/// Postgres-backed lookups for the gate, delegating to the table repositories.
#[derive(Clone)]
pub struct PgAuthzStore {
    users: UserRepository,
    roles: RbacRepository,
    events: EventRepository,
    suppliers: SupplierRepository,
}

impl PgAuthzStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            roles: RbacRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            suppliers: SupplierRepository::new(pool),
        }
    }
}

#[async_trait]
impl AuthzStore for PgAuthzStore {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        self.users.find_by_id(id).await
    }

    async fn find_role(&self, id: Uuid) -> Result<Option<Role>, AppError> {
        self.roles.find_by_id(id).await
    }

    async fn find_event(&self, id: Uuid) -> Result<Option<Event>, AppError> {
        self.events.find_by_id(id).await
    }

    async fn find_event_category(&self, id: Uuid) -> Result<Option<EventCategory>, AppError> {
        self.suppliers.find_event_category(id).await
    }

    async fn find_event_supplier(&self, id: Uuid) -> Result<Option<EventSupplier>, AppError> {
        self.suppliers.find_event_supplier(id).await
    }

    async fn count_events(&self, captain_id: Uuid) -> Result<i64, AppError> {
        self.events.count_for_owner(captain_id).await
    }

    async fn count_members(&self, captain_id: Uuid) -> Result<i64, AppError> {
        self.users.count_members(captain_id).await
    }

    async fn events_of(&self, captain_id: Uuid) -> Result<Vec<Event>, AppError> {
        self.events.list_for_owner(captain_id).await
    }

    async fn roles_of(&self, captain_id: Uuid) -> Result<Vec<Role>, AppError> {
        self.roles.list_roles(captain_id).await
    }

    async fn members_of(&self, captain_id: Uuid) -> Result<Vec<User>, AppError> {
        self.users.list_members(captain_id).await
    }
}
