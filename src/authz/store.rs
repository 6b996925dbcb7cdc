// src/authz/store.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        auth::User,
        events::Event,
        rbac::Role,
        suppliers::{EventCategory, EventSupplier},
    },
};

/// Read-only lookups the gate needs. `db::PgAuthzStore` backs it in
/// production; the integration tests plug in an in-memory map.
///
/// Every call is fresh: nothing here is cached between requests.
#[async_trait]
pub trait AuthzStore: Send + Sync {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError>;

    async fn find_role(&self, id: Uuid) -> Result<Option<Role>, AppError>;

    async fn find_event(&self, id: Uuid) -> Result<Option<Event>, AppError>;

    async fn find_event_category(&self, id: Uuid) -> Result<Option<EventCategory>, AppError>;

    async fn find_event_supplier(&self, id: Uuid) -> Result<Option<EventSupplier>, AppError>;

    // Plan usage
    async fn count_events(&self, captain_id: Uuid) -> Result<i64, AppError>;

    async fn count_members(&self, captain_id: Uuid) -> Result<i64, AppError>;

    // Collections of an (effective) account
    async fn events_of(&self, captain_id: Uuid) -> Result<Vec<Event>, AppError>;

    async fn roles_of(&self, captain_id: Uuid) -> Result<Vec<Role>, AppError>;

    async fn members_of(&self, captain_id: Uuid) -> Result<Vec<User>, AppError>;
}
