// src/authz/hierarchy.rs

use std::borrow::Cow;
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    authz::AuthzStore,
    common::error::AppError,
    models::{auth::User, events::Event, rbac::Role},
};

// Two resolutions live side by side:
//   * plan, events, roles and members resolve through the CAPTAIN (this module);
//   * the role checked by the gate is the ACTING account's own `role_id`.
// Mixing them up would let a member inherit the captain's Owner role.

/// Id of the account whose plan and collections govern `acting`.
/// Exactly one hop: a captain is its own effective account.
pub fn effective_account_id(acting: &User) -> Uuid {
    acting.captain_id.unwrap_or(acting.id)
}

#[derive(Clone)]
pub struct HierarchyResolver {
    store: Arc<dyn AuthzStore>,
}

impl HierarchyResolver {
    pub fn new(store: Arc<dyn AuthzStore>) -> Self {
        Self { store }
    }

    /// The captain itself, or the member's captain loaded from the store.
    /// The loaded row is returned as-is even if it carries a `captain_id` of
    /// its own: the hierarchy is one level deep and never walked further.
    pub async fn effective_account<'a>(&self, acting: &'a User) -> Result<Cow<'a, User>, AppError> {
        let Some(captain_id) = acting.captain_id else {
            return Ok(Cow::Borrowed(acting));
        };

        let captain = self
            .store
            .find_user(captain_id)
            .await?
            .ok_or(AppError::ResourceNotFound("Account"))?;

        Ok(Cow::Owned(captain))
    }

    pub async fn effective_events(&self, acting: &User) -> Result<Vec<Event>, AppError> {
        self.store.events_of(effective_account_id(acting)).await
    }

    pub async fn effective_roles(&self, acting: &User) -> Result<Vec<Role>, AppError> {
        self.store.roles_of(effective_account_id(acting)).await
    }

    pub async fn effective_members(&self, acting: &User) -> Result<Vec<User>, AppError> {
        self.store.members_of(effective_account_id(acting)).await
    }
}
