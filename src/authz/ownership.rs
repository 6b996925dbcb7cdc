// src/authz/ownership.rs

use uuid::Uuid;

use crate::{
    authz::{hierarchy::effective_account_id, AuthzStore, Permission},
    common::error::AppError,
    models::{
        auth::User,
        events::{AgendaItem, Event},
        guests::Guest,
        rbac::Role,
        suppliers::{ContractFile, EventCategory, EventSupplier, Installment},
    },
};

/// An already-loaded entity an ability is checked against.
#[derive(Debug, Clone, Copy)]
pub enum Resource<'a> {
    Event(&'a Event),
    EventCategory(&'a EventCategory),
    EventSupplier(&'a EventSupplier),
    Installment(&'a Installment),
    ContractFile(&'a ContractFile),
    Guest(&'a Guest),
    Agenda(&'a AgendaItem),
    Member(&'a User),
    Role(&'a Role),
}

impl Resource<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            Resource::Event(_) => "Event",
            Resource::EventCategory(_) => "Event category",
            Resource::EventSupplier(_) => "Event supplier",
            Resource::Installment(_) => "Installment",
            Resource::ContractFile(_) => "Contract file",
            Resource::Guest(_) => "Guest",
            Resource::Agenda(_) => "Agenda item",
            Resource::Member(_) => "Member",
            Resource::Role(_) => "Role",
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Resource::Event(r) => r.id,
            Resource::EventCategory(r) => r.id,
            Resource::EventSupplier(r) => r.id,
            Resource::Installment(r) => r.id,
            Resource::ContractFile(r) => r.id,
            Resource::Guest(r) => r.id,
            Resource::Agenda(r) => r.id,
            Resource::Member(r) => r.id,
            Resource::Role(r) => r.id,
        }
    }
}

/// Walks the chain up to the owning captain, one explicit lookup per link.
/// `None` means the resource has no owner at all (a root account).
pub async fn owner_captain_id(
    store: &dyn AuthzStore,
    resource: &Resource<'_>,
) -> Result<Option<Uuid>, AppError> {
    let owner = match resource {
        Resource::Event(event) => event.owner_id,
        Resource::EventCategory(category) => event_owner(store, category.event_id).await?,
        Resource::EventSupplier(supplier) => {
            category_owner(store, supplier.event_category_id).await?
        }
        Resource::Installment(installment) => {
            supplier_owner(store, installment.event_supplier_id).await?
        }
        Resource::ContractFile(file) => supplier_owner(store, file.event_supplier_id).await?,
        Resource::Guest(guest) => event_owner(store, guest.event_id).await?,
        Resource::Agenda(item) => event_owner(store, item.event_id).await?,
        Resource::Member(member) => return Ok(member.captain_id),
        Resource::Role(role) => role.captain_id,
    };

    Ok(Some(owner))
}

async fn event_owner(store: &dyn AuthzStore, event_id: Uuid) -> Result<Uuid, AppError> {
    let event = store
        .find_event(event_id)
        .await?
        .ok_or(AppError::ResourceNotFound("Event"))?;
    Ok(event.owner_id)
}

async fn category_owner(store: &dyn AuthzStore, category_id: Uuid) -> Result<Uuid, AppError> {
    let category = store
        .find_event_category(category_id)
        .await?
        .ok_or(AppError::ResourceNotFound("Event category"))?;
    event_owner(store, category.event_id).await
}

async fn supplier_owner(store: &dyn AuthzStore, supplier_id: Uuid) -> Result<Uuid, AppError> {
    let supplier = store
        .find_event_supplier(supplier_id)
        .await?
        .ok_or(AppError::ResourceNotFound("Event supplier"))?;
    category_owner(store, supplier.event_category_id).await
}

/// Pure part of the check, once the terminal owner is known.
pub fn owns(acting: &User, ability: Permission, resource: &Resource<'_>, owner: Option<Uuid>) -> bool {
    // Nobody removes themselves from the team.
    if ability == Permission::DeleteMember {
        if let Resource::Member(member) = resource {
            if member.id == acting.id {
                return false;
            }
        }
    }

    owner == Some(effective_account_id(acting))
}

pub async fn authorize_ownership(
    store: &dyn AuthzStore,
    acting: &User,
    ability: Permission,
    resource: &Resource<'_>,
) -> Result<bool, AppError> {
    let owner = owner_captain_id(store, resource).await?;
    Ok(owns(acting, ability, resource, owner))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sqlx::types::Json;

    fn account(captain_id: Option<Uuid>) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Someone".into(),
            email: format!("{}@example.com", Uuid::new_v4()),
            password_hash: None,
            email_verified_at: Some(Utc::now()),
            captain_id,
            role_id: None,
            plan: "basic".into(),
            plan_overrides: Json(Default::default()),
            invitation_token: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn member_cannot_delete_itself() {
        let captain = account(None);
        let member = account(Some(captain.id));
        let resource = Resource::Member(&member);

        assert!(!owns(&member, Permission::DeleteMember, &resource, Some(captain.id)));
        assert!(owns(&member, Permission::ViewMember, &resource, Some(captain.id)));
    }

    #[test]
    fn root_accounts_are_never_owned() {
        let captain = account(None);
        let other = account(None);
        assert!(!owns(&captain, Permission::DeleteMember, &Resource::Member(&other), None));
        assert!(!owns(&captain, Permission::ViewMember, &Resource::Member(&captain), None));
    }

    #[test]
    fn owner_must_be_the_effective_account() {
        let captain = account(None);
        let member = account(Some(captain.id));
        let role = Role {
            id: Uuid::new_v4(),
            captain_id: captain.id,
            name: "Crew".into(),
            permissions: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let resource = Resource::Role(&role);

        assert!(owns(&member, Permission::EditRole, &resource, Some(captain.id)));
        assert!(!owns(&member, Permission::EditRole, &resource, Some(Uuid::new_v4())));
    }
}
