// tests/common/mod.rs
#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use backend::{
    authz::{AuthzStore, Gate, Permission, PlanCatalog},
    common::error::AppError,
    models::{
        auth::User,
        events::{AgendaItem, Event},
        guests::{Guest, GuestRelation, GuestStatus},
        rbac::Role,
        suppliers::{
            ContractFile, EventCategory, EventSupplier, Installment, InstallmentStatus,
            SupplierStatus,
        },
    },
};
use chrono::{NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    roles: HashMap<Uuid, Role>,
    events: HashMap<Uuid, Event>,
    categories: HashMap<Uuid, EventCategory>,
    suppliers: HashMap<Uuid, EventSupplier>,
}

/// `AuthzStore` over plain maps. Cloning shares the same tables.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gate(&self) -> Gate {
        Gate::new(Arc::new(self.clone()), PlanCatalog::default())
    }

    pub fn gate_with(&self, plans: PlanCatalog) -> Gate {
        Gate::new(Arc::new(self.clone()), plans)
    }

    // --- Accounts ---

    /// A verified captain holding an Owner role with every ability.
    pub fn captain(&self, plan: &str) -> User {
        let mut captain = account(None, plan);
        let owner = self.role(captain.id, Permission::ALL.iter().map(|p| p.as_str()));
        captain.role_id = Some(owner.id);
        self.put_user(captain.clone());
        captain
    }

    pub fn member(&self, captain: &User, role: Option<&Role>) -> User {
        let mut member = account(Some(captain.id), "basic");
        member.role_id = role.map(|r| r.id);
        self.put_user(member.clone());
        member
    }

    pub fn put_user(&self, user: User) {
        self.lock().users.insert(user.id, user);
    }

    pub fn role<'a>(&self, captain_id: Uuid, permissions: impl IntoIterator<Item = &'a str>) -> Role {
        let role = Role {
            id: Uuid::new_v4(),
            captain_id,
            name: format!("role-{}", Uuid::new_v4()),
            permissions: permissions.into_iter().map(str::to_string).collect(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.lock().roles.insert(role.id, role.clone());
        role
    }

    // --- Resources ---

    pub fn event(&self, owner: &User) -> Event {
        let event = Event {
            id: Uuid::new_v4(),
            owner_id: owner.id,
            title: format!("event-{}", Uuid::new_v4()),
            attending_date: Utc::now(),
            budget: Decimal::new(10_000, 0),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        self.lock().events.insert(event.id, event.clone());
        event
    }

    pub fn delete_event(&self, id: Uuid) {
        self.lock().events.remove(&id);
    }

    pub fn category(&self, event: &Event) -> EventCategory {
        let category = EventCategory {
            id: Uuid::new_v4(),
            event_id: event.id,
            supplier_category_id: Uuid::new_v4(),
            budget: Decimal::new(2_000, 0),
        };
        self.lock().categories.insert(category.id, category.clone());
        category
    }

    pub fn supplier(&self, category: &EventCategory) -> EventSupplier {
        let supplier = EventSupplier {
            id: Uuid::new_v4(),
            event_category_id: category.id,
            supplier_id: Uuid::new_v4(),
            value: Decimal::new(1_500, 0),
            status: SupplierStatus::Hired,
        };
        self.lock().suppliers.insert(supplier.id, supplier.clone());
        supplier
    }

    /// Installments are leaves of the chain: the gate never looks them up.
    pub fn installment(&self, supplier: &EventSupplier) -> Installment {
        Installment {
            id: Uuid::new_v4(),
            event_supplier_id: supplier.id,
            value: Decimal::new(500, 0),
            due_date: Utc::now().date_naive(),
            status: InstallmentStatus::Pending,
            created_at: Utc::now(),
        }
    }

    pub fn contract_file(&self, supplier: &EventSupplier) -> ContractFile {
        ContractFile {
            id: Uuid::new_v4(),
            event_supplier_id: supplier.id,
            path: format!("contracts/{}.pdf", supplier.id),
            created_at: Utc::now(),
        }
    }

    pub fn guest(&self, event: &Event) -> Guest {
        Guest {
            id: Uuid::new_v4(),
            event_id: event.id,
            name: "Guest".into(),
            email: format!("{}@example.com", Uuid::new_v4()),
            relation: GuestRelation::Friend,
            status: GuestStatus::Pending,
            rsvp_token: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    pub fn agenda_item(&self, event: &Event) -> AgendaItem {
        AgendaItem {
            id: Uuid::new_v4(),
            event_id: event.id,
            title: "Cake tasting".into(),
            date: Utc::now().date_naive(),
            time: NaiveTime::from_hms_opt(14, 30, 0).expect("valid time"),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().expect("store mutex poisoned")
    }
}

pub fn account(captain_id: Option<Uuid>, plan: &str) -> User {
    User {
        id: Uuid::new_v4(),
        name: "Test account".into(),
        email: format!("{}@example.com", Uuid::new_v4()),
        password_hash: None,
        email_verified_at: Some(Utc::now()),
        captain_id,
        role_id: None,
        plan: plan.to_string(),
        plan_overrides: Json(BTreeMap::new()),
        invitation_token: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[async_trait]
impl AuthzStore for MemoryStore {
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.lock().users.get(&id).cloned())
    }

    async fn find_role(&self, id: Uuid) -> Result<Option<Role>, AppError> {
        Ok(self.lock().roles.get(&id).cloned())
    }

    async fn find_event(&self, id: Uuid) -> Result<Option<Event>, AppError> {
        Ok(self.lock().events.get(&id).cloned())
    }

    async fn find_event_category(&self, id: Uuid) -> Result<Option<EventCategory>, AppError> {
        Ok(self.lock().categories.get(&id).cloned())
    }

    async fn find_event_supplier(&self, id: Uuid) -> Result<Option<EventSupplier>, AppError> {
        Ok(self.lock().suppliers.get(&id).cloned())
    }

    async fn count_events(&self, captain_id: Uuid) -> Result<i64, AppError> {
        let count = self
            .lock()
            .events
            .values()
            .filter(|e| e.owner_id == captain_id)
            .count();
        Ok(count as i64)
    }

    async fn count_members(&self, captain_id: Uuid) -> Result<i64, AppError> {
        let count = self
            .lock()
            .users
            .values()
            .filter(|u| u.captain_id == Some(captain_id))
            .count();
        Ok(count as i64)
    }

    async fn events_of(&self, captain_id: Uuid) -> Result<Vec<Event>, AppError> {
        Ok(self
            .lock()
            .events
            .values()
            .filter(|e| e.owner_id == captain_id)
            .cloned()
            .collect())
    }

    async fn roles_of(&self, captain_id: Uuid) -> Result<Vec<Role>, AppError> {
        Ok(self
            .lock()
            .roles
            .values()
            .filter(|r| r.captain_id == captain_id)
            .cloned()
            .collect())
    }

    async fn members_of(&self, captain_id: Uuid) -> Result<Vec<User>, AppError> {
        Ok(self
            .lock()
            .users
            .values()
            .filter(|u| u.captain_id == Some(captain_id))
            .cloned()
            .collect())
    }
}
