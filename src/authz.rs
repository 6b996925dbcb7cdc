// src/authz.rs

pub mod catalog;
pub mod gate;
pub mod hierarchy;
pub mod ownership;
pub mod plan;
pub mod role;
pub mod store;

pub use catalog::{Permission, PermissionArea};
pub use gate::{Decision, DenialStatus, DenyStage, Gate, OwnershipDenialPolicy};
pub use hierarchy::{effective_account_id, HierarchyResolver};
pub use ownership::Resource;
pub use plan::{Plan, PlanCatalog, PlanDecision, PlanParams, PlanUsage, UNLIMITED};
pub use role::{has_permission, RoleDraft};
pub use store::AuthzStore;
