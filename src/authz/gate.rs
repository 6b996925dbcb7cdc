// src/authz/gate.rs

use std::collections::BTreeMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    authz::{
        hierarchy::HierarchyResolver,
        ownership::{authorize_ownership, Resource},
        plan::{Plan, PlanCatalog, PlanDecision, PlanUsage},
        role::has_permission,
        AuthzStore, Permission,
    },
    common::error::AppError,
    models::auth::User,
};

const ROLE_DENIED: &str = "Your role is insufficient";
const NOT_OWNED: &str = "This resource does not belong to your account";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyStage {
    Plan,
    Role,
    Ownership,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny { stage: DenyStage, reason: String },
}

impl Decision {
    fn deny(stage: DenyStage, reason: impl Into<String>) -> Self {
        Decision::Deny { stage, reason: reason.into() }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Decision::Allow => None,
            Decision::Deny { reason, .. } => Some(reason),
        }
    }

    pub fn stage(&self) -> Option<DenyStage> {
        match self {
            Decision::Allow => None,
            Decision::Deny { stage, .. } => Some(*stage),
        }
    }
}

/// How an ownership denial is reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialStatus {
    Forbidden,
    NotFound,
}

/// Per-ability choice between 403 and 404 for ownership denials.
/// Plan and role denials are always 403.
#[derive(Debug, Clone)]
pub struct OwnershipDenialPolicy {
    table: BTreeMap<Permission, DenialStatus>,
}

impl Default for OwnershipDenialPolicy {
    fn default() -> Self {
        let table = Permission::ALL
            .iter()
            .map(|ability| (*ability, default_denial(*ability)))
            .collect();
        Self { table }
    }
}

// Foreign resources answer 403 today, including ones reached by id alone.
// A resource addressed under a path it does not belong to (a category under
// another event) is a 404 raised by the service, e.g. `SupplierService::detach_category`,
// after the gate has already allowed the request.
fn default_denial(ability: Permission) -> DenialStatus {
    use Permission::*;
    match ability {
        ViewEvents | ViewEvent | CreateEvent | EditEvent | DeleteEvent => DenialStatus::Forbidden,
        ViewMembers | ViewMember | InviteMember | EditMember | DeleteMember => {
            DenialStatus::Forbidden
        }
        ViewRoles | CreateRole | EditRole | DeleteRole => DenialStatus::Forbidden,
        AddCategory | RemoveCategory => DenialStatus::Forbidden,
        AddSupplier | EditSupplier | RemoveSupplier => DenialStatus::Forbidden,
        AssignMember => DenialStatus::Forbidden,
        AddInstallment | EditInstallment | RemoveInstallment => DenialStatus::Forbidden,
        InviteGuest | EditGuest | DeleteGuest => DenialStatus::Forbidden,
        CreateAgenda | EditAgenda | DeleteAgenda => DenialStatus::Forbidden,
    }
}

impl OwnershipDenialPolicy {
    /// Reports ownership denials of `ability` as "not found".
    pub fn hide(mut self, ability: Permission) -> Self {
        self.table.insert(ability, DenialStatus::NotFound);
        self
    }

    pub fn status_for(&self, ability: Permission) -> DenialStatus {
        self.table
            .get(&ability)
            .copied()
            .unwrap_or(DenialStatus::Forbidden)
    }
}

/// The single authorization pipeline every protected operation goes through:
/// effective account, plan, role, ownership. The first deny wins.
#[derive(Clone)]
pub struct Gate {
    store: Arc<dyn AuthzStore>,
    plans: Arc<PlanCatalog>,
    denial_policy: Arc<OwnershipDenialPolicy>,
    hierarchy: HierarchyResolver,
}

impl Gate {
    pub fn new(store: Arc<dyn AuthzStore>, plans: PlanCatalog) -> Self {
        Self {
            hierarchy: HierarchyResolver::new(store.clone()),
            store,
            plans: Arc::new(plans),
            denial_policy: Arc::new(OwnershipDenialPolicy::default()),
        }
    }

    pub fn with_denial_policy(mut self, policy: OwnershipDenialPolicy) -> Self {
        self.denial_policy = Arc::new(policy);
        self
    }

    pub fn hierarchy(&self) -> &HierarchyResolver {
        &self.hierarchy
    }

    pub async fn authorize(
        &self,
        acting: &User,
        ability: Permission,
        resource: Option<Resource<'_>>,
    ) -> Result<Decision, AppError> {
        let decision = self.evaluate(acting, ability, resource).await?;

        match &decision {
            Decision::Allow => {
                tracing::debug!(user_id = %acting.id, %ability, "authorization granted");
            }
            Decision::Deny { stage, reason } => {
                tracing::info!(
                    user_id = %acting.id,
                    %ability,
                    resource = resource.map(|r| r.kind()),
                    ?stage,
                    reason = %reason,
                    "authorization denied"
                );
            }
        }

        Ok(decision)
    }

    /// Same as `authorize`, for abilities named at runtime.
    pub async fn authorize_named(
        &self,
        acting: &User,
        ability: &str,
        resource: Option<Resource<'_>>,
    ) -> Result<Decision, AppError> {
        let ability: Permission = ability.parse()?;
        self.authorize(acting, ability, resource).await
    }

    /// Runs the gate and turns a denial into the matching `AppError`.
    pub async fn require(
        &self,
        acting: &User,
        ability: Permission,
        resource: Option<Resource<'_>>,
    ) -> Result<(), AppError> {
        match self.authorize(acting, ability, resource).await? {
            Decision::Allow => Ok(()),
            Decision::Deny { stage: DenyStage::Ownership, reason } => {
                match (self.denial_policy.status_for(ability), resource) {
                    (DenialStatus::NotFound, Some(resource)) => {
                        Err(AppError::ResourceNotFound(resource.kind()))
                    }
                    _ => Err(AppError::Forbidden(reason)),
                }
            }
            Decision::Deny { reason, .. } => Err(AppError::Forbidden(reason)),
        }
    }

    async fn evaluate(
        &self,
        acting: &User,
        ability: Permission,
        resource: Option<Resource<'_>>,
    ) -> Result<Decision, AppError> {
        // 1. Effective account (plan side of the dual resolution)
        let effective = self.hierarchy.effective_account(acting).await?;

        // 2. Plan
        let plan = self.plans.resolve(&effective)?;
        let usage = self.usage_for(effective.id, ability).await?;
        if let PlanDecision::Deny(reason) = plan.evaluate(ability, &usage) {
            return Ok(Decision::deny(DenyStage::Plan, reason));
        }

        // 3. Role: the acting account's own, never the captain's
        let role = match acting.role_id {
            Some(role_id) => self
                .store
                .find_role(role_id)
                .await?
                .filter(|role| role.captain_id == effective.id),
            None => None,
        };
        if !has_permission(role.as_ref(), ability) {
            return Ok(Decision::deny(DenyStage::Role, ROLE_DENIED));
        }

        // 4. Ownership
        if let Some(resource) = resource.filter(|_| ability.is_resource_scoped()) {
            if !authorize_ownership(self.store.as_ref(), acting, ability, &resource).await? {
                return Ok(Decision::deny(DenyStage::Ownership, NOT_OWNED));
            }
        }

        Ok(Decision::Allow)
    }

    // Counted live, and only for the abilities that have a cap.
    async fn usage_for(&self, captain_id: Uuid, ability: Permission) -> Result<PlanUsage, AppError> {
        let mut usage = PlanUsage::default();
        if !Plan::is_quantity_gated(ability) {
            return Ok(usage);
        }

        // is_quantity_gated covers exactly these two
        match ability {
            Permission::CreateEvent => usage.events = self.store.count_events(captain_id).await?,
            Permission::InviteMember => usage.members = self.store.count_members(captain_id).await?,
            _ => {}
        }
        Ok(usage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_answers_forbidden_everywhere() {
        let policy = OwnershipDenialPolicy::default();
        for ability in Permission::ALL {
            assert_eq!(policy.status_for(ability), DenialStatus::Forbidden);
        }
    }

    #[test]
    fn hidden_abilities_answer_not_found() {
        let policy = OwnershipDenialPolicy::default().hide(Permission::ViewEvent);
        assert_eq!(policy.status_for(Permission::ViewEvent), DenialStatus::NotFound);
        assert_eq!(policy.status_for(Permission::EditEvent), DenialStatus::Forbidden);
    }

    #[test]
    fn decision_accessors() {
        let deny = Decision::deny(DenyStage::Role, ROLE_DENIED);
        assert!(!deny.is_allowed());
        assert_eq!(deny.reason(), Some(ROLE_DENIED));
        assert_eq!(deny.stage(), Some(DenyStage::Role));
        assert!(Decision::Allow.is_allowed());
        assert_eq!(Decision::Allow.reason(), None);
    }
}
