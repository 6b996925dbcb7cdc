// src/authz/plan.rs

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::{authz::Permission, common::error::AppError, models::auth::User};

/// Sentinel for "no cap" in the constraint table.
pub const UNLIMITED: i64 = -1;

/// One row of the constraint table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlanParams {
    pub max_events: i64,
    pub max_members: i64,

    // Tier-wide ability switches, e.g. `{"view-events": false}`
    #[serde(default)]
    pub abilities: BTreeMap<Permission, bool>,
}

impl PlanParams {
    pub fn limits(max_events: i64, max_members: i64) -> Self {
        Self { max_events, max_members, abilities: BTreeMap::new() }
    }
}

/// Plan identifier → constraints. Injected into the gate so tests and
/// deployments can swap the table without touching code.
#[derive(Debug, Clone)]
pub struct PlanCatalog {
    tiers: HashMap<String, PlanParams>,
}

impl Default for PlanCatalog {
    fn default() -> Self {
        let mut tiers = HashMap::new();
        tiers.insert("basic".to_string(), PlanParams::limits(3, 10));
        tiers.insert("pro".to_string(), PlanParams::limits(10, 20));
        tiers.insert("premium".to_string(), PlanParams::limits(UNLIMITED, UNLIMITED));
        Self { tiers }
    }
}

impl PlanCatalog {
    pub fn new(tiers: HashMap<String, PlanParams>) -> Self {
        Self { tiers }
    }

    /// Reads a JSON object of `{"<plan>": {"max_events": .., "max_members": .., "abilities": {..}}}`.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading plan catalog {}", path.display()))?;
        let tiers: HashMap<String, PlanParams> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing plan catalog {}", path.display()))?;
        Ok(Self { tiers })
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.tiers.contains_key(identifier)
    }

    /// Builds the plan of an already-resolved captain: its tier, with the
    /// account's own overrides taking precedence over the tier's.
    /// Members must never reach here with their own row; `Gate` resolves first.
    pub fn resolve(&self, captain: &User) -> Result<Plan, AppError> {
        let params = self
            .tiers
            .get(&captain.plan)
            .ok_or_else(|| AppError::PlanNotConfigured(captain.plan.clone()))?;

        let mut plan = Plan::with_params(&captain.plan, params.clone());
        plan.overrides
            .extend(captain.plan_overrides.0.iter().map(|(k, v)| (*k, *v)));
        Ok(plan)
    }
}

/// Live resource counts of the effective account, taken at evaluation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanUsage {
    pub events: i64,
    pub members: i64,
}

/// What the plan has to say about an ability. Only `Deny` short-circuits the
/// gate. `evaluate` never answers `Allow`: being under a cap or switched on
/// is "no opinion", so the role check always runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanDecision {
    Allow,
    Deny(String),
    NoOpinion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub identifier: String,
    pub max_events: i64,
    pub max_members: i64,
    pub overrides: BTreeMap<Permission, bool>,
}

impl Plan {
    /// Synthetic plans for tests and custom tiers.
    pub fn with_params(identifier: &str, params: PlanParams) -> Self {
        Self {
            identifier: identifier.to_string(),
            max_events: params.max_events,
            max_members: params.max_members,
            overrides: params.abilities,
        }
    }

    /// Abilities whose evaluation needs a live count.
    pub fn is_quantity_gated(ability: Permission) -> bool {
        matches!(ability, Permission::CreateEvent | Permission::InviteMember)
    }

    pub fn evaluate(&self, ability: Permission, usage: &PlanUsage) -> PlanDecision {
        // 1. Categorical switch
        if self.overrides.get(&ability) == Some(&false) {
            return PlanDecision::Deny("Your plan does not allow this action".to_string());
        }

        // 2. Quantity caps
        match ability {
            Permission::CreateEvent => {
                if reached(usage.events, self.max_events) {
                    return PlanDecision::Deny("You've reached your plan's events limit".to_string());
                }
                PlanDecision::NoOpinion
            }
            Permission::InviteMember => {
                if reached(usage.members, self.max_members) {
                    return PlanDecision::Deny("You've reached your plan's members limit".to_string());
                }
                PlanDecision::NoOpinion
            }
            _ => PlanDecision::NoOpinion,
        }
    }
}

fn reached(current: i64, max: i64) -> bool {
    max != UNLIMITED && current >= max
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use sqlx::types::Json;
    use uuid::Uuid;

    fn captain(plan: &str, overrides: &[(Permission, bool)]) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Captain".into(),
            email: "captain@example.com".into(),
            password_hash: None,
            email_verified_at: Some(Utc::now()),
            captain_id: None,
            role_id: None,
            plan: plan.into(),
            plan_overrides: Json(overrides.iter().copied().collect()),
            invitation_token: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[rstest]
    #[case("basic", 3, 10)]
    #[case("pro", 10, 20)]
    #[case("premium", UNLIMITED, UNLIMITED)]
    fn default_constraint_table(#[case] tier: &str, #[case] events: i64, #[case] members: i64) {
        let plan = PlanCatalog::default().resolve(&captain(tier, &[])).unwrap();
        assert_eq!((plan.max_events, plan.max_members), (events, members));
    }

    #[test]
    fn unknown_plan_is_a_misconfiguration() {
        let err = PlanCatalog::default().resolve(&captain("gold", &[])).unwrap_err();
        assert!(matches!(err, AppError::PlanNotConfigured(ref id) if id == "gold"));
    }

    #[test]
    fn events_limit_is_inclusive() {
        let plan = Plan::with_params("basic", PlanParams::limits(3, 10));
        let under = PlanUsage { events: 2, members: 0 };
        let at = PlanUsage { events: 3, members: 0 };

        assert_eq!(plan.evaluate(Permission::CreateEvent, &under), PlanDecision::NoOpinion);
        match plan.evaluate(Permission::CreateEvent, &at) {
            PlanDecision::Deny(reason) => assert!(reason.contains("events limit")),
            other => panic!("expected deny, got {other:?}"),
        }
    }

    #[test]
    fn members_limit() {
        let plan = Plan::with_params("tiny", PlanParams::limits(UNLIMITED, 1));
        let usage = PlanUsage { events: 0, members: 1 };
        match plan.evaluate(Permission::InviteMember, &usage) {
            PlanDecision::Deny(reason) => assert!(reason.contains("members limit")),
            other => panic!("expected deny, got {other:?}"),
        }
    }

    #[test]
    fn unlimited_never_denies() {
        let plan = Plan::with_params("premium", PlanParams::limits(UNLIMITED, UNLIMITED));
        let usage = PlanUsage { events: 10_000, members: 10_000 };
        assert_eq!(plan.evaluate(Permission::CreateEvent, &usage), PlanDecision::NoOpinion);
        assert_eq!(plan.evaluate(Permission::InviteMember, &usage), PlanDecision::NoOpinion);
    }

    #[rstest]
    #[case(Permission::CreateEvent, PlanUsage { events: 0, members: 0 })]
    #[case(Permission::InviteMember, PlanUsage { events: 0, members: 0 })]
    #[case(Permission::ViewEvents, PlanUsage::default())]
    fn plan_never_force_allows(#[case] ability: Permission, #[case] usage: PlanUsage) {
        let mut params = PlanParams::limits(UNLIMITED, UNLIMITED);
        params.abilities.insert(ability, true);
        let plan = Plan::with_params("premium", params);

        assert_ne!(plan.evaluate(ability, &usage), PlanDecision::Allow);
    }

    #[test]
    fn ungated_abilities_get_no_opinion() {
        let plan = Plan::with_params("basic", PlanParams::limits(0, 0));
        assert_eq!(
            plan.evaluate(Permission::EditEvent, &PlanUsage::default()),
            PlanDecision::NoOpinion
        );
    }

    #[test]
    fn false_override_denies_categorically() {
        let mut params = PlanParams::limits(UNLIMITED, UNLIMITED);
        params.abilities.insert(Permission::ViewEvents, false);
        let plan = Plan::with_params("restricted", params);

        assert_eq!(
            plan.evaluate(Permission::ViewEvents, &PlanUsage::default()),
            PlanDecision::Deny("Your plan does not allow this action".to_string())
        );
    }

    #[test]
    fn true_override_does_not_lift_quantity_caps() {
        let mut params = PlanParams::limits(1, 1);
        params.abilities.insert(Permission::CreateEvent, true);
        let plan = Plan::with_params("basic", params);
        let usage = PlanUsage { events: 1, members: 0 };

        assert!(matches!(plan.evaluate(Permission::CreateEvent, &usage), PlanDecision::Deny(_)));
    }

    #[test]
    fn account_overrides_win_over_tier() {
        let mut tier = PlanParams::limits(3, 10);
        tier.abilities.insert(Permission::ViewEvents, false);
        let catalog = PlanCatalog::new(HashMap::from([("basic".to_string(), tier)]));

        let plan = catalog
            .resolve(&captain("basic", &[(Permission::ViewEvents, true), (Permission::EditEvent, false)]))
            .unwrap();

        assert_eq!(plan.overrides.get(&Permission::ViewEvents), Some(&true));
        assert_eq!(plan.overrides.get(&Permission::EditEvent), Some(&false));
    }

    #[test]
    fn catalog_parses_json_tiers() {
        let tiers: HashMap<String, PlanParams> = serde_json::from_str(
            r#"{"trial": {"max_events": 1, "max_members": 0, "abilities": {"invite-guest": false}}}"#,
        )
        .unwrap();
        let catalog = PlanCatalog::new(tiers);
        assert!(catalog.contains("trial"));

        let plan = catalog.resolve(&captain("trial", &[])).unwrap();
        assert_eq!(plan.overrides.get(&Permission::InviteGuest), Some(&false));
    }
}
