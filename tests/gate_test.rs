// tests/gate_test.rs

mod common;

use std::collections::HashMap;

use backend::{
    authz::{
        effective_account_id, DenyStage, OwnershipDenialPolicy, Permission, PlanCatalog,
        PlanParams, Resource,
    },
    common::error::AppError,
    models::{
        auth::User,
        events::{AgendaItem, Event},
        guests::Guest,
        rbac::Role,
        suppliers::{ContractFile, EventCategory, EventSupplier, Installment},
    },
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use uuid::Uuid;

use common::MemoryStore;

// =============================================================================
//  1. Effective account
// =============================================================================

#[tokio::test]
async fn captain_is_its_own_effective_account() {
    let store = MemoryStore::new();
    let captain = store.captain("basic");
    let gate = store.gate();

    let effective = gate.hierarchy().effective_account(&captain).await.unwrap();

    assert_eq!(effective.id, captain.id);
    assert_eq!(effective_account_id(&captain), captain.id);
}

#[tokio::test]
async fn member_resolves_plan_and_collections_through_its_captain() {
    let store = MemoryStore::new();
    let captain = store.captain("pro");
    let viewer = store.role(captain.id, ["view-events", "view-members"]);
    let member = store.member(&captain, Some(&viewer));
    let event = store.event(&captain);
    let gate = store.gate();

    let effective = gate.hierarchy().effective_account(&member).await.unwrap();
    assert_eq!(effective.id, captain.id);
    assert_eq!(effective.plan, "pro");

    let events = gate.hierarchy().effective_events(&member).await.unwrap();
    assert_eq!(events.iter().map(|e| e.id).collect::<Vec<_>>(), vec![event.id]);

    let members = gate.hierarchy().effective_members(&member).await.unwrap();
    assert_eq!(members.iter().map(|m| m.id).collect::<Vec<_>>(), vec![member.id]);

    let role_ids = |roles: Vec<Role>| {
        let mut ids: Vec<Uuid> = roles.into_iter().map(|r| r.id).collect();
        ids.sort();
        ids
    };
    let seen_by_member = role_ids(gate.hierarchy().effective_roles(&member).await.unwrap());
    let seen_by_captain = role_ids(gate.hierarchy().effective_roles(&captain).await.unwrap());
    assert_eq!(seen_by_member, seen_by_captain);
    assert_eq!(seen_by_member.len(), 2); // Owner + viewer
    assert!(seen_by_member.contains(&viewer.id));
}

#[tokio::test]
async fn member_role_is_its_own_not_the_captains() {
    let store = MemoryStore::new();
    let captain = store.captain("premium");
    let viewer = store.role(captain.id, ["view-events"]);
    let member = store.member(&captain, Some(&viewer));
    let gate = store.gate();

    // The captain's Owner role grants everything; the member only gets its own.
    assert!(gate.authorize(&member, Permission::ViewEvents, None).await.unwrap().is_allowed());

    let decision = gate.authorize(&member, Permission::CreateEvent, None).await.unwrap();
    assert_eq!(decision.stage(), Some(DenyStage::Role));
    assert_eq!(decision.reason(), Some("Your role is insufficient"));
}

#[tokio::test]
async fn member_of_member_resolves_exactly_one_hop() {
    let store = MemoryStore::new();
    let captain = store.captain("premium");
    let middle = store.member(&captain, None);
    let nested = store.member(&middle, None);
    let gate = store.gate();

    let effective = gate.hierarchy().effective_account(&nested).await.unwrap();

    assert_eq!(effective.id, middle.id);
    assert_ne!(effective.id, captain.id);
    assert_eq!(effective_account_id(&nested), middle.id);
}

#[tokio::test]
async fn member_whose_captain_vanished_is_not_found() {
    let store = MemoryStore::new();
    let orphan = common::account(Some(Uuid::new_v4()), "basic");
    store.put_user(orphan.clone());
    let gate = store.gate();

    let err = gate.authorize(&orphan, Permission::ViewEvents, None).await.unwrap_err();
    assert!(matches!(err, AppError::ResourceNotFound("Account")));
}

// =============================================================================
//  2. Roles
// =============================================================================

#[rstest]
#[case(Permission::ViewEvents)]
#[case(Permission::CreateEvent)]
#[case(Permission::ViewRoles)]
#[case(Permission::InviteMember)]
#[tokio::test]
async fn empty_role_denies_everything(#[case] ability: Permission) {
    let store = MemoryStore::new();
    let captain = store.captain("premium");
    let empty = store.role(captain.id, []);
    let member = store.member(&captain, Some(&empty));
    let gate = store.gate();

    let decision = gate.authorize(&member, ability, None).await.unwrap();
    assert_eq!(decision.stage(), Some(DenyStage::Role));
}

#[tokio::test]
async fn member_without_role_is_denied() {
    let store = MemoryStore::new();
    let captain = store.captain("premium");
    let member = store.member(&captain, None);
    let gate = store.gate();

    let decision = gate.authorize(&member, Permission::ViewEvents, None).await.unwrap();
    assert_eq!(decision.stage(), Some(DenyStage::Role));
}

#[tokio::test]
async fn role_of_another_captain_grants_nothing() {
    let store = MemoryStore::new();
    let captain = store.captain("premium");
    let stranger = store.captain("premium");
    let foreign = store.role(stranger.id, ["view-events"]);
    let member = store.member(&captain, Some(&foreign));
    let gate = store.gate();

    let decision = gate.authorize(&member, Permission::ViewEvents, None).await.unwrap();
    assert_eq!(decision.stage(), Some(DenyStage::Role));
}

// =============================================================================
//  3. Plan
// =============================================================================

#[tokio::test]
async fn basic_captain_is_capped_at_three_events_counted_live() {
    let store = MemoryStore::new();
    let captain = store.captain("basic");
    let events: Vec<_> = (0..3).map(|_| store.event(&captain)).collect();
    let gate = store.gate();

    let decision = gate.authorize(&captain, Permission::CreateEvent, None).await.unwrap();
    assert_eq!(decision.stage(), Some(DenyStage::Plan));
    assert_eq!(decision.reason(), Some("You've reached your plan's events limit"));

    store.delete_event(events[0].id);

    let decision = gate.authorize(&captain, Permission::CreateEvent, None).await.unwrap();
    assert!(decision.is_allowed());
}

#[tokio::test]
async fn members_limit_counts_the_captains_members() {
    let store = MemoryStore::new();
    let captain = store.captain("basic");
    let inviter = store.role(captain.id, ["invite-member"]);
    let member = store.member(&captain, Some(&inviter));
    for _ in 0..9 {
        store.member(&captain, None);
    }
    let gate = store.gate();

    // Ten members on a basic plan, the inviting member included
    let decision = gate.authorize(&member, Permission::InviteMember, None).await.unwrap();
    assert_eq!(decision.stage(), Some(DenyStage::Plan));
    assert_eq!(decision.reason(), Some("You've reached your plan's members limit"));
}

#[tokio::test]
async fn premium_has_no_caps() {
    let store = MemoryStore::new();
    let captain = store.captain("premium");
    for _ in 0..50 {
        store.event(&captain);
    }
    let gate = store.gate();

    assert!(gate.authorize(&captain, Permission::CreateEvent, None).await.unwrap().is_allowed());
}

#[tokio::test]
async fn plan_override_false_beats_a_granting_role() {
    let store = MemoryStore::new();
    let mut captain = store.captain("premium");
    captain.plan_overrides.0.insert(Permission::EditEvent, false);
    store.put_user(captain.clone());
    let event = store.event(&captain);
    let gate = store.gate();

    let decision = gate
        .authorize(&captain, Permission::EditEvent, Some(Resource::Event(&event)))
        .await
        .unwrap();

    assert_eq!(decision.stage(), Some(DenyStage::Plan));
    assert_eq!(decision.reason(), Some("Your plan does not allow this action"));
}

#[tokio::test]
async fn plan_override_true_does_not_grant_a_missing_role_ability() {
    let store = MemoryStore::new();
    let mut captain = store.captain("premium");
    captain.plan_overrides.0.insert(Permission::DeleteEvent, true);
    store.put_user(captain.clone());
    let viewer = store.role(captain.id, ["view-events"]);
    let member = store.member(&captain, Some(&viewer));
    let event = store.event(&captain);
    let gate = store.gate();

    let decision = gate
        .authorize(&member, Permission::DeleteEvent, Some(Resource::Event(&event)))
        .await
        .unwrap();
    assert_eq!(decision.stage(), Some(DenyStage::Role));
}

#[tokio::test]
async fn tier_switches_apply_to_members_through_the_captain() {
    let mut basic = PlanParams::limits(3, 10);
    basic.abilities.insert(Permission::InviteGuest, false);
    let plans = PlanCatalog::new(HashMap::from([("basic".to_string(), basic)]));

    let store = MemoryStore::new();
    let captain = store.captain("basic");
    let host = store.role(captain.id, ["invite-guest"]);
    let member = store.member(&captain, Some(&host));
    let event = store.event(&captain);
    let gate = store.gate_with(plans);

    let decision = gate
        .authorize(&member, Permission::InviteGuest, Some(Resource::Event(&event)))
        .await
        .unwrap();
    assert_eq!(decision.stage(), Some(DenyStage::Plan));
}

#[tokio::test]
async fn unknown_plan_is_a_configuration_error() {
    let store = MemoryStore::new();
    let captain = store.captain("platinum");
    let gate = store.gate();

    let err = gate.authorize(&captain, Permission::ViewEvents, None).await.unwrap_err();
    assert!(matches!(err, AppError::PlanNotConfigured(plan) if plan == "platinum"));
}

// =============================================================================
//  4. Ownership
// =============================================================================

#[tokio::test]
async fn installment_chain_resolves_to_the_owning_captain() {
    let store = MemoryStore::new();
    let owner = store.captain("premium");
    let stranger = store.captain("premium");
    let event = store.event(&owner);
    let category = store.category(&event);
    let supplier = store.supplier(&category);
    let installment = store.installment(&supplier);
    let gate = store.gate();

    let resource = Some(Resource::Installment(&installment));

    let allowed = gate.authorize(&owner, Permission::EditInstallment, resource).await.unwrap();
    assert!(allowed.is_allowed());

    // All-powerful, but on another account's chain
    let denied = gate.authorize(&stranger, Permission::EditInstallment, resource).await.unwrap();
    assert_eq!(denied.stage(), Some(DenyStage::Ownership));
    assert_eq!(denied.reason(), Some("This resource does not belong to your account"));
}

/// One resource of each kind, built under a single captain.
enum Owned {
    Event(Event),
    Category(EventCategory),
    Supplier(EventSupplier),
    Installment(Installment),
    File(ContractFile),
    Guest(Guest),
    Agenda(AgendaItem),
    Member(User),
    Role(Role),
}

impl Owned {
    fn build(store: &MemoryStore, kind: &str, owner: &User) -> Self {
        let event = store.event(owner);
        match kind {
            "Event" => Owned::Event(event),
            "Event category" => Owned::Category(store.category(&event)),
            "Event supplier" => Owned::Supplier(store.supplier(&store.category(&event))),
            "Installment" => {
                Owned::Installment(store.installment(&store.supplier(&store.category(&event))))
            }
            "Contract file" => {
                Owned::File(store.contract_file(&store.supplier(&store.category(&event))))
            }
            "Guest" => Owned::Guest(store.guest(&event)),
            "Agenda item" => Owned::Agenda(store.agenda_item(&event)),
            "Member" => Owned::Member(store.member(owner, None)),
            "Role" => Owned::Role(store.role(owner.id, ["view-events"])),
            other => panic!("no fixture for {other}"),
        }
    }

    fn resource(&self) -> Resource<'_> {
        match self {
            Owned::Event(r) => Resource::Event(r),
            Owned::Category(r) => Resource::EventCategory(r),
            Owned::Supplier(r) => Resource::EventSupplier(r),
            Owned::Installment(r) => Resource::Installment(r),
            Owned::File(r) => Resource::ContractFile(r),
            Owned::Guest(r) => Resource::Guest(r),
            Owned::Agenda(r) => Resource::Agenda(r),
            Owned::Member(r) => Resource::Member(r),
            Owned::Role(r) => Resource::Role(r),
        }
    }
}

#[rstest]
#[case("Event", Permission::EditEvent)]
#[case("Event category", Permission::RemoveCategory)]
#[case("Event supplier", Permission::EditSupplier)]
#[case("Installment", Permission::EditInstallment)]
#[case("Contract file", Permission::EditSupplier)]
#[case("Guest", Permission::EditGuest)]
#[case("Agenda item", Permission::EditAgenda)]
#[case("Member", Permission::EditMember)]
#[case("Role", Permission::EditRole)]
#[tokio::test]
async fn every_resource_kind_belongs_to_its_captain_only(
    #[case] kind: &str,
    #[case] ability: Permission,
) {
    let store = MemoryStore::new();
    let owner = store.captain("premium");
    let stranger = store.captain("premium");
    let owned = Owned::build(&store, kind, &owner);
    let resource = owned.resource();
    let gate = store.gate();

    assert_eq!(resource.kind(), kind);

    let allowed = gate.authorize(&owner, ability, Some(resource)).await.unwrap();
    assert!(allowed.is_allowed(), "{kind}: owner was denied");

    let denied = gate.authorize(&stranger, ability, Some(resource)).await.unwrap();
    assert_eq!(denied.stage(), Some(DenyStage::Ownership), "{kind}");
}

#[tokio::test]
async fn category_of_a_deleted_event_is_not_found() {
    let store = MemoryStore::new();
    let owner = store.captain("premium");
    let event = store.event(&owner);
    let category = store.category(&event);
    store.delete_event(event.id);
    let gate = store.gate();

    let err = gate
        .authorize(&owner, Permission::RemoveCategory, Some(Resource::EventCategory(&category)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ResourceNotFound("Event")));
}

#[tokio::test]
async fn installment_of_an_unknown_supplier_is_not_found() {
    let store = MemoryStore::new();
    let owner = store.captain("premium");
    let category = store.category(&store.event(&owner));
    let detached = EventSupplier { id: Uuid::new_v4(), ..store.supplier(&category) };
    let installment = store.installment(&detached);
    let gate = store.gate();

    let err = gate
        .authorize(&owner, Permission::EditInstallment, Some(Resource::Installment(&installment)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ResourceNotFound("Event supplier")));
}

#[tokio::test]
async fn member_edits_its_captains_event_but_not_a_strangers() {
    let store = MemoryStore::new();
    let captain = store.captain("basic");
    let stranger = store.captain("basic");
    let editor = store.role(captain.id, ["edit-event"]);
    let member = store.member(&captain, Some(&editor));
    let own = store.event(&captain);
    let foreign = store.event(&stranger);
    let gate = store.gate();

    let allowed = gate
        .authorize(&member, Permission::EditEvent, Some(Resource::Event(&own)))
        .await
        .unwrap();
    assert!(allowed.is_allowed());

    let denied = gate
        .authorize(&member, Permission::EditEvent, Some(Resource::Event(&foreign)))
        .await
        .unwrap();
    assert_eq!(denied.stage(), Some(DenyStage::Ownership));
}

#[tokio::test]
async fn nobody_removes_themselves_from_the_team() {
    let store = MemoryStore::new();
    let captain = store.captain("basic");
    let manager = store.role(captain.id, ["delete-member"]);
    let member = store.member(&captain, Some(&manager));
    let colleague = store.member(&captain, None);
    let gate = store.gate();

    let own = gate
        .authorize(&member, Permission::DeleteMember, Some(Resource::Member(&member)))
        .await
        .unwrap();
    assert_eq!(own.stage(), Some(DenyStage::Ownership));

    let other = gate
        .authorize(&member, Permission::DeleteMember, Some(Resource::Member(&colleague)))
        .await
        .unwrap();
    assert!(other.is_allowed());

    // A root account has no owner, so not even its own captain session can remove it.
    let root = gate
        .authorize(&captain, Permission::DeleteMember, Some(Resource::Member(&captain)))
        .await
        .unwrap();
    assert_eq!(root.stage(), Some(DenyStage::Ownership));
}

#[tokio::test]
async fn plan_is_checked_before_ownership() {
    let store = MemoryStore::new();
    let mut stranger = store.captain("premium");
    stranger.plan_overrides.0.insert(Permission::ViewEvent, false);
    store.put_user(stranger.clone());
    let owner = store.captain("premium");
    let event = store.event(&owner);
    let gate = store.gate();

    let decision = gate
        .authorize(&stranger, Permission::ViewEvent, Some(Resource::Event(&event)))
        .await
        .unwrap();
    assert_eq!(decision.stage(), Some(DenyStage::Plan));
}

// =============================================================================
//  5. Error mapping
// =============================================================================

#[tokio::test]
async fn ownership_denial_is_403_unless_hidden() {
    let store = MemoryStore::new();
    let owner = store.captain("premium");
    let stranger = store.captain("premium");
    let event = store.event(&owner);

    let default_gate = store.gate();
    let err = default_gate
        .require(&stranger, Permission::ViewEvent, Some(Resource::Event(&event)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let hiding_gate = store
        .gate()
        .with_denial_policy(OwnershipDenialPolicy::default().hide(Permission::ViewEvent));
    let err = hiding_gate
        .require(&stranger, Permission::ViewEvent, Some(Resource::Event(&event)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ResourceNotFound("Event")));
}

#[tokio::test]
async fn hidden_abilities_still_answer_403_for_role_denials() {
    let store = MemoryStore::new();
    let captain = store.captain("premium");
    let member = store.member(&captain, None);
    let event = store.event(&captain);
    let gate = store
        .gate()
        .with_denial_policy(OwnershipDenialPolicy::default().hide(Permission::ViewEvent));

    let err = gate
        .require(&member, Permission::ViewEvent, Some(Resource::Event(&event)))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(reason) if reason == "Your role is insufficient"));
}

#[tokio::test]
async fn abilities_named_at_runtime_must_exist() {
    let store = MemoryStore::new();
    let captain = store.captain("basic");
    let gate = store.gate();

    assert!(gate
        .authorize_named(&captain, "view-events", None)
        .await
        .unwrap()
        .is_allowed());

    let err = gate.authorize_named(&captain, "launch-rocket", None).await.unwrap_err();
    assert!(matches!(err, AppError::UnknownAbility(name) if name == "launch-rocket"));
}
