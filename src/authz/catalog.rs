// src/authz/catalog.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::common::error::AppError;

/// Every ability the gate knows about. Adding one is a code change: the
/// exhaustive matches below make the compiler point at each table to update.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum Permission {
    // Events
    ViewEvents,
    ViewEvent,
    CreateEvent,
    EditEvent,
    DeleteEvent,

    // Members
    ViewMembers,
    ViewMember,
    InviteMember,
    EditMember,
    DeleteMember,

    // Roles
    ViewRoles,
    CreateRole,
    EditRole,
    DeleteRole,

    // Categories
    AddCategory,
    RemoveCategory,

    // Suppliers
    AddSupplier,
    EditSupplier,
    RemoveSupplier,

    // Assignment
    AssignMember,

    // Installments
    AddInstallment,
    EditInstallment,
    RemoveInstallment,

    // Guests
    InviteGuest,
    EditGuest,
    DeleteGuest,

    // Agenda
    CreateAgenda,
    EditAgenda,
    DeleteAgenda,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PermissionArea {
    Events,
    Members,
    Roles,
    Categories,
    Suppliers,
    Assignment,
    Installments,
    Guests,
    Agenda,
}

impl PermissionArea {
    pub fn as_str(self) -> &'static str {
        match self {
            PermissionArea::Events => "events",
            PermissionArea::Members => "members",
            PermissionArea::Roles => "roles",
            PermissionArea::Categories => "categories",
            PermissionArea::Suppliers => "suppliers",
            PermissionArea::Assignment => "assignment",
            PermissionArea::Installments => "installments",
            PermissionArea::Guests => "guests",
            PermissionArea::Agenda => "agenda",
        }
    }
}

impl Permission {
    /// Declaration order; `Permission::ALL[p as usize] == p` holds for every entry.
    pub const ALL: [Permission; 29] = [
        Permission::ViewEvents,
        Permission::ViewEvent,
        Permission::CreateEvent,
        Permission::EditEvent,
        Permission::DeleteEvent,
        Permission::ViewMembers,
        Permission::ViewMember,
        Permission::InviteMember,
        Permission::EditMember,
        Permission::DeleteMember,
        Permission::ViewRoles,
        Permission::CreateRole,
        Permission::EditRole,
        Permission::DeleteRole,
        Permission::AddCategory,
        Permission::RemoveCategory,
        Permission::AddSupplier,
        Permission::EditSupplier,
        Permission::RemoveSupplier,
        Permission::AssignMember,
        Permission::AddInstallment,
        Permission::EditInstallment,
        Permission::RemoveInstallment,
        Permission::InviteGuest,
        Permission::EditGuest,
        Permission::DeleteGuest,
        Permission::CreateAgenda,
        Permission::EditAgenda,
        Permission::DeleteAgenda,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Permission::ViewEvents => "view-events",
            Permission::ViewEvent => "view-event",
            Permission::CreateEvent => "create-event",
            Permission::EditEvent => "edit-event",
            Permission::DeleteEvent => "delete-event",
            Permission::ViewMembers => "view-members",
            Permission::ViewMember => "view-member",
            Permission::InviteMember => "invite-member",
            Permission::EditMember => "edit-member",
            Permission::DeleteMember => "delete-member",
            Permission::ViewRoles => "view-roles",
            Permission::CreateRole => "create-role",
            Permission::EditRole => "edit-role",
            Permission::DeleteRole => "delete-role",
            Permission::AddCategory => "add-category",
            Permission::RemoveCategory => "remove-category",
            Permission::AddSupplier => "add-supplier",
            Permission::EditSupplier => "edit-supplier",
            Permission::RemoveSupplier => "remove-supplier",
            Permission::AssignMember => "assign-member",
            Permission::AddInstallment => "add-installment",
            Permission::EditInstallment => "edit-installment",
            Permission::RemoveInstallment => "remove-installment",
            Permission::InviteGuest => "invite-guest",
            Permission::EditGuest => "edit-guest",
            Permission::DeleteGuest => "delete-guest",
            Permission::CreateAgenda => "create-agenda",
            Permission::EditAgenda => "edit-agenda",
            Permission::DeleteAgenda => "delete-agenda",
        }
    }

    pub fn area(self) -> PermissionArea {
        use Permission::*;
        match self {
            ViewEvents | ViewEvent | CreateEvent | EditEvent | DeleteEvent => PermissionArea::Events,
            ViewMembers | ViewMember | InviteMember | EditMember | DeleteMember => {
                PermissionArea::Members
            }
            ViewRoles | CreateRole | EditRole | DeleteRole => PermissionArea::Roles,
            AddCategory | RemoveCategory => PermissionArea::Categories,
            AddSupplier | EditSupplier | RemoveSupplier => PermissionArea::Suppliers,
            AssignMember => PermissionArea::Assignment,
            AddInstallment | EditInstallment | RemoveInstallment => PermissionArea::Installments,
            InviteGuest | EditGuest | DeleteGuest => PermissionArea::Guests,
            CreateAgenda | EditAgenda | DeleteAgenda => PermissionArea::Agenda,
        }
    }

    /// Abilities checked against a concrete resource. The rest act on the
    /// effective account's collections as a whole.
    pub fn is_resource_scoped(self) -> bool {
        use Permission::*;
        !matches!(
            self,
            ViewEvents | CreateEvent | ViewMembers | InviteMember | ViewRoles | CreateRole
        )
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| AppError::UnknownAbility(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::collections::HashSet;

    #[test]
    fn all_lists_every_variant_in_order() {
        assert_eq!(Permission::ALL.len(), Permission::DeleteAgenda as usize + 1);
        for (index, permission) in Permission::ALL.iter().enumerate() {
            assert_eq!(*permission as usize, index, "{permission} out of order");
        }
    }

    #[test]
    fn names_are_unique_and_match_serde() {
        let mut seen = HashSet::new();
        for permission in Permission::ALL {
            assert!(seen.insert(permission.as_str()), "duplicate {permission}");

            let wire = serde_json::to_value(permission).unwrap();
            assert_eq!(wire, serde_json::Value::String(permission.as_str().to_string()));

            let parsed: Permission = permission.as_str().parse().unwrap();
            assert_eq!(parsed, permission);
        }
    }

    #[test]
    fn unknown_ability_fails_fast() {
        let err = "launch-rocket".parse::<Permission>().unwrap_err();
        assert!(matches!(err, AppError::UnknownAbility(ref name) if name == "launch-rocket"));
    }

    #[rstest]
    #[case(Permission::ViewEvents, false)]
    #[case(Permission::CreateEvent, false)]
    #[case(Permission::InviteMember, false)]
    #[case(Permission::CreateRole, false)]
    #[case(Permission::EditEvent, true)]
    #[case(Permission::EditInstallment, true)]
    #[case(Permission::DeleteMember, true)]
    #[case(Permission::AssignMember, true)]
    fn resource_scope(#[case] permission: Permission, #[case] scoped: bool) {
        assert_eq!(permission.is_resource_scoped(), scoped);
    }

    #[test]
    fn every_area_has_an_ability() {
        let areas: HashSet<&str> = Permission::ALL.iter().map(|p| p.area().as_str()).collect();
        assert_eq!(areas.len(), 9);
    }
}
