// src/authz/role.rs

use std::collections::BTreeSet;

use crate::{
    authz::Permission,
    common::error::AppError,
    models::rbac::Role,
};

impl Role {
    /// Set membership test. Closed by default: anything not listed is denied.
    pub fn grants(&self, ability: Permission) -> bool {
        self.permissions.iter().any(|p| p == ability.as_str())
    }
}

/// An account without a role, or whose role was deleted, has no permissions.
pub fn has_permission(role: Option<&Role>, ability: Permission) -> bool {
    role.is_some_and(|r| r.grants(ability))
}

/// Validated input for creating or updating a role. Building one performs no
/// authorization: callers pass the gate (`create-role`/`edit-role`) first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDraft {
    pub name: String,
    pub permissions: Vec<String>,
}

impl RoleDraft {
    pub fn new(name: &str, permissions: &[String]) -> Result<Self, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::field("name", "required", "The name is required."));
        }

        Ok(Self {
            name: name.to_string(),
            permissions: normalize_permissions(permissions)?,
        })
    }
}

/// De-duplicates and sorts, rejecting empty sets and names outside the catalog.
pub fn normalize_permissions(raw: &[String]) -> Result<Vec<String>, AppError> {
    let mut set = BTreeSet::new();
    for slug in raw {
        let permission: Permission = slug.trim().parse().map_err(|_| {
            AppError::field(
                "permissions",
                "unknown_permission",
                &format!("'{}' is not a known permission.", slug),
            )
        })?;
        set.insert(permission.as_str());
    }

    if set.is_empty() {
        return Err(AppError::field(
            "permissions",
            "required",
            "Select at least one permission.",
        ));
    }

    Ok(set.into_iter().map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn role(permissions: &[&str]) -> Role {
        Role {
            id: Uuid::new_v4(),
            captain_id: Uuid::new_v4(),
            name: "Crew".into(),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn empty_role_denies_every_ability() {
        let empty = role(&[]);
        for ability in Permission::ALL {
            assert!(!empty.grants(ability), "{ability} granted by an empty role");
        }
    }

    #[test]
    fn missing_role_fails_closed() {
        assert!(!has_permission(None, Permission::ViewEvents));
    }

    #[test]
    fn grants_only_what_is_listed() {
        let r = role(&["edit-event", "view-event"]);
        assert!(has_permission(Some(&r), Permission::EditEvent));
        assert!(!has_permission(Some(&r), Permission::DeleteEvent));
    }

    #[test]
    fn draft_normalizes_permission_set() {
        let draft = RoleDraft::new(
            "  Planner ",
            &["view-event".into(), "edit-event".into(), "view-event".into()],
        )
        .unwrap();
        assert_eq!(draft.name, "Planner");
        assert_eq!(draft.permissions, vec!["edit-event".to_string(), "view-event".to_string()]);
    }

    #[test]
    fn draft_rejects_blank_name_and_empty_set() {
        assert!(matches!(
            RoleDraft::new("   ", &["view-event".into()]),
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(RoleDraft::new("Planner", &[]), Err(AppError::ValidationError(_))));
    }

    #[test]
    fn draft_rejects_names_outside_catalog() {
        let err = RoleDraft::new("Planner", &["foo".into(), "bar".into()]).unwrap_err();
        let AppError::ValidationError(errors) = err else {
            panic!("expected validation error");
        };
        assert!(errors.field_errors().contains_key("permissions"));
    }
}
