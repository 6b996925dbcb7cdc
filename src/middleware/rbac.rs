// src/middleware/rbac.rs

use std::marker::PhantomData;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::{
    authz::Permission,
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
};

/// 1. An ability known at compile time
pub trait AbilityDef: Send + Sync + 'static {
    fn ability() -> Permission;
}

/// 2. The guard: runs the gate for abilities that act on the account's
/// collections rather than on one resource. Resource-scoped abilities are
/// checked in the handler once the resource is loaded.
pub struct RequireAbility<T>(PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequireAbility<T>
where
    T: AbilityDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        // A. Account
        let AuthenticatedUser(user) = AuthenticatedUser::from_request_parts(parts, state).await?;

        // B. Gate
        app_state.gate.require(&user, T::ability(), None).await?;

        Ok(RequireAbility(PhantomData))
    }
}

// ---
// Abilities usable as guards
// ---

macro_rules! ability_guard {
    ($($name:ident => $ability:ident),* $(,)?) => {
        $(
            pub struct $name;
            impl AbilityDef for $name {
                fn ability() -> Permission {
                    Permission::$ability
                }
            }
        )*
    };
}

ability_guard! {
    CanViewEvents => ViewEvents,
    CanCreateEvent => CreateEvent,
    CanViewMembers => ViewMembers,
    CanInviteMember => InviteMember,
    CanViewRoles => ViewRoles,
    CanCreateRole => CreateRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guards_only_cover_collection_abilities() {
        for ability in [
            CanViewEvents::ability(),
            CanCreateEvent::ability(),
            CanViewMembers::ability(),
            CanInviteMember::ability(),
            CanViewRoles::ability(),
            CanCreateRole::ability(),
        ] {
            assert!(!ability.is_resource_scoped(), "{ability} needs a resource");
        }
    }
}
