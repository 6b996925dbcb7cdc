// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,

        // --- Members ---
        handlers::auth::join_info,
        handlers::auth::join,
        handlers::members::list_members,
        handlers::members::invite_member,
        handlers::members::get_member,
        handlers::members::update_member,
        handlers::members::delete_member,

        // --- RBAC ---
        handlers::rbac::list_permissions,
        handlers::rbac::list_roles,
        handlers::rbac::create_role,
        handlers::rbac::update_role,
        handlers::rbac::delete_role,

        // --- Events ---
        handlers::events::list_events,
        handlers::events::create_event,
        handlers::events::get_event,
        handlers::events::update_event,
        handlers::events::delete_event,
        handlers::events::assign_member,
        handlers::events::unassign_member,

        // --- Agenda ---
        handlers::events::create_agenda_item,
        handlers::events::update_agenda_item,
        handlers::events::delete_agenda_item,

        // --- Suppliers ---
        handlers::suppliers::list_catalog,
        handlers::suppliers::attach_category,
        handlers::suppliers::detach_category,
        handlers::suppliers::attach_supplier,
        handlers::suppliers::update_supplier,
        handlers::suppliers::detach_supplier,
        handlers::suppliers::add_contract_file,
        handlers::suppliers::delete_contract_file,
        handlers::suppliers::add_installment,
        handlers::suppliers::update_installment,
        handlers::suppliers::delete_installment,

        // --- Guests ---
        handlers::guests::invite_guest,
        handlers::guests::update_guest,
        handlers::guests::delete_guest,
        handlers::guests::confirm_presence,
        handlers::guests::refuse_presence,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::auth::InviteMemberPayload,
            models::auth::UpdateMemberPayload,
            models::auth::JoinTeamPayload,
            models::auth::PendingMember,

            // --- RBAC ---
            models::rbac::Role,
            models::rbac::SaveRolePayload,
            models::rbac::PermissionInfo,

            // --- Events ---
            models::events::Event,
            models::events::AgendaItem,
            models::events::EventDetail,
            models::events::CreateEventPayload,
            models::events::UpdateEventPayload,
            models::events::SaveAgendaPayload,

            // --- Suppliers ---
            models::suppliers::SupplierStatus,
            models::suppliers::InstallmentStatus,
            models::suppliers::SupplierCategory,
            models::suppliers::Supplier,
            models::suppliers::SupplierCategoryWithSuppliers,
            models::suppliers::EventCategory,
            models::suppliers::EventSupplier,
            models::suppliers::Installment,
            models::suppliers::ContractFile,
            models::suppliers::EventSupplierDetail,
            models::suppliers::EventCategoryDetail,
            models::suppliers::AttachCategoryPayload,
            models::suppliers::AttachSupplierPayload,
            models::suppliers::UpdateSupplierPayload,
            models::suppliers::AddContractFilePayload,
            models::suppliers::CreateInstallmentPayload,
            models::suppliers::UpdateInstallmentPayload,

            // --- Guests ---
            models::guests::GuestStatus,
            models::guests::GuestRelation,
            models::guests::Guest,
            models::guests::InviteGuestPayload,
            models::guests::UpdateGuestPayload,
            models::guests::RsvpResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Captain signup and login"),
        (name = "Users", description = "The authenticated account"),
        (name = "Members", description = "Team members and invitations"),
        (name = "RBAC", description = "Roles and the permission catalog"),
        (name = "Events", description = "Events and their assignees"),
        (name = "Agenda", description = "Event agenda"),
        (name = "Suppliers", description = "Categories, suppliers, contracts and installments"),
        (name = "Guests", description = "Guest list and RSVP")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_protected_path_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/events/{id}",
            "/api/event-suppliers/{id}/installments",
            "/api/rsvp/{token}/confirm",
            "/api/members/join/{token}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{path} missing");
        }
    }
}
