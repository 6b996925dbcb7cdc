// src/lib.rs

pub mod authz;
pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, middleware::auth::auth_guard};

/// Full HTTP surface: public auth/invitation/RSVP routes plus everything behind `auth_guard`.
pub fn app(app_state: AppState) -> Router {
    // Reachable without a token
    let public_routes = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route(
            "/api/members/join/{token}",
            get(handlers::auth::join_info).post(handlers::auth::join),
        )
        .route("/api/rsvp/{token}/confirm", get(handlers::guests::confirm_presence))
        .route("/api/rsvp/{token}/refuse", get(handlers::guests::refuse_presence));

    let user_routes = Router::new()
        .route("/api/users/me", get(handlers::auth::get_me))
        .route("/api/permissions", get(handlers::rbac::list_permissions));

    let member_routes = Router::new()
        .route(
            "/api/members",
            get(handlers::members::list_members).post(handlers::members::invite_member),
        )
        .route(
            "/api/members/{id}",
            get(handlers::members::get_member)
                .put(handlers::members::update_member)
                .delete(handlers::members::delete_member),
        );

    let role_routes = Router::new()
        .route(
            "/api/roles",
            get(handlers::rbac::list_roles).post(handlers::rbac::create_role),
        )
        .route(
            "/api/roles/{id}",
            put(handlers::rbac::update_role).delete(handlers::rbac::delete_role),
        );

    let event_routes = Router::new()
        .route(
            "/api/events",
            get(handlers::events::list_events).post(handlers::events::create_event),
        )
        .route(
            "/api/events/{id}",
            get(handlers::events::get_event)
                .put(handlers::events::update_event)
                .delete(handlers::events::delete_event),
        )
        .route(
            "/api/events/{id}/assignees/{member_id}",
            post(handlers::events::assign_member).delete(handlers::events::unassign_member),
        )
        .route("/api/events/{id}/agenda", post(handlers::events::create_agenda_item))
        .route(
            "/api/agenda/{id}",
            put(handlers::events::update_agenda_item).delete(handlers::events::delete_agenda_item),
        )
        .route("/api/events/{id}/guests", post(handlers::guests::invite_guest))
        .route(
            "/api/guests/{id}",
            put(handlers::guests::update_guest).delete(handlers::guests::delete_guest),
        );

    let supplier_routes = Router::new()
        .route("/api/supplier-categories", get(handlers::suppliers::list_catalog))
        .route("/api/events/{id}/categories", post(handlers::suppliers::attach_category))
        .route(
            "/api/events/{id}/categories/{category_id}",
            delete(handlers::suppliers::detach_category),
        )
        .route(
            "/api/event-categories/{id}/suppliers",
            post(handlers::suppliers::attach_supplier),
        )
        .route(
            "/api/event-suppliers/{id}",
            put(handlers::suppliers::update_supplier).delete(handlers::suppliers::detach_supplier),
        )
        .route(
            "/api/event-suppliers/{id}/files",
            post(handlers::suppliers::add_contract_file),
        )
        .route(
            "/api/contract-files/{id}",
            delete(handlers::suppliers::delete_contract_file),
        )
        .route(
            "/api/event-suppliers/{id}/installments",
            post(handlers::suppliers::add_installment),
        )
        .route(
            "/api/installments/{id}",
            put(handlers::suppliers::update_installment)
                .delete(handlers::suppliers::delete_installment),
        );

    let protected_routes = Router::new()
        .merge(user_routes)
        .merge(member_routes)
        .merge(role_routes)
        .merge(event_routes)
        .merge(supplier_routes)
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(app_state)
}
