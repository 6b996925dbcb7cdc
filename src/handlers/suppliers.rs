// src/handlers/suppliers.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    authz::{Permission, Resource},
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::suppliers::{
        AddContractFilePayload, AttachCategoryPayload, AttachSupplierPayload, ContractFile,
        CreateInstallmentPayload, EventCategory, EventSupplier, Installment,
        SupplierCategoryWithSuppliers, UpdateInstallmentPayload, UpdateSupplierPayload,
    },
};

// =============================================================================
//  1. CATALOG
// =============================================================================

// GET /api/supplier-categories
#[utoipa::path(
    get,
    path = "/api/supplier-categories",
    tag = "Suppliers",
    responses((status = 200, description = "Supplier categories with their suppliers", body = Vec<SupplierCategoryWithSuppliers>)),
    security(("api_jwt" = []))
)]
pub async fn list_catalog(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<SupplierCategoryWithSuppliers>>, AppError> {
    let catalog = app_state.supplier_service.catalog().await?;
    Ok(Json(catalog))
}

// =============================================================================
//  2. EVENT CATEGORIES
// =============================================================================

// POST /api/events/{id}/categories
#[utoipa::path(
    post,
    path = "/api/events/{id}/categories",
    tag = "Suppliers",
    params(("id" = Uuid, Path, description = "Event ID")),
    request_body = AttachCategoryPayload,
    responses((status = 201, description = "Category attached (or already there)", body = EventCategory)),
    security(("api_jwt" = []))
)]
pub async fn attach_category(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AttachCategoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let event = app_state.event_service.find_event(id).await?;
    app_state
        .gate
        .require(&user, Permission::AddCategory, Some(Resource::Event(&event)))
        .await?;

    let category = app_state.supplier_service.attach_category(&event, &payload).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

// DELETE /api/events/{id}/categories/{category_id}
#[utoipa::path(
    delete,
    path = "/api/events/{id}/categories/{category_id}",
    tag = "Suppliers",
    params(
        ("id" = Uuid, Path, description = "Event ID"),
        ("category_id" = Uuid, Path, description = "Event category ID")
    ),
    responses(
        (status = 204, description = "Category removed with its suppliers"),
        (status = 404, description = "Category not attached to this event")
    ),
    security(("api_jwt" = []))
)]
pub async fn detach_category(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path((id, category_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    let event = app_state.event_service.find_event(id).await?;
    let category = app_state.supplier_service.find_event_category(category_id).await?;
    app_state
        .gate
        .require(&user, Permission::RemoveCategory, Some(Resource::EventCategory(&category)))
        .await?;

    app_state.supplier_service.detach_category(&event, &category).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  3. EVENT SUPPLIERS
// =============================================================================

// POST /api/event-categories/{id}/suppliers
#[utoipa::path(
    post,
    path = "/api/event-categories/{id}/suppliers",
    tag = "Suppliers",
    params(("id" = Uuid, Path, description = "Event category ID")),
    request_body = AttachSupplierPayload,
    responses((status = 201, description = "Supplier attached (or already there)", body = EventSupplier)),
    security(("api_jwt" = []))
)]
pub async fn attach_supplier(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AttachSupplierPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let category = app_state.supplier_service.find_event_category(id).await?;
    app_state
        .gate
        .require(&user, Permission::AddSupplier, Some(Resource::EventCategory(&category)))
        .await?;

    let supplier = app_state.supplier_service.attach_supplier(&category, &payload).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

// PUT /api/event-suppliers/{id}
#[utoipa::path(
    put,
    path = "/api/event-suppliers/{id}",
    tag = "Suppliers",
    params(("id" = Uuid, Path, description = "Event supplier ID")),
    request_body = UpdateSupplierPayload,
    responses(
        (status = 200, description = "Supplier updated", body = EventSupplier),
        (status = 422, description = "Value below the installments already scheduled")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_supplier(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSupplierPayload>,
) -> Result<Json<EventSupplier>, AppError> {
    payload.validate()?;

    let supplier = app_state.supplier_service.find_event_supplier(id).await?;
    app_state
        .gate
        .require(&user, Permission::EditSupplier, Some(Resource::EventSupplier(&supplier)))
        .await?;

    let supplier = app_state.supplier_service.update_supplier(&supplier, &payload).await?;
    Ok(Json(supplier))
}

// DELETE /api/event-suppliers/{id}
#[utoipa::path(
    delete,
    path = "/api/event-suppliers/{id}",
    tag = "Suppliers",
    params(("id" = Uuid, Path, description = "Event supplier ID")),
    responses((status = 204, description = "Supplier removed")),
    security(("api_jwt" = []))
)]
pub async fn detach_supplier(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let supplier = app_state.supplier_service.find_event_supplier(id).await?;
    app_state
        .gate
        .require(&user, Permission::RemoveSupplier, Some(Resource::EventSupplier(&supplier)))
        .await?;

    app_state.supplier_service.detach_supplier(&supplier).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  4. CONTRACT FILES
// =============================================================================

// POST /api/event-suppliers/{id}/files
#[utoipa::path(
    post,
    path = "/api/event-suppliers/{id}/files",
    tag = "Suppliers",
    params(("id" = Uuid, Path, description = "Event supplier ID")),
    request_body = AddContractFilePayload,
    responses((status = 201, description = "File recorded", body = ContractFile)),
    security(("api_jwt" = []))
)]
pub async fn add_contract_file(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddContractFilePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let supplier = app_state.supplier_service.find_event_supplier(id).await?;
    app_state
        .gate
        .require(&user, Permission::EditSupplier, Some(Resource::EventSupplier(&supplier)))
        .await?;

    let file = app_state.supplier_service.add_contract_file(&supplier, &payload.path).await?;
    Ok((StatusCode::CREATED, Json(file)))
}

// DELETE /api/contract-files/{id}
#[utoipa::path(
    delete,
    path = "/api/contract-files/{id}",
    tag = "Suppliers",
    params(("id" = Uuid, Path, description = "Contract file ID")),
    responses((status = 204, description = "File record removed")),
    security(("api_jwt" = []))
)]
pub async fn delete_contract_file(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let file = app_state.supplier_service.find_contract_file(id).await?;
    app_state
        .gate
        .require(&user, Permission::EditSupplier, Some(Resource::ContractFile(&file)))
        .await?;

    app_state.supplier_service.delete_contract_file(&file).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  5. INSTALLMENTS
// =============================================================================

// POST /api/event-suppliers/{id}/installments
#[utoipa::path(
    post,
    path = "/api/event-suppliers/{id}/installments",
    tag = "Suppliers",
    params(("id" = Uuid, Path, description = "Event supplier ID")),
    request_body = CreateInstallmentPayload,
    responses(
        (status = 201, description = "Installment scheduled", body = Installment),
        (status = 422, description = "The sum of installments exceeds the value hired")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_installment(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreateInstallmentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let supplier = app_state.supplier_service.find_event_supplier(id).await?;
    app_state
        .gate
        .require(&user, Permission::AddInstallment, Some(Resource::EventSupplier(&supplier)))
        .await?;

    let installment = app_state.supplier_service.add_installment(&supplier, &payload).await?;
    Ok((StatusCode::CREATED, Json(installment)))
}

// PUT /api/installments/{id}
#[utoipa::path(
    put,
    path = "/api/installments/{id}",
    tag = "Suppliers",
    params(("id" = Uuid, Path, description = "Installment ID")),
    request_body = UpdateInstallmentPayload,
    responses(
        (status = 200, description = "Installment updated", body = Installment),
        (status = 422, description = "The sum of installments exceeds the value hired")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_installment(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateInstallmentPayload>,
) -> Result<Json<Installment>, AppError> {
    payload.validate()?;

    let installment = app_state.supplier_service.find_installment(id).await?;
    app_state
        .gate
        .require(&user, Permission::EditInstallment, Some(Resource::Installment(&installment)))
        .await?;

    let installment = app_state
        .supplier_service
        .update_installment(&installment, &payload)
        .await?;
    Ok(Json(installment))
}

// DELETE /api/installments/{id}
#[utoipa::path(
    delete,
    path = "/api/installments/{id}",
    tag = "Suppliers",
    params(("id" = Uuid, Path, description = "Installment ID")),
    responses((status = 204, description = "Installment removed")),
    security(("api_jwt" = []))
)]
pub async fn delete_installment(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let installment = app_state.supplier_service.find_installment(id).await?;
    app_state
        .gate
        .require(&user, Permission::RemoveInstallment, Some(Resource::Installment(&installment)))
        .await?;

    app_state.supplier_service.delete_installment(&installment).await?;
    Ok(StatusCode::NO_CONTENT)
}
