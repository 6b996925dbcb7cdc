// src/models/suppliers.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::events::validate_positive;

// --- Enums ---

// Maps CREATE TYPE event_supplier_status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "event_supplier_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SupplierStatus {
    Pending,
    Hired,
}

// Maps CREATE TYPE installment_status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "installment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InstallmentStatus {
    Paid,
    Pending,
}

// --- Global catalog ---

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplierCategory {
    pub id: Uuid,
    #[schema(example = "Catering")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: Uuid,
    pub category_id: Uuid,
    #[schema(example = "Buffet Estrela")]
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplierCategoryWithSuppliers {
    #[serde(flatten)]
    pub category: SupplierCategory,
    pub suppliers: Vec<Supplier>,
}

// --- Per-event rows (the ownership chain) ---

// A supplier category attached to one event, with its own budget.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventCategory {
    pub id: Uuid,
    pub event_id: Uuid,
    pub supplier_category_id: Uuid,
    pub budget: Decimal,
}

// A supplier hired (or being negotiated) under an event category.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventSupplier {
    pub id: Uuid,
    pub event_category_id: Uuid,
    pub supplier_id: Uuid,
    pub value: Decimal,
    pub status: SupplierStatus,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    pub id: Uuid,
    pub event_supplier_id: Uuid,
    pub value: Decimal,
    pub due_date: NaiveDate,
    pub status: InstallmentStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContractFile {
    pub id: Uuid,
    pub event_supplier_id: Uuid,
    #[schema(example = "contracts/2024/buffet-estrela.pdf")]
    pub path: String,
    pub created_at: DateTime<Utc>,
}

// --- Event page aggregates ---

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventSupplierDetail {
    #[serde(flatten)]
    pub supplier: EventSupplier,
    pub name: String,
    pub installments: Vec<Installment>,
    pub files: Vec<ContractFile>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventCategoryDetail {
    #[serde(flatten)]
    pub category: EventCategory,
    pub name: String,
    pub suppliers: Vec<EventSupplierDetail>,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttachCategoryPayload {
    pub category_id: Uuid,

    #[validate(custom(function = "validate_positive"))]
    pub budget: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttachSupplierPayload {
    pub supplier_id: Uuid,

    #[validate(custom(function = "validate_positive"))]
    pub value: Decimal,

    pub status: SupplierStatus,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSupplierPayload {
    #[validate(custom(function = "validate_positive"))]
    pub value: Decimal,

    pub status: SupplierStatus,
}

// The file itself is stored elsewhere; we only keep where it went.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddContractFilePayload {
    #[validate(length(min = 1, message = "The file path is required."))]
    pub path: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateInstallmentPayload {
    #[validate(custom(function = "validate_positive"))]
    pub value: Decimal,

    pub due_date: NaiveDate,

    pub status: InstallmentStatus,
}

// Every field optional: only what is sent gets changed
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInstallmentPayload {
    #[validate(custom(function = "validate_positive"))]
    pub value: Option<Decimal>,

    pub due_date: Option<NaiveDate>,

    pub status: Option<InstallmentStatus>,
}
