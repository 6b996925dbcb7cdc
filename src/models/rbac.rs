// src/models/rbac.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Roles table row
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,

    pub captain_id: Uuid,

    #[schema(example = "Supplier manager")]
    pub name: String,

    // Stored de-duplicated and sorted, see `authz::role::normalize_permissions`.
    #[schema(example = json!(["add-supplier", "edit-supplier"]))]
    pub permissions: Vec<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Payload shared by create and update
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SaveRolePayload {
    #[validate(length(min = 1, message = "The name is required."))]
    #[schema(example = "Supplier manager")]
    pub name: String,

    #[validate(length(min = 1, message = "Select at least one permission."))]
    #[schema(example = json!(["add-supplier", "edit-supplier"]))]
    pub permissions: Vec<String>,
}

// One catalog entry, for role-building screens
#[derive(Debug, Serialize, ToSchema)]
pub struct PermissionInfo {
    #[schema(example = "edit-event")]
    pub slug: &'static str,

    #[schema(example = "events")]
    pub area: &'static str,

    pub resource_scoped: bool,
}
