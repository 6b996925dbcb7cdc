// src/models/auth.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::authz::Permission;

// ---
// 1. User (the tenant account)
// ---
// A captain when `captain_id` is NULL, otherwise a member acting for that captain.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,

    #[schema(example = "Ana Souza")]
    pub name: String,

    #[schema(example = "ana@example.com")]
    pub email: String,

    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub password_hash: Option<String>,

    pub email_verified_at: Option<DateTime<Utc>>,

    pub captain_id: Option<Uuid>,

    pub role_id: Option<Uuid>,

    // Only meaningful on captains; members always run on their captain's plan.
    #[schema(example = "basic")]
    pub plan: String,

    #[schema(value_type = Object)]
    pub plan_overrides: Json<BTreeMap<Permission, bool>>,

    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub invitation_token: Option<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_member(&self) -> bool {
        self.captain_id.is_some()
    }

    pub fn is_verified(&self) -> bool {
        self.email_verified_at.is_some()
    }
}

// ---
// 2. Payloads
// ---

// Captain signup
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterUserPayload {
    #[validate(length(min = 1, message = "The name is required."))]
    pub name: String,
    #[validate(email(message = "The e-mail is invalid."))]
    pub email: String,
    #[validate(length(min = 6, message = "The password must have at least 6 characters."))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "The e-mail is invalid."))]
    pub email: String,
    #[validate(length(min = 1, message = "The password is required."))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// JWT claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InviteMemberPayload {
    #[validate(length(min = 1, message = "The name is required."))]
    pub name: String,

    #[validate(email(message = "The e-mail is invalid."))]
    pub email: String,

    pub role_id: Uuid,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMemberPayload {
    #[validate(length(min = 1, message = "The name cannot be empty."))]
    pub name: Option<String>,

    pub role_id: Option<Uuid>,
}

// Completes a pending invitation
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JoinTeamPayload {
    #[validate(length(min = 1, message = "The name is required."))]
    pub name: String,

    #[validate(
        length(min = 6, message = "The password must have at least 6 characters."),
        must_match(other = "password_confirmation", message = "The password confirmation does not match.")
    )]
    pub password: String,

    pub password_confirmation: String,
}

// What the join page shows before the member sets a password
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PendingMember {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}
