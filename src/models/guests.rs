// src/models/guests.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "guest_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GuestStatus {
    Pending,
    Confirmed,
    Refused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "guest_relation", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum GuestRelation {
    Friend,
    Parent,
    Relative,
    Grandparent,
    Colleague,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub id: Uuid,
    pub event_id: Uuid,

    #[schema(example = "Carla Dias")]
    pub name: String,

    #[schema(example = "carla@example.com")]
    pub email: String,

    pub relation: GuestRelation,
    pub status: GuestStatus,

    // Secret part of the RSVP links; never echoed back to the API.
    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub rsvp_token: Uuid,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct InviteGuestPayload {
    #[validate(length(min = 1, message = "The name is required."))]
    pub name: String,

    #[validate(email(message = "The e-mail is invalid."))]
    pub email: String,

    pub relation: GuestRelation,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateGuestPayload {
    #[validate(length(min = 1, message = "The name cannot be empty."))]
    pub name: Option<String>,

    pub relation: Option<GuestRelation>,
}

// Answer to a public RSVP link
#[derive(Debug, Serialize, ToSchema)]
pub struct RsvpResponse {
    pub event: String,
    pub guest: String,
    pub status: GuestStatus,
}
