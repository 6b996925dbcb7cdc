// src/models/events.rs

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::auth::User;
use crate::models::guests::Guest;
use crate::models::suppliers::EventCategoryDetail;

fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("The value cannot be negative.".into());
        return Err(err);
    }
    Ok(())
}

pub(crate) fn validate_positive(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.message = Some("The value must be greater than zero.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Event
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,

    // Always a captain: members create events on their captain's behalf.
    pub owner_id: Uuid,

    #[schema(example = "Ana & Leo wedding")]
    pub title: String,

    pub attending_date: DateTime<Utc>,

    #[schema(example = 35000.0)]
    pub budget: Decimal,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgendaItem {
    pub id: Uuid,
    pub event_id: Uuid,

    #[schema(example = "Cake tasting")]
    pub title: String,

    pub date: NaiveDate,

    #[schema(value_type = String, example = "14:30:00")]
    pub time: NaiveTime,
}

// Everything the event page shows
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventDetail {
    #[serde(flatten)]
    pub event: Event,
    pub assignees: Vec<User>,
    pub categories: Vec<EventCategoryDetail>,
    pub guests: Vec<Guest>,
    pub agenda: Vec<AgendaItem>,
}

// ---
// Payloads
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventPayload {
    #[validate(length(min = 1, message = "The title is required."))]
    pub title: String,

    pub attending_date: DateTime<Utc>,

    #[validate(custom(function = "validate_not_negative"))]
    pub budget: Decimal,

    // Members to assign right away
    #[serde(default)]
    pub assignees: Vec<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventPayload {
    #[validate(length(min = 1, message = "The title is required."))]
    pub title: String,

    pub attending_date: DateTime<Utc>,

    #[validate(custom(function = "validate_not_negative"))]
    pub budget: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SaveAgendaPayload {
    #[validate(length(min = 1, message = "The title is required."))]
    pub title: String,

    pub date: NaiveDate,

    #[schema(value_type = String, example = "14:30")]
    #[serde(with = "hour_minute")]
    pub time: NaiveTime,
}

// Agenda times travel as "HH:MM"
mod hour_minute {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer};

    const FORMAT: &str = "%H:%M";

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
