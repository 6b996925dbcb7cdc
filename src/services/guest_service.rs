// src/services/guest_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{EventRepository, GuestRepository},
    models::{
        events::Event,
        guests::{Guest, GuestStatus, InviteGuestPayload, RsvpResponse, UpdateGuestPayload},
    },
};

#[derive(Clone)]
pub struct GuestService {
    guest_repo: GuestRepository,
    event_repo: EventRepository,
    app_url: String,
}

impl GuestService {
    pub fn new(guest_repo: GuestRepository, event_repo: EventRepository, app_url: String) -> Self {
        Self { guest_repo, event_repo, app_url }
    }

    pub async fn find_guest(&self, id: Uuid) -> Result<Guest, AppError> {
        self.guest_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::ResourceNotFound("Guest"))
    }

    /// Adds the guest and logs both RSVP links in place of the invitation e-mail.
    pub async fn invite(&self, event: &Event, payload: &InviteGuestPayload) -> Result<Guest, AppError> {
        let guest = self
            .guest_repo
            .create(event.id, payload.name.trim(), payload.email.trim(), payload.relation)
            .await?;

        let base = self.app_url.trim_end_matches('/');
        tracing::info!(
            guest_id = %guest.id,
            event_id = %event.id,
            confirm = %format!("{base}/rsvp/{}/confirm", guest.rsvp_token),
            refuse = %format!("{base}/rsvp/{}/refuse", guest.rsvp_token),
            "guest invited"
        );

        Ok(guest)
    }

    pub async fn update(&self, guest: &Guest, payload: &UpdateGuestPayload) -> Result<Guest, AppError> {
        self.guest_repo
            .update(guest.id, payload.name.as_deref().map(str::trim), payload.relation)
            .await
    }

    pub async fn delete(&self, guest: &Guest) -> Result<(), AppError> {
        self.guest_repo.delete(guest.id).await
    }

    /// Public RSVP answer. Only a pending invitation can be answered; anything
    /// else (unknown token, already answered) is reported as not found.
    pub async fn respond(&self, rsvp_token: Uuid, status: GuestStatus) -> Result<RsvpResponse, AppError> {
        let guest = self
            .guest_repo
            .answer_pending(rsvp_token, status)
            .await?
            .ok_or(AppError::ResourceNotFound("Invitation"))?;

        let event = self
            .event_repo
            .find_by_id(guest.event_id)
            .await?
            .ok_or(AppError::ResourceNotFound("Event"))?;

        tracing::info!(guest_id = %guest.id, event_id = %event.id, ?status, "guest answered");

        Ok(RsvpResponse { event: event.title, guest: guest.name, status: guest.status })
    }
}
