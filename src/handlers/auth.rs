// src/handlers/auth.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{AuthResponse, JoinTeamPayload, LoginUserPayload, PendingMember, RegisterUserPayload, User},
};

// POST /api/auth/register
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterUserPayload,
    responses(
        (status = 201, description = "Captain account created", body = AuthResponse),
        (status = 400, description = "Invalid fields"),
        (status = 409, description = "E-mail already in use")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let token = app_state
        .auth_service
        .register_captain(payload.name.trim(), payload.email.trim(), &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(AuthResponse { token })))
}

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 400, description = "E-mail not verified"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginUserPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;

    let token = app_state
        .auth_service
        .login_user(payload.email.trim(), &payload.password)
        .await?;

    Ok(Json(AuthResponse { token }))
}

// GET /api/users/me
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses((status = 200, description = "The signed-in account", body = User)),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}

// GET /api/members/join/{token}
#[utoipa::path(
    get,
    path = "/api/members/join/{token}",
    tag = "Members",
    params(("token" = Uuid, Path, description = "Invitation token")),
    responses(
        (status = 200, description = "Pending invitation", body = PendingMember),
        (status = 404, description = "Invitation already used or unknown")
    )
)]
pub async fn join_info(
    State(app_state): State<AppState>,
    Path(token): Path<Uuid>,
) -> Result<Json<PendingMember>, AppError> {
    let pending = app_state.auth_service.pending_invitation(token).await?;
    Ok(Json(pending))
}

// POST /api/members/join/{token}
#[utoipa::path(
    post,
    path = "/api/members/join/{token}",
    tag = "Members",
    params(("token" = Uuid, Path, description = "Invitation token")),
    request_body = JoinTeamPayload,
    responses(
        (status = 200, description = "Invitation accepted, signed in", body = AuthResponse),
        (status = 404, description = "Invitation already used or unknown")
    )
)]
pub async fn join(
    State(app_state): State<AppState>,
    Path(token): Path<Uuid>,
    Json(payload): Json<JoinTeamPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;

    let token = app_state
        .auth_service
        .join_team(token, payload.name.trim(), &payload.password)
        .await?;

    Ok(Json(AuthResponse { token }))
}
