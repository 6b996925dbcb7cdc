// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail already exists")]
    EmailAlreadyExists,

    #[error("An event titled '{0}' already exists")]
    EventTitleTaken(String),

    #[error("A role named '{0}' already exists")]
    RoleNameTaken(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("User not found")]
    UserNotFound,

    // Authorization deny surfaced as 403
    #[error("Forbidden: {0}")]
    Forbidden(String),

    // Unknown id, or a resource outside the path scope it was addressed through
    #[error("{0} not found")]
    ResourceNotFound(&'static str),

    #[error("This invitation is no longer open")]
    InvitationClosed,

    #[error("The sum of installments exceeds the value hired")]
    InstallmentsExceedValue,

    // Programmer error: abilities come from the catalog, never from user input
    #[error("Unknown ability '{0}'")]
    UnknownAbility(String),

    // Deploy/data inconsistency: an account references a plan the catalog lacks
    #[error("Plan {0} configuration not found")]
    PlanNotConfigured(String),

    #[error("Database error")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal server error")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Bcrypt error: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    /// Builds a single-field validation error, keeping the `details` response shape.
    pub fn field(field: &'static str, code: &'static str, message: &str) -> Self {
        let mut errors = validator::ValidationErrors::new();
        let mut err = validator::ValidationError::new(code);
        err.message = Some(message.to_string().into());
        errors.add(field, err);
        AppError::ValidationError(errors)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::EmailAlreadyExists
            | AppError::EventTitleTaken(_)
            | AppError::RoleNameTaken(_) => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::UserNotFound
            | AppError::ResourceNotFound(_)
            | AppError::InvitationClosed => StatusCode::NOT_FOUND,
            AppError::InstallmentsExceedValue => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                json!({
                    "error": "One or more fields are invalid.",
                    "details": details,
                })
            }
            ref e if status == StatusCode::INTERNAL_SERVER_ERROR => {
                // The detailed message only goes to the log.
                tracing::error!("Internal server error: {:?}", e);
                json!({ "error": "An unexpected error occurred." })
            }
            e => json!({ "error": e.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorization_failures_map_to_403_and_404() {
        assert_eq!(AppError::Forbidden("no".into()).status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::ResourceNotFound("Event").status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn misconfiguration_is_a_server_error() {
        assert_eq!(
            AppError::PlanNotConfigured("gold".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::UnknownAbility("fly".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn field_error_carries_message() {
        let AppError::ValidationError(errors) = AppError::field("name", "required", "Name is required.") else {
            panic!("expected a validation error");
        };
        let field_errors = errors.field_errors();
        let name = field_errors.get("name").expect("name errors");
        assert_eq!(name[0].message.as_deref(), Some("Name is required."));
    }
}
