// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    authz::Permission,
    common::error::AppError,
    db::{RbacRepository, UserRepository},
    models::auth::{Claims, PendingMember, User},
};

/// Name of the all-permissions role every captain gets at signup.
pub const OWNER_ROLE: &str = "Owner";

pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Password hashing task failed: {}", e))??;
    Ok(hashed)
}

pub fn owner_permissions() -> Vec<String> {
    Permission::ALL.iter().map(|p| p.as_str().to_string()).collect()
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    rbac_repo: RbacRepository,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        rbac_repo: RbacRepository,
        jwt_secret: String,
        pool: PgPool,
    ) -> Self {
        Self { user_repo, rbac_repo, jwt_secret, pool }
    }

    /// Captain signup: account, Owner role and role assignment in one transaction.
    pub async fn register_captain(&self, name: &str, email: &str, password: &str) -> Result<String, AppError> {
        // 1. Hash outside the transaction
        let password_hash = hash_password(password).await?;

        // 2. Account
        let mut tx = self.pool.begin().await?;
        let captain = self
            .user_repo
            .create_captain(&mut *tx, name, email, &password_hash)
            .await?;

        // 3. Owner role with the whole catalog
        let owner_role = self
            .rbac_repo
            .create_role(&mut *tx, captain.id, OWNER_ROLE, &owner_permissions())
            .await?;

        // 4. The captain acts through that role like anyone else
        self.user_repo
            .assign_role(&mut *tx, captain.id, owner_role.id)
            .await?;

        tx.commit().await?;

        tracing::info!(user_id = %captain.id, "captain registered");
        self.create_token(captain.id)
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        // Pending members have no password yet
        let Some(password_hash) = user.password_hash.clone() else {
            return Err(AppError::InvalidCredentials);
        };

        let password = password.to_owned();
        let is_password_valid = tokio::task::spawn_blocking(move || verify(&password, &password_hash))
            .await
            .map_err(|e| anyhow::anyhow!("Password verification task failed: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        if !user.is_verified() {
            return Err(AppError::field("email", "unverified", "Your email is not verified"));
        }

        self.create_token(user.id)
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    // ---
    // Member join links
    // ---

    pub async fn pending_invitation(&self, token: Uuid) -> Result<PendingMember, AppError> {
        let member = self
            .user_repo
            .find_by_invitation_token(token)
            .await?
            .ok_or(AppError::InvitationClosed)?;

        Ok(PendingMember { id: member.id, name: member.name, email: member.email })
    }

    /// Completes a pending invitation and signs the member in.
    pub async fn join_team(&self, token: Uuid, name: &str, password: &str) -> Result<String, AppError> {
        let member = self
            .user_repo
            .find_by_invitation_token(token)
            .await?
            .ok_or(AppError::InvitationClosed)?;

        let password_hash = hash_password(password).await?;

        let member = self
            .user_repo
            .complete_invitation(member.id, name, &password_hash)
            .await?
            .ok_or(AppError::InvitationClosed)?;

        tracing::info!(user_id = %member.id, captain_id = ?member.captain_id, "member joined");
        self.create_token(member.id)
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authz::RoleDraft;

    #[test]
    fn owner_role_covers_the_whole_catalog() {
        let draft = RoleDraft::new(OWNER_ROLE, &owner_permissions()).unwrap();
        assert_eq!(draft.permissions.len(), Permission::ALL.len());
        for ability in Permission::ALL {
            assert!(draft.permissions.iter().any(|p| p == ability.as_str()), "{ability} missing");
        }
    }
}
