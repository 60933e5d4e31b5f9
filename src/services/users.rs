use std::sync::Arc;

use chrono::{Duration, Utc};
use rand::RngCore;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::{AuthError, AuthService, TokenResponse};
use crate::entities::user;
use crate::errors::ServiceError;
use crate::notifications::{Mail, Mailer};

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct Credentials {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct NewPassword {
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Public view of an account
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    pub is_admin: bool,
}

impl From<user::Model> for UserProfile {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            is_admin: model.is_admin,
        }
    }
}

/// 32 hex characters from 16 random bytes
fn reset_token() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[derive(Clone)]
pub struct UserService {
    db: Arc<DatabaseConnection>,
    auth: Arc<AuthService>,
    mailer: Arc<dyn Mailer>,
    base_url: String,
    reset_ttl: Duration,
}

impl UserService {
    pub fn new(
        db: Arc<DatabaseConnection>,
        auth: Arc<AuthService>,
        mailer: Arc<dyn Mailer>,
        base_url: impl Into<String>,
        reset_ttl_secs: u64,
    ) -> Self {
        Self {
            db,
            auth,
            mailer,
            base_url: base_url.into(),
            reset_ttl: Duration::seconds(reset_ttl_secs as i64),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>, ServiceError> {
        Ok(user::Entity::find()
            .filter(user::Column::Email.eq(email.trim().to_lowercase()))
            .one(&*self.db)
            .await?)
    }

    /// Creates a regular account. Admins come from the `seed-admin` command.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn signup(&self, credentials: Credentials) -> Result<UserProfile, ServiceError> {
        self.create_account(credentials, false).await
    }

    pub async fn create_account(
        &self,
        credentials: Credentials,
        is_admin: bool,
    ) -> Result<UserProfile, ServiceError> {
        credentials.validate()?;
        if self.find_by_email(&credentials.email).await?.is_some() {
            return Err(ServiceError::Conflict(
                "an account with this email already exists".to_string(),
            ));
        }

        let account = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(credentials.email.trim().to_lowercase()),
            password: Set(hash_password(&credentials.password)?),
            is_admin: Set(is_admin),
            reset_token: Set(None),
            reset_token_expires_at: Set(None),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.db)
        .await?;

        info!(user_id = %account.id, is_admin, "Created account");
        Ok(account.into())
    }

    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn signin(&self, credentials: Credentials) -> Result<TokenResponse, ServiceError> {
        let account = self
            .find_by_email(&credentials.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(&credentials.password, &account.password)? {
            warn!(user_id = %account.id, "Failed sign-in");
            return Err(AuthError::InvalidCredentials.into());
        }

        Ok(self.auth.generate_token(&account)?)
    }

    #[instrument(skip(self))]
    pub async fn me(&self, user_id: Uuid) -> Result<UserProfile, ServiceError> {
        user::Entity::find_by_id(user_id)
            .one(&*self.db)
            .await?
            .map(UserProfile::from)
            .ok_or_else(|| ServiceError::NotFound(format!("User {} not found", user_id)))
    }

    /// Stores a reset token and mails the link. Unknown emails succeed silently.
    #[instrument(skip(self))]
    pub async fn request_password_reset(&self, email: &str) -> Result<(), ServiceError> {
        let Some(account) = self.find_by_email(email).await? else {
            info!("Password reset requested for unknown email");
            return Ok(());
        };

        let token = reset_token();
        let to = account.email.clone();
        let mut active: user::ActiveModel = account.into();
        active.reset_token = Set(Some(token.clone()));
        active.reset_token_expires_at = Set(Some(Utc::now() + self.reset_ttl));
        active.update(&*self.db).await?;

        let link = format!(
            "{}/reset_password/{}",
            self.base_url.trim_end_matches('/'),
            token
        );
        self.mailer
            .send(Mail {
                to,
                subject: "Password reset".to_string(),
                body: format!("Follow this link to choose a new password: {}", link),
            })
            .await?;
        Ok(())
    }

    #[instrument(skip(self, token, new_password))]
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: NewPassword,
    ) -> Result<(), ServiceError> {
        new_password.validate()?;

        let account = user::Entity::find()
            .filter(user::Column::ResetToken.eq(token))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::BadRequest("invalid or expired reset token".to_string()))?;

        let expired = account
            .reset_token_expires_at
            .map_or(true, |expires_at| expires_at < Utc::now());
        if expired {
            return Err(ServiceError::BadRequest(
                "invalid or expired reset token".to_string(),
            ));
        }

        let user_id = account.id;
        let mut active: user::ActiveModel = account.into();
        active.password = Set(hash_password(&new_password.password)?);
        active.reset_token = Set(None);
        active.reset_token_expires_at = Set(None);
        active.update(&*self.db).await?;

        info!(user_id = %user_id, "Password reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthConfig;
    use crate::notifications::{MailError, MockMailer};
    use tempfile::TempDir;

    async fn service_with(dir: &TempDir, mailer: MockMailer) -> UserService {
        let url = format!("sqlite://{}/users.sqlite?mode=rwc", dir.path().display());
        let pool = crate::db::establish_connection(&url).await.unwrap();
        crate::db::run_migrations(&pool).await.unwrap();
        let auth = AuthService::new(AuthConfig::new(
            "unit_test_signing_key_with_enough_entropy".to_string(),
            std::time::Duration::from_secs(600),
        ));
        UserService::new(
            Arc::new(pool),
            Arc::new(auth),
            Arc::new(mailer),
            "https://shop.example/",
            60,
        )
    }

    fn owner() -> Credentials {
        Credentials {
            email: "owner@example.com".to_string(),
            password: "long enough".to_string(),
        }
    }

    #[tokio::test]
    async fn reset_mail_carries_the_link() {
        let dir = TempDir::new().unwrap();
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .withf(|mail| {
                mail.to == "owner@example.com"
                    && mail.body.contains("https://shop.example/reset_password/")
            })
            .times(1)
            .returning(|_| Ok(()));
        let users = service_with(&dir, mailer).await;

        users.signup(owner()).await.unwrap();
        users.request_password_reset("OWNER@example.com").await.unwrap();
    }

    #[tokio::test]
    async fn failed_delivery_surfaces_as_notification_error() {
        let dir = TempDir::new().unwrap();
        let mut mailer = MockMailer::new();
        mailer
            .expect_send()
            .returning(|_| Err(MailError::Delivery("smtp down".to_string())));
        let users = service_with(&dir, mailer).await;

        users.signup(owner()).await.unwrap();
        let err = users
            .request_password_reset("owner@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotificationError(_)));
    }

    #[tokio::test]
    async fn unknown_email_sends_nothing() {
        let dir = TempDir::new().unwrap();
        let mut mailer = MockMailer::new();
        mailer.expect_send().times(0);
        let users = service_with(&dir, mailer).await;

        users.request_password_reset("ghost@example.com").await.unwrap();
    }

    #[test]
    fn reset_tokens_are_32_hex_chars() {
        let token = reset_token();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, reset_token());
    }

    #[test]
    fn credentials_validate_email_and_length() {
        let ok = Credentials {
            email: "owner@example.com".to_string(),
            password: "long enough".to_string(),
        };
        assert!(ok.validate().is_ok());

        let short = Credentials {
            password: "short".to_string(),
            ..ok.clone()
        };
        assert!(short.validate().is_err());

        let bad_email = Credentials {
            email: "owner".to_string(),
            ..ok
        };
        assert!(bad_email.validate().is_err());
    }
}
