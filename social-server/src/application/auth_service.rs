use std::sync::Arc;

use tracing::instrument;

use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::user::{NewUser, User, UserCredentials};
use crate::infrastructure::security::{JwtKeys, hash_password, verify_password};

/// A freshly issued session.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Minimal session provider: creates accounts and issues signed session tokens.
#[derive(Clone)]
pub struct AuthService {
    repo: Arc<dyn UserRepository>,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(repo: Arc<dyn UserRepository>, keys: JwtKeys) -> Self {
        Self { repo, keys }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    #[instrument(skip(self, password))]
    pub async fn sign_up(
        &self,
        name: String,
        email: String,
        username: Option<String>,
        password: String,
    ) -> Result<Session, DomainError> {
        if name.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(DomainError::InvalidInput(
                "name, email and password are required".to_string(),
            ));
        }
        let hash =
            hash_password(&password).map_err(|err| DomainError::Internal(err.to_string()))?;
        let user = self
            .repo
            .create(NewUser {
                name,
                email: email.trim().to_lowercase(),
                username: username.map(|u| u.trim().to_lowercase()).filter(|u| !u.is_empty()),
                password_hash: hash,
            })
            .await?;
        let token = self.issue(user.id, user.username.clone())?;
        Ok(Session { token, user })
    }

    #[instrument(skip(self, password))]
    pub async fn sign_in_email(&self, email: &str, password: &str) -> Result<Session, DomainError> {
        let credentials = self
            .repo
            .find_credentials_by_email(&email.trim().to_lowercase())
            .await?;
        self.sign_in(credentials, password).await
    }

    #[instrument(skip(self, password))]
    pub async fn sign_in_username(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Session, DomainError> {
        let credentials = self
            .repo
            .find_credentials_by_username(&username.trim().to_lowercase())
            .await?;
        self.sign_in(credentials, password).await
    }

    async fn sign_in(
        &self,
        credentials: Option<UserCredentials>,
        password: &str,
    ) -> Result<Session, DomainError> {
        let credentials = credentials.ok_or(DomainError::InvalidCredentials)?;
        let valid = verify_password(password, &credentials.password_hash)
            .map_err(|_| DomainError::InvalidCredentials)?;
        if !valid {
            return Err(DomainError::InvalidCredentials);
        }

        let user = self
            .repo
            .find_by_id(credentials.id)
            .await?
            .ok_or(DomainError::InvalidCredentials)?;
        let token = self.issue(user.id, credentials.username)?;
        Ok(Session { token, user })
    }

    fn issue(&self, user_id: uuid::Uuid, username: Option<String>) -> Result<String, DomainError> {
        self.keys
            .generate_token(user_id, username)
            .map_err(|err| DomainError::Internal(err.to_string()))
    }
}
