//! Registration, authentication and profile lookups.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use finapi_auth::{JwtIssuer, NewUser, PasswordHasher, User, UserProfile, normalize_email};
use finapi_core::UserId;

use super::{ServiceError, USER_ALREADY_EXISTS, USER_NOT_FOUND};
use crate::store::{StoreError, UserStore};

/// Registration input.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub struct RegistrationService {
    users: Arc<dyn UserStore>,
    hasher: Arc<dyn PasswordHasher>,
}

impl RegistrationService {
    pub fn new(users: Arc<dyn UserStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    /// Register a user, storing only the password hash.
    pub async fn create_user(&self, input: CreateUser, now: DateTime<Utc>) -> Result<User, ServiceError> {
        if input.password.is_empty() {
            return Err(ServiceError::Validation("password cannot be empty".to_string()));
        }

        let email = normalize_email(&input.email);
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(ServiceError::Conflict(USER_ALREADY_EXISTS.to_string()));
        }

        let hasher = Arc::clone(&self.hasher);
        let password = input.password;
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        let new_user = NewUser::new(&input.name, &email, password_hash, now)?;
        let user = self.users.create(new_user).await.map_err(|e| match e {
            // Lost a race with a concurrent registration.
            StoreError::Duplicate(_) => ServiceError::Conflict(USER_ALREADY_EXISTS.to_string()),
            other => ServiceError::Store(other),
        })?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }
}

/// A freshly opened session.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

pub struct AuthenticationService {
    users: Arc<dyn UserStore>,
    hasher: Arc<dyn PasswordHasher>,
    issuer: Arc<dyn JwtIssuer>,
}

impl AuthenticationService {
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: Arc<dyn PasswordHasher>,
        issuer: Arc<dyn JwtIssuer>,
    ) -> Self {
        Self { users, hasher, issuer }
    }

    /// Check credentials and issue a token whose subject is the user id.
    ///
    /// Unknown email and wrong password fail identically.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<Session, ServiceError> {
        let Some(user) = self.users.find_by_email(&normalize_email(email)).await? else {
            tracing::debug!("authentication failed: unknown email");
            return Err(ServiceError::Unauthorized);
        };

        let hasher = Arc::clone(&self.hasher);
        let password = password.to_string();
        let stored = user.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored))
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?
            .map_err(|e| {
                tracing::error!(user_id = %user.id, error = %e, "stored password hash unusable");
                ServiceError::Internal(e.to_string())
            })?;

        if !matches {
            tracing::debug!(user_id = %user.id, "authentication failed: wrong password");
            return Err(ServiceError::Unauthorized);
        }

        let token = self
            .issuer
            .issue(user.id, now)
            .map_err(|e| ServiceError::Internal(e.to_string()))?;

        Ok(Session {
            token,
            user: user.profile(),
        })
    }
}

pub struct ProfileService {
    users: Arc<dyn UserStore>,
}

impl ProfileService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    pub async fn show_profile(&self, user_id: UserId) -> Result<UserProfile, ServiceError> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(|u| u.profile())
            .ok_or_else(|| ServiceError::NotFound(USER_NOT_FOUND.to_string()))
    }
}
