//! Registered user (account holder).

use chrono::{DateTime, Utc};
use serde::Serialize;

use finapi_core::{DomainError, DomainResult, Entity, UserId};

/// A registered user as stored.
///
/// Not `Serialize`: the password hash must never leave the service layer.
/// Use [`User::profile`] for anything that goes over the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            created_at: self.created_at,
        }
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Public projection of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// A validated user record ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl NewUser {
    /// Validate and normalize registration data.
    ///
    /// The email is trimmed and lowercased; lookups must go through
    /// [`normalize_email`] to match.
    pub fn new(
        name: &str,
        email: &str,
        password_hash: String,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }

        let email = normalize_email(email);
        if email.is_empty() || !email.contains('@') {
            return Err(DomainError::validation("invalid email format"));
        }

        if password_hash.is_empty() {
            return Err(DomainError::invariant("password hash cannot be empty"));
        }

        Ok(Self {
            id: UserId::new(),
            name: name.to_string(),
            email,
            password_hash,
            created_at,
        })
    }

    pub fn into_user(self) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            created_at: self.created_at,
        }
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
