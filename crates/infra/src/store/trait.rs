use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use finapi_auth::{NewUser, User};
use finapi_core::{StatementId, UserId};
use finapi_statements::{NewStatement, Statement};

/// Store operation error.
///
/// Infrastructure failures only. "Not found" is not an error at this layer:
/// lookups return `Option` and the services decide what absence means.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write (e.g. email already taken).
    #[error("duplicate record: {0}")]
    Duplicate(String),

    /// A stored row could not be mapped back into a domain value.
    #[error("corrupt record: {0}")]
    Corrupt(String),

    /// The backend failed (connection, query, lock poisoning).
    #[error("store backend failure: {0}")]
    Backend(String),
}

/// User records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new user. Fails with `Duplicate` when the email is taken.
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Lookup by already-normalized email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}

/// Append-only statement records.
#[async_trait]
pub trait StatementStore: Send + Sync {
    /// Persist exactly one statement.
    async fn create(&self, statement: NewStatement) -> Result<Statement, StoreError>;

    /// Every statement `user_id` takes part in, as owner or as transfer
    /// sender, in creation order.
    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Statement>, StoreError>;

    /// A statement by id, only if it is owned by `user_id`.
    async fn find_by_id_and_user(
        &self,
        id: StatementId,
        user_id: UserId,
    ) -> Result<Option<Statement>, StoreError>;
}

#[async_trait]
impl<S> UserStore for Arc<S>
where
    S: UserStore + ?Sized,
{
    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        (**self).create(user).await
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        (**self).find_by_id(id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        (**self).find_by_email(email).await
    }
}

#[async_trait]
impl<S> StatementStore for Arc<S>
where
    S: StatementStore + ?Sized,
{
    async fn create(&self, statement: NewStatement) -> Result<Statement, StoreError> {
        (**self).create(statement).await
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Statement>, StoreError> {
        (**self).find_by_user(user_id).await
    }

    async fn find_by_id_and_user(
        &self,
        id: StatementId,
        user_id: UserId,
    ) -> Result<Option<Statement>, StoreError> {
        (**self).find_by_id_and_user(id, user_id).await
    }
}
