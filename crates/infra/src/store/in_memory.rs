use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use finapi_auth::{NewUser, User};
use finapi_core::{StatementId, UserId};
use finapi_statements::{NewStatement, Statement};

use super::r#trait::{StatementStore, StoreError, UserStore};

fn poisoned() -> StoreError {
    StoreError::Backend("lock poisoned".to_string())
}

/// In-memory user store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write().map_err(|_| poisoned())?;

        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate(format!("email '{}'", user.email)));
        }

        let user = user.into_user();
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let users = self.users.read().map_err(|_| poisoned())?;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let users = self.users.read().map_err(|_| poisoned())?;
        Ok(users.values().find(|u| u.email == email).cloned())
    }
}

/// In-memory append-only statement store for tests/dev.
///
/// Keeps insertion order, which is creation order.
#[derive(Debug, Default)]
pub struct InMemoryStatementStore {
    statements: RwLock<Vec<Statement>>,
}

impl InMemoryStatementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.statements.read().map_err(|_| poisoned())?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl StatementStore for InMemoryStatementStore {
    async fn create(&self, statement: NewStatement) -> Result<Statement, StoreError> {
        let mut statements = self.statements.write().map_err(|_| poisoned())?;

        if statements.iter().any(|s| s.id == statement.id) {
            return Err(StoreError::Duplicate(format!("statement {}", statement.id)));
        }

        let statement = statement.into_statement();
        statements.push(statement.clone());
        Ok(statement)
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Statement>, StoreError> {
        let statements = self.statements.read().map_err(|_| poisoned())?;
        Ok(statements
            .iter()
            .filter(|s| s.user_id == user_id || s.sender_id == Some(user_id))
            .cloned()
            .collect())
    }

    async fn find_by_id_and_user(
        &self,
        id: StatementId,
        user_id: UserId,
    ) -> Result<Option<Statement>, StoreError> {
        let statements = self.statements.read().map_err(|_| poisoned())?;
        Ok(statements
            .iter()
            .find(|s| s.id == id && s.user_id == user_id)
            .cloned())
    }
}
