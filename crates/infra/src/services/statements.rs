//! Balance, statement creation and statement lookup.
//!
//! The creation guard reads the payer's balance and then inserts. Nothing
//! holds a lock or transaction across the two steps, so two concurrent
//! withdrawals can both pass the guard.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use finapi_core::{StatementId, UserId};
use finapi_statements::{Balance, CreateStatement, NewStatement, Statement, StatementOperation};

use super::{BALANCE_LIMIT_EXCEEDED, STATEMENT_NOT_FOUND, SENDER_NOT_FOUND, ServiceError, USER_NOT_FOUND};
use crate::store::{StatementStore, UserStore};

async fn ensure_user(users: &dyn UserStore, user_id: UserId, message: &str) -> Result<(), ServiceError> {
    match users.find_by_id(user_id).await? {
        Some(_) => Ok(()),
        None => Err(ServiceError::NotFound(message.to_string())),
    }
}

pub struct BalanceCalculator {
    users: Arc<dyn UserStore>,
    statements: Arc<dyn StatementStore>,
}

impl BalanceCalculator {
    pub fn new(users: Arc<dyn UserStore>, statements: Arc<dyn StatementStore>) -> Self {
        Self { users, statements }
    }

    /// Every statement the user takes part in, plus the balance they fold to.
    pub async fn compute_balance(&self, user_id: UserId) -> Result<Balance, ServiceError> {
        ensure_user(self.users.as_ref(), user_id, USER_NOT_FOUND).await?;
        self.balance_of(user_id).await
    }

    async fn balance_of(&self, user_id: UserId) -> Result<Balance, ServiceError> {
        let statements = self.statements.find_by_user(user_id).await?;
        Ok(Balance::from_statements(user_id, statements)?)
    }
}

pub struct CreateStatementService {
    users: Arc<dyn UserStore>,
    statements: Arc<dyn StatementStore>,
    balances: BalanceCalculator,
}

impl CreateStatementService {
    pub fn new(users: Arc<dyn UserStore>, statements: Arc<dyn StatementStore>) -> Self {
        let balances = BalanceCalculator::new(Arc::clone(&users), Arc::clone(&statements));
        Self {
            users,
            statements,
            balances,
        }
    }

    /// Validate, guard against overdraft and against a credit the receiving
    /// balance cannot represent, then persist exactly one statement.
    pub async fn create_statement(
        &self,
        cmd: CreateStatement,
        now: DateTime<Utc>,
    ) -> Result<Statement, ServiceError> {
        let new_statement = NewStatement::from_command(&cmd, now)?;

        ensure_user(self.users.as_ref(), cmd.operation.owner(), USER_NOT_FOUND).await?;
        if let StatementOperation::Transfer { sender_id, .. } = cmd.operation {
            ensure_user(self.users.as_ref(), sender_id, SENDER_NOT_FOUND).await?;
        }

        if let Some(payer) = cmd.operation.payer() {
            let balance = self.balances.balance_of(payer).await?;
            if !balance.covers(cmd.amount) {
                tracing::info!(
                    user_id = %payer,
                    kind = %cmd.operation.kind(),
                    balance = %balance.balance,
                    amount = %cmd.amount,
                    "insufficient funds"
                );
                return Err(ServiceError::InsufficientFunds);
            }
        }

        if cmd.operation.payer() != Some(cmd.operation.owner()) {
            let owner = cmd.operation.owner();
            let balance = self.balances.balance_of(owner).await?;
            if !balance.can_receive(cmd.amount) {
                tracing::info!(user_id = %owner, amount = %cmd.amount, "credit would overflow balance");
                return Err(ServiceError::Validation(BALANCE_LIMIT_EXCEEDED.to_string()));
            }
        }

        let statement = self.statements.create(new_statement).await?;
        tracing::info!(
            statement_id = %statement.id,
            user_id = %statement.user_id,
            kind = %statement.kind,
            "statement created"
        );
        Ok(statement)
    }
}

pub struct StatementLookupService {
    users: Arc<dyn UserStore>,
    statements: Arc<dyn StatementStore>,
}

impl StatementLookupService {
    pub fn new(users: Arc<dyn UserStore>, statements: Arc<dyn StatementStore>) -> Self {
        Self { users, statements }
    }

    /// A statement owned by `user_id`. Statements the user only sent are not
    /// visible here.
    pub async fn get_statement(
        &self,
        user_id: UserId,
        statement_id: StatementId,
    ) -> Result<Statement, ServiceError> {
        ensure_user(self.users.as_ref(), user_id, USER_NOT_FOUND).await?;

        self.statements
            .find_by_id_and_user(statement_id, user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(STATEMENT_NOT_FOUND.to_string()))
    }
}
