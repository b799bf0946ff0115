//! Balance derivation.
//!
//! Balances are never stored. They are folded from every statement a user
//! takes part in, reading the direction of each movement from the user's
//! point of view.

use rust_decimal::Decimal;
use serde::Serialize;

use finapi_core::{Amount, DomainError, DomainResult, UserId};

use crate::statement::{Statement, StatementType};

/// Signed effect of one statement on `user_id`'s balance.
///
/// - deposit owned by the user: `+amount`
/// - withdraw owned by the user: `-amount`
/// - transfer received (`user_id` matches): `+amount`
/// - transfer sent (`sender_id` matches): `-amount`
/// - anything else: zero
pub fn contribution(statement: &Statement, user_id: UserId) -> Decimal {
    let amount = statement.amount.value();
    match statement.kind {
        StatementType::Deposit if statement.user_id == user_id => amount,
        StatementType::Withdraw if statement.user_id == user_id => -amount,
        StatementType::Transfer => {
            let mut net = Decimal::ZERO;
            if statement.user_id == user_id {
                net += amount;
            }
            if statement.sender_id == Some(user_id) {
                net -= amount;
            }
            net
        }
        _ => Decimal::ZERO,
    }
}

/// Sum of every statement's contribution. Order does not matter.
///
/// Fails instead of overflowing when the running total leaves the range of
/// [`Decimal`].
pub fn fold_balance<'a, I>(user_id: UserId, statements: I) -> DomainResult<Decimal>
where
    I: IntoIterator<Item = &'a Statement>,
{
    statements
        .into_iter()
        .try_fold(Decimal::ZERO, |total, s| {
            total.checked_add(contribution(s, user_id)).ok_or_else(|| {
                DomainError::invariant(format!("balance of user {user_id} overflows at statement {}", s.id))
            })
        })
}

/// Balance report: the folded balance plus the statements it was folded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Balance {
    pub statement: Vec<Statement>,
    #[serde(with = "rust_decimal::serde::float")]
    pub balance: Decimal,
}

impl Balance {
    pub fn from_statements(user_id: UserId, statements: Vec<Statement>) -> DomainResult<Self> {
        let balance = fold_balance(user_id, &statements)?;
        Ok(Self {
            statement: statements,
            balance,
        })
    }

    /// Whether the balance can pay `amount` (balance >= amount).
    pub fn covers(&self, amount: Amount) -> bool {
        self.balance >= amount.value()
    }

    /// Whether crediting `amount` keeps the balance representable.
    pub fn can_receive(&self, amount: Amount) -> bool {
        self.balance.checked_add(amount.value()).is_some()
    }
}
