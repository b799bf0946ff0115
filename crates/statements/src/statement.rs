use core::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use finapi_core::{Amount, DomainError, DomainResult, Entity, StatementId, UserId};

/// Kind of movement a statement records.
///
/// The transfer variant is persisted and serialized as `"transfers"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementType {
    Deposit,
    Withdraw,
    #[serde(rename = "transfers")]
    Transfer,
}

impl StatementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementType::Deposit => "deposit",
            StatementType::Withdraw => "withdraw",
            StatementType::Transfer => "transfers",
        }
    }
}

impl core::fmt::Display for StatementType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatementType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(StatementType::Deposit),
            "withdraw" => Ok(StatementType::Withdraw),
            "transfers" => Ok(StatementType::Transfer),
            other => Err(DomainError::validation(format!("unknown statement type '{other}'"))),
        }
    }
}

/// One immutable ledger entry.
///
/// A transfer is a single row: `user_id` is the receiver (credited) and
/// `sender_id` the payer (debited). No mirrored debit row exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub id: StatementId,
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_id: Option<UserId>,
    #[serde(rename = "type")]
    pub kind: StatementType,
    pub amount: Amount,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl Entity for Statement {
    type Id = StatementId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Which movement is requested, and between whom.
///
/// Chosen by the route that received the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementOperation {
    Deposit { user_id: UserId },
    Withdraw { user_id: UserId },
    Transfer { sender_id: UserId, receiver_id: UserId },
}

impl StatementOperation {
    pub fn kind(&self) -> StatementType {
        match self {
            StatementOperation::Deposit { .. } => StatementType::Deposit,
            StatementOperation::Withdraw { .. } => StatementType::Withdraw,
            StatementOperation::Transfer { .. } => StatementType::Transfer,
        }
    }

    /// Owner of the resulting statement (the receiver for transfers).
    pub fn owner(&self) -> UserId {
        match *self {
            StatementOperation::Deposit { user_id } | StatementOperation::Withdraw { user_id } => user_id,
            StatementOperation::Transfer { receiver_id, .. } => receiver_id,
        }
    }

    pub fn sender(&self) -> Option<UserId> {
        match *self {
            StatementOperation::Transfer { sender_id, .. } => Some(sender_id),
            _ => None,
        }
    }

    /// The party whose balance must cover the amount, if any.
    pub fn payer(&self) -> Option<UserId> {
        match *self {
            StatementOperation::Deposit { .. } => None,
            StatementOperation::Withdraw { user_id } => Some(user_id),
            StatementOperation::Transfer { sender_id, .. } => Some(sender_id),
        }
    }
}

/// Command: create one statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateStatement {
    pub operation: StatementOperation,
    pub amount: Amount,
    pub description: String,
}

/// A validated statement ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStatement {
    pub id: StatementId,
    pub user_id: UserId,
    pub sender_id: Option<UserId>,
    pub kind: StatementType,
    pub amount: Amount,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl NewStatement {
    pub fn from_command(cmd: &CreateStatement, created_at: DateTime<Utc>) -> DomainResult<Self> {
        if let StatementOperation::Transfer { sender_id, receiver_id } = cmd.operation {
            if sender_id == receiver_id {
                return Err(DomainError::validation("cannot transfer to the same account"));
            }
        }

        Ok(Self {
            id: StatementId::new(),
            user_id: cmd.operation.owner(),
            sender_id: cmd.operation.sender(),
            kind: cmd.operation.kind(),
            amount: cmd.amount,
            description: cmd.description.clone(),
            created_at,
        })
    }

    pub fn into_statement(self) -> Statement {
        Statement {
            id: self.id,
            user_id: self.user_id,
            sender_id: self.sender_id,
            kind: self.kind,
            amount: self.amount,
            description: self.description,
            created_at: self.created_at,
        }
    }
}
