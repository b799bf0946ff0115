//! Application services.
//!
//! Each service takes its stores through its constructor as
//! `Arc<dyn UserStore>` / `Arc<dyn StatementStore>` and contains no transport
//! logic. Failures are reported as [`ServiceError`], which the HTTP layer maps
//! to status codes in one place.

pub mod statements;
pub mod users;

pub use statements::{BalanceCalculator, CreateStatementService, StatementLookupService};
pub use users::{AuthenticationService, ProfileService, RegistrationService, Session};

use thiserror::Error;

use finapi_core::DomainError;

use crate::store::StoreError;

pub const USER_NOT_FOUND: &str = "User not found";
pub const SENDER_NOT_FOUND: &str = "Sender not found";
pub const STATEMENT_NOT_FOUND: &str = "Statement not found";
pub const USER_ALREADY_EXISTS: &str = "User already exists";
pub const INCORRECT_CREDENTIALS: &str = "Incorrect email or password";
pub const BALANCE_LIMIT_EXCEEDED: &str = "Amount would exceed the maximum account balance";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    /// Credentials did not match. Never says which half was wrong.
    #[error("Incorrect email or password")]
    Unauthorized,

    #[error("Insufficient funds")]
    InsufficientFunds,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Hashing, token signing or a blocking task failed.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<DomainError> for ServiceError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => ServiceError::Validation(msg),
            // Stored data broke a domain rule (e.g. a balance out of range).
            DomainError::InvariantViolation(msg) => ServiceError::Internal(msg),
        }
    }
}
