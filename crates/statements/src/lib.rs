//! Statements module (single-entry ledger of deposits, withdrawals and
//! transfers).
//!
//! Pure domain logic only: no IO, no HTTP, no persistence concerns.

pub mod balance;
pub mod statement;

pub use balance::{Balance, contribution, fold_balance};
pub use statement::{CreateStatement, NewStatement, Statement, StatementOperation, StatementType};
