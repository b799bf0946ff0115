//! Persistence boundary for users and statements.
//!
//! Services only see the traits; the in-memory stores back tests and local
//! runs, the Postgres stores back deployments.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::{InMemoryStatementStore, InMemoryUserStore};
pub use postgres::{PostgresStatementStore, PostgresUserStore};
pub use r#trait::{StatementStore, StoreError, UserStore};
