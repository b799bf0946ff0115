//! `finapi-core` — domain building blocks shared by every crate.
//!
//! Pure types only: identifiers, the money value object and the domain error
//! model. No IO lives here.

pub mod amount;
pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use amount::Amount;
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{StatementId, UserId};
pub use value_object::ValueObject;
