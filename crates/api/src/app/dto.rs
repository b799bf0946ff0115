//! Request bodies. Responses serialize the domain types directly.

use rust_decimal::Decimal;
use serde::Deserialize;

use finapi_core::{Amount, DomainResult};
use finapi_infra::services::users::CreateUser;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl From<CreateUserRequest> for CreateUser {
    fn from(body: CreateUserRequest) -> Self {
        CreateUser {
            name: body.name,
            email: body.email,
            password: body.password,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub email: String,
    pub password: String,
}

/// Body shared by deposit, withdraw and transfer.
///
/// `amount` is taken as a raw decimal so a non-positive value surfaces as a
/// validation error rather than a body rejection.
#[derive(Debug, Deserialize)]
pub struct StatementRequest {
    pub amount: Decimal,
    #[serde(default)]
    pub description: String,
}

impl StatementRequest {
    pub fn amount(&self) -> DomainResult<Amount> {
        Amount::new(self.amount)
    }
}
