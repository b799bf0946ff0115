//! Statement endpoints. The route picks the operation; the body only carries
//! amount and description.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use finapi_core::{StatementId, UserId};
use finapi_statements::{CreateStatement, StatementOperation};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::UserContext;

pub fn router() -> Router {
    Router::new()
        .route("/deposit", post(deposit))
        .route("/withdraw", post(withdraw))
        .route("/transfers/:user_id", post(transfer))
        .route("/balance", get(balance))
        .route("/:statement_id", get(get_statement))
}

pub async fn deposit(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    body: Result<Json<dto::StatementRequest>, JsonRejection>,
) -> axum::response::Response {
    let operation = StatementOperation::Deposit { user_id: user.user_id() };
    create(services, operation, body).await
}

pub async fn withdraw(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    body: Result<Json<dto::StatementRequest>, JsonRejection>,
) -> axum::response::Response {
    let operation = StatementOperation::Withdraw { user_id: user.user_id() };
    create(services, operation, body).await
}

pub async fn transfer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Path(receiver): Path<String>,
    body: Result<Json<dto::StatementRequest>, JsonRejection>,
) -> axum::response::Response {
    let receiver_id = match receiver.parse::<UserId>() {
        Ok(id) => id,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let operation = StatementOperation::Transfer {
        sender_id: user.user_id(),
        receiver_id,
    };
    create(services, operation, body).await
}

async fn create(
    services: Arc<AppServices>,
    operation: StatementOperation,
    body: Result<Json<dto::StatementRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => return errors::rejection_to_response(rejection),
    };
    let amount = match body.amount() {
        Ok(amount) => amount,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let cmd = CreateStatement {
        operation,
        amount,
        description: body.description,
    };

    match services.create_statement.create_statement(cmd, Utc::now()).await {
        Ok(statement) => (StatusCode::CREATED, Json(statement)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn balance(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
) -> axum::response::Response {
    match services.balance.compute_balance(user.user_id()).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_statement(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<UserContext>,
    Path(statement_id): Path<String>,
) -> axum::response::Response {
    let statement_id = match statement_id.parse::<StatementId>() {
        Ok(id) => id,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services
        .statement_lookup
        .get_statement(user.user_id(), statement_id)
        .await
    {
        Ok(statement) => (StatusCode::OK, Json(statement)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
