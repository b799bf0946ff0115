//! Postgres-backed stores.
//!
//! Schema lives in `crates/infra/migrations` and is applied by
//! [`crate::db::migrate`] before the stores are used.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `Duplicate` |
//! | Database (other) | any | `Backend` |
//! | Decode / ColumnDecode | N/A | `Corrupt` |
//! | Other | N/A | `Backend` |
//!
//! The `statements.type` column is a Postgres enum; it is written with an
//! explicit `::statement_type` cast and read back as text so the domain crate
//! stays free of sqlx derives.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use tracing::instrument;
use uuid::Uuid;

use finapi_auth::{NewUser, User};
use finapi_core::{Amount, StatementId, UserId};
use finapi_statements::{NewStatement, Statement, StatementType};

use super::r#trait::{StatementStore, StoreError, UserStore};

#[derive(Debug, Clone)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: UserId::from_uuid(row.id),
            name: row.name,
            email: row.email,
            password_hash: row.password,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    #[instrument(skip(self, user), fields(user_id = %user.id), err)]
    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, password, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_user", e))?;

        Ok(user.into_user())
    }

    #[instrument(skip(self), fields(user_id = %id), err)]
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_user_by_id", e))?;

        Ok(row.map(User::from))
    }

    #[instrument(skip(self, email), err)]
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, name, email, password, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_user_by_email", e))?;

        Ok(row.map(User::from))
    }
}

#[derive(Debug, Clone)]
pub struct PostgresStatementStore {
    pool: PgPool,
}

impl PostgresStatementStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct StatementRow {
    id: Uuid,
    user_id: Uuid,
    sender_id: Option<Uuid>,
    #[sqlx(rename = "type")]
    kind: String,
    amount: Decimal,
    description: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<StatementRow> for Statement {
    type Error = StoreError;

    fn try_from(row: StatementRow) -> Result<Self, Self::Error> {
        let kind: StatementType = row
            .kind
            .parse()
            .map_err(|e| StoreError::Corrupt(format!("statement {}: {e}", row.id)))?;
        let amount = Amount::new(row.amount)
            .map_err(|e| StoreError::Corrupt(format!("statement {}: {e}", row.id)))?;

        Ok(Statement {
            id: StatementId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            sender_id: row.sender_id.map(UserId::from_uuid),
            kind,
            amount,
            description: row.description,
            created_at: row.created_at,
        })
    }
}

const STATEMENT_COLUMNS: &str =
    "id, user_id, sender_id, type::text AS type, amount, description, created_at";

#[async_trait]
impl StatementStore for PostgresStatementStore {
    #[instrument(
        skip(self, statement),
        fields(statement_id = %statement.id, user_id = %statement.user_id, kind = %statement.kind),
        err
    )]
    async fn create(&self, statement: NewStatement) -> Result<Statement, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO statements
                (id, user_id, sender_id, type, amount, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4::statement_type, $5, $6, $7, $7)
            "#,
        )
        .bind(statement.id.as_uuid())
        .bind(statement.user_id.as_uuid())
        .bind(statement.sender_id.map(Uuid::from))
        .bind(statement.kind.as_str())
        .bind(statement.amount.value())
        .bind(&statement.description)
        .bind(statement.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("create_statement", e))?;

        Ok(statement.into_statement())
    }

    #[instrument(skip(self), fields(user_id = %user_id), err)]
    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Statement>, StoreError> {
        let sql = format!(
            "SELECT {STATEMENT_COLUMNS} FROM statements \
             WHERE user_id = $1 OR sender_id = $1 \
             ORDER BY created_at ASC, id ASC"
        );
        let rows = sqlx::query_as::<_, StatementRow>(&sql)
            .bind(user_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_statements_by_user", e))?;

        tracing::debug!(count = rows.len(), "loaded statements");
        rows.into_iter().map(Statement::try_from).collect()
    }

    #[instrument(skip(self), fields(statement_id = %id, user_id = %user_id), err)]
    async fn find_by_id_and_user(
        &self,
        id: StatementId,
        user_id: UserId,
    ) -> Result<Option<Statement>, StoreError> {
        let sql = format!("SELECT {STATEMENT_COLUMNS} FROM statements WHERE id = $1 AND user_id = $2");
        let row = sqlx::query_as::<_, StatementRow>(&sql)
            .bind(id.as_uuid())
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_statement_by_id_and_user", e))?;

        row.map(Statement::try_from).transpose()
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") => StoreError::Duplicate(msg),
                _ => StoreError::Backend(msg),
            }
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            StoreError::Corrupt(format!("decode failure in {}: {}", operation, err))
        }
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}
