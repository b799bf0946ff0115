//! Service wiring: picks the store backend and builds every application
//! service on top of it.

use std::sync::Arc;

use anyhow::Context;

use finapi_auth::{Argon2PasswordHasher, Hs256JwtIssuer, Hs256JwtValidator, JwtValidator, PasswordHasher};
use finapi_infra::config::AppConfig;
use finapi_infra::db;
use finapi_infra::services::{
    AuthenticationService, BalanceCalculator, CreateStatementService, ProfileService,
    RegistrationService, StatementLookupService,
};
use finapi_infra::store::{
    InMemoryStatementStore, InMemoryUserStore, PostgresStatementStore, PostgresUserStore,
    StatementStore, UserStore,
};

pub struct AppServices {
    pub registration: RegistrationService,
    pub authentication: AuthenticationService,
    pub profile: ProfileService,
    pub balance: BalanceCalculator,
    pub create_statement: CreateStatementService,
    pub statement_lookup: StatementLookupService,
    pub jwt: Arc<dyn JwtValidator>,
}

impl AppServices {
    /// Build every service over one pair of stores.
    pub fn new(
        config: &AppConfig,
        users: Arc<dyn UserStore>,
        statements: Arc<dyn StatementStore>,
    ) -> anyhow::Result<Self> {
        let hashing = config.hashing;
        let hasher: Arc<dyn PasswordHasher> = Arc::new(
            Argon2PasswordHasher::new(hashing.memory_kib, hashing.iterations, hashing.parallelism)
                .context("invalid argon2 parameters")?,
        );
        let issuer = Arc::new(Hs256JwtIssuer::new(config.jwt.secret.as_bytes(), config.jwt.ttl));
        let jwt = Arc::new(Hs256JwtValidator::new(config.jwt.secret.as_bytes()));

        Ok(Self {
            registration: RegistrationService::new(Arc::clone(&users), Arc::clone(&hasher)),
            authentication: AuthenticationService::new(Arc::clone(&users), hasher, issuer),
            profile: ProfileService::new(Arc::clone(&users)),
            balance: BalanceCalculator::new(Arc::clone(&users), Arc::clone(&statements)),
            create_statement: CreateStatementService::new(Arc::clone(&users), Arc::clone(&statements)),
            statement_lookup: StatementLookupService::new(users, statements),
            jwt,
        })
    }
}

pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    match &config.database {
        Some(database) => {
            let pool = db::connect(database)
                .await
                .context("failed to connect to postgres")?;
            db::migrate(&pool).await.context("failed to run migrations")?;
            tracing::info!(max_connections = database.max_connections, "using postgres stores");

            AppServices::new(
                config,
                Arc::new(PostgresUserStore::new(pool.clone())),
                Arc::new(PostgresStatementStore::new(pool)),
            )
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory stores (data is lost on exit)");
            AppServices::new(
                config,
                Arc::new(InMemoryUserStore::new()),
                Arc::new(InMemoryStatementStore::new()),
            )
        }
    }
}
