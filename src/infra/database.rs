//! For interacting with the database.

use super::config::DatabaseConfig;
use sqlx::{
    migrate::MigrateError,
    pool::PoolOptions,
    postgres::{PgConnectOptions, PgSslMode},
    PgPool, Postgres, Transaction,
};

/// A common transaction type.
/// Use this for the business and persistence layer.
pub type Tx = Transaction<'static, Postgres>;

/// A common database pool type.
pub type DbPool = PgPool;

/// Connects to the database based on some configuration.
pub fn init_db(config: &DatabaseConfig) -> DbPool {
    let db_options = PgConnectOptions::default()
        .username(&config.username)
        .password(&config.password)
        .host(&config.host)
        .port(config.port)
        .database(&config.database_name)
        .ssl_mode(PgSslMode::Prefer);
    PoolOptions::default()
        .acquire_timeout(config.acquire_timeout)
        .min_connections(1)
        .max_connections(config.max_connections)
        .connect_lazy_with(db_options)
}

/// Brings the schema up to date.
#[tracing::instrument(skip(db))]
pub async fn migrate(db: &DbPool) -> Result<(), MigrateError> {
    tracing::info!("Running migrations");
    sqlx::migrate!("./migrations").run(db).await?;
    tracing::info!("Migrations done");
    Ok(())
}
