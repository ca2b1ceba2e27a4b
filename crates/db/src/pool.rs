//! Database connection pool management

use bookshelf_kernel::settings::DatabaseSettings;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgRow};
use tracing::{info, instrument};

use crate::params::{bind_all, SqlParam};

/// Handle to the PostgreSQL pool.
///
/// Cloning is cheap and every clone shares the same connections.
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect eagerly, failing if no connection can be established.
    ///
    /// # Errors
    /// Returns the driver error when the first connection fails.
    #[instrument(skip(settings), fields(host = ?settings.host, max_connections = settings.max_connections))]
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, sqlx::Error> {
        info!("Initializing database connection pool");

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .connect_with(connect_options(settings))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to create database pool");
                e
            })?;

        info!("Database connection pool initialized");
        Ok(Self { pool })
    }

    /// Build the pool without touching the network; connections open on first use.
    pub fn connect_lazy(settings: &DatabaseSettings) -> Self {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .connect_lazy_with(connect_options(settings));
        Self { pool }
    }

    /// Get a reference to the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run a parameterized statement and return every row it produced.
    pub async fn fetch(&self, statement: &str, params: Vec<SqlParam>) -> Result<Vec<PgRow>, sqlx::Error> {
        bind_all(statement, params).fetch_all(&self.pool).await
    }

    /// Run a parameterized statement and return the number of rows affected.
    pub async fn execute(&self, statement: &str, params: Vec<SqlParam>) -> Result<u64, sqlx::Error> {
        let result = bind_all(statement, params).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Perform a health check on the database connection
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Database health check failed");
                e
            })?;

        tracing::debug!("Database health check passed");
        Ok(())
    }

    /// Close the connection pool gracefully
    #[instrument(skip(self))]
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
        info!("Database connection pool closed");
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

/// Translate settings into driver options. Unset fields keep the driver defaults.
fn connect_options(settings: &DatabaseSettings) -> PgConnectOptions {
    let mut options = PgConnectOptions::new().port(settings.port());
    if let Some(host) = &settings.host {
        options = options.host(host);
    }
    if let Some(name) = &settings.name {
        options = options.database(name);
    }
    if let Some(user) = &settings.user {
        options = options.username(user);
    }
    if let Some(password) = &settings.password {
        options = options.password(password);
    }
    options
}
