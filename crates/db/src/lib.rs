//! PostgreSQL access for bookshelf.
//!
//! A [`Database`] is built once at startup from [`DatabaseSettings`] and
//! handed to whoever needs it; there is no process-wide pool.
//!
//! [`DatabaseSettings`]: bookshelf_kernel::settings::DatabaseSettings

pub mod params;
pub mod pool;

pub use params::SqlParam;
pub use pool::Database;
pub use sqlx::postgres::PgRow;
