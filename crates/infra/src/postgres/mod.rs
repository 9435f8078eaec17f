//! Postgres persistence adapters (`sqlx`).
//!
//! ## Error mapping
//!
//! | Condition | SQLSTATE | `DomainError` |
//! |---|---|---|
//! | unique violation on a name | `23505` | `NameConflict` (at the insert call site) |
//! | check violation (`quantity >= 0`, `price > 0`) | `23514` | `InvariantViolation` |
//! | foreign key violation | `23503` | `InvariantViolation` |
//! | anything else | - | `Store` |

mod article;
pub mod filter;
mod label;
pub mod rows;

pub use article::PgArticleStore;
pub use label::{LabelTable, PgLabelStore};

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use stockroom_catalog::{Brand, Category};
use stockroom_core::DomainError;
use tracing::info;

pub type PgBrandStore = PgLabelStore<Brand>;
pub type PgCategoryStore = PgLabelStore<Category>;

/// Connection settings for the Postgres pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

/// Open a bounded pool and bring the schema up to date.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect(&settings.url)
        .await?;
    migrate(&pool).await?;
    info!(max_connections = settings.max_connections, "postgres pool ready");
    Ok(pool)
}

pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> DomainError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23514") | Some("23503") => DomainError::invariant(msg),
                _ => DomainError::store(msg),
            }
        }
        sqlx::Error::PoolTimedOut => {
            DomainError::store(format!("timed out waiting for a connection in {operation}"))
        }
        sqlx::Error::PoolClosed => {
            DomainError::store(format!("connection pool closed in {operation}"))
        }
        other => DomainError::store(format!("sqlx error in {operation}: {other}")),
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(code) = db_err.code() {
            return code.as_ref() == "23505";
        }
    }
    false
}
