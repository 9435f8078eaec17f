//! Infrastructure layer: persistence adapters for the inventory ports.
//!
//! - [`memory`]: lock-guarded maps, used by tests and when no database is
//!   configured.
//! - [`postgres`]: `sqlx` stores over the schema in `migrations/`.

pub mod memory;
pub mod postgres;


pub use memory::{
    InMemoryArticleStore, InMemoryBrandStore, InMemoryCategoryStore, InMemoryLabelStore,
};
pub use postgres::{
    DatabaseSettings, PgArticleStore, PgBrandStore, PgCategoryStore, PgLabelStore, connect,
};
