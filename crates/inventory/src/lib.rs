//! Inventory consistency engine and filtered-pagination query engine.
//!
//! The services in this crate enforce name uniqueness and stock invariants and
//! orchestrate brand/category lookups when an article is assembled. They
//! depend only on the persistence ports declared in [`ports`]; storage
//! adapters live in `stockroom-infra`.

pub mod config;
pub mod ports;
pub mod query;
pub mod service;

pub use config::ServiceConfig;
pub use ports::{ArticleRepository, BrandRepository, CategoryRepository, StockDecrement};
pub use query::{
    ArticleCriterion, ArticleFilter, ArticleSortField, BrandSortField, CategorySortField,
    LabelSortField,
};
pub use service::{
    ArticleAssembler, ArticleDraft, ArticleService, BrandService, CategoryService,
};
