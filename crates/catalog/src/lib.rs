//! Catalog domain module.
//!
//! This crate contains the business rules for articles, brands and categories,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no storage).
//! Unsaved entities are modelled as drafts (`NewArticle`, `NewBrand`,
//! `NewCategory`) so that an identity can only ever come from the store.

pub mod article;
pub mod brand;
pub mod category;
pub mod label;
pub mod ordering;
mod rules;

pub use article::{Article, NewArticle};
pub use brand::{Brand, NewBrand};
pub use category::{Category, NewCategory};
pub use label::Label;
pub use ordering::{display_order, sort_categories_by_name};
pub use rules::{
    ARTICLE_DESCRIPTION_MAX_CHARS, LABEL_DESCRIPTION_MAX_CHARS, MAX_CATEGORIES, MIN_CATEGORIES,
    NAME_MAX_CHARS,
};
