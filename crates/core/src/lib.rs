//! `stockroom-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the error taxonomy and the pagination value types shared by
//! every other crate in the workspace.

pub mod entity;
pub mod error;
pub mod id;
pub mod page;

pub use entity::{Entity, EntityKind};
pub use error::{DomainError, DomainResult};
pub use id::{ArticleId, BrandId, CategoryId};
pub use page::{Page, PageRequest, SortDirection};
