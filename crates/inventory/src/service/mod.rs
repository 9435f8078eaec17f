//! Use-case services.
//!
//! Each service owns its ports and a [`ServiceConfig`](crate::ServiceConfig)
//! handed in at construction. Operations await the store one step at a time
//! and never spawn work of their own.

mod article;
mod assembler;
mod brand;
mod category;

pub use article::ArticleService;
pub use assembler::{ArticleAssembler, ArticleDraft};
pub use brand::BrandService;
pub use category::CategoryService;

use stockroom_core::{DomainResult, PageRequest};

use crate::config::ServiceConfig;

/// Enforce the configured page-size ceiling before any store call.
fn check_page(config: &ServiceConfig, request: &PageRequest) -> DomainResult<()> {
    request.ensure_max_size(config.max_page_size)
}
