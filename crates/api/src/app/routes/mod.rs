use axum::Router;

use stockroom_core::DomainResult;
use stockroom_inventory::{ArticleSortField, LabelSortField};

use crate::app::dto::PageQuery;

pub mod articles;
pub mod brands;
pub mod categories;
pub mod system;

/// Router for every entity endpoint.
pub fn router() -> Router {
    Router::new()
        .nest("/brands", brands::router())
        .nest("/categories", categories::router())
        .nest("/articles", articles::router())
}

fn label_sort(query: &PageQuery) -> DomainResult<LabelSortField> {
    query.sort().parse()
}

fn article_sort(query: &PageQuery) -> DomainResult<ArticleSortField> {
    query.sort().parse()
}
