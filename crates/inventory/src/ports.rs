//! Persistence ports.
//!
//! One trait per entity. Adapters (in-memory, Postgres) implement these and
//! the services only ever see the traits, so a store can be swapped without
//! touching the consistency rules.
//!
//! Every method is a single store interaction. The services compose them;
//! the only compound guarantee an adapter must give is that
//! [`ArticleRepository::decrement_quantity`] checks and writes in one atomic
//! step.

use std::sync::Arc;

use async_trait::async_trait;
use stockroom_catalog::{Article, Brand, Category, NewArticle, NewBrand, NewCategory};
use stockroom_core::{ArticleId, BrandId, CategoryId, DomainResult, Page, PageRequest};

use crate::query::{ArticleFilter, ArticleSortField, LabelSortField};

/// Result of an atomic conditional stock decrement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockDecrement {
    /// Stock was sufficient; the article as stored after the decrement.
    Applied(Article),
    /// Stock was not sufficient; nothing changed.
    Insufficient { available: i32 },
    /// No article has this id.
    NotFound,
}

#[async_trait]
pub trait BrandRepository: Send + Sync {
    /// Exact, case-sensitive name lookup.
    async fn exists_by_name(&self, name: &str) -> DomainResult<bool>;

    /// Persist a new brand and return it with its assigned id.
    ///
    /// A racing writer with the same name surfaces as `NameConflict`.
    async fn insert(&self, brand: NewBrand) -> DomainResult<Brand>;

    async fn find_by_id(&self, id: BrandId) -> DomainResult<Option<Brand>>;

    async fn find_page(
        &self,
        request: PageRequest,
        sort: LabelSortField,
    ) -> DomainResult<Page<Brand>>;
}

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn exists_by_name(&self, name: &str) -> DomainResult<bool>;

    async fn insert(&self, category: NewCategory) -> DomainResult<Category>;

    async fn find_by_id(&self, id: CategoryId) -> DomainResult<Option<Category>>;

    /// Categories for the given ids in request order. Unknown ids are
    /// dropped; a repeated id appears once.
    async fn find_by_ids(&self, ids: &[CategoryId]) -> DomainResult<Vec<Category>>;

    async fn find_page(
        &self,
        request: PageRequest,
        sort: LabelSortField,
    ) -> DomainResult<Page<Category>>;
}

#[async_trait]
pub trait ArticleRepository: Send + Sync {
    async fn exists_by_name(&self, name: &str) -> DomainResult<bool>;

    /// Persist a new article together with its category links.
    async fn insert(&self, article: NewArticle) -> DomainResult<Article>;

    async fn find_by_id(&self, id: ArticleId) -> DomainResult<Option<Article>>;

    /// Articles for the given ids, distinct and ordered by id ascending.
    /// Unknown ids are dropped.
    async fn find_by_ids(&self, ids: &[ArticleId]) -> DomainResult<Vec<Article>>;

    /// One page over every stored article, ordered by `sort` in the
    /// request's direction with id as tie-break.
    async fn find_page(
        &self,
        request: PageRequest,
        sort: ArticleSortField,
    ) -> DomainResult<Page<Article>>;

    /// Like [`Self::find_page`], restricted to articles matching every active
    /// criterion of `filter`. A no-op filter yields the same page.
    async fn find_filtered_page(
        &self,
        request: PageRequest,
        sort: ArticleSortField,
        filter: &ArticleFilter,
    ) -> DomainResult<Page<Article>>;

    /// Overwrite the stored quantity. `None` when the article is missing.
    async fn set_quantity(&self, id: ArticleId, quantity: i32) -> DomainResult<Option<Article>>;

    /// Subtract `amount` if and only if the stored quantity covers it, as one
    /// atomic step with respect to every other writer.
    async fn decrement_quantity(&self, id: ArticleId, amount: i32) -> DomainResult<StockDecrement>;
}

#[async_trait]
impl<S> BrandRepository for Arc<S>
where
    S: BrandRepository + ?Sized,
{
    async fn exists_by_name(&self, name: &str) -> DomainResult<bool> {
        (**self).exists_by_name(name).await
    }

    async fn insert(&self, brand: NewBrand) -> DomainResult<Brand> {
        (**self).insert(brand).await
    }

    async fn find_by_id(&self, id: BrandId) -> DomainResult<Option<Brand>> {
        (**self).find_by_id(id).await
    }

    async fn find_page(
        &self,
        request: PageRequest,
        sort: LabelSortField,
    ) -> DomainResult<Page<Brand>> {
        (**self).find_page(request, sort).await
    }
}

#[async_trait]
impl<S> CategoryRepository for Arc<S>
where
    S: CategoryRepository + ?Sized,
{
    async fn exists_by_name(&self, name: &str) -> DomainResult<bool> {
        (**self).exists_by_name(name).await
    }

    async fn insert(&self, category: NewCategory) -> DomainResult<Category> {
        (**self).insert(category).await
    }

    async fn find_by_id(&self, id: CategoryId) -> DomainResult<Option<Category>> {
        (**self).find_by_id(id).await
    }

    async fn find_by_ids(&self, ids: &[CategoryId]) -> DomainResult<Vec<Category>> {
        (**self).find_by_ids(ids).await
    }

    async fn find_page(
        &self,
        request: PageRequest,
        sort: LabelSortField,
    ) -> DomainResult<Page<Category>> {
        (**self).find_page(request, sort).await
    }
}

#[async_trait]
impl<S> ArticleRepository for Arc<S>
where
    S: ArticleRepository + ?Sized,
{
    async fn exists_by_name(&self, name: &str) -> DomainResult<bool> {
        (**self).exists_by_name(name).await
    }

    async fn insert(&self, article: NewArticle) -> DomainResult<Article> {
        (**self).insert(article).await
    }

    async fn find_by_id(&self, id: ArticleId) -> DomainResult<Option<Article>> {
        (**self).find_by_id(id).await
    }

    async fn find_by_ids(&self, ids: &[ArticleId]) -> DomainResult<Vec<Article>> {
        (**self).find_by_ids(ids).await
    }

    async fn find_page(
        &self,
        request: PageRequest,
        sort: ArticleSortField,
    ) -> DomainResult<Page<Article>> {
        (**self).find_page(request, sort).await
    }

    async fn find_filtered_page(
        &self,
        request: PageRequest,
        sort: ArticleSortField,
        filter: &ArticleFilter,
    ) -> DomainResult<Page<Article>> {
        (**self).find_filtered_page(request, sort, filter).await
    }

    async fn set_quantity(&self, id: ArticleId, quantity: i32) -> DomainResult<Option<Article>> {
        (**self).set_quantity(id, quantity).await
    }

    async fn decrement_quantity(&self, id: ArticleId, amount: i32) -> DomainResult<StockDecrement> {
        (**self).decrement_quantity(id, amount).await
    }
}
