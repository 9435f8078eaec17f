use stockroom_catalog::{Category, NewCategory};
use stockroom_core::{
    ArticleId, CategoryId, DomainError, DomainResult, EntityKind, Page, PageRequest,
};
use tracing::{Span, debug, field, info, instrument, warn};

use super::check_page;
use crate::config::ServiceConfig;
use crate::ports::{ArticleRepository, CategoryRepository};
use crate::query::CategorySortField;

/// Category use cases.
///
/// Also answers "which categories does this article carry", which needs the
/// article port as well.
pub struct CategoryService<C, A> {
    categories: C,
    articles: A,
    config: ServiceConfig,
}

impl<C, A> CategoryService<C, A>
where
    C: CategoryRepository,
    A: ArticleRepository,
{
    pub fn new(categories: C, articles: A, config: ServiceConfig) -> Self {
        Self {
            categories,
            articles,
            config,
        }
    }

    #[instrument(
        skip(self, category),
        fields(category_name = %category.name(), category_id = field::Empty),
        err
    )]
    pub async fn save(&self, category: NewCategory) -> DomainResult<Category> {
        if self.categories.exists_by_name(category.name()).await? {
            warn!(category_name = %category.name(), "category name already taken");
            return Err(DomainError::name_conflict(EntityKind::Category, category.name()));
        }
        let saved = self.categories.insert(category).await?;
        Span::current().record("category_id", saved.id_typed().get());
        info!("category saved");
        Ok(saved)
    }

    #[instrument(skip(self), fields(category_id = %id), err)]
    pub async fn get_by_id(&self, id: CategoryId) -> DomainResult<Category> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::Category, id))
    }

    /// Existing categories among `ids`, in request order.
    #[instrument(skip(self, ids), fields(requested = ids.len()), err)]
    pub async fn get_by_ids(&self, ids: &[CategoryId]) -> DomainResult<Vec<Category>> {
        self.categories.find_by_ids(ids).await
    }

    #[instrument(skip(self), err)]
    pub async fn get_page(
        &self,
        request: PageRequest,
        sort: CategorySortField,
    ) -> DomainResult<Page<Category>> {
        check_page(&self.config, &request)?;
        let page = self.categories.find_page(request, sort).await?;
        debug!(
            returned = page.number_of_elements,
            total = page.total_elements,
            "category page loaded"
        );
        Ok(page)
    }

    /// Names of the article's categories, in the article's own order.
    #[instrument(skip(self), fields(article_id = %article_id), err)]
    pub async fn get_category_names_by_article_id(
        &self,
        article_id: ArticleId,
    ) -> DomainResult<Vec<String>> {
        let article = self
            .articles
            .find_by_id(article_id)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::Article, article_id))?;
        Ok(article.category_names())
    }
}
