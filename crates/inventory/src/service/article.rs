use rust_decimal::Decimal;
use stockroom_catalog::{Article, NewArticle};
use stockroom_core::{ArticleId, DomainError, DomainResult, EntityKind, Page, PageRequest};
use tracing::{Span, debug, field, info, instrument, warn};

use super::check_page;
use crate::config::ServiceConfig;
use crate::ports::{ArticleRepository, StockDecrement};
use crate::query::{ArticleFilter, ArticleSortField};

/// Article use cases: creation under name uniqueness, stock maintenance and
/// (filtered) listing.
pub struct ArticleService<A> {
    articles: A,
    config: ServiceConfig,
}

impl<A: ArticleRepository> ArticleService<A> {
    pub fn new(articles: A, config: ServiceConfig) -> Self {
        Self { articles, config }
    }

    /// Persist a new article.
    ///
    /// A taken name is rejected before the insert is attempted. A writer that
    /// wins the race between the check and the insert still surfaces as
    /// `NameConflict`, from the store's unique constraint.
    #[instrument(
        skip(self, article),
        fields(article_name = %article.name(), article_id = field::Empty),
        err
    )]
    pub async fn save_article(&self, article: NewArticle) -> DomainResult<Article> {
        if self.articles.exists_by_name(article.name()).await? {
            warn!(article_name = %article.name(), "article name already taken");
            return Err(DomainError::name_conflict(EntityKind::Article, article.name()));
        }
        let saved = self.articles.insert(article).await?;
        Span::current().record("article_id", saved.id_typed().get());
        info!(quantity = saved.quantity(), "article saved");
        Ok(saved)
    }

    #[instrument(skip(self), fields(article_id = %id), err)]
    pub async fn exists_by_id(&self, id: ArticleId) -> DomainResult<bool> {
        Ok(self.articles.find_by_id(id).await?.is_some())
    }

    #[instrument(skip(self), fields(article_id = %id), err)]
    pub async fn get_by_id(&self, id: ArticleId) -> DomainResult<Article> {
        self.load(id).await
    }

    /// Overwrite the stock level.
    ///
    /// Only existence is checked here; a negative value is refused by the
    /// store as an invariant violation.
    #[instrument(skip(self), fields(article_id = %id), err)]
    pub async fn update_quantity(&self, id: ArticleId, quantity: i32) -> DomainResult<Article> {
        let updated = self
            .articles
            .set_quantity(id, quantity)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::Article, id))?;
        info!(quantity, "article quantity updated");
        Ok(updated)
    }

    /// True exactly when `reduce_stock(id, requested)` would succeed against
    /// the current quantity.
    #[instrument(skip(self), fields(article_id = %id), err)]
    pub async fn is_stock_available(&self, id: ArticleId, requested: i32) -> DomainResult<bool> {
        check_amount(requested)?;
        let article = self.load(id).await?;
        Ok(article.has_stock_for(requested))
    }

    /// Take `quantity` units out of stock in one atomic store step.
    #[instrument(skip(self), fields(article_id = %id), err)]
    pub async fn reduce_stock(&self, id: ArticleId, quantity: i32) -> DomainResult<Article> {
        check_amount(quantity)?;
        match self.articles.decrement_quantity(id, quantity).await? {
            StockDecrement::Applied(article) => {
                info!(reduced_by = quantity, remaining = article.quantity(), "stock reduced");
                Ok(article)
            }
            StockDecrement::Insufficient { available } => {
                warn!(requested = quantity, available, "stock reduction refused");
                Err(DomainError::insufficient_stock(id, quantity, available))
            }
            StockDecrement::NotFound => Err(DomainError::not_found(EntityKind::Article, id)),
        }
    }

    #[instrument(skip(self), fields(article_id = %id), err)]
    pub async fn get_price_by_id(&self, id: ArticleId) -> DomainResult<Decimal> {
        Ok(self.load(id).await?.price())
    }

    /// Articles found among `ids`, distinct and in ascending id order.
    #[instrument(skip(self, ids), fields(requested = ids.len(), found = field::Empty), err)]
    pub async fn get_all_by_ids(&self, ids: &[ArticleId]) -> DomainResult<Vec<Article>> {
        let found = self.articles.find_by_ids(ids).await?;
        Span::current().record("found", found.len());
        Ok(found)
    }

    /// Unfiltered listing over every article.
    #[instrument(skip(self), err)]
    pub async fn get_page(
        &self,
        request: PageRequest,
        sort: ArticleSortField,
    ) -> DomainResult<Page<Article>> {
        check_page(&self.config, &request)?;
        let page = self.articles.find_page(request, sort).await?;
        debug!(
            returned = page.number_of_elements,
            total = page.total_elements,
            "article page loaded"
        );
        Ok(page)
    }

    #[instrument(skip(self, filter), fields(criteria = filter.criteria().len()), err)]
    pub async fn get_filtered_page(
        &self,
        request: PageRequest,
        sort: ArticleSortField,
        filter: &ArticleFilter,
    ) -> DomainResult<Page<Article>> {
        check_page(&self.config, &request)?;
        let page = self
            .articles
            .find_filtered_page(request, sort, filter)
            .await?;
        debug!(
            returned = page.number_of_elements,
            total = page.total_elements,
            "filtered article page loaded"
        );
        Ok(page)
    }

    async fn load(&self, id: ArticleId) -> DomainResult<Article> {
        self.articles
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::Article, id))
    }
}

fn check_amount(quantity: i32) -> DomainResult<()> {
    if quantity < 0 {
        return Err(DomainError::validation("stock amount cannot be negative"));
    }
    Ok(())
}
