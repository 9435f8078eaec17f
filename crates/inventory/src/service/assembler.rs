//! Turns an article request that names its brand and categories by id into a
//! validated [`NewArticle`].

use rust_decimal::Decimal;
use stockroom_catalog::{Article, MAX_CATEGORIES, MIN_CATEGORIES, NewArticle};
use stockroom_core::{BrandId, CategoryId, DomainError, DomainResult, EntityKind};
use tracing::{debug, instrument};

use super::ArticleService;
use crate::ports::{ArticleRepository, BrandRepository, CategoryRepository};

/// An article creation request before its references are resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleDraft {
    pub name: String,
    pub description: String,
    pub quantity: i32,
    pub price: Decimal,
    pub brand_id: BrandId,
    pub category_ids: Vec<CategoryId>,
}

pub struct ArticleAssembler<B, C> {
    brands: B,
    categories: C,
}

impl<B, C> ArticleAssembler<B, C>
where
    B: BrandRepository,
    C: CategoryRepository,
{
    pub fn new(brands: B, categories: C) -> Self {
        Self { brands, categories }
    }

    /// Resolve the brand (which must exist) and the categories (unknown ids
    /// are dropped), then validate the result.
    ///
    /// The requested id list itself must hold between one and three distinct
    /// ids. A request whose category ids all turn out unknown fails
    /// validation for having no categories.
    #[instrument(
        skip(self, draft),
        fields(article_name = %draft.name, brand_id = %draft.brand_id),
        err
    )]
    pub async fn assemble(&self, draft: ArticleDraft) -> DomainResult<NewArticle> {
        check_category_ids(&draft.category_ids)?;
        let brand = self
            .brands
            .find_by_id(draft.brand_id)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::Brand, draft.brand_id))?;

        let categories = self.categories.find_by_ids(&draft.category_ids).await?;
        if categories.len() < draft.category_ids.len() {
            debug!(
                requested = draft.category_ids.len(),
                resolved = categories.len(),
                "some category ids did not resolve"
            );
        }

        NewArticle::new(
            draft.name,
            draft.description,
            draft.quantity,
            draft.price,
            brand,
            categories,
        )
    }

    pub async fn assemble_and_save<A: ArticleRepository>(
        &self,
        draft: ArticleDraft,
        articles: &ArticleService<A>,
    ) -> DomainResult<Article> {
        let article = self.assemble(draft).await?;
        articles.save_article(article).await
    }
}

fn check_category_ids(ids: &[CategoryId]) -> DomainResult<()> {
    if !(MIN_CATEGORIES..=MAX_CATEGORIES).contains(&ids.len()) {
        return Err(DomainError::validation(format!(
            "an article must name between {MIN_CATEGORIES} and {MAX_CATEGORIES} categories \
             (got {})",
            ids.len()
        )));
    }
    for (i, id) in ids.iter().enumerate() {
        if ids[..i].contains(id) {
            return Err(DomainError::validation(format!(
                "category {id} is listed more than once"
            )));
        }
    }
    Ok(())
}
