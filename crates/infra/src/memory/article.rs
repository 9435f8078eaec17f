use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

use async_trait::async_trait;
use stockroom_catalog::{Article, NewArticle};
use stockroom_core::{ArticleId, DomainError, DomainResult, EntityKind, Page, PageRequest};
use stockroom_inventory::{ArticleFilter, ArticleRepository, ArticleSortField, StockDecrement};

use super::{paginate, poisoned};

/// Articles keyed by id. Brand and category values are stored by copy; they
/// never change once saved.
#[derive(Debug)]
pub struct InMemoryArticleStore {
    inner: RwLock<ArticleState>,
}

#[derive(Debug)]
struct ArticleState {
    next_id: i64,
    rows: BTreeMap<ArticleId, Article>,
}

impl InMemoryArticleStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(ArticleState {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
        }
    }
}

impl Default for InMemoryArticleStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArticleRepository for InMemoryArticleStore {
    async fn exists_by_name(&self, name: &str) -> DomainResult<bool> {
        let state = self.inner.read().map_err(|_| poisoned("article"))?;
        Ok(state.rows.values().any(|a| a.name() == name))
    }

    async fn insert(&self, article: NewArticle) -> DomainResult<Article> {
        let mut state = self.inner.write().map_err(|_| poisoned("article"))?;
        if state.rows.values().any(|a| a.name() == article.name()) {
            return Err(DomainError::name_conflict(EntityKind::Article, article.name()));
        }
        let id = ArticleId::new(state.next_id);
        state.next_id += 1;
        let saved = article.into_article(id);
        state.rows.insert(id, saved.clone());
        Ok(saved)
    }

    async fn find_by_id(&self, id: ArticleId) -> DomainResult<Option<Article>> {
        let state = self.inner.read().map_err(|_| poisoned("article"))?;
        Ok(state.rows.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[ArticleId]) -> DomainResult<Vec<Article>> {
        let wanted: BTreeSet<ArticleId> = ids.iter().copied().collect();
        let state = self.inner.read().map_err(|_| poisoned("article"))?;
        Ok(wanted
            .into_iter()
            .filter_map(|id| state.rows.get(&id).cloned())
            .collect())
    }

    async fn find_page(
        &self,
        request: PageRequest,
        sort: ArticleSortField,
    ) -> DomainResult<Page<Article>> {
        let mut all: Vec<Article> = {
            let state = self.inner.read().map_err(|_| poisoned("article"))?;
            state.rows.values().cloned().collect()
        };
        all.sort_by(|a, b| sort.order(request.direction(), a, b));
        Ok(paginate(all, &request))
    }

    async fn find_filtered_page(
        &self,
        request: PageRequest,
        sort: ArticleSortField,
        filter: &ArticleFilter,
    ) -> DomainResult<Page<Article>> {
        let criteria = filter.criteria();
        let mut matching: Vec<Article> = {
            let state = self.inner.read().map_err(|_| poisoned("article"))?;
            state
                .rows
                .values()
                .filter(|a| criteria.iter().all(|c| c.matches(a)))
                .cloned()
                .collect()
        };
        matching.sort_by(|a, b| sort.order(request.direction(), a, b));
        Ok(paginate(matching, &request))
    }

    async fn set_quantity(&self, id: ArticleId, quantity: i32) -> DomainResult<Option<Article>> {
        let mut state = self.inner.write().map_err(|_| poisoned("article"))?;
        let Some(article) = state.rows.get_mut(&id) else {
            return Ok(None);
        };
        article.set_quantity(quantity)?;
        Ok(Some(article.clone()))
    }

    async fn decrement_quantity(&self, id: ArticleId, amount: i32) -> DomainResult<StockDecrement> {
        let mut state = self.inner.write().map_err(|_| poisoned("article"))?;
        let Some(article) = state.rows.get_mut(&id) else {
            return Ok(StockDecrement::NotFound);
        };
        if !article.has_stock_for(amount) {
            return Ok(StockDecrement::Insufficient {
                available: article.quantity(),
            });
        }
        article.reduce_stock(amount)?;
        Ok(StockDecrement::Applied(article.clone()))
    }
}
