use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use stockroom_catalog::{Article, NewArticle};
use stockroom_core::{ArticleId, DomainError, DomainResult, EntityKind, Page, PageRequest};
use stockroom_inventory::{ArticleFilter, ArticleRepository, ArticleSortField, StockDecrement};
use tracing::{Span, debug, field, instrument};

use super::filter::{ARTICLE_FROM, ARTICLE_JOIN, article_sort_key, push_filter};
use super::label::to_i64;
use super::rows::{ArticleRow, CategoryLinkRow, articles_from_rows};
use super::{is_unique_violation, map_sqlx_error};

const ARTICLE_COLUMNS: &str = "SELECT a.id, a.name, a.description, a.quantity, a.price, \
     b.id AS brand_id, b.name AS brand_name, b.description AS brand_description";

/// Articles plus their ordered category links.
///
/// Stock changes are single conditional `UPDATE`s, so concurrent writers
/// serialize on the row lock and can never push `quantity` below zero.
#[derive(Debug, Clone)]
pub struct PgArticleStore {
    pool: Arc<PgPool>,
}

impl PgArticleStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Attach category links to already loaded article rows.
    async fn hydrate(&self, rows: Vec<ArticleRow>) -> DomainResult<Vec<Article>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let links = sqlx::query(
            r#"
            SELECT
                ac.article_id,
                ac.position,
                c.id AS category_id,
                c.name AS category_name,
                c.description AS category_description
            FROM article_categories ac
            JOIN categories c ON c.id = ac.category_id
            WHERE ac.article_id = ANY($1)
            ORDER BY ac.article_id, ac.position
            "#,
        )
        .bind(ids)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("load_category_links", e))?;

        let links = links
            .iter()
            .map(CategoryLinkRow::from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| map_sqlx_error("decode_category_link", e))?;
        articles_from_rows(rows, links)
    }

    async fn load_rows(
        &self,
        mut builder: QueryBuilder<'_, Postgres>,
    ) -> DomainResult<Vec<Article>> {
        let rows = builder
            .build()
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("load_articles", e))?;
        let rows = rows
            .iter()
            .map(ArticleRow::from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| map_sqlx_error("decode_article", e))?;
        self.hydrate(rows).await
    }

    /// Append `ORDER BY` plus the page window and load the page content.
    async fn load_window(
        &self,
        mut select: QueryBuilder<'_, Postgres>,
        request: &PageRequest,
        sort: ArticleSortField,
    ) -> DomainResult<Vec<Article>> {
        select.push(format!(
            " ORDER BY {} {}, a.id ASC LIMIT ",
            article_sort_key(sort),
            request.direction().as_sql()
        ));
        select.push_bind(to_i64(request.limit()));
        select.push(" OFFSET ");
        select.push_bind(to_i64(request.offset()));
        self.load_rows(select).await
    }

    async fn load_one(&self, id: ArticleId) -> DomainResult<Option<Article>> {
        let mut builder = QueryBuilder::<Postgres>::new(ARTICLE_COLUMNS);
        builder.push(ARTICLE_FROM);
        builder.push(" AND a.id = ");
        builder.push_bind(id.get());
        Ok(self.load_rows(builder).await?.into_iter().next())
    }
}

#[async_trait]
impl ArticleRepository for PgArticleStore {
    #[instrument(skip(self), err)]
    async fn exists_by_name(&self, name: &str) -> DomainResult<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM articles WHERE name = $1)")
            .bind(name)
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("exists_by_name", e))
    }

    #[instrument(
        skip(self, article),
        fields(article_name = %article.name(), article_id = field::Empty),
        err
    )]
    async fn insert(&self, article: NewArticle) -> DomainResult<Article> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO articles (name, description, quantity, price, brand_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(article.name())
        .bind(article.description())
        .bind(article.quantity())
        .bind(article.price())
        .bind(article.brand().id_typed().get())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::name_conflict(EntityKind::Article, article.name())
            } else {
                map_sqlx_error("insert_article", e)
            }
        })?;

        for (position, category) in article.categories().iter().enumerate() {
            sqlx::query(
                "INSERT INTO article_categories (article_id, category_id, position) \
                 VALUES ($1, $2, $3)",
            )
            .bind(id)
            .bind(category.id_typed().get())
            .bind(i32::try_from(position).unwrap_or(i32::MAX))
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("insert_article_category", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        Span::current().record("article_id", id);
        Ok(article.into_article(ArticleId::new(id)))
    }

    #[instrument(skip(self), fields(article_id = %id), err)]
    async fn find_by_id(&self, id: ArticleId) -> DomainResult<Option<Article>> {
        self.load_one(id).await
    }

    #[instrument(skip(self, ids), fields(requested = ids.len()), err)]
    async fn find_by_ids(&self, ids: &[ArticleId]) -> DomainResult<Vec<Article>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let mut builder = QueryBuilder::<Postgres>::new(ARTICLE_COLUMNS);
        builder.push(ARTICLE_FROM);
        builder.push(" AND a.id = ANY(");
        builder.push_bind(raw);
        builder.push(") ORDER BY a.id ASC");
        self.load_rows(builder).await
    }

    #[instrument(skip(self), err)]
    async fn find_page(
        &self,
        request: PageRequest,
        sort: ArticleSortField,
    ) -> DomainResult<Page<Article>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles")
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("count_articles", e))?;

        let mut select = QueryBuilder::<Postgres>::new(ARTICLE_COLUMNS);
        select.push(ARTICLE_JOIN);
        let content = self.load_window(select, &request, sort).await?;
        debug!(total, returned = content.len(), "article page queried");
        Ok(Page::new(content, &request, u64::try_from(total).unwrap_or(0)))
    }

    #[instrument(skip(self, filter), fields(criteria = field::Empty), err)]
    async fn find_filtered_page(
        &self,
        request: PageRequest,
        sort: ArticleSortField,
        filter: &ArticleFilter,
    ) -> DomainResult<Page<Article>> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*)");
        count.push(ARTICLE_FROM);
        let criteria = push_filter(&mut count, filter);
        Span::current().record("criteria", criteria);

        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("count_articles", e))?;

        let mut select = QueryBuilder::<Postgres>::new(ARTICLE_COLUMNS);
        select.push(ARTICLE_FROM);
        push_filter(&mut select, filter);
        let content = self.load_window(select, &request, sort).await?;
        debug!(total, returned = content.len(), "filtered article page queried");
        Ok(Page::new(content, &request, u64::try_from(total).unwrap_or(0)))
    }

    #[instrument(skip(self), fields(article_id = %id), err)]
    async fn set_quantity(&self, id: ArticleId, quantity: i32) -> DomainResult<Option<Article>> {
        let updated = sqlx::query("UPDATE articles SET quantity = $2 WHERE id = $1")
            .bind(id.get())
            .bind(quantity)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("set_quantity", e))?;
        if updated.rows_affected() == 0 {
            return Ok(None);
        }
        self.load_one(id).await
    }

    #[instrument(skip(self), fields(article_id = %id), err)]
    async fn decrement_quantity(&self, id: ArticleId, amount: i32) -> DomainResult<StockDecrement> {
        // The row lock taken by `target` makes `available` the quantity the
        // conditional update was judged against.
        let outcome: Option<(i32, Option<i32>)> = sqlx::query_as(
            r#"
            WITH target AS (
                SELECT id, quantity FROM articles WHERE id = $1 FOR UPDATE
            ),
            decremented AS (
                UPDATE articles a
                SET quantity = a.quantity - $2
                FROM target t
                WHERE a.id = t.id AND t.quantity >= $2
                RETURNING a.quantity
            )
            SELECT t.quantity AS available, (SELECT quantity FROM decremented) AS remaining
            FROM target t
            "#,
        )
        .bind(id.get())
        .bind(amount)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("decrement_quantity", e))?;

        match outcome {
            None => Ok(StockDecrement::NotFound),
            Some((available, None)) => Ok(StockDecrement::Insufficient { available }),
            Some((_, Some(_))) => Ok(match self.load_one(id).await? {
                Some(article) => StockDecrement::Applied(article),
                None => StockDecrement::NotFound,
            }),
        }
    }
}
