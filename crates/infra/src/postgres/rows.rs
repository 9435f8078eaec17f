//! Storage rows and their conversion into domain values.
//!
//! Rows are decoded with `try_get` into plain structs, then turned into
//! domain values by the functions below. Conversion re-runs every domain
//! invariant, so a row the domain would never have produced is reported as a
//! store failure instead of leaking into a response.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::Row;
use sqlx::postgres::PgRow;
use stockroom_catalog::{Article, Brand, Category, Label};
use stockroom_core::{ArticleId, BrandId, CategoryId, DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRow {
    pub id: i64,
    pub name: String,
    pub description: String,
}

impl<'r> sqlx::FromRow<'r, PgRow> for LabelRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(LabelRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
        })
    }
}

/// An `articles` row joined with its brand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub quantity: i32,
    pub price: Decimal,
    pub brand_id: i64,
    pub brand_name: String,
    pub brand_description: String,
}

impl<'r> sqlx::FromRow<'r, PgRow> for ArticleRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(ArticleRow {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            quantity: row.try_get("quantity")?,
            price: row.try_get("price")?,
            brand_id: row.try_get("brand_id")?,
            brand_name: row.try_get("brand_name")?,
            brand_description: row.try_get("brand_description")?,
        })
    }
}

/// One `article_categories` link joined with its category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryLinkRow {
    pub article_id: i64,
    pub position: i32,
    pub category_id: i64,
    pub category_name: String,
    pub category_description: String,
}

impl<'r> sqlx::FromRow<'r, PgRow> for CategoryLinkRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(CategoryLinkRow {
            article_id: row.try_get("article_id")?,
            position: row.try_get("position")?,
            category_id: row.try_get("category_id")?,
            category_name: row.try_get("category_name")?,
            category_description: row.try_get("category_description")?,
        })
    }
}

pub fn label_from_row<T: Label>(row: LabelRow) -> DomainResult<T> {
    let id = row.id;
    T::from_parts(T::Id::from(id), row.name, row.description)
        .map_err(|e| corrupt(T::KIND.as_str(), id, e))
}

/// Build articles from their rows and category links.
///
/// Output follows the order of `articles`; each article's categories follow
/// `position`.
pub fn articles_from_rows(
    articles: Vec<ArticleRow>,
    links: Vec<CategoryLinkRow>,
) -> DomainResult<Vec<Article>> {
    let mut by_article: HashMap<i64, Vec<CategoryLinkRow>> = HashMap::new();
    for link in links {
        by_article.entry(link.article_id).or_default().push(link);
    }

    articles
        .into_iter()
        .map(|row| {
            let links = by_article.remove(&row.id).unwrap_or_default();
            article_from_row(row, links)
        })
        .collect()
}

pub fn article_from_row(row: ArticleRow, mut links: Vec<CategoryLinkRow>) -> DomainResult<Article> {
    let id = row.id;
    let brand = Brand::from_parts(BrandId::new(row.brand_id), row.brand_name, row.brand_description)
        .map_err(|e| corrupt("brand", row.brand_id, e))?;

    links.sort_by_key(|l| l.position);
    let categories = links
        .into_iter()
        .map(|l| {
            let category_id = l.category_id;
            Category::from_parts(
                CategoryId::new(category_id),
                l.category_name,
                l.category_description,
            )
            .map_err(|e| corrupt("category", category_id, e))
        })
        .collect::<DomainResult<Vec<_>>>()?;

    Article::from_parts(
        ArticleId::new(id),
        row.name,
        row.description,
        row.quantity,
        row.price,
        brand,
        categories,
    )
    .map_err(|e| corrupt("article", id, e))
}

fn corrupt(table: &str, id: i64, err: DomainError) -> DomainError {
    DomainError::store(format!("stored {table} {id} is inconsistent: {err}"))
}
