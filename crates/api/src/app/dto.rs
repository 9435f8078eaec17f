use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockroom_catalog::{Article, Brand, Category, NewBrand, NewCategory};
use stockroom_core::{
    ArticleId, BrandId, CategoryId, DomainResult, PageRequest, SortDirection,
};
use stockroom_inventory::{ArticleDraft, ArticleFilter};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreateLabelRequest {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateArticleRequest {
    pub name: String,
    pub description: String,
    pub quantity: i32,
    pub price: Decimal,
    pub brand_id: i64,
    pub category_ids: Vec<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ArticleSearchRequest {
    pub article_ids: Option<Vec<i64>>,
    pub category_name: Option<String>,
    pub brand_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ArticleIdsRequest {
    pub article_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct QuantityRequest {
    pub quantity: i32,
}

/// `?page&size&sort&ascending` of every listing endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort: Option<String>,
    pub ascending: Option<bool>,
}

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_SORT: &str = "name";

impl PageQuery {
    pub fn page_request(&self) -> DomainResult<PageRequest> {
        PageRequest::new(
            self.page.unwrap_or(0),
            self.size.unwrap_or(DEFAULT_PAGE_SIZE),
            SortDirection::from_ascending(self.ascending.unwrap_or(true)),
        )
    }

    pub fn sort(&self) -> &str {
        self.sort.as_deref().unwrap_or(DEFAULT_SORT)
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub quantity: i32,
    pub price: Decimal,
    pub brand: BrandResponse,
    pub categories: Vec<CategoryResponse>,
}

// -------------------------
// Mapping
// -------------------------

pub fn new_brand(body: CreateLabelRequest) -> DomainResult<NewBrand> {
    NewBrand::new(body.name, body.description)
}

pub fn new_category(body: CreateLabelRequest) -> DomainResult<NewCategory> {
    NewCategory::new(body.name, body.description)
}

pub fn article_draft(body: CreateArticleRequest) -> ArticleDraft {
    ArticleDraft {
        name: body.name,
        description: body.description,
        quantity: body.quantity,
        price: body.price,
        brand_id: BrandId::new(body.brand_id),
        category_ids: body.category_ids.into_iter().map(CategoryId::new).collect(),
    }
}

pub fn article_filter(body: ArticleSearchRequest) -> ArticleFilter {
    ArticleFilter {
        ids: body
            .article_ids
            .map(|ids| ids.into_iter().map(ArticleId::new).collect()),
        category_name: body.category_name,
        brand_name: body.brand_name,
    }
}

pub fn article_ids(body: ArticleIdsRequest) -> Vec<ArticleId> {
    body.article_ids.into_iter().map(ArticleId::new).collect()
}

pub fn brand_response(brand: &Brand) -> BrandResponse {
    BrandResponse {
        id: brand.id_typed().get(),
        name: brand.name().to_string(),
        description: brand.description().to_string(),
    }
}

pub fn category_response(category: &Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id_typed().get(),
        name: category.name().to_string(),
        description: category.description().to_string(),
    }
}

pub fn article_response(article: &Article) -> ArticleResponse {
    ArticleResponse {
        id: article.id_typed().get(),
        name: article.name().to_string(),
        description: article.description().to_string(),
        quantity: article.quantity(),
        price: article.price(),
        brand: brand_response(article.brand()),
        categories: article.categories().iter().map(category_response).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::DomainError;

    #[test]
    fn page_query_defaults() {
        let query = PageQuery::default();
        let req = query.page_request().unwrap();
        assert_eq!(req.page(), 0);
        assert_eq!(req.size(), 10);
        assert!(req.direction().is_ascending());
        assert_eq!(query.sort(), "name");
    }

    #[test]
    fn zero_size_is_a_validation_error() {
        let query = PageQuery {
            size: Some(0),
            ..PageQuery::default()
        };
        assert!(matches!(query.page_request(), Err(DomainError::Validation(_))));
    }

    #[test]
    fn search_body_maps_to_filter() {
        let body: ArticleSearchRequest =
            serde_json::from_str(r#"{"article_ids":[3,1],"brand_name":"Acme"}"#).unwrap();
        let filter = article_filter(body);
        assert_eq!(filter.ids, Some(vec![ArticleId::new(3), ArticleId::new(1)]));
        assert_eq!(filter.brand_name.as_deref(), Some("Acme"));
        assert!(filter.category_name.is_none());
    }

    #[test]
    fn price_accepts_numbers_and_strings() {
        for (price, expected) in [
            (serde_json::json!("19.99"), Decimal::new(1999, 2)),
            (serde_json::json!(500), Decimal::new(500, 0)),
        ] {
            let body = serde_json::json!({
                "name": "X1",
                "description": "d",
                "quantity": 1,
                "price": price,
                "brand_id": 1,
                "category_ids": [1],
            });
            let parsed: CreateArticleRequest = serde_json::from_value(body).unwrap();
            assert_eq!(parsed.price, expected);
        }
    }
}
