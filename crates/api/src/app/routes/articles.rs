use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    routing::{get, patch, post},
};
use rust_decimal::Decimal;

use stockroom_catalog::{display_order, sort_categories_by_name};
use stockroom_core::{ArticleId, Page};

use super::article_sort;
use crate::app::dto::{
    self, ArticleIdsRequest, ArticleResponse, ArticleSearchRequest, CreateArticleRequest,
    PageQuery, QuantityRequest,
};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_articles).post(create_article))
        .route("/search", post(search_articles))
        .route("/by-ids", post(articles_by_ids))
        .route("/:id", get(article_exists))
        .route("/:id/detail", get(get_article))
        .route("/:id/quantity", patch(update_quantity))
        .route("/:id/availability/:quantity", get(stock_available))
        .route("/:id/reduce", post(reduce_stock))
        .route("/:id/price", get(get_price))
}

pub async fn create_article(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<CreateArticleRequest>,
) -> Result<(StatusCode, Json<ArticleResponse>), ApiError> {
    let article = services
        .assembler
        .assemble_and_save(dto::article_draft(body), &services.articles)
        .await?;
    Ok((StatusCode::CREATED, Json(dto::article_response(&article))))
}

/// Unfiltered listing, in display order.
pub async fn list_articles(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<ArticleResponse>>, ApiError> {
    let mut page = services
        .articles
        .get_page(query.page_request()?, article_sort(&query)?)
        .await?;
    display_order(&mut page.content);
    Ok(Json(page.map(|a| dto::article_response(&a))))
}

pub async fn search_articles(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<PageQuery>,
    Json(body): Json<ArticleSearchRequest>,
) -> Result<Json<Page<ArticleResponse>>, ApiError> {
    let filter = dto::article_filter(body);
    let page = services
        .articles
        .get_filtered_page(query.page_request()?, article_sort(&query)?, &filter)
        .await?;
    Ok(Json(page.map(|mut a| {
        sort_categories_by_name(&mut a);
        dto::article_response(&a)
    })))
}

pub async fn articles_by_ids(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<ArticleIdsRequest>,
) -> Result<Json<Vec<ArticleResponse>>, ApiError> {
    let found = services
        .articles
        .get_all_by_ids(&dto::article_ids(body))
        .await?;
    Ok(Json(found.iter().map(dto::article_response).collect()))
}

pub async fn article_exists(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<bool>, ApiError> {
    let id: ArticleId = id.parse()?;
    Ok(Json(services.articles.exists_by_id(id).await?))
}

pub async fn get_article(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<ArticleResponse>, ApiError> {
    let id: ArticleId = id.parse()?;
    let article = services.articles.get_by_id(id).await?;
    Ok(Json(dto::article_response(&article)))
}

pub async fn update_quantity(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<QuantityRequest>,
) -> Result<Json<ArticleResponse>, ApiError> {
    let id: ArticleId = id.parse()?;
    let article = services.articles.update_quantity(id, body.quantity).await?;
    Ok(Json(dto::article_response(&article)))
}

pub async fn stock_available(
    Extension(services): Extension<Arc<AppServices>>,
    Path((id, quantity)): Path<(String, i32)>,
) -> Result<Json<bool>, ApiError> {
    let id: ArticleId = id.parse()?;
    Ok(Json(services.articles.is_stock_available(id, quantity).await?))
}

pub async fn reduce_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<QuantityRequest>,
) -> Result<Json<ArticleResponse>, ApiError> {
    let id: ArticleId = id.parse()?;
    let article = services.articles.reduce_stock(id, body.quantity).await?;
    Ok(Json(dto::article_response(&article)))
}

pub async fn get_price(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<Decimal>, ApiError> {
    let id: ArticleId = id.parse()?;
    Ok(Json(services.articles.get_price_by_id(id).await?))
}
