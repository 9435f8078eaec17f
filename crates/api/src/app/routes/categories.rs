use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    routing::get,
};

use stockroom_core::{ArticleId, CategoryId, Page};

use super::label_sort;
use crate::app::dto::{self, CategoryResponse, CreateLabelRequest, PageQuery};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/:id", get(get_category))
        .route("/by-article/:article_id", get(category_names_by_article))
}

pub async fn create_category(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<CreateLabelRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), ApiError> {
    let category = services.categories.save(dto::new_category(body)?).await?;
    Ok((StatusCode::CREATED, Json(dto::category_response(&category))))
}

pub async fn list_categories(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<CategoryResponse>>, ApiError> {
    let page = services
        .categories
        .get_page(query.page_request()?, label_sort(&query)?)
        .await?;
    Ok(Json(page.map(|c| dto::category_response(&c))))
}

pub async fn get_category(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<CategoryResponse>, ApiError> {
    let id: CategoryId = id.parse()?;
    let category = services.categories.get_by_id(id).await?;
    Ok(Json(dto::category_response(&category)))
}

pub async fn category_names_by_article(
    Extension(services): Extension<Arc<AppServices>>,
    Path(article_id): Path<String>,
) -> Result<Json<Vec<String>>, ApiError> {
    let article_id: ArticleId = article_id.parse()?;
    let names = services
        .categories
        .get_category_names_by_article_id(article_id)
        .await?;
    Ok(Json(names))
}
