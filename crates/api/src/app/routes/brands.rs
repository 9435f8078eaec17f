use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path, Query},
    http::StatusCode,
    routing::get,
};

use stockroom_core::{BrandId, Page};

use super::label_sort;
use crate::app::dto::{self, BrandResponse, CreateLabelRequest, PageQuery};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_brands).post(create_brand))
        .route("/:id", get(get_brand))
}

pub async fn create_brand(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<CreateLabelRequest>,
) -> Result<(StatusCode, Json<BrandResponse>), ApiError> {
    let brand = services.brands.save(dto::new_brand(body)?).await?;
    Ok((StatusCode::CREATED, Json(dto::brand_response(&brand))))
}

pub async fn list_brands(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<BrandResponse>>, ApiError> {
    let page = services
        .brands
        .get_page(query.page_request()?, label_sort(&query)?)
        .await?;
    Ok(Json(page.map(|b| dto::brand_response(&b))))
}

pub async fn get_brand(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<BrandResponse>, ApiError> {
    let id: BrandId = id.parse()?;
    let brand = services.brands.get_by_id(id).await?;
    Ok(Json(dto::brand_response(&brand)))
}
