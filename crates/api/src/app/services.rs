use std::sync::Arc;

use sqlx::PgPool;
use stockroom_infra::{
    InMemoryArticleStore, InMemoryBrandStore, InMemoryCategoryStore, PgArticleStore, PgBrandStore,
    PgCategoryStore,
};
use stockroom_inventory::{
    ArticleAssembler, ArticleRepository, ArticleService, BrandRepository, BrandService,
    CategoryRepository, CategoryService, ServiceConfig,
};
use tracing::info;

use crate::config::AppConfig;

pub type Brands = Arc<dyn BrandRepository>;
pub type Categories = Arc<dyn CategoryRepository>;
pub type Articles = Arc<dyn ArticleRepository>;

/// Every use-case service the routes call, wired to one set of stores.
pub struct AppServices {
    pub brands: BrandService<Brands>,
    pub categories: CategoryService<Categories, Articles>,
    pub articles: ArticleService<Articles>,
    pub assembler: ArticleAssembler<Brands, Categories>,
}

impl AppServices {
    pub fn from_stores(
        brands: Brands,
        categories: Categories,
        articles: Articles,
        config: ServiceConfig,
    ) -> Self {
        Self {
            brands: BrandService::new(brands.clone(), config),
            categories: CategoryService::new(categories.clone(), articles.clone(), config),
            articles: ArticleService::new(articles, config),
            assembler: ArticleAssembler::new(brands, categories),
        }
    }

    pub fn in_memory(config: ServiceConfig) -> Self {
        Self::from_stores(
            Arc::new(InMemoryBrandStore::new()),
            Arc::new(InMemoryCategoryStore::new()),
            Arc::new(InMemoryArticleStore::new()),
            config,
        )
    }

    pub fn postgres(pool: PgPool, config: ServiceConfig) -> Self {
        Self::from_stores(
            Arc::new(PgBrandStore::new(pool.clone())),
            Arc::new(PgCategoryStore::new(pool.clone())),
            Arc::new(PgArticleStore::new(pool)),
            config,
        )
    }
}

/// Postgres when a database is configured, in-memory otherwise.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    match &config.database {
        Some(settings) => {
            let pool = stockroom_infra::connect(settings).await?;
            info!("using postgres stores");
            Ok(AppServices::postgres(pool, config.service))
        }
        None => {
            info!("DATABASE_URL not set; using in-memory stores");
            Ok(AppServices::in_memory(config.service))
        }
    }
}
