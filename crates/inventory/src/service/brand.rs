use stockroom_catalog::{Brand, NewBrand};
use stockroom_core::{BrandId, DomainError, DomainResult, EntityKind, Page, PageRequest};
use tracing::{Span, debug, field, info, instrument, warn};

use super::check_page;
use crate::config::ServiceConfig;
use crate::ports::BrandRepository;
use crate::query::BrandSortField;

/// Brand use cases: save with name uniqueness, lookup and listing.
pub struct BrandService<B> {
    brands: B,
    config: ServiceConfig,
}

impl<B: BrandRepository> BrandService<B> {
    pub fn new(brands: B, config: ServiceConfig) -> Self {
        Self { brands, config }
    }

    #[instrument(
        skip(self, brand),
        fields(brand_name = %brand.name(), brand_id = field::Empty),
        err
    )]
    pub async fn save(&self, brand: NewBrand) -> DomainResult<Brand> {
        if self.brands.exists_by_name(brand.name()).await? {
            warn!(brand_name = %brand.name(), "brand name already taken");
            return Err(DomainError::name_conflict(EntityKind::Brand, brand.name()));
        }
        let saved = self.brands.insert(brand).await?;
        Span::current().record("brand_id", saved.id_typed().get());
        info!("brand saved");
        Ok(saved)
    }

    #[instrument(skip(self), fields(brand_id = %id), err)]
    pub async fn get_by_id(&self, id: BrandId) -> DomainResult<Brand> {
        self.brands
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::Brand, id))
    }

    #[instrument(skip(self), err)]
    pub async fn get_page(
        &self,
        request: PageRequest,
        sort: BrandSortField,
    ) -> DomainResult<Page<Brand>> {
        check_page(&self.config, &request)?;
        let page = self.brands.find_page(request, sort).await?;
        debug!(
            returned = page.number_of_elements,
            total = page.total_elements,
            "brand page loaded"
        );
        Ok(page)
    }
}
