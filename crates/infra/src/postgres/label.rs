use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use stockroom_catalog::{Brand, Category, Label, NewBrand, NewCategory};
use stockroom_core::{BrandId, CategoryId, DomainError, DomainResult, Page, PageRequest};
use stockroom_inventory::{BrandRepository, CategoryRepository, LabelSortField};
use tracing::{Span, field, instrument};

use super::filter::label_sort_key;
use super::rows::{LabelRow, label_from_row};
use super::{is_unique_violation, map_sqlx_error};

/// A label entity together with the table it lives in.
pub trait LabelTable: Label {
    const TABLE: &'static str;
}

impl LabelTable for Brand {
    const TABLE: &'static str = "brands";
}

impl LabelTable for Category {
    const TABLE: &'static str = "categories";
}

/// Brands or categories in their own table: `id BIGSERIAL`, unique `name`,
/// `description`.
#[derive(Debug)]
pub struct PgLabelStore<T> {
    pool: Arc<PgPool>,
    _label: PhantomData<fn() -> T>,
}

impl<T> Clone for PgLabelStore<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _label: PhantomData,
        }
    }
}

impl<T: LabelTable> PgLabelStore<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
            _label: PhantomData,
        }
    }

    #[instrument(skip(self), fields(table = T::TABLE), err)]
    async fn contains_name(&self, name: &str) -> DomainResult<bool> {
        let sql = format!("SELECT EXISTS (SELECT 1 FROM {} WHERE name = $1)", T::TABLE);
        sqlx::query_scalar::<_, bool>(&sql)
            .bind(name)
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("exists_by_name", e))
    }

    #[instrument(skip(self, draft), fields(table = T::TABLE, id = field::Empty), err)]
    async fn insert_draft(&self, draft: T::Draft) -> DomainResult<T> {
        let sql = format!(
            "INSERT INTO {} (name, description) VALUES ($1, $2) RETURNING id",
            T::TABLE
        );
        let id: i64 = sqlx::query_scalar(&sql)
            .bind(T::draft_name(&draft))
            .bind(T::draft_description(&draft))
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    DomainError::name_conflict(T::KIND, T::draft_name(&draft))
                } else {
                    map_sqlx_error("insert", e)
                }
            })?;
        Span::current().record("id", id);
        Ok(T::from_draft(draft, T::Id::from(id)))
    }

    #[instrument(skip(self), fields(table = T::TABLE), err)]
    async fn get(&self, id: T::Id) -> DomainResult<Option<T>> {
        let sql = format!("SELECT id, name, description FROM {} WHERE id = $1", T::TABLE);
        let raw: i64 = id.into();
        let row = sqlx::query(&sql)
            .bind(raw)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_id", e))?;
        row.map(|r| {
            LabelRow::from_row(&r)
                .map_err(|e| map_sqlx_error("decode_row", e))
                .and_then(label_from_row::<T>)
        })
        .transpose()
    }

    /// Rows for `ids`, reordered to follow the request and de-duplicated.
    #[instrument(skip(self, ids), fields(table = T::TABLE, requested = ids.len()), err)]
    async fn get_many(&self, ids: &[T::Id]) -> DomainResult<Vec<T>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let raw: Vec<i64> = ids.iter().map(|id| (*id).into()).collect();
        let sql = format!(
            "SELECT id, name, description FROM {} WHERE id = ANY($1)",
            T::TABLE
        );
        let rows = sqlx::query(&sql)
            .bind(raw)
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by_ids", e))?;

        let mut loaded = Vec::with_capacity(rows.len());
        for row in rows {
            let row = LabelRow::from_row(&row).map_err(|e| map_sqlx_error("decode_row", e))?;
            loaded.push(label_from_row::<T>(row)?);
        }

        let mut ordered: Vec<T> = Vec::with_capacity(loaded.len());
        for id in ids {
            if ordered.iter().any(|l| l.id() == id) {
                continue;
            }
            if let Some(found) = loaded.iter().find(|l| l.id() == id) {
                ordered.push(found.clone());
            }
        }
        Ok(ordered)
    }

    #[instrument(skip(self), fields(table = T::TABLE), err)]
    async fn page(&self, request: PageRequest, sort: LabelSortField) -> DomainResult<Page<T>> {
        let count_sql = format!("SELECT COUNT(*) FROM {}", T::TABLE);
        let total: i64 = sqlx::query_scalar(&count_sql)
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("count", e))?;

        let sql = format!(
            "SELECT id, name, description FROM {} ORDER BY {} {}, id ASC LIMIT $1 OFFSET $2",
            T::TABLE,
            label_sort_key(sort),
            request.direction().as_sql()
        );
        let rows = sqlx::query(&sql)
            .bind(to_i64(request.limit()))
            .bind(to_i64(request.offset()))
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_page", e))?;

        let mut content = Vec::with_capacity(rows.len());
        for row in rows {
            let row = LabelRow::from_row(&row).map_err(|e| map_sqlx_error("decode_row", e))?;
            content.push(label_from_row::<T>(row)?);
        }
        Ok(Page::new(content, &request, u64::try_from(total).unwrap_or(0)))
    }
}

pub(super) fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[async_trait]
impl BrandRepository for PgLabelStore<Brand> {
    async fn exists_by_name(&self, name: &str) -> DomainResult<bool> {
        self.contains_name(name).await
    }

    async fn insert(&self, brand: NewBrand) -> DomainResult<Brand> {
        self.insert_draft(brand).await
    }

    async fn find_by_id(&self, id: BrandId) -> DomainResult<Option<Brand>> {
        self.get(id).await
    }

    async fn find_page(
        &self,
        request: PageRequest,
        sort: LabelSortField,
    ) -> DomainResult<Page<Brand>> {
        self.page(request, sort).await
    }
}

#[async_trait]
impl CategoryRepository for PgLabelStore<Category> {
    async fn exists_by_name(&self, name: &str) -> DomainResult<bool> {
        self.contains_name(name).await
    }

    async fn insert(&self, category: NewCategory) -> DomainResult<Category> {
        self.insert_draft(category).await
    }

    async fn find_by_id(&self, id: CategoryId) -> DomainResult<Option<Category>> {
        self.get(id).await
    }

    async fn find_by_ids(&self, ids: &[CategoryId]) -> DomainResult<Vec<Category>> {
        self.get_many(ids).await
    }

    async fn find_page(
        &self,
        request: PageRequest,
        sort: LabelSortField,
    ) -> DomainResult<Page<Category>> {
        self.page(request, sort).await
    }
}
