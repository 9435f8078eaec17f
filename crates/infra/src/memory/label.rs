use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use stockroom_catalog::{Brand, Category, Label, NewBrand, NewCategory};
use stockroom_core::{BrandId, CategoryId, DomainError, DomainResult, Page, PageRequest};
use stockroom_inventory::{BrandRepository, CategoryRepository, LabelSortField};

use super::{paginate, poisoned};

/// Brands or categories, keyed by id, with names unique per store.
#[derive(Debug)]
pub struct InMemoryLabelStore<T: Label> {
    inner: RwLock<LabelState<T>>,
}

#[derive(Debug)]
struct LabelState<T: Label> {
    next_id: i64,
    rows: BTreeMap<T::Id, T>,
}

impl<T: Label> InMemoryLabelStore<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(LabelState {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
        }
    }

    fn contains_name(&self, name: &str) -> DomainResult<bool> {
        let state = self.inner.read().map_err(|_| poisoned(T::KIND.as_str()))?;
        Ok(state.rows.values().any(|row| row.name() == name))
    }

    fn insert_draft(&self, draft: T::Draft) -> DomainResult<T> {
        let mut state = self.inner.write().map_err(|_| poisoned(T::KIND.as_str()))?;
        let name = T::draft_name(&draft);
        if state.rows.values().any(|row| row.name() == name) {
            return Err(DomainError::name_conflict(T::KIND, name));
        }
        let id = T::Id::from(state.next_id);
        state.next_id += 1;
        let saved = T::from_draft(draft, id);
        state.rows.insert(id, saved.clone());
        Ok(saved)
    }

    fn get(&self, id: T::Id) -> DomainResult<Option<T>> {
        let state = self.inner.read().map_err(|_| poisoned(T::KIND.as_str()))?;
        Ok(state.rows.get(&id).cloned())
    }

    fn get_many(&self, ids: &[T::Id]) -> DomainResult<Vec<T>> {
        let state = self.inner.read().map_err(|_| poisoned(T::KIND.as_str()))?;
        let mut found: Vec<T> = Vec::with_capacity(ids.len());
        for id in ids {
            if found.iter().any(|row| row.id() == id) {
                continue;
            }
            if let Some(row) = state.rows.get(id) {
                found.push(row.clone());
            }
        }
        Ok(found)
    }

    fn page(&self, request: PageRequest, sort: LabelSortField) -> DomainResult<Page<T>> {
        let state = self.inner.read().map_err(|_| poisoned(T::KIND.as_str()))?;
        let mut rows: Vec<T> = state.rows.values().cloned().collect();
        drop(state);
        rows.sort_by(|a, b| sort.order(request.direction(), a, b));
        Ok(paginate(rows, &request))
    }
}

impl<T: Label> Default for InMemoryLabelStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BrandRepository for InMemoryLabelStore<Brand> {
    async fn exists_by_name(&self, name: &str) -> DomainResult<bool> {
        self.contains_name(name)
    }

    async fn insert(&self, brand: NewBrand) -> DomainResult<Brand> {
        self.insert_draft(brand)
    }

    async fn find_by_id(&self, id: BrandId) -> DomainResult<Option<Brand>> {
        self.get(id)
    }

    async fn find_page(
        &self,
        request: PageRequest,
        sort: LabelSortField,
    ) -> DomainResult<Page<Brand>> {
        self.page(request, sort)
    }
}

#[async_trait]
impl CategoryRepository for InMemoryLabelStore<Category> {
    async fn exists_by_name(&self, name: &str) -> DomainResult<bool> {
        self.contains_name(name)
    }

    async fn insert(&self, category: NewCategory) -> DomainResult<Category> {
        self.insert_draft(category)
    }

    async fn find_by_id(&self, id: CategoryId) -> DomainResult<Option<Category>> {
        self.get(id)
    }

    async fn find_by_ids(&self, ids: &[CategoryId]) -> DomainResult<Vec<Category>> {
        self.get_many(ids)
    }

    async fn find_page(
        &self,
        request: PageRequest,
        sort: LabelSortField,
    ) -> DomainResult<Page<Category>> {
        self.page(request, sort)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::{EntityKind, SortDirection};

    fn brand(name: &str, desc: &str) -> NewBrand {
        NewBrand::new(name, desc).unwrap()
    }

    #[test]
    fn ids_are_assigned_from_one() {
        let store = InMemoryLabelStore::<Brand>::new();
        let a = store.insert_draft(brand("Acme", "d")).unwrap();
        let b = store.insert_draft(brand("Globex", "d")).unwrap();
        assert_eq!(a.id_typed(), BrandId::new(1));
        assert_eq!(b.id_typed(), BrandId::new(2));
    }

    #[test]
    fn duplicate_name_is_rejected_at_insert() {
        let store = InMemoryLabelStore::<Brand>::new();
        store.insert_draft(brand("Acme", "d")).unwrap();
        let err = store.insert_draft(brand("Acme", "other")).unwrap_err();
        assert_eq!(err, DomainError::name_conflict(EntityKind::Brand, "Acme"));
    }

    #[test]
    fn names_are_case_sensitive() {
        let store = InMemoryLabelStore::<Brand>::new();
        store.insert_draft(brand("Acme", "d")).unwrap();
        assert!(store.insert_draft(brand("ACME", "d")).is_ok());
    }

    #[test]
    fn find_by_ids_keeps_request_order_and_drops_unknown() {
        let store = InMemoryLabelStore::<Category>::new();
        for name in ["Phones", "Audio", "Tablets"] {
            store.insert_draft(NewCategory::new(name, "d").unwrap()).unwrap();
        }
        let ids = [CategoryId::new(3), CategoryId::new(99), CategoryId::new(1), CategoryId::new(3)];
        let found = store.get_many(&ids).unwrap();
        let names: Vec<_> = found.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["Tablets", "Phones"]);
    }

    #[test]
    fn page_is_sorted_by_requested_field() {
        let store = InMemoryLabelStore::<Brand>::new();
        store.insert_draft(brand("Beta", "z")).unwrap();
        store.insert_draft(brand("Alpha", "y")).unwrap();
        store.insert_draft(brand("Gamma", "x")).unwrap();

        let req = PageRequest::new(0, 2, SortDirection::Descending).unwrap();
        let page = store.page(req, LabelSortField::Name).unwrap();
        let names: Vec<_> = page.content.iter().map(|b| b.name()).collect();
        assert_eq!(names, vec!["Gamma", "Beta"]);
        assert_eq!(page.total_elements, 3);
        assert_eq!(page.total_pages, 2);
    }
}
