//! In-memory persistence adapters for tests and local runs.
//!
//! State sits behind a `std::sync::RwLock`. Every port call takes the lock
//! once, so a check and the write that depends on it (unique name on insert,
//! sufficient stock on decrement) happen under the same guard. A poisoned
//! lock surfaces as `DomainError::Store`.

mod article;
mod label;

pub use article::InMemoryArticleStore;
pub use label::InMemoryLabelStore;

use stockroom_catalog::{Brand, Category};
use stockroom_core::{DomainError, Page, PageRequest};

pub type InMemoryBrandStore = InMemoryLabelStore<Brand>;
pub type InMemoryCategoryStore = InMemoryLabelStore<Category>;

fn poisoned(store: &str) -> DomainError {
    DomainError::store(format!("{store} lock poisoned"))
}

/// Cut one page out of an already sorted listing.
fn paginate<T>(sorted: Vec<T>, request: &PageRequest) -> Page<T> {
    let total = sorted.len() as u64;
    let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(request.limit()).unwrap_or(usize::MAX);
    let content = sorted.into_iter().skip(offset).take(limit).collect();
    Page::new(content, request, total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_core::SortDirection;

    #[test]
    fn paginate_slices_and_counts() {
        let req = PageRequest::new(1, 2, SortDirection::Ascending).unwrap();
        let page = paginate(vec![1, 2, 3, 4, 5], &req);
        assert_eq!(page.content, vec![3, 4]);
        assert_eq!(page.total_elements, 5);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn page_past_the_end_is_empty_but_keeps_totals() {
        let req = PageRequest::new(10, 2, SortDirection::Ascending).unwrap();
        let page = paginate(vec![1, 2, 3], &req);
        assert!(page.content.is_empty());
        assert_eq!(page.number_of_elements, 0);
        assert_eq!(page.total_elements, 3);
    }
}
