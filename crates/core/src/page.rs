//! Pagination value types shared by every listing operation.
//!
//! A listing is always requested as a 0-based page window with a sort
//! direction; the answer carries the page contents plus both the total
//! element count and the total page count, so callers never have to guess
//! which of the two a single "total" field meant.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Sort direction of a listing.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        }
    }

    pub fn is_ascending(self) -> bool {
        self == SortDirection::Ascending
    }

    /// SQL keyword for `ORDER BY`.
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }

    /// Apply this direction to an ascending comparison result.
    pub fn apply(self, ordering: core::cmp::Ordering) -> core::cmp::Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// A validated page window.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page: u32,
    size: u32,
    direction: SortDirection,
}

impl PageRequest {
    /// `size` must be at least 1.
    pub fn new(page: u32, size: u32, direction: SortDirection) -> DomainResult<Self> {
        if size == 0 {
            return Err(DomainError::validation("page size must be greater than zero"));
        }
        Ok(Self {
            page,
            size,
            direction,
        })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Number of elements to skip before this page starts.
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.size)
    }

    /// Reject windows larger than the configured maximum.
    pub fn ensure_max_size(&self, max_size: u32) -> DomainResult<()> {
        if self.size > max_size {
            return Err(DomainError::validation(format!(
                "page size {} exceeds the maximum of {max_size}",
                self.size
            )));
        }
        Ok(())
    }
}

/// `ceil(total_elements / page_size)`; zero for an empty result.
pub fn total_pages(total_elements: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total_elements.div_ceil(u64::from(page_size))
}

/// One page of a listing plus its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page_number: u32,
    pub page_size: u32,
    /// Elements on this page (`content.len()`).
    pub number_of_elements: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let number_of_elements = u32::try_from(content.len()).unwrap_or(u32::MAX);
        Self {
            content,
            page_number: request.page(),
            page_size: request.size(),
            number_of_elements,
            total_elements,
            total_pages: total_pages(total_elements, request.size()),
        }
    }

    pub fn empty(request: &PageRequest) -> Self {
        Self::new(Vec::new(), request, 0)
    }

    /// Whether a page after this one exists.
    pub fn has_next(&self) -> bool {
        u64::from(self.page_number) + 1 < self.total_pages
    }

    /// Convert the contents while keeping the metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            page_number: self.page_number,
            page_size: self.page_size,
            number_of_elements: self.number_of_elements,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_size_is_rejected() {
        let err = PageRequest::new(0, 0, SortDirection::Ascending).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn offset_is_page_times_size() {
        let req = PageRequest::new(3, 25, SortDirection::Descending).unwrap();
        assert_eq!(req.offset(), 75);
        assert_eq!(req.limit(), 25);
    }

    #[test]
    fn max_size_is_enforced() {
        let req = PageRequest::new(0, 101, SortDirection::Ascending).unwrap();
        assert!(req.ensure_max_size(100).is_err());
        assert!(req.ensure_max_size(101).is_ok());
    }

    #[test]
    fn page_metadata_reports_both_totals() {
        let req = PageRequest::new(0, 2, SortDirection::Ascending).unwrap();
        let page = Page::new(vec!["A", "B"], &req, 5);
        assert_eq!(page.number_of_elements, 2);
        assert_eq!(page.total_elements, 5);
        assert_eq!(page.total_pages, 3);
        assert!(page.has_next());
    }

    #[test]
    fn empty_page_has_no_pages() {
        let req = PageRequest::new(0, 10, SortDirection::Ascending).unwrap();
        let page: Page<u8> = Page::empty(&req);
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next());
    }

    #[test]
    fn descending_reverses_ordering() {
        use core::cmp::Ordering;
        assert_eq!(SortDirection::Descending.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(SortDirection::Ascending.apply(Ordering::Less), Ordering::Less);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: total_pages == ceil(total_elements / page_size) for non-empty results.
            #[test]
            fn total_pages_is_ceiling_division(total in 1u64..1_000_000, size in 1u32..10_000) {
                let pages = total_pages(total, size);
                let size = u64::from(size);
                prop_assert!(pages * size >= total);
                prop_assert!((pages - 1) * size < total);
            }
        }
    }
}
