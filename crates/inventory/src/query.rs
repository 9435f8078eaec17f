//! Filtered pagination: sort-field allow-lists and article filter criteria.
//!
//! A filter is a small ordered set of optional values. Each value that is
//! present and non-empty becomes one [`ArticleCriterion`]; absent or empty
//! values contribute nothing. Storage adapters translate every criterion on
//! its own (an in-memory predicate, one SQL fragment, ...) and AND them
//! together, so a filter with nothing set is exactly the unfiltered listing.

use core::cmp::Ordering;
use core::str::FromStr;

use stockroom_catalog::{Article, Label};
use stockroom_core::{ArticleId, DomainError, SortDirection};

/// Columns an article listing may be sorted by.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum ArticleSortField {
    Id,
    #[default]
    Name,
    Description,
    Quantity,
    Price,
}

impl ArticleSortField {
    /// Ascending comparison on this field alone.
    pub fn compare(self, a: &Article, b: &Article) -> Ordering {
        match self {
            ArticleSortField::Id => a.id_typed().cmp(&b.id_typed()),
            ArticleSortField::Name => a.name().cmp(b.name()),
            ArticleSortField::Description => a.description().cmp(b.description()),
            ArticleSortField::Quantity => a.quantity().cmp(&b.quantity()),
            ArticleSortField::Price => a.price().cmp(&b.price()),
        }
    }

    /// Full listing order: this field in `direction`, then id ascending.
    pub fn order(self, direction: SortDirection, a: &Article, b: &Article) -> Ordering {
        direction
            .apply(self.compare(a, b))
            .then_with(|| a.id_typed().cmp(&b.id_typed()))
    }
}

impl FromStr for ArticleSortField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(ArticleSortField::Id),
            "name" => Ok(ArticleSortField::Name),
            "description" => Ok(ArticleSortField::Description),
            "quantity" => Ok(ArticleSortField::Quantity),
            "price" => Ok(ArticleSortField::Price),
            other => Err(DomainError::validation(format!(
                "cannot sort articles by '{other}' \
                 (expected id, name, description, quantity or price)"
            ))),
        }
    }
}

/// Columns a brand or category listing may be sorted by.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum LabelSortField {
    Id,
    #[default]
    Name,
    Description,
}

impl LabelSortField {
    /// Full listing order: this field in `direction`, then id ascending.
    pub fn order<L: Label>(self, direction: SortDirection, a: &L, b: &L) -> Ordering {
        let primary = match self {
            LabelSortField::Id => a.id().cmp(b.id()),
            LabelSortField::Name => a.name().cmp(b.name()),
            LabelSortField::Description => a.description().cmp(b.description()),
        };
        direction.apply(primary).then_with(|| a.id().cmp(b.id()))
    }
}

pub type BrandSortField = LabelSortField;
pub type CategorySortField = LabelSortField;

impl FromStr for LabelSortField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(LabelSortField::Id),
            "name" => Ok(LabelSortField::Name),
            "description" => Ok(LabelSortField::Description),
            other => Err(DomainError::validation(format!(
                "cannot sort by '{other}' (expected id, name or description)"
            ))),
        }
    }
}

/// Optional filters for an article listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleFilter {
    /// Restrict to these ids. `None` or empty means no restriction.
    pub ids: Option<Vec<ArticleId>>,
    /// Exact name of a category the article must carry.
    pub category_name: Option<String>,
    /// Exact name of the article's brand.
    pub brand_name: Option<String>,
}

impl ArticleFilter {
    pub fn with_ids(mut self, ids: Vec<ArticleId>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn with_category_name(mut self, name: impl Into<String>) -> Self {
        self.category_name = Some(name.into());
        self
    }

    pub fn with_brand_name(mut self, name: impl Into<String>) -> Self {
        self.brand_name = Some(name.into());
        self
    }

    pub fn id_criterion(&self) -> Option<ArticleCriterion<'_>> {
        match self.ids.as_deref() {
            None | Some([]) => None,
            Some(ids) => Some(ArticleCriterion::IdIn(ids)),
        }
    }

    pub fn category_criterion(&self) -> Option<ArticleCriterion<'_>> {
        non_empty(self.category_name.as_deref()).map(ArticleCriterion::CategoryName)
    }

    pub fn brand_criterion(&self) -> Option<ArticleCriterion<'_>> {
        non_empty(self.brand_name.as_deref()).map(ArticleCriterion::BrandName)
    }

    /// Criteria to AND together, in a fixed order: ids, category, brand.
    pub fn criteria(&self) -> Vec<ArticleCriterion<'_>> {
        [
            self.id_criterion(),
            self.category_criterion(),
            self.brand_criterion(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    pub fn is_noop(&self) -> bool {
        self.criteria().is_empty()
    }

    pub fn matches(&self, article: &Article) -> bool {
        self.criteria().iter().all(|c| c.matches(article))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// One active filter condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArticleCriterion<'a> {
    IdIn(&'a [ArticleId]),
    CategoryName(&'a str),
    BrandName(&'a str),
}

impl ArticleCriterion<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            ArticleCriterion::IdIn(_) => "id_in",
            ArticleCriterion::CategoryName(_) => "category_name",
            ArticleCriterion::BrandName(_) => "brand_name",
        }
    }

    pub fn matches(&self, article: &Article) -> bool {
        match self {
            ArticleCriterion::IdIn(ids) => ids.contains(&article.id_typed()),
            ArticleCriterion::CategoryName(name) => article.has_category_named(name),
            ArticleCriterion::BrandName(name) => article.brand().name() == *name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use stockroom_catalog::{Brand, Category, NewArticle, NewBrand, NewCategory};
    use stockroom_core::{BrandId, CategoryId};

    fn article(id: i64, name: &str, brand: &str, categories: &[&str]) -> Article {
        let brand = Brand::from_draft(NewBrand::new(brand, "desc").unwrap(), BrandId::new(1));
        let categories = categories
            .iter()
            .enumerate()
            .map(|(i, c)| {
                Category::from_draft(
                    NewCategory::new(*c, "desc").unwrap(),
                    CategoryId::new(i as i64 + 1),
                )
            })
            .collect();
        NewArticle::new(name, "d", 1, Decimal::ONE, brand, categories)
            .unwrap()
            .into_article(ArticleId::new(id))
    }

    #[test]
    fn absent_and_empty_values_are_noops() {
        assert!(ArticleFilter::default().is_noop());

        let empty = ArticleFilter::default()
            .with_ids(vec![])
            .with_category_name("")
            .with_brand_name("");
        assert!(empty.id_criterion().is_none());
        assert!(empty.category_criterion().is_none());
        assert!(empty.brand_criterion().is_none());
        assert!(empty.is_noop());
    }

    #[test]
    fn criteria_keep_fixed_order() {
        let filter = ArticleFilter::default()
            .with_brand_name("Acme")
            .with_category_name("Phones")
            .with_ids(vec![ArticleId::new(1)]);
        let names: Vec<_> = filter.criteria().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["id_in", "category_name", "brand_name"]);
    }

    #[test]
    fn criteria_are_anded() {
        let phone = article(1, "X1", "Acme", &["Phones"]);
        let other_brand = article(2, "Y1", "Globex", &["Phones"]);
        let other_category = article(3, "Z1", "Acme", &["Audio"]);

        let filter = ArticleFilter::default()
            .with_brand_name("Acme")
            .with_category_name("Phones");

        assert!(filter.matches(&phone));
        assert!(!filter.matches(&other_brand));
        assert!(!filter.matches(&other_category));
    }

    #[test]
    fn category_match_is_exact_and_any_of() {
        let a = article(1, "X1", "Acme", &["Audio", "Phones"]);
        assert!(ArticleCriterion::CategoryName("Phones").matches(&a));
        assert!(!ArticleCriterion::CategoryName("phones").matches(&a));
    }

    #[test]
    fn id_allow_list_restricts() {
        let a = article(1, "X1", "Acme", &["Phones"]);
        let ids = [ArticleId::new(2)];
        assert!(!ArticleCriterion::IdIn(&ids).matches(&a));
    }

    #[test]
    fn sort_fields_parse_case_insensitively() {
        assert_eq!("Price".parse::<ArticleSortField>().unwrap(), ArticleSortField::Price);
        assert_eq!("name".parse::<LabelSortField>().unwrap(), LabelSortField::Name);
        assert!("brand; DROP TABLE".parse::<ArticleSortField>().is_err());
        assert!("quantity".parse::<LabelSortField>().is_err());
    }

    #[test]
    fn ordering_breaks_ties_by_id() {
        let a = article(2, "Same", "Acme", &["Phones"]);
        let b = article(1, "Same", "Acme", &["Phones"]);
        let ord = ArticleSortField::Name.order(SortDirection::Descending, &a, &b);
        assert_eq!(ord, Ordering::Greater);
    }
}
