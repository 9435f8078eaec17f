//! Display ordering applied to a page of articles after it is fetched.
//!
//! This sits on top of the store's own sort: categories inside each article
//! are ordered by name, then the articles are ordered by their first
//! (alphabetical) category name and, for ties, by how many categories they
//! carry. The sort is stable, so the store's order survives among equals.

use crate::article::Article;

/// Order an article's categories alphabetically by name.
pub fn sort_categories_by_name(article: &mut Article) {
    article
        .categories_mut()
        .sort_by(|a, b| a.name().cmp(b.name()));
}

/// Full display ordering for a page of articles.
pub fn display_order(articles: &mut [Article]) {
    for article in articles.iter_mut() {
        sort_categories_by_name(article);
    }
    articles.sort_by(|a, b| {
        let first_a = a.categories().first().map(|c| c.name());
        let first_b = b.categories().first().map(|c| c.name());
        first_a
            .cmp(&first_b)
            .then_with(|| a.categories().len().cmp(&b.categories().len()))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label::Label;
    use crate::{Brand, Category, NewArticle, NewBrand, NewCategory};
    use rust_decimal::Decimal;
    use stockroom_core::{ArticleId, BrandId, CategoryId};

    fn category(id: i64, name: &str) -> Category {
        Category::from_draft(NewCategory::new(name, "desc").unwrap(), CategoryId::new(id))
    }

    fn article(id: i64, name: &str, categories: Vec<Category>) -> Article {
        let brand = Brand::from_draft(NewBrand::new("Acme", "desc").unwrap(), BrandId::new(1));
        NewArticle::new(name, "d", 1, Decimal::ONE, brand, categories)
            .unwrap()
            .into_article(ArticleId::new(id))
    }

    fn names(articles: &[Article]) -> Vec<&str> {
        articles.iter().map(|a| a.name()).collect()
    }

    #[test]
    fn categories_are_sorted_within_article() {
        let mut a = article(1, "A", vec![category(3, "Zoom"), category(1, "Audio")]);
        sort_categories_by_name(&mut a);
        assert_eq!(a.category_names(), vec!["Audio", "Zoom"]);
    }

    #[test]
    fn articles_sorted_by_first_category_then_count() {
        let mut page = vec![
            article(1, "phone", vec![category(2, "Phones")]),
            article(2, "combo", vec![category(3, "Tablets"), category(1, "Audio")]),
            article(3, "speaker", vec![category(1, "Audio")]),
            article(4, "case", vec![category(2, "Phones"), category(4, "Accessories")]),
        ];

        display_order(&mut page);

        // "case" becomes [Accessories, Phones]; "combo" becomes [Audio, Tablets].
        assert_eq!(names(&page), vec!["case", "speaker", "combo", "phone"]);
    }

    #[test]
    fn ties_keep_store_order() {
        let mut page = vec![
            article(1, "b", vec![category(1, "Audio")]),
            article(2, "a", vec![category(1, "Audio")]),
        ];
        display_order(&mut page);
        assert_eq!(names(&page), vec!["b", "a"]);
    }
}
