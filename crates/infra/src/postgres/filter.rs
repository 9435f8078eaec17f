//! SQL rendering of article filter criteria and sort keys.
//!
//! Each active criterion appends exactly one ` AND ...` fragment with its
//! value bound as a parameter; absent criteria append nothing. Queries using
//! this start from a `WHERE TRUE` so the fragments can always be appended.
//!
//! Text sort keys use `COLLATE "C"` so Postgres orders names byte-wise, the
//! same as the in-memory stores.

use sqlx::{Postgres, QueryBuilder};
use stockroom_inventory::{ArticleCriterion, ArticleFilter, ArticleSortField, LabelSortField};

/// Article joined with its brand. `a` is the article, `b` its brand.
pub const ARTICLE_JOIN: &str = " FROM articles a JOIN brands b ON b.id = a.brand_id";

/// [`ARTICLE_JOIN`] ready for criteria to be appended.
pub const ARTICLE_FROM: &str = " FROM articles a JOIN brands b ON b.id = a.brand_id WHERE TRUE";

/// `ORDER BY` key of an article listing, qualified with the `a` alias.
pub fn article_sort_key(sort: ArticleSortField) -> &'static str {
    match sort {
        ArticleSortField::Id => "a.id",
        ArticleSortField::Name => r#"a.name COLLATE "C""#,
        ArticleSortField::Description => r#"a.description COLLATE "C""#,
        ArticleSortField::Quantity => "a.quantity",
        ArticleSortField::Price => "a.price",
    }
}

/// `ORDER BY` key of a brand or category listing.
pub fn label_sort_key(sort: LabelSortField) -> &'static str {
    match sort {
        LabelSortField::Id => "id",
        LabelSortField::Name => r#"name COLLATE "C""#,
        LabelSortField::Description => r#"description COLLATE "C""#,
    }
}

pub fn push_criterion(builder: &mut QueryBuilder<'_, Postgres>, criterion: ArticleCriterion<'_>) {
    match criterion {
        ArticleCriterion::IdIn(ids) => {
            let ids: Vec<i64> = ids.iter().map(|id| id.get()).collect();
            builder.push(" AND a.id = ANY(");
            builder.push_bind(ids);
            builder.push(")");
        }
        ArticleCriterion::CategoryName(name) => {
            builder.push(
                " AND EXISTS (SELECT 1 FROM article_categories ac \
                 JOIN categories c ON c.id = ac.category_id \
                 WHERE ac.article_id = a.id AND c.name = ",
            );
            builder.push_bind(name.to_owned());
            builder.push(")");
        }
        ArticleCriterion::BrandName(name) => {
            builder.push(" AND b.name = ");
            builder.push_bind(name.to_owned());
        }
    }
}

/// Append every active criterion of `filter`; returns how many were added.
pub fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &ArticleFilter) -> usize {
    let criteria = filter.criteria();
    for criterion in &criteria {
        push_criterion(builder, *criterion);
    }
    criteria.len()
}
