use std::collections::HashSet;

use rust_decimal::Decimal;
use stockroom_core::{ArticleId, DomainError, DomainResult, Entity, EntityKind};

use crate::brand::Brand;
use crate::category::Category;
use crate::rules::{
    ARTICLE_DESCRIPTION_MAX_CHARS, MAX_CATEGORIES, MIN_CATEGORIES, NAME_MAX_CHARS, required_text,
};

/// An article that has not been saved yet, with its brand and categories
/// already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArticle {
    name: String,
    description: String,
    quantity: i32,
    price: Decimal,
    brand: Brand,
    categories: Vec<Category>,
}

impl NewArticle {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        quantity: i32,
        price: Decimal,
        brand: Brand,
        categories: Vec<Category>,
    ) -> DomainResult<Self> {
        let name = name.into();
        let description = description.into();

        required_text("article name", &name, NAME_MAX_CHARS)?;
        required_text("article description", &description, ARTICLE_DESCRIPTION_MAX_CHARS)?;
        if quantity < 0 {
            return Err(DomainError::validation("article quantity cannot be negative"));
        }
        ensure_price(price)?;
        ensure_categories(&categories)?;

        Ok(Self {
            name,
            description,
            quantity,
            price,
            brand,
            categories,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn brand(&self) -> &Brand {
        &self.brand
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Attach the store-assigned identity.
    pub fn into_article(self, id: ArticleId) -> Article {
        Article {
            id,
            name: self.name,
            description: self.description,
            quantity: self.quantity,
            price: self.price,
            brand: self.brand,
            categories: self.categories,
        }
    }
}

/// A sellable product record.
///
/// `quantity` is the only attribute that changes after creation, and it never
/// goes below zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    id: ArticleId,
    name: String,
    description: String,
    quantity: i32,
    price: Decimal,
    brand: Brand,
    categories: Vec<Category>,
}

impl Article {
    /// Rehydrate a stored article, re-checking every invariant.
    pub fn from_parts(
        id: ArticleId,
        name: String,
        description: String,
        quantity: i32,
        price: Decimal,
        brand: Brand,
        categories: Vec<Category>,
    ) -> DomainResult<Self> {
        let draft = NewArticle::new(name, description, quantity, price, brand, categories)?;
        Ok(draft.into_article(id))
    }

    pub fn id_typed(&self) -> ArticleId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn brand(&self) -> &Brand {
        &self.brand
    }

    /// Categories in the order they were attached.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category_names(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.name().to_string()).collect()
    }

    pub fn has_category_named(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c.name() == name)
    }

    pub fn has_stock_for(&self, requested: i32) -> bool {
        self.quantity >= requested
    }

    /// Overwrite the stock level. Negative values break the stored invariant.
    pub fn set_quantity(&mut self, quantity: i32) -> DomainResult<()> {
        if quantity < 0 {
            return Err(DomainError::invariant(format!(
                "article {} quantity cannot go negative (got {quantity})",
                self.id
            )));
        }
        self.quantity = quantity;
        Ok(())
    }

    /// Take `amount` units out of stock, or fail without touching it.
    pub fn reduce_stock(&mut self, amount: i32) -> DomainResult<()> {
        if amount < 0 {
            return Err(DomainError::validation("reduction amount cannot be negative"));
        }
        if !self.has_stock_for(amount) {
            return Err(DomainError::insufficient_stock(self.id, amount, self.quantity));
        }
        self.quantity -= amount;
        Ok(())
    }

    pub(crate) fn categories_mut(&mut self) -> &mut Vec<Category> {
        &mut self.categories
    }
}

impl Entity for Article {
    type Id = ArticleId;
    const KIND: EntityKind = EntityKind::Article;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn ensure_price(price: Decimal) -> DomainResult<()> {
    if price <= Decimal::ZERO {
        return Err(DomainError::validation("article price must be greater than zero"));
    }
    Ok(())
}

fn ensure_categories(categories: &[Category]) -> DomainResult<()> {
    let count = categories.len();
    if !(MIN_CATEGORIES..=MAX_CATEGORIES).contains(&count) {
        return Err(DomainError::validation(format!(
            "an article must have between {MIN_CATEGORIES} and {MAX_CATEGORIES} categories \
             (got {count})"
        )));
    }
    let mut seen = HashSet::with_capacity(count);
    for category in categories {
        if !seen.insert(category.id_typed()) {
            return Err(DomainError::validation(format!(
                "category {} is attached more than once",
                category.id_typed()
            )));
        }
    }
    Ok(())
}
