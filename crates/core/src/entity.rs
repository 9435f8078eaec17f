//! Entity trait: identity + continuity across state changes.

use serde::Serialize;

/// The kinds of entity the record-keeper stores.
///
/// Used to give errors and logs a stable, human-readable subject.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Article,
    Brand,
    Category,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Article => "article",
            EntityKind::Brand => "brand",
            EntityKind::Category => "category",
        }
    }
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed, store-assigned identifier.
    type Id: Copy
        + Eq
        + Ord
        + core::hash::Hash
        + core::fmt::Debug
        + core::fmt::Display
        + From<i64>
        + Into<i64>;

    /// Which kind of entity this is.
    const KIND: EntityKind;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
