//! Shared shape of the two "label" entities, brands and categories.
//!
//! Both are a name + description pair with store-assigned identity and the
//! same uniqueness rule, so storage adapters can be written once over this
//! trait while the persistence ports stay per-entity.

use stockroom_core::{DomainResult, Entity};

pub trait Label: Entity + Clone + Send + Sync + 'static {
    /// Unsaved form of the entity.
    type Draft: Send + Sync + 'static;

    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn draft_name(draft: &Self::Draft) -> &str;

    fn draft_description(draft: &Self::Draft) -> &str;

    /// Attach a store-assigned identity to a draft.
    fn from_draft(draft: Self::Draft, id: Self::Id) -> Self;

    /// Rehydrate a stored entity, re-checking its invariants.
    fn from_parts(id: Self::Id, name: String, description: String) -> DomainResult<Self>;
}
