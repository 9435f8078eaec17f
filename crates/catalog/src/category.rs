use stockroom_core::{CategoryId, DomainResult, Entity, EntityKind};

use crate::label::Label;
use crate::rules::{LABEL_DESCRIPTION_MAX_CHARS, NAME_MAX_CHARS, required_text};

/// A category that has not been saved yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    name: String,
    description: String,
}

impl NewCategory {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        let description = description.into();
        required_text("category name", &name, NAME_MAX_CHARS)?;
        required_text("category description", &description, LABEL_DESCRIPTION_MAX_CHARS)?;
        Ok(Self { name, description })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// A classification tag; articles carry between one and three.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    id: CategoryId,
    name: String,
    description: String,
}

impl Category {
    pub fn id_typed(&self) -> CategoryId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl Entity for Category {
    type Id = CategoryId;
    const KIND: EntityKind = EntityKind::Category;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Label for Category {
    type Draft = NewCategory;

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn draft_name(draft: &NewCategory) -> &str {
        &draft.name
    }

    fn draft_description(draft: &NewCategory) -> &str {
        &draft.description
    }

    fn from_draft(draft: NewCategory, id: CategoryId) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
        }
    }

    fn from_parts(id: CategoryId, name: String, description: String) -> DomainResult<Self> {
        let draft = NewCategory::new(name, description)?;
        Ok(Self::from_draft(draft, id))
    }
}
