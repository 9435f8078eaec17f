use stockroom_core::{BrandId, DomainResult, Entity, EntityKind};

use crate::label::Label;
use crate::rules::{LABEL_DESCRIPTION_MAX_CHARS, NAME_MAX_CHARS, required_text};

/// A brand that has not been saved yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBrand {
    name: String,
    description: String,
}

impl NewBrand {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        let description = description.into();
        required_text("brand name", &name, NAME_MAX_CHARS)?;
        required_text("brand description", &description, LABEL_DESCRIPTION_MAX_CHARS)?;
        Ok(Self { name, description })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// A manufacturer/label referenced by articles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brand {
    id: BrandId,
    name: String,
    description: String,
}

impl Brand {
    pub fn id_typed(&self) -> BrandId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl Entity for Brand {
    type Id = BrandId;
    const KIND: EntityKind = EntityKind::Brand;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Label for Brand {
    type Draft = NewBrand;

    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn draft_name(draft: &NewBrand) -> &str {
        &draft.name
    }

    fn draft_description(draft: &NewBrand) -> &str {
        &draft.description
    }

    fn from_draft(draft: NewBrand, id: BrandId) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
        }
    }

    fn from_parts(id: BrandId, name: String, description: String) -> DomainResult<Self> {
        let draft = NewBrand::new(name, description)?;
        Ok(Self::from_draft(draft, id))
    }
}
