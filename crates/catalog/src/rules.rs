use stockroom_core::{DomainError, DomainResult};

pub const NAME_MAX_CHARS: usize = 50;
pub const LABEL_DESCRIPTION_MAX_CHARS: usize = 90;
pub const ARTICLE_DESCRIPTION_MAX_CHARS: usize = 120;
pub const MIN_CATEGORIES: usize = 1;
pub const MAX_CATEGORIES: usize = 3;

/// Non-blank text of at most `max` chars.
pub(crate) fn required_text(field: &str, value: &str, max: usize) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    let len = value.chars().count();
    if len > max {
        return Err(DomainError::validation(format!(
            "{field} must be at most {max} characters (got {len})"
        )));
    }
    Ok(())
}
