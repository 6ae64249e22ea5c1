//! Inquiry domain invariants.

use crate::error::{DomainError, Result};

pub const TITLE_MIN_LENGTH: usize = 2;
pub const TITLE_MAX_LENGTH: usize = 200;
/// Applies to inquiry and answer bodies.
pub const CONTENT_MAX_LENGTH: usize = 40_000;

/// Validates that a title is non-blank and 2 to 200 characters long.
pub fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(DomainError::ValidationFailed {
            field: "title".into(),
            message: "title must not be blank".into(),
        });
    }

    let len = title.chars().count();
    if !(TITLE_MIN_LENGTH..=TITLE_MAX_LENGTH).contains(&len) {
        return Err(DomainError::ValidationFailed {
            field: "title".into(),
            message: format!(
                "title must be between {TITLE_MIN_LENGTH} and {TITLE_MAX_LENGTH} characters"
            ),
        });
    }

    Ok(())
}

/// Validates that a body is non-blank and at most 40,000 characters long.
pub fn validate_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(DomainError::ValidationFailed {
            field: "content".into(),
            message: "content must not be blank".into(),
        });
    }

    if content.chars().count() > CONTENT_MAX_LENGTH {
        return Err(DomainError::ValidationFailed {
            field: "content".into(),
            message: format!(
                "content must be at most {CONTENT_MAX_LENGTH} characters"
            ),
        });
    }

    Ok(())
}
