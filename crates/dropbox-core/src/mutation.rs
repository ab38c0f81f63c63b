//! Partial updates of library entries (title and tags).

use crate::error::AppError;
use crate::models::{MediaEntry, PatchMediaRequest};
use crate::validation::{validate_tag, validate_title};

/// Check a patch request, collecting every violated constraint.
pub fn validate_patch(patch: &PatchMediaRequest) -> Result<(), AppError> {
    let mut violations = Vec::new();

    if let Some(title) = &patch.set_title {
        if let Err(v) = validate_title(title) {
            violations.push(v);
        }
    }

    for tag in &patch.add_tags {
        if let Err(v) = validate_tag("addTags", tag) {
            violations.push(v);
        }
    }

    for tag in &patch.del_tags {
        if let Err(v) = validate_tag("delTags", tag) {
            violations.push(v);
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(violations))
    }
}

/// Validate and apply a patch to an entry.
///
/// On failure the entry is left untouched. Resulting tags are
/// `(current ∪ add_tags) − del_tags`: existing order is kept and new tags are
/// appended in request order.
pub fn apply_patch(entry: &mut MediaEntry, patch: &PatchMediaRequest) -> Result<(), AppError> {
    validate_patch(patch)?;

    if let Some(title) = &patch.set_title {
        entry.title = title.clone();
    }

    let mut tags: Vec<String> = Vec::with_capacity(entry.tags.len() + patch.add_tags.len());
    for tag in entry.tags.iter().chain(patch.add_tags.iter()) {
        if !patch.del_tags.contains(tag) && !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }
    entry.tags = tags;

    Ok(())
}
