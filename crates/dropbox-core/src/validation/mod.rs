//! Validation rules for entry titles and tags

pub const MIN_TITLE_LENGTH: usize = 1;
pub const MAX_TITLE_LENGTH: usize = 128;
pub const MIN_TAG_LENGTH: usize = 1;
pub const MAX_TAG_LENGTH: usize = 32;

/// Validate a title, returning a violation message if it is out of range.
///
/// Length is counted in characters, not bytes.
pub fn validate_title(title: &str) -> Result<(), String> {
    let len = title.chars().count();
    if !(MIN_TITLE_LENGTH..=MAX_TITLE_LENGTH).contains(&len) {
        return Err(format!(
            "setTitle must be {}-{} characters (got {})",
            MIN_TITLE_LENGTH, MAX_TITLE_LENGTH, len
        ));
    }
    Ok(())
}

/// Validate a single tag: lowercase, 1-32 characters.
pub fn validate_tag(field: &str, tag: &str) -> Result<(), String> {
    let len = tag.chars().count();
    if !(MIN_TAG_LENGTH..=MAX_TAG_LENGTH).contains(&len) {
        return Err(format!(
            "{} entry '{}' must be {}-{} characters",
            field, tag, MIN_TAG_LENGTH, MAX_TAG_LENGTH
        ));
    }
    if tag.chars().any(char::is_uppercase) {
        return Err(format!("{} entry '{}' must be lowercase", field, tag));
    }
    Ok(())
}

/// Clamp a derived title (e.g. from a filename) into the allowed length.
pub fn normalize_title(raw: &str, fallback: &str) -> String {
    let trimmed = raw.trim();
    let title = if trimmed.is_empty() { fallback } else { trimmed };
    title.chars().take(MAX_TITLE_LENGTH).collect()
}
