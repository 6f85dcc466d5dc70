//! Input validation shared by every mutation path.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// User-correctable input errors. Operations that hit one of these perform
/// no mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelValidationError {
    /// Project or section name is empty after trim.
    BlankName,
    /// Task title is empty after trim.
    BlankTitle,
    /// Comment has neither text nor attachments.
    EmptyComment,
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "name must not be blank"),
            Self::BlankTitle => write!(f, "task title must not be blank"),
            Self::EmptyComment => write!(f, "comment must have text or at least one image"),
        }
    }
}

impl Error for ModelValidationError {}

/// Trims a project or section name, rejecting blank input.
pub fn normalize_name(value: &str) -> Result<String, ModelValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ModelValidationError::BlankName);
    }
    Ok(trimmed.to_string())
}

/// Trims a task title, rejecting blank input.
pub fn normalize_title(value: &str) -> Result<String, ModelValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ModelValidationError::BlankTitle);
    }
    Ok(trimmed.to_string())
}

/// Normalizes one label: trimmed, lowercased, `None` when blank.
pub fn normalize_label(label: &str) -> Option<String> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Normalizes and deduplicates labels, keeping first-seen order.
pub fn normalize_labels<I, S>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut unique: Vec<String> = Vec::new();
    for label in labels {
        if let Some(value) = normalize_label(label.as_ref()) {
            if !unique.contains(&value) {
                unique.push(value);
            }
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_are_rejected() {
        assert_eq!(normalize_name("   "), Err(ModelValidationError::BlankName));
        assert_eq!(normalize_name(""), Err(ModelValidationError::BlankName));
        assert_eq!(normalize_name("  Launch ").unwrap(), "Launch");
        assert_eq!(normalize_title("\t"), Err(ModelValidationError::BlankTitle));
    }

    #[test]
    fn labels_are_lowercased_and_deduplicated_in_order() {
        let labels = normalize_labels(["Urgent", " design ", "", "URGENT", "backend"]);
        assert_eq!(labels, vec!["urgent", "design", "backend"]);
    }
}
