use crate::category::Category;
use crate::tags::{TagSet, parse_custom_tags};

/// Longest accepted title, in Unicode characters.
pub const MAX_TITLE_CHARS: usize = 256;

/// Reasons a prompt submission is turned away before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("Title must be 1-256 characters")]
    Title,
    #[error("Prompt text must not be empty")]
    EmptyText,
    #[error("Category must not be empty")]
    MissingCategory,
    #[error("Unknown category '{0}'")]
    UnknownCategory(String),
    #[error("Tag '{tag}' is not offered for category '{category}'")]
    ForeignTag { tag: String, category: Category },
    #[error("Please select or enter at least one tag")]
    NoTags,
}

/// Raw submission form as entered by a member.
#[derive(Debug, Clone, Default)]
pub struct SubmissionForm {
    pub title: String,
    pub prompt_text: String,
    pub category: String,
    /// Predefined tags picked for the chosen category.
    pub selected_tags: Vec<String>,
    /// Free-typed, comma-separated tags.
    pub custom_tags: String,
}

/// A submission that passed every check and is ready to be stored as pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSubmission {
    pub title: String,
    pub prompt_text: String,
    pub category: Category,
    pub tags: TagSet,
}

impl SubmissionForm {
    /// Check the form. Title, text and category must be present and the
    /// combined tag set must not be empty.
    pub fn validate(self) -> Result<ValidSubmission, SubmissionError> {
        let title = self.title.trim();
        if title.is_empty() || title.chars().count() > MAX_TITLE_CHARS {
            return Err(SubmissionError::Title);
        }
        if self.prompt_text.trim().is_empty() {
            return Err(SubmissionError::EmptyText);
        }

        let category = self.category.trim();
        if category.is_empty() {
            return Err(SubmissionError::MissingCategory);
        }
        let category: Category = category
            .parse()
            .map_err(|_| SubmissionError::UnknownCategory(category.to_string()))?;

        let mut selected = Vec::with_capacity(self.selected_tags.len());
        for tag in self.selected_tags {
            let tag = tag.trim();
            if tag.is_empty() {
                continue;
            }
            if !category.has_predefined_tag(tag) {
                return Err(SubmissionError::ForeignTag {
                    tag: tag.to_string(),
                    category,
                });
            }
            selected.push(tag.to_string());
        }

        let tags = TagSet::from_parts(selected, parse_custom_tags(&self.custom_tags));
        if tags.is_empty() {
            return Err(SubmissionError::NoTags);
        }

        Ok(ValidSubmission {
            title: title.to_string(),
            prompt_text: self.prompt_text,
            category,
            tags,
        })
    }
}
