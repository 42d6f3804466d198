/// Keyword and tag filter applied to the approved library.
///
/// Both checks are case-insensitive substring matches. Tags are matched
/// against the stored comma-joined column rather than the parsed set, so a
/// `SQL` filter also selects a prompt tagged `PostgreSQL`.
#[derive(Debug, Clone, Default)]
pub struct PromptFilter {
    search: Option<String>,
    tags: Vec<String>,
}

impl PromptFilter {
    pub fn new(search: Option<&str>, tags: &[String]) -> Self {
        let search = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        let tags = tags
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
            .collect();
        Self { search, tags }
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.tags.is_empty()
    }

    /// Returns true if the prompt passes the keyword check and every tag check.
    pub fn matches(&self, title: &str, prompt_text: &str, tags: &str) -> bool {
        if let Some(ref needle) = self.search
            && !title.to_lowercase().contains(needle)
            && !prompt_text.to_lowercase().contains(needle)
        {
            return false;
        }

        let tags = tags.to_lowercase();
        self.tags.iter().all(|t| tags.contains(t.as_str()))
    }
}
