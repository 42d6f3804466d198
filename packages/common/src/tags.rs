use std::collections::BTreeSet;

/// Separator used when a tag set is stored as a single column.
pub const TAG_SEPARATOR: &str = ", ";

/// Split a free-typed, comma-separated tag list. Entries are trimmed and
/// blanks are dropped.
pub fn parse_custom_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Deduplicated, sorted set of tags attached to a prompt.
///
/// Comparison is case-sensitive: `SQL` and `sql` are distinct tags.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagSet(BTreeSet<String>);

impl TagSet {
    /// Union of the picked predefined tags and the custom ones.
    pub fn from_parts<I, J>(selected: I, custom: J) -> Self
    where
        I: IntoIterator<Item = String>,
        J: IntoIterator<Item = String>,
    {
        Self(selected.into_iter().chain(custom).collect())
    }

    /// Parse a stored column value back into a set.
    pub fn from_joined(joined: &str) -> Self {
        Self(parse_custom_tags(joined).into_iter().collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Column representation: sorted tags joined by [`TAG_SEPARATOR`].
    pub fn joined(&self) -> String {
        self.iter().collect::<Vec<_>>().join(TAG_SEPARATOR)
    }
}

/// Distinct tags across a collection of stored tag columns, sorted.
pub fn collect_tags<'a, I>(columns: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    columns
        .into_iter()
        .flat_map(parse_custom_tags)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
