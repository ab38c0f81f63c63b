//! Library search over a snapshot of entries.

use crate::models::{MediaEntry, SearchQuery};

/// Filter entries by the optional tag and title query, keeping input order.
///
/// `tag` matches a member of the tag set exactly after lowercasing; `q` matches
/// any substring of the lowercased title. Blank filters are ignored.
pub fn search<'a, I>(entries: I, query: &SearchQuery) -> Vec<MediaEntry>
where
    I: IntoIterator<Item = &'a MediaEntry>,
{
    let tag = normalized(query.tag.as_deref());
    let q = normalized(query.q.as_deref());

    entries
        .into_iter()
        .filter(|entry| tag.as_deref().map_or(true, |tag| entry.has_tag(tag)))
        .filter(|entry| {
            q.as_deref()
                .map_or(true, |q| entry.title.to_lowercase().contains(q))
        })
        .cloned()
        .collect()
}

fn normalized(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_lowercase)
}
