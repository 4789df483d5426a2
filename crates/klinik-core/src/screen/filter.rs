//! Client-side search.

use super::Entity;

/// Case-insensitive substring match against any of `fields`.
pub fn matches(fields: &[&str], term: &str) -> bool {
    let needle = term.to_lowercase();
    fields.iter().any(|f| f.to_lowercase().contains(&needle))
}

/// Rows whose search fields contain `term`, in collection order.
pub fn filter<'a, E: Entity>(items: &'a [E], term: &str) -> Vec<&'a E> {
    items
        .iter()
        .filter(|item| matches(&item.search_fields(), term))
        .collect()
}
