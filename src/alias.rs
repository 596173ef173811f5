//! Resolution of alternative or obsolete identifiers
//!
//! Both the [`Ontology`](crate::Ontology) and the
//! [`Annotation`](crate::Annotation) can hold an [`AliasResolver`]. It is
//! only consulted when an identifier is not found in the index, and only
//! once: the canonical identifier is never resolved again.
use std::collections::HashMap;
use std::sync::Arc;

/// Maps an external or obsolete identifier to its canonical identifier
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use goterm::AliasResolver;
///
/// let mut aliases = HashMap::new();
/// aliases.insert("GO:0000004".to_string(), "GO:0008150".to_string());
///
/// assert!(aliases.has("GO:0000004"));
/// assert_eq!(AliasResolver::get(&aliases, "GO:0000004"), Some("GO:0008150"));
/// assert!(AliasResolver::get(&aliases, "GO:0008150").is_none());
/// ```
pub trait AliasResolver {
    /// Returns `true` if a canonical identifier is known for `key`
    fn has(&self, key: &str) -> bool;

    /// Returns the canonical identifier of `key`
    fn get(&self, key: &str) -> Option<&str>;
}

impl AliasResolver for HashMap<String, String> {
    fn has(&self, key: &str) -> bool {
        self.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<&str> {
        HashMap::get(self, key).map(String::as_str)
    }
}

/// Shared, thread-safe handle to an [`AliasResolver`]
pub type SharedAliases = Arc<dyn AliasResolver + Send + Sync>;

/// Looks up `id` with `lookup` and retries once with the alias of `id`
pub(crate) fn resolve_with<'a, T, F>(
    aliases: Option<&SharedAliases>,
    id: &str,
    lookup: F,
) -> Option<&'a T>
where
    F: Fn(&str) -> Option<&'a T>,
{
    if let Some(value) = lookup(id) {
        return Some(value);
    }
    let aliases = aliases?;
    if !aliases.has(id) {
        return None;
    }
    aliases.get(id).and_then(lookup)
}

#[cfg(test)]
mod test {
    use super::*;

    struct Stub;

    impl AliasResolver for Stub {
        fn has(&self, key: &str) -> bool {
            key.starts_with("old:")
        }

        fn get(&self, key: &str) -> Option<&str> {
            match key {
                "old:1" => Some("new:1"),
                "old:2" => Some("old:1"),
                _ => None,
            }
        }
    }

    #[test]
    fn direct_hit_ignores_aliases() {
        let data: HashMap<&str, u8> = [("old:1", 7u8), ("new:1", 1u8)].into_iter().collect();
        let aliases: SharedAliases = Arc::new(Stub);
        assert_eq!(resolve_with(Some(&aliases), "old:1", |k| data.get(k)), Some(&7));
    }

    #[test]
    fn alias_on_miss() {
        let data: HashMap<&str, u8> = [("new:1", 1u8)].into_iter().collect();
        let aliases: SharedAliases = Arc::new(Stub);
        assert_eq!(resolve_with(Some(&aliases), "old:1", |k| data.get(k)), Some(&1));
        assert_eq!(resolve_with(None, "old:1", |k| data.get(k)), None);
    }

    #[test]
    fn alias_is_not_chained() {
        let data: HashMap<&str, u8> = [("new:1", 1u8)].into_iter().collect();
        let aliases: SharedAliases = Arc::new(Stub);
        // old:2 -> old:1 is a miss, old:1 -> new:1 must not be followed
        assert_eq!(resolve_with(Some(&aliases), "old:2", |k| data.get(k)), None);
    }
}
