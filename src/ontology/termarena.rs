use tracing::warn;

use crate::index::IndexedMap;
use crate::term::internal::GoTermInternal;

/// Owns all terms in insertion order and indexes them by id
#[derive(Debug, Default, Clone)]
pub(crate) struct Arena {
    terms: Vec<GoTermInternal>,
    ids: IndexedMap<usize>,
}

impl Arena {
    pub fn with_capacity(n_terms: usize) -> Self {
        Self {
            terms: Vec::with_capacity(n_terms),
            ids: IndexedMap::with_capacity(crate::term_capacity(n_terms)),
        }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Adds `term` to the arena
    ///
    /// A term with an already known id replaces the previous one
    pub fn insert(&mut self, term: GoTermInternal) {
        let idx = self.terms.len();
        match self.ids.put(term.id().as_str(), idx) {
            None => self.terms.push(term),
            Some(previous) => {
                warn!("replacing term {}", term.id());
                self.ids.put(term.id().as_str(), previous);
                self.terms[previous] = term;
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&GoTermInternal> {
        self.ids.get(id).map(|idx| &self.terms[*idx])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut GoTermInternal> {
        match self.ids.get(id) {
            Some(idx) => self.terms.get_mut(*idx),
            None => None,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.terms.iter(),
        }
    }
}

pub(crate) struct Iter<'a> {
    inner: std::slice::Iter<'a, GoTermInternal>,
}

impl<'a> std::iter::Iterator for Iter<'a> {
    type Item = &'a GoTermInternal;
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn insert_and_get() {
        let mut arena = Arena::with_capacity(2);
        arena.insert(GoTermInternal::new("GO:1".into()));
        arena.insert(GoTermInternal::new("GO:2".into()));
        assert_eq!(arena.len(), 2);
        assert!(arena.contains("GO:2"));
        assert_eq!(arena.get("GO:1").unwrap().id(), "GO:1");
        assert!(arena.get("GO:3").is_none());
    }

    #[test]
    fn duplicate_replaces_in_place() {
        let mut arena = Arena::with_capacity(2);
        arena.insert(GoTermInternal::new("GO:1".into()));
        arena.insert(GoTermInternal::new("GO:2".into()));

        let mut replacement = GoTermInternal::new("GO:1".into());
        replacement.add_parent("GO:2".into());
        arena.insert(replacement);

        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get("GO:1").unwrap().parents().len(), 1);
        let order: Vec<&str> = arena.iter().map(|t| t.id().as_str()).collect();
        assert_eq!(order, vec!["GO:1", "GO:2"]);
    }
}
