use std::borrow::Borrow;
use std::hash::Hash;

use indexmap::IndexSet;

use crate::{GoTerm, Ontology, TermId};

/// An insertion-ordered set of [`TermId`]s
///
/// Each term can occur only once in the group. The group is used as
/// work list during the graph traversals and as the set of matched terms
/// of a query.
///
/// # Examples
///
/// ```
/// use goterm::TermGroup;
///
/// let mut group = TermGroup::new();
/// assert!(group.insert("GO:0008150".into()));
/// assert!(group.insert("GO:0003674".into()));
/// assert!(!group.insert("GO:0008150".into()));
///
/// assert_eq!(group.len(), 2);
/// assert!(group.contains("GO:0003674"));
///
/// let ids: Vec<&str> = group.iter().map(|id| id.as_str()).collect();
/// assert_eq!(ids, vec!["GO:0008150", "GO:0003674"]);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TermGroup {
    ids: IndexSet<TermId>,
}

impl TermGroup {
    /// Constructs a new, empty [`TermGroup`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a new, empty [`TermGroup`] with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: IndexSet::with_capacity(capacity),
        }
    }

    /// Returns `true` if the group contains no [`TermId`]s
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns the number of [`TermId`]s in the group
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Adds a [`TermId`] to the end of the group
    ///
    /// Returns whether the `TermId` was newly inserted.
    pub fn insert(&mut self, id: TermId) -> bool {
        self.ids.insert(id)
    }

    /// Returns `true` if the group contains `id`
    pub fn contains<Q>(&self, id: &Q) -> bool
    where
        TermId: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.ids.contains(id)
    }

    /// Returns an iterator of the [`TermId`]s in insertion order
    pub fn iter(&self) -> indexmap::set::Iter<'_, TermId> {
        self.ids.iter()
    }

    /// Returns an iterator of the [`GoTerm`]s of the group
    ///
    /// Ids that don't resolve in `ontology` are skipped
    pub fn terms<'a>(&'a self, ontology: &'a Ontology) -> impl Iterator<Item = GoTerm<'a>> + 'a {
        self.ids.iter().filter_map(|id| ontology.resolve(id.as_str()))
    }
}

impl FromIterator<TermId> for TermGroup {
    fn from_iter<T: IntoIterator<Item = TermId>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

impl Extend<TermId> for TermGroup {
    fn extend<T: IntoIterator<Item = TermId>>(&mut self, iter: T) {
        self.ids.extend(iter);
    }
}

impl<'a> IntoIterator for &'a TermGroup {
    type Item = &'a TermId;
    type IntoIter = indexmap::set::Iter<'a, TermId>;
    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}

impl IntoIterator for TermGroup {
    type Item = TermId;
    type IntoIter = indexmap::set::IntoIter<TermId>;
    fn into_iter(self) -> Self::IntoIter {
        self.ids.into_iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn keeps_insertion_order() {
        let mut group = TermGroup::with_capacity(3);
        group.insert("c".into());
        group.insert("a".into());
        group.insert("b".into());
        group.insert("a".into());
        let ids: Vec<String> = group.iter().map(ToString::to_string).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn collect_and_extend() {
        let mut group: TermGroup = ["x", "y", "x"].into_iter().map(TermId::from).collect();
        assert_eq!(group.len(), 2);
        group.extend([TermId::from("z"), TermId::from("y")]);
        assert_eq!(group.len(), 3);
        assert!(group.contains(&TermId::from("z")));
        assert_eq!(group.into_iter().last(), Some(TermId::from("z")));
    }

    #[test]
    fn terms_skip_unknown() {
        let ont = Ontology::from_terms([("a", vec![]), ("b", vec!["a"])]).unwrap();
        let group: TermGroup = ["b", "nope", "a"].into_iter().map(TermId::from).collect();
        let ids: Vec<&str> = group.terms(&ont).map(|t| t.id().as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }
}
