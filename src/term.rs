//! [`GoTerm`]s are the nodes of the Gene Ontology
//!
//! Terms are owned by the [`Ontology`] and can only be accessed through it.
//! [`GoTerm`] is a cheap, borrowed view on a single term that gives
//! access to its direct relatives and their transitive closures.
use core::fmt::Debug;
use std::borrow::Borrow;
use std::collections::{HashSet, VecDeque};
use std::fmt::Display;

use smallvec::SmallVec;

use crate::{Ontology, DEFAULT_NUM_PARENTS};

mod group;
pub(crate) mod internal;

pub use group::TermGroup;

/// The ordered, duplicate-free list of parent or child ids of a term
pub type TermIds = SmallVec<[TermId; DEFAULT_NUM_PARENTS]>;

/// Identifier of a GO term, e.g. `GO:0008150`
#[derive(Clone, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TermId {
    inner: String,
}

impl TermId {
    /// Returns the identifier as `&str`
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Returns `true` if the identifier is the empty string
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl From<&str> for TermId {
    fn from(s: &str) -> Self {
        TermId {
            inner: s.to_string(),
        }
    }
}

impl From<String> for TermId {
    fn from(inner: String) -> Self {
        TermId { inner }
    }
}

impl From<&String> for TermId {
    fn from(s: &String) -> Self {
        TermId { inner: s.clone() }
    }
}

impl AsRef<str> for TermId {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl Borrow<str> for TermId {
    fn borrow(&self) -> &str {
        &self.inner
    }
}

impl Debug for TermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TermId({})", self.inner)
    }
}

impl Display for TermId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl PartialEq<str> for TermId {
    fn eq(&self, other: &str) -> bool {
        self.inner == other
    }
}

impl PartialEq<&str> for TermId {
    fn eq(&self, other: &&str) -> bool {
        self.inner == *other
    }
}

/// A single term of the [`Ontology`]
///
/// The view borrows from the ontology and can be copied freely.
///
/// # Examples
///
/// ```
/// use goterm::Ontology;
///
/// let ontology = Ontology::from_terms([
///     ("GO:0008150", vec![]),
///     ("GO:0009987", vec!["GO:0008150"]),
///     ("GO:0008152", vec!["GO:0008150"]),
///     ("GO:0044237", vec!["GO:0009987", "GO:0008152"]),
/// ]).unwrap();
///
/// let term = ontology.resolve("GO:0044237").unwrap();
/// assert_eq!(term.parent_ids().len(), 2);
/// assert_eq!(term.ancestor_ids().len(), 3);
///
/// let root = ontology.resolve("GO:0008150").unwrap();
/// assert_eq!(root.children().count(), 2);
/// assert_eq!(root.descendant_ids().len(), 3);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GoTerm<'a> {
    id: &'a TermId,
    parents: &'a TermIds,
    children: &'a TermIds,
    ontology: &'a Ontology,
}

impl<'a> GoTerm<'a> {
    /// Constructs a new [`GoTerm`] from a `GoTermInternal`
    pub(crate) fn new(ontology: &'a Ontology, term: &'a internal::GoTermInternal) -> GoTerm<'a> {
        GoTerm {
            id: term.id(),
            parents: term.parents(),
            children: term.children(),
            ontology,
        }
    }

    /// Returns the [`TermId`] of the term
    pub fn id(&self) -> &'a TermId {
        self.id
    }

    /// Returns the ids of the direct parents, in input order
    ///
    /// The ids are returned as they were provided to the ontology,
    /// i.e. they may contain identifiers that do not resolve to a term.
    pub fn parent_ids(&self) -> &'a TermIds {
        self.parents
    }

    /// Returns the ids of the direct children
    pub fn child_ids(&self) -> &'a TermIds {
        self.children
    }

    /// Returns an iterator of the direct parents
    ///
    /// Parent ids that can't be resolved are skipped
    pub fn parents(&self) -> Iter<'a> {
        Iter::new(self.parents, self.ontology)
    }

    /// Returns an iterator of the direct children
    pub fn children(&self) -> Iter<'a> {
        Iter::new(self.children, self.ontology)
    }

    /// Returns the ids of all direct and indirect parents
    ///
    /// The term itself is not part of the result, unless the ontology
    /// contains a cycle through it.
    pub fn ancestor_ids(&self) -> TermGroup {
        self.closure(GoTerm::parents)
    }

    /// Returns the ids of all direct and indirect children
    pub fn descendant_ids(&self) -> TermGroup {
        self.closure(GoTerm::children)
    }

    /// Returns `true` if `self` is a direct or indirect child of `other`
    pub fn child_of(&self, other: &GoTerm) -> bool {
        self.ancestor_ids().contains(other.id())
    }

    /// Returns `true` if `self` is a direct or indirect parent of `other`
    pub fn parent_of(&self, other: &GoTerm) -> bool {
        other.child_of(self)
    }

    /// Breadth-first closure over `next`, safe against cycles
    fn closure<F>(&self, next: F) -> TermGroup
    where
        F: Fn(&GoTerm<'a>) -> Iter<'a>,
    {
        let mut res = TermGroup::new();
        let mut seen: HashSet<&'a TermId> = HashSet::new();
        seen.insert(self.id);
        let mut queue: VecDeque<GoTerm<'a>> = VecDeque::new();
        queue.push_back(*self);
        while let Some(term) = queue.pop_front() {
            for relative in next(&term) {
                res.insert(relative.id().clone());
                if seen.insert(relative.id()) {
                    queue.push_back(relative);
                }
            }
        }
        res
    }
}

impl PartialEq for GoTerm<'_> {
    fn eq(&self, other: &GoTerm) -> bool {
        self.id == other.id
    }
}

impl Eq for GoTerm<'_> {}

/// Iterates [`GoTerm`]s from a list of ids, skipping ids that don't resolve
pub struct Iter<'a> {
    ids: std::slice::Iter<'a, TermId>,
    ontology: &'a Ontology,
}

impl<'a> Iter<'a> {
    fn new(ids: &'a TermIds, ontology: &'a Ontology) -> Self {
        Iter {
            ids: ids.iter(),
            ontology,
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = GoTerm<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        for id in self.ids.by_ref() {
            if let Some(term) = self.ontology.resolve(id.as_str()) {
                return Some(term);
            }
        }
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn diamond() -> Ontology {
        Ontology::from_terms([
            ("root", vec![]),
            ("left", vec!["root"]),
            ("right", vec!["root", "missing"]),
            ("bottom", vec!["left", "right"]),
        ])
        .unwrap()
    }

    #[test]
    fn term_id_comparisons() {
        let id = TermId::from("GO:0008150");
        assert_eq!(id, "GO:0008150");
        assert_eq!(&id, "GO:0008150");
        assert_eq!(id.to_string(), "GO:0008150");
        assert_eq!(format!("{id:?}"), "TermId(GO:0008150)");
        assert!(TermId::default().is_empty());
    }

    #[test]
    fn dangling_parents_are_skipped() {
        let ont = diamond();
        let right = ont.resolve("right").unwrap();
        assert_eq!(right.parent_ids().len(), 2);
        let parents: Vec<&str> = right.parents().map(|t| t.id().as_str()).collect();
        assert_eq!(parents, vec!["root"]);
    }

    #[test]
    fn ancestors_are_unique() {
        let ont = diamond();
        let bottom = ont.resolve("bottom").unwrap();
        let ancestors = bottom.ancestor_ids();
        assert_eq!(ancestors.len(), 3);
        assert!(ancestors.contains("root"));
        assert!(!ancestors.contains("bottom"));
        assert!(!ancestors.contains("missing"));
    }

    #[test]
    fn descendants() {
        let ont = diamond();
        let root = ont.resolve("root").unwrap();
        let desc = root.descendant_ids();
        assert_eq!(desc.len(), 3);
        assert!(desc.contains("bottom"));

        let bottom = ont.resolve("bottom").unwrap();
        assert!(bottom.descendant_ids().is_empty());
        assert!(bottom.child_of(&root));
        assert!(root.parent_of(&bottom));
        assert!(!root.child_of(&bottom));
    }

    #[test]
    fn closures_terminate_on_cycles() {
        let ont = Ontology::from_terms([("a", vec!["c"]), ("b", vec!["a"]), ("c", vec!["b"])]).unwrap();
        let a = ont.resolve("a").unwrap();
        let ancestors = a.ancestor_ids();
        assert_eq!(ancestors.len(), 3);
        assert!(ancestors.contains("a"));
        assert_eq!(a.descendant_ids().len(), 3);
    }
}
