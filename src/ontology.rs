use core::fmt::Debug;
use std::collections::{HashMap, HashSet, VecDeque};

use tracing::{debug, warn};

use crate::alias::{self, SharedAliases};
use crate::term::internal::GoTermInternal;
use crate::term::{GoTerm, TermGroup, TermId};
use crate::GoResult;

mod builder;
mod termarena;
pub use builder::{AllTerms, Builder, ConnectedTerms, LooseCollection};
use termarena::Arena;

#[cfg_attr(doc, aquamarine::aquamarine)]
/// `Ontology` holds all GO terms and their relationships
///
/// The ontology is immutable once it is built. All per-query state lives
/// in [`crate::query::QueryContext`], so an `Ontology` can be shared
/// between threads and queried concurrently.
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
/// assert_eq!(ontology.len(), 4);
/// assert!(ontology.resolve("GO:9999999").is_none());
///
/// let root = ontology.resolve("GO:0008150").unwrap();
/// assert_eq!(root.child_ids().len(), 2);
///
/// // Iterate all terms in the order they were added
/// for term in &ontology {
///     println!("{}", term.id());
/// }
/// ```
///
/// # Construction
///
/// The ontology is built from flat `(term id, parent ids)` tuples, either
/// through [`Ontology::from_terms`] or, with more control, through the
/// [`Builder`]. Child relationships are derived from the parent lists,
/// parent ids that are aliases are linked to their canonical term.
/// Parent ids that do not belong to any term are kept in the parent list of
/// the term but are otherwise ignored.
///
/// # Layout
///
/// ```mermaid
/// erDiagram
///     ONTOLOGY ||--|{ GOTERM : contains
///     ONTOLOGY |o--o| ALIASRESOLVER : "consults on miss"
///     GOTERM ||--o{ GOTERM : is_a
///     GOTERM {
///         TermId id
///         TermIds parents
///         TermIds children
///     }
/// ```
///
/// # Example ontology
///
/// ```mermaid
/// graph TD
/// GO:0008150["GO:0008150<br>biological_process"]
/// GO:0008150 --> GO:0009987
/// GO:0008150 --> GO:0008152
/// GO:0009987["GO:0009987<br>cellular process"]
/// GO:0009987 --> GO:0044237
/// GO:0008152["GO:0008152<br>metabolic process"]
/// GO:0008152 --> GO:0044237
/// GO:0044237["GO:0044237<br>cellular metabolic process"]
/// ```
#[derive(Default, Clone)]
pub struct Ontology {
    terms: Arena,
    aliases: Option<SharedAliases>,
}

impl Debug for Ontology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ontology with {} terms", self.terms.len())
    }
}

/// Public API of the Ontology
impl Ontology {
    /// Builds an `Ontology` from `(term id, parent ids)` tuples
    ///
    /// # Errors
    ///
    /// [`crate::GoError::MalformedTerm`] if a term id or parent id is empty
    pub fn from_terms<I, S, P, S2>(terms: I) -> GoResult<Self>
    where
        I: IntoIterator<Item = (S, P)>,
        S: Into<String>,
        P: IntoIterator<Item = S2>,
        S2: Into<String>,
    {
        Self::build(terms, None)
    }

    /// Builds an `Ontology` that resolves unknown ids through `aliases`
    ///
    /// # Errors
    ///
    /// [`crate::GoError::MalformedTerm`] if a term id or parent id is empty
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use std::sync::Arc;
    /// use goterm::Ontology;
    ///
    /// let mut aliases = HashMap::new();
    /// aliases.insert("GO:0000004".to_string(), "GO:0008150".to_string());
    ///
    /// let ontology = Ontology::from_terms_with_aliases(
    ///     [("GO:0008150", Vec::<&str>::new())],
    ///     Arc::new(aliases),
    /// ).unwrap();
    ///
    /// assert_eq!(ontology.resolve("GO:0000004").unwrap().id(), "GO:0008150");
    /// ```
    pub fn from_terms_with_aliases<I, S, P, S2>(terms: I, aliases: SharedAliases) -> GoResult<Self>
    where
        I: IntoIterator<Item = (S, P)>,
        S: Into<String>,
        P: IntoIterator<Item = S2>,
        S2: Into<String>,
    {
        Self::build(terms, Some(aliases))
    }

    /// Returns a new [`Builder`]
    pub fn builder() -> Builder<LooseCollection> {
        Builder::new()
    }

    /// Returns the number of terms in the Ontology
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns `true` if the Ontology does not contain any terms
    pub fn is_empty(&self) -> bool {
        self.terms.len() == 0
    }

    /// Returns the [`GoTerm`] of the provided id
    ///
    /// If the id is unknown and an alias resolver is attached, the
    /// canonical id of the alias is looked up once.
    pub fn resolve(&self, id: &str) -> Option<GoTerm<'_>> {
        self.get(id).map(|term| GoTerm::new(self, term))
    }

    /// Returns `true` if `id` (or its alias) belongs to a term
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Returns an iterator of all terms in insertion order
    pub fn terms(&self) -> Iter<'_> {
        self.into_iter()
    }

    /// Returns the attached alias resolver
    pub fn aliases(&self) -> Option<&SharedAliases> {
        self.aliases.as_ref()
    }

    /// Returns the given terms and all their ancestors
    ///
    /// Terms are visited breadth-first, starting with `ids`. Aliases are
    /// resolved to their canonical id, unknown ids are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use goterm::Ontology;
    ///
    /// let ontology = Ontology::from_terms([
    ///     ("root", vec![]),
    ///     ("a", vec!["root"]),
    ///     ("b", vec!["root"]),
    ///     ("c", vec!["a"]),
    /// ]).unwrap();
    ///
    /// let dag = ontology.extract_dag(["c", "unknown"]);
    /// let ids: Vec<&str> = dag.iter().map(|id| id.as_str()).collect();
    /// assert_eq!(ids, vec!["c", "a", "root"]);
    /// ```
    pub fn extract_dag<I, S>(&self, ids: I) -> TermGroup
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut res = TermGroup::new();
        let mut queue: VecDeque<GoTerm> = VecDeque::new();
        for id in ids {
            match self.resolve(id.as_ref()) {
                Some(term) => queue.push_back(term),
                None => warn!("Unknown term {}", id.as_ref()),
            }
        }
        while let Some(term) = queue.pop_front() {
            if res.insert(term.id().clone()) {
                queue.extend(term.parents());
            }
        }
        res
    }

    /// Returns the depth of the term
    ///
    /// The depth is the number of terms on the shortest path to a root term,
    /// including the term itself, so root terms have a depth of `1`.
    /// Returns `None` if the term is unknown.
    ///
    /// # Examples
    ///
    /// ```
    /// use goterm::Ontology;
    ///
    /// let ontology = Ontology::from_terms([
    ///     ("root", vec![]),
    ///     ("a", vec!["root"]),
    ///     ("b", vec!["a"]),
    ///     ("c", vec!["b", "root"]),
    /// ]).unwrap();
    ///
    /// assert_eq!(ontology.depth("root"), Some(1));
    /// assert_eq!(ontology.depth("b"), Some(3));
    /// assert_eq!(ontology.depth("c"), Some(2));
    /// assert_eq!(ontology.depth("foobar"), None);
    /// ```
    pub fn depth(&self, id: &str) -> Option<usize> {
        let term = self.resolve(id)?;
        Some(Depths::default().of(term))
    }

    /// Returns the maximum depth of the given terms
    ///
    /// Unknown ids are ignored. Returns `None` if no id is known.
    pub fn max_depth<I, S>(&self, ids: I) -> Option<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut depths = Depths::default();
        ids.into_iter()
            .filter_map(|id| self.resolve(id.as_ref()))
            .map(|term| depths.of(term))
            .max()
    }

    /// Returns the terms with a depth of at most `depth`
    ///
    /// Unknown ids are dropped, aliases are replaced with their canonical id.
    pub fn filter_by_depth<I, S>(&self, ids: I, depth: usize) -> TermGroup
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut depths = Depths::default();
        ids.into_iter()
            .filter_map(|id| self.resolve(id.as_ref()))
            .filter(|term| depths.of(*term) <= depth)
            .map(|term| term.id().clone())
            .collect()
    }

    /// Constructs a slim ontology from a subset of the terms of `self`
    ///
    /// Every selected term keeps its parent list. Parents outside the subset
    /// are dangling in the slim ontology. The slim ontology shares the alias
    /// resolver of `self`. Unknown ids are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use goterm::Ontology;
    ///
    /// let ontology = Ontology::from_terms([
    ///     ("root", vec![]),
    ///     ("a", vec!["root"]),
    ///     ("b", vec!["a"]),
    /// ]).unwrap();
    ///
    /// let slim = ontology.slim_subset(["root", "b", "nope"]);
    /// assert_eq!(slim.len(), 2);
    /// assert!(slim.contains("b"));
    /// assert!(!slim.contains("a"));
    /// ```
    pub fn slim_subset<I, S>(&self, ids: I) -> Ontology
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = Builder::new();
        if let Some(aliases) = &self.aliases {
            builder = builder.aliases(aliases.clone());
        }
        for id in ids {
            let Some(term) = self.get(id.as_ref()) else {
                warn!("Unknown slim term {}", id.as_ref());
                continue;
            };
            let parents = term.parents().iter().map(TermId::to_string);
            if let Err(err) = builder.add_term(term.id().to_string(), parents) {
                warn!("Skipping slim term {}: {}", term.id(), err);
            }
        }
        builder.terms_complete().connect_children().build()
    }
}

/// Crate-only functions for setting up and querying the Ontology
impl Ontology {
    pub(crate) fn new(terms: Arena, aliases: Option<SharedAliases>) -> Self {
        Self { terms, aliases }
    }

    fn build<I, S, P, S2>(terms: I, aliases: Option<SharedAliases>) -> GoResult<Self>
    where
        I: IntoIterator<Item = (S, P)>,
        S: Into<String>,
        P: IntoIterator<Item = S2>,
        S2: Into<String>,
    {
        let terms = terms.into_iter();
        let mut builder = Builder::with_capacity(terms.size_hint().0);
        if let Some(aliases) = aliases {
            builder = builder.aliases(aliases);
        }
        for (id, parents) in terms {
            builder.add_term(id, parents)?;
        }
        let ont = builder.terms_complete().connect_children().build();
        debug!("Built {:?}", ont);
        Ok(ont)
    }

    /// Returns the `GoTermInternal` with the given id or alias
    pub(crate) fn get(&self, id: &str) -> Option<&GoTermInternal> {
        alias::resolve_with(self.aliases.as_ref(), id, move |key| self.terms.get(key))
    }
}

/// Memoized minimum depth calculation
#[derive(Default)]
struct Depths<'a> {
    cache: HashMap<&'a TermId, usize>,
    in_progress: HashSet<&'a TermId>,
}

impl<'a> Depths<'a> {
    fn of(&mut self, term: GoTerm<'a>) -> usize {
        if let Some(depth) = self.cache.get(term.id()) {
            return *depth;
        }
        self.in_progress.insert(term.id());
        let mut min_depth: Option<usize> = None;
        for parent in term.parents() {
            // back edge of a cycle
            if self.in_progress.contains(parent.id()) {
                continue;
            }
            let depth = self.of(parent) + 1;
            min_depth = Some(min_depth.map_or(depth, |d| d.min(depth)));
        }
        self.in_progress.remove(term.id());
        let depth = min_depth.unwrap_or(1);
        self.cache.insert(term.id(), depth);
        depth
    }
}

/// Iterates the Ontology and yields [`GoTerm`]s
pub struct Iter<'a> {
    inner: termarena::Iter<'a>,
    ontology: &'a Ontology,
}

impl<'a> std::iter::Iterator for Iter<'a> {
    type Item = GoTerm<'a>;
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|term| GoTerm::new(self.ontology, term))
    }
}

impl<'a> IntoIterator for &'a Ontology {
    type Item = GoTerm<'a>;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        Iter {
            inner: self.terms.iter(),
            ontology: self,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::GoError;
    use std::sync::Arc;

    fn example() -> Ontology {
        Ontology::from_terms([
            ("root", vec![]),
            ("a", vec!["root"]),
            ("b", vec!["root"]),
            ("c", vec!["a", "b"]),
            ("d", vec!["c", "dangling"]),
        ])
        .unwrap()
    }

    #[test]
    fn edge_symmetry() {
        let ont = example();
        for term in &ont {
            for parent in term.parents() {
                assert!(parent.child_ids().contains(term.id()));
            }
            for child in term.children() {
                assert!(child.parent_ids().contains(term.id()));
            }
        }
    }

    #[test]
    fn two_term_round_trip() {
        let ont = Ontology::from_terms([("A", vec![]), ("B", vec!["A"])]).unwrap();
        let a = ont.resolve("A").unwrap();
        let b = ont.resolve("B").unwrap();
        assert_eq!(a.child_ids().as_slice(), &[TermId::from("B")]);
        assert_eq!(b.parent_ids().as_slice(), &[TermId::from("A")]);
        assert!(a.parent_ids().is_empty());
        assert!(b.child_ids().is_empty());
    }

    #[test]
    fn malformed_terms_fail_construction() {
        let res = Ontology::from_terms([("root", vec![]), ("", vec!["root"])]);
        assert_eq!(res.unwrap_err(), GoError::MalformedTerm { index: 1 });
    }

    #[test]
    fn iteration_keeps_input_order() {
        let ont = example();
        let ids: Vec<&str> = ont.terms().map(|t| t.id().as_str()).collect();
        assert_eq!(ids, vec!["root", "a", "b", "c", "d"]);
        assert!(!ont.is_empty());
        assert!(Ontology::default().is_empty());
    }

    #[test]
    fn alias_lookup() {
        let mut aliases = HashMap::new();
        aliases.insert("old".to_string(), "c".to_string());
        aliases.insert("broken".to_string(), "nothing".to_string());
        let ont = Ontology::from_terms_with_aliases([("c", Vec::<&str>::new())], Arc::new(aliases)).unwrap();

        assert_eq!(ont.resolve("old").unwrap().id(), "c");
        assert!(ont.resolve("broken").is_none());
        assert!(ont.contains("old"));
        assert!(ont.aliases().is_some());
    }

    #[test]
    fn alias_parents_are_linked_both_ways() {
        let mut aliases = HashMap::new();
        aliases.insert("old_root".to_string(), "root".to_string());
        let ont = Ontology::from_terms_with_aliases(
            [("root", vec![]), ("a", vec!["old_root"])],
            Arc::new(aliases),
        )
        .unwrap();
        let root = ont.resolve("root").unwrap();
        let a = ont.resolve("a").unwrap();

        let parents: Vec<&str> = a.parents().map(|p| p.id().as_str()).collect();
        assert_eq!(parents, vec!["root"]);
        assert_eq!(root.child_ids().len(), 1);
        assert!(root.parent_of(&a));
        assert!(a.child_of(&root));
        assert!(root.descendant_ids().contains("a"));
    }

    #[test]
    fn extract_dag() {
        let ont = example();
        let dag = ont.extract_dag(["d"]);
        assert_eq!(dag.len(), 5);
        let first: Vec<&str> = dag.iter().take(2).map(TermId::as_str).collect();
        assert_eq!(first, vec!["d", "c"]);
        assert!(ont.extract_dag(["unknown"]).is_empty());
    }

    #[test]
    fn depths() {
        let ont = example();
        assert_eq!(ont.depth("root"), Some(1));
        assert_eq!(ont.depth("c"), Some(3));
        assert_eq!(ont.depth("d"), Some(4));
        assert_eq!(ont.max_depth(["a", "d", "x"]), Some(4));
        assert_eq!(ont.max_depth(["x"]), None);

        let shallow = ont.filter_by_depth(["root", "a", "d"], 2);
        assert_eq!(shallow.len(), 2);
        assert!(!shallow.contains("d"));
    }

    #[test]
    fn depth_with_cycle_terminates() {
        let ont = Ontology::from_terms([("a", vec!["b"]), ("b", vec!["a"])]).unwrap();
        assert_eq!(ont.depth("a"), Some(2));
    }

    #[test]
    fn slim_subset_shares_aliases() {
        let mut aliases = HashMap::new();
        aliases.insert("old_c".to_string(), "c".to_string());
        let ont = Ontology::from_terms_with_aliases(
            [("root", vec![]), ("c", vec!["root"])],
            Arc::new(aliases),
        )
        .unwrap();
        let slim = ont.slim_subset(["c"]);
        assert_eq!(slim.len(), 1);
        assert!(slim.contains("old_c"));
        let c = slim.resolve("c").unwrap();
        assert_eq!(c.parent_ids().len(), 1);
        assert_eq!(c.parents().count(), 0);
    }
}
