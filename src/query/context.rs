use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use tracing::trace;

use crate::annotations::Evidence;
use crate::slim::SlimMark;
use crate::term::{GoTerm, TermGroup, TermId};

/// Genes annotated to one term, with the union of their evidence
pub type GeneEvidence = IndexMap<String, Evidence>;

/// Per-query scratch data, keyed by term id
///
/// The [`Ontology`](crate::Ontology) itself is never modified by a query.
/// Instead, every query collects the genes of each term, the reference
/// support and the slim markers in its own `QueryContext`.
///
/// # Examples
///
/// ```
/// use goterm::{Evidence, Ontology, TermGroup};
/// use goterm::query::QueryContext;
///
/// let ontology = Ontology::from_terms([
///     ("A", vec![]),
///     ("B", vec!["A"]),
/// ]).unwrap();
///
/// let mut ctx = QueryContext::new();
/// let mut matched = TermGroup::new();
/// let b = ontology.resolve("B").unwrap();
///
/// ctx.mark(b, "g1", Evidence::ALL, true, &mut matched);
/// assert_eq!(matched.len(), 2);
/// assert!(ctx.genes("A").unwrap().contains_key("g1"));
///
/// ctx.count_reference_support(b, 1);
/// assert_eq!(ctx.reference_support("A"), 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct QueryContext {
    genes: HashMap<TermId, GeneEvidence>,
    marks: HashMap<TermId, SlimMark>,
    support: HashMap<TermId, usize>,
    generation: HashMap<TermId, u32>,
}

impl QueryContext {
    /// Constructs a new, empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `gene` with `evidence` to `term`
    ///
    /// The term is added to `result`. If `propagate` is `true`, the gene is
    /// added to all ancestors of the term as well. The evidence of a gene
    /// that is already known for a term is merged.
    pub fn mark(
        &mut self,
        term: GoTerm<'_>,
        gene: &str,
        evidence: Evidence,
        propagate: bool,
        result: &mut TermGroup,
    ) {
        let mut visited: HashSet<&TermId> = HashSet::new();
        self.mark_recursive(term, gene, evidence, propagate, result, &mut visited);
    }

    fn mark_recursive<'a>(
        &mut self,
        term: GoTerm<'a>,
        gene: &str,
        evidence: Evidence,
        propagate: bool,
        result: &mut TermGroup,
        visited: &mut HashSet<&'a TermId>,
    ) {
        if !visited.insert(term.id()) {
            return;
        }
        trace!("marking {} for {}", term.id(), gene);
        result.insert(term.id().clone());
        *self
            .genes
            .entry(term.id().clone())
            .or_default()
            .entry(gene.to_string())
            .or_default() |= evidence;

        if propagate {
            for parent in term.parents() {
                self.mark_recursive(parent, gene, evidence, propagate, result, visited);
            }
        }
    }

    /// Counts one reference gene for `term` and its ancestors
    ///
    /// `generation` must be unique per reference gene and must not be `0`.
    /// Each term is counted only once per generation, even if it is
    /// reachable on several paths.
    pub fn count_reference_support(&mut self, term: GoTerm<'_>, generation: u32) {
        let stamp = self.generation.entry(term.id().clone()).or_default();
        if *stamp == generation {
            return;
        }
        *stamp = generation;
        *self.support.entry(term.id().clone()).or_default() += 1;
        for parent in term.parents() {
            self.count_reference_support(parent, generation);
        }
    }

    /// Returns the genes (and their evidence) that are marked for `term`
    pub fn genes(&self, term: &str) -> Option<&GeneEvidence> {
        self.genes.get(term)
    }

    /// Returns the number of reference genes counted for `term`
    pub fn reference_support(&self, term: &str) -> usize {
        self.support.get(term).copied().unwrap_or_default()
    }

    /// Returns the slim marker of `term`
    pub fn slim_mark(&self, term: &str) -> SlimMark {
        self.marks.get(term).copied().unwrap_or_default()
    }

    pub(crate) fn set_slim_mark(&mut self, term: &TermId, mark: SlimMark) {
        self.marks.insert(term.clone(), mark);
    }

    pub(crate) fn clear_slim_marks(&mut self) {
        self.marks.clear();
    }

    /// Removes all collected data
    pub fn reset(&mut self) {
        self.genes.clear();
        self.marks.clear();
        self.support.clear();
        self.generation.clear();
    }

    /// Returns `true` if the context holds no data
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
            && self.marks.is_empty()
            && self.support.is_empty()
            && self.generation.is_empty()
    }
}
