//! Mapping of GO terms onto a GO slim
//!
//! A GO slim is a reduced subset of the ontology. Each term of the full
//! ontology is represented by its closest ancestors that belong to the
//! slim. Once a branch reaches a slim term, every term above it on that
//! branch is suppressed, so a term is never mapped to both a slim term and
//! one of that slim term's ancestors.
//!
//! ```text
//!        root*
//!       /    \
//!      a*     b
//!       \    /
//!         c
//!         |
//!       query
//! ```
//!
//! Mapping `query` onto the slim `{root, a}` returns only `a`, since
//! `root` is an ancestor of `a`.
use std::collections::HashSet;

use crate::query::QueryContext;
use crate::term::{GoTerm, TermGroup, TermId};
use crate::Ontology;

/// The state of a term during slim mapping
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SlimMark {
    /// The term was not reached yet
    #[default]
    Unvisited,
    /// The term is a closest slim representative
    Direct,
    /// The term is an ancestor of a closest slim representative
    Indirect,
}

/// Collects the slim representatives of `term`
///
/// The returned group contains every slim term that was reached as a
/// [`SlimMark::Direct`] match. A term collected early can be demoted to
/// [`SlimMark::Indirect`] later in the search, so consumers must check the
/// marker in `ctx`. [`closest`] does that.
pub fn map_to_slim(term: GoTerm<'_>, slim: &Ontology, ctx: &mut QueryContext) -> TermGroup {
    ctx.clear_slim_marks();
    let mut res = TermGroup::new();

    if slim.contains(term.id().as_str()) {
        ctx.set_slim_mark(term.id(), SlimMark::Direct);
        res.insert(term.id().clone());
        return res;
    }

    let mut explored: HashSet<&TermId> = HashSet::new();
    search_upwards(term, slim, ctx, &mut res, &mut explored);
    res
}

/// Returns the closest slim representatives of `term`
///
/// # Examples
///
/// ```
/// use goterm::Ontology;
/// use goterm::query::QueryContext;
/// use goterm::slim;
///
/// let ontology = Ontology::from_terms([
///     ("root", vec![]),
///     ("a", vec!["root"]),
///     ("b", vec!["root"]),
///     ("c", vec!["a", "b"]),
///     ("query", vec!["c"]),
/// ]).unwrap();
/// let go_slim = ontology.slim_subset(["root", "a"]);
///
/// let mut ctx = QueryContext::new();
/// let query = ontology.resolve("query").unwrap();
/// let closest = slim::closest(query, &go_slim, &mut ctx);
///
/// let ids: Vec<&str> = closest.iter().map(|id| id.as_str()).collect();
/// assert_eq!(ids, vec!["a"]);
/// ```
pub fn closest(term: GoTerm<'_>, slim: &Ontology, ctx: &mut QueryContext) -> TermGroup {
    map_to_slim(term, slim, ctx)
        .into_iter()
        .filter(|id| ctx.slim_mark(id.as_str()) == SlimMark::Direct)
        .collect()
}

fn search_upwards<'a>(
    term: GoTerm<'a>,
    slim: &Ontology,
    ctx: &mut QueryContext,
    res: &mut TermGroup,
    explored: &mut HashSet<&'a TermId>,
) {
    for parent in term.parents() {
        let unvisited = ctx.slim_mark(parent.id().as_str()) == SlimMark::Unvisited;
        if unvisited && slim.contains(parent.id().as_str()) {
            ctx.set_slim_mark(parent.id(), SlimMark::Direct);
            res.insert(parent.id().clone());
            mark_indirect(parent, ctx);
        } else if unvisited && explored.insert(parent.id()) {
            search_upwards(parent, slim, ctx, res, explored);
        }
    }
}

fn mark_indirect(term: GoTerm<'_>, ctx: &mut QueryContext) {
    for parent in term.parents() {
        if ctx.slim_mark(parent.id().as_str()) == SlimMark::Indirect {
            continue;
        }
        ctx.set_slim_mark(parent.id(), SlimMark::Indirect);
        mark_indirect(parent, ctx);
    }
}
