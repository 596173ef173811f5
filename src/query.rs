//! Queries on an [`Ontology`] and its [`Annotation`]
//!
//! All queries are methods of [`TermFinder`]:
//!
//! - [`TermFinder::enrichment`]: terms that are enriched in a study set of
//!   genes, compared to a reference population
//! - [`TermFinder::find_terms`]: terms that are annotated to a set of genes
//! - [`TermFinder::find_genes`]: genes that are annotated to a set of terms
//! - [`TermFinder::map_to_slims`]: closest GO slim terms of a term
//!
//! Every query keeps its intermediate data in its own [`QueryContext`], so
//! one `TermFinder` can run several queries at the same time.
use indexmap::{IndexMap, IndexSet};
use tracing::{debug, warn};

use crate::annotations::{Annotation, Aspect, Evidence};
use crate::stats::{self, LogFactorials, TermEnrichment};
use crate::term::{GoTerm, TermGroup, TermId};
use crate::{slim, GoError, GoResult, Ontology};

mod context;
mod progress;

pub use context::{GeneEvidence, QueryContext};
pub use progress::{NoProgress, Progress};
use progress::Ticker;

/// Options of [`TermFinder::enrichment`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichmentQuery {
    /// Only records with one of these evidence codes are used
    pub evidence: Evidence,
    /// Only records of these namespaces are used
    pub aspect: Aspect,
    /// Map annotated terms to the slim subset and report slim terms only
    pub slims_only: bool,
}

impl Default for EnrichmentQuery {
    fn default() -> Self {
        Self {
            evidence: Evidence::ALL,
            aspect: Aspect::ALL,
            slims_only: false,
        }
    }
}

/// Options of [`TermFinder::find_terms`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermQuery {
    /// Only records with one of these evidence codes are used
    pub evidence: Evidence,
    /// Only records of these namespaces are used
    pub aspect: Aspect,
    /// Map annotated terms to the slim subset and report slim terms only
    pub slims_only: bool,
    /// Don't add genes to the ancestors of their annotated terms
    pub direct_only: bool,
    /// Include the evidence of each gene in the result
    pub report_evidence: bool,
}

impl Default for TermQuery {
    fn default() -> Self {
        Self {
            evidence: Evidence::ALL,
            aspect: Aspect::ALL,
            slims_only: false,
            direct_only: false,
            report_evidence: false,
        }
    }
}

/// Options of [`TermFinder::find_genes`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneQuery {
    /// Only records with one of these evidence codes are used
    pub evidence: Evidence,
    /// Only match genes annotated to the requested terms themselves,
    /// not to their descendants
    pub direct_only: bool,
    /// Include the evidence of each term in the result
    pub report_evidence: bool,
}

impl Default for GeneQuery {
    fn default() -> Self {
        Self {
            evidence: Evidence::ALL,
            direct_only: false,
            report_evidence: false,
        }
    }
}

/// A gene that is annotated to a term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneAssociation {
    gene: String,
    evidence: Option<Evidence>,
}

impl GeneAssociation {
    /// The gene name
    pub fn gene(&self) -> &str {
        &self.gene
    }

    /// The merged evidence of all annotations, if requested
    pub fn evidence(&self) -> Option<Evidence> {
        self.evidence
    }
}

/// A term that a gene is annotated to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermAssociation {
    term: TermId,
    evidence: Option<Evidence>,
}

impl TermAssociation {
    /// The id of the term
    pub fn term(&self) -> &TermId {
        &self.term
    }

    /// The merged evidence of all annotations, if requested
    pub fn evidence(&self) -> Option<Evidence> {
        self.evidence
    }
}

/// The result of [`TermFinder::enrichment`]
///
/// Terms are ordered by the first study gene that is annotated to them.
#[derive(Debug, Clone, PartialEq)]
pub struct Enrichments {
    terms: IndexMap<TermId, TermEnrichment>,
    study_size: usize,
    reference_size: usize,
}

impl Enrichments {
    /// Returns the enrichment of a term
    pub fn get(&self, term: &str) -> Option<&TermEnrichment> {
        self.terms.get(term)
    }

    /// Returns the number of terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns `true` if no term is enriched
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// The number of distinct study genes
    pub fn study_size(&self) -> usize {
        self.study_size
    }

    /// The number of distinct reference genes
    pub fn reference_size(&self) -> usize {
        self.reference_size
    }

    /// Returns an iterator of all terms and their enrichment
    pub fn iter(&self) -> indexmap::map::Iter<'_, TermId, TermEnrichment> {
        self.terms.iter()
    }

    /// Keeps only terms with a p-value below `max_pvalue`
    #[must_use]
    pub fn filter_by_p_value(self, max_pvalue: f64) -> Self {
        self.retain(|enrichment| enrichment.pvalue() < max_pvalue)
    }

    /// Keeps only terms with at least `min_count` study genes
    #[must_use]
    pub fn filter_by_frequency(self, min_count: usize) -> Self {
        self.retain(|enrichment| enrichment.count() >= min_count)
    }

    /// Keeps only terms with at least `min_count` reference genes
    #[must_use]
    pub fn filter_by_ref_frequency(self, min_count: usize) -> Self {
        self.retain(|enrichment| enrichment.reference_support() >= min_count)
    }

    fn retain<F: Fn(&TermEnrichment) -> bool>(mut self, keep: F) -> Self {
        self.terms.retain(|_, enrichment| keep(enrichment));
        self
    }
}

impl<'a> IntoIterator for &'a Enrichments {
    type Item = (&'a TermId, &'a TermEnrichment);
    type IntoIter = indexmap::map::Iter<'a, TermId, TermEnrichment>;
    fn into_iter(self) -> Self::IntoIter {
        self.terms.iter()
    }
}

impl IntoIterator for Enrichments {
    type Item = (TermId, TermEnrichment);
    type IntoIter = indexmap::map::IntoIter<TermId, TermEnrichment>;
    fn into_iter(self) -> Self::IntoIter {
        self.terms.into_iter()
    }
}

/// Runs queries on an [`Ontology`] and an [`Annotation`]
///
/// # Examples
///
/// ```
/// use goterm::{Annotation, Aspect, Evidence, Ontology, TermFinder};
/// use goterm::query::{NoProgress, TermQuery};
///
/// let ontology = Ontology::from_terms([
///     ("A", vec![]),
///     ("B", vec!["A"]),
/// ]).unwrap();
///
/// let annotation = Annotation::from_records([
///     ("g1", "A", Evidence::ALL, Aspect::PROCESS),
///     ("g1", "B", Evidence::ALL, Aspect::PROCESS),
/// ]).unwrap();
///
/// let finder = TermFinder::new(&ontology, &annotation);
/// let terms = finder
///     .find_terms(&["g1"], &TermQuery::default(), &mut NoProgress)
///     .unwrap();
///
/// assert_eq!(terms.len(), 2);
/// assert_eq!(terms["A"][0].gene(), "g1");
/// assert_eq!(terms["B"][0].gene(), "g1");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TermFinder<'a> {
    ontology: &'a Ontology,
    annotation: &'a Annotation,
    slim: Option<&'a Ontology>,
}

impl<'a> TermFinder<'a> {
    /// Constructs a new `TermFinder` without slim subset
    pub fn new(ontology: &'a Ontology, annotation: &'a Annotation) -> Self {
        Self {
            ontology,
            annotation,
            slim: None,
        }
    }

    /// Adds a slim subset for slim mapping
    ///
    /// The slim ontology is usually created with [`Ontology::slim_subset`].
    #[must_use]
    pub fn with_slim(mut self, slim: &'a Ontology) -> Self {
        self.slim = Some(slim);
        self
    }

    /// Returns the [`Ontology`]
    pub fn ontology(&self) -> &'a Ontology {
        self.ontology
    }

    /// Returns the [`Annotation`]
    pub fn annotation(&self) -> &'a Annotation {
        self.annotation
    }

    /// Calculates the enrichment of terms in `genes`, compared to `reference`
    ///
    /// Each study gene is added to its annotated terms and their ancestors.
    /// Every term that receives at least one study gene is tested against
    /// the number of `reference` genes that are annotated to it (directly
    /// or through a descendant). An empty `reference` uses all genes of
    /// the annotation. Duplicate gene names are used only once.
    ///
    /// Unknown genes and terms are skipped.
    ///
    /// # Errors
    ///
    /// - [`GoError::MissingSlimSubset`] if `slims_only` is requested, but
    ///   the `TermFinder` has no slim subset
    /// - Any error returned from `progress`
    ///
    /// # Examples
    ///
    /// ```
    /// use goterm::{Annotation, Aspect, Evidence, Ontology, TermFinder};
    /// use goterm::query::{EnrichmentQuery, NoProgress};
    ///
    /// let ontology = Ontology::from_terms([
    ///     ("root", vec![]),
    ///     ("repair", vec!["root"]),
    ///     ("transport", vec!["root"]),
    /// ]).unwrap();
    ///
    /// let annotation = Annotation::from_records([
    ///     ("g1", "repair", Evidence::ALL, Aspect::PROCESS),
    ///     ("g2", "repair", Evidence::ALL, Aspect::PROCESS),
    ///     ("g3", "transport", Evidence::ALL, Aspect::PROCESS),
    ///     ("g4", "transport", Evidence::ALL, Aspect::PROCESS),
    /// ]).unwrap();
    ///
    /// let finder = TermFinder::new(&ontology, &annotation);
    /// let no_reference: &[&str] = &[];
    /// let result = finder
    ///     .enrichment(&["g1", "g2"], no_reference, &EnrichmentQuery::default(), &mut NoProgress)
    ///     .unwrap();
    ///
    /// let repair = result.get("repair").unwrap();
    /// assert_eq!(repair.count(), 2);
    /// assert_eq!(repair.reference_support(), 2);
    /// assert!((repair.enrichment() - 2.0).abs() < 1e-12);
    /// assert!(result.get("transport").is_none());
    /// assert_eq!(result.get("root").unwrap().pvalue(), 1.0);
    /// ```
    pub fn enrichment<S, R, P>(
        &self,
        genes: &[S],
        reference: &[R],
        options: &EnrichmentQuery,
        progress: &mut P,
    ) -> GoResult<Enrichments>
    where
        S: AsRef<str>,
        R: AsRef<str>,
        P: Progress + ?Sized,
    {
        let slim = self.slim_for(options.slims_only)?;

        let study = unique(genes);
        let reference: IndexSet<&str> = if reference.is_empty() {
            self.annotation.gene_names().collect()
        } else {
            unique(reference)
        };
        debug!(
            "Enrichment of {} study genes against {} reference genes",
            study.len(),
            reference.len()
        );

        let mut ticker = Ticker::new(progress, reference.len() + study.len());
        let mut ctx = QueryContext::new();

        let mut generation = 0u32;
        for gene in &reference {
            ticker.tick()?;
            generation += 1;
            for (_, term) in self.annotated_terms(gene, options.evidence, options.aspect) {
                ctx.count_reference_support(term, generation);
            }
        }

        let mut matched = TermGroup::new();
        for gene in &study {
            ticker.tick()?;
            for (evidence, term) in self.annotated_terms(gene, options.evidence, options.aspect) {
                match slim {
                    Some(slim) => self.mark_slims(term, slim, gene, evidence, true, &mut ctx, &mut matched),
                    None => ctx.mark(term, gene, evidence, true, &mut matched),
                }
            }
        }

        let table = LogFactorials::new(study.len());
        let mut terms = IndexMap::with_capacity(matched.len());
        for id in &matched {
            if slim.is_some_and(|slim| !slim.contains(id.as_str())) {
                continue;
            }
            let Some(study_genes) = ctx.genes(id.as_str()) else {
                continue;
            };
            let study_hits = study_genes.len();
            let ref_hits = ctx.reference_support(id.as_str());
            let pvalue = stats::enrichment_p_value(study.len(), reference.len(), study_hits, ref_hits, &table);
            let fold = stats::fold_enrichment(study.len(), reference.len(), study_hits, ref_hits);
            terms.insert(
                id.clone(),
                TermEnrichment::new(study_genes.keys().cloned().collect(), pvalue, ref_hits, fold),
            );
        }
        debug!("Found {} terms", terms.len());

        Ok(Enrichments {
            terms,
            study_size: study.len(),
            reference_size: reference.len(),
        })
    }

    /// Returns all terms that `genes` are annotated to, with their genes
    ///
    /// Genes are added to the ancestors of their annotated terms as well,
    /// unless `direct_only` is set. Unknown genes and terms are skipped.
    ///
    /// # Errors
    ///
    /// - [`GoError::MissingSlimSubset`] if `slims_only` is requested, but
    ///   the `TermFinder` has no slim subset
    /// - Any error returned from `progress`
    pub fn find_terms<S, P>(
        &self,
        genes: &[S],
        options: &TermQuery,
        progress: &mut P,
    ) -> GoResult<IndexMap<TermId, Vec<GeneAssociation>>>
    where
        S: AsRef<str>,
        P: Progress + ?Sized,
    {
        let slim = self.slim_for(options.slims_only)?;
        let propagate = !options.direct_only;
        let genes = unique(genes);

        let mut ticker = Ticker::new(progress, genes.len());
        let mut ctx = QueryContext::new();
        let mut matched = TermGroup::new();
        for gene in &genes {
            ticker.tick()?;
            for (evidence, term) in self.annotated_terms(gene, options.evidence, options.aspect) {
                match slim {
                    Some(slim) => self.mark_slims(term, slim, gene, evidence, propagate, &mut ctx, &mut matched),
                    None => ctx.mark(term, gene, evidence, propagate, &mut matched),
                }
            }
        }

        let mut res = IndexMap::with_capacity(matched.len());
        for id in matched {
            if slim.is_some_and(|slim| !slim.contains(id.as_str())) {
                continue;
            }
            let Some(term_genes) = ctx.genes(id.as_str()) else {
                continue;
            };
            let associations = term_genes
                .iter()
                .map(|(gene, evidence)| GeneAssociation {
                    gene: gene.clone(),
                    evidence: options.report_evidence.then_some(*evidence),
                })
                .collect();
            res.insert(id, associations);
        }
        debug!("Found {} terms for {} genes", res.len(), genes.len());
        Ok(res)
    }

    /// Returns all genes that are annotated to `terms`
    ///
    /// Unless `direct_only` is set, genes annotated to a descendant of a
    /// requested term are included as well. The result lists for every gene
    /// the requested terms it is associated with. Unknown terms are skipped.
    ///
    /// # Errors
    ///
    /// Any error returned from `progress`
    ///
    /// # Examples
    ///
    /// ```
    /// use goterm::{Annotation, Aspect, Evidence, Ontology, TermFinder};
    /// use goterm::query::{GeneQuery, NoProgress};
    ///
    /// let ontology = Ontology::from_terms([
    ///     ("A", vec![]),
    ///     ("B", vec!["A"]),
    /// ]).unwrap();
    ///
    /// let annotation = Annotation::from_records([
    ///     ("g1", "A", Evidence::ALL, Aspect::PROCESS),
    ///     ("g2", "B", Evidence::ALL, Aspect::PROCESS),
    /// ]).unwrap();
    /// let finder = TermFinder::new(&ontology, &annotation);
    ///
    /// let genes = finder.find_genes(&["A"], &GeneQuery::default(), &mut NoProgress).unwrap();
    /// assert_eq!(genes.keys().collect::<Vec<_>>(), vec!["g1", "g2"]);
    ///
    /// let direct = GeneQuery { direct_only: true, ..Default::default() };
    /// let genes = finder.find_genes(&["A"], &direct, &mut NoProgress).unwrap();
    /// assert_eq!(genes.keys().collect::<Vec<_>>(), vec!["g1"]);
    /// ```
    pub fn find_genes<S, P>(
        &self,
        terms: &[S],
        options: &GeneQuery,
        progress: &mut P,
    ) -> GoResult<IndexMap<String, Vec<TermAssociation>>>
    where
        S: AsRef<str>,
        P: Progress + ?Sized,
    {
        let propagate = !options.direct_only;

        let mut requested = TermGroup::new();
        for id in terms {
            match self.ontology.resolve(id.as_ref()) {
                Some(term) => {
                    requested.insert(term.id().clone());
                }
                None => warn!("Unknown term {}", id.as_ref()),
            }
        }

        let mut expanded = requested.clone();
        if propagate {
            for term in requested.terms(self.ontology) {
                expanded.extend(term.descendant_ids());
            }
        }

        let mut ticker = Ticker::new(progress, self.annotation.len());
        let mut found: IndexSet<&str> = IndexSet::new();
        for record in self.annotation {
            ticker.tick()?;
            if !record.evidence().intersects(options.evidence) {
                continue;
            }
            let annotated = self.ontology.resolve(record.term().as_str());
            if annotated.is_some_and(|term| expanded.contains(term.id())) {
                found.insert(record.gene());
            }
        }

        let mut ctx = QueryContext::new();
        let mut matched = TermGroup::new();
        for gene in &found {
            for (evidence, term) in self.annotated_terms(gene, options.evidence, Aspect::ALL) {
                ctx.mark(term, gene, evidence, propagate, &mut matched);
            }
        }

        let mut res: IndexMap<String, Vec<TermAssociation>> = IndexMap::with_capacity(found.len());
        for gene in found {
            let associations: Vec<TermAssociation> = requested
                .iter()
                .filter_map(|id| {
                    let evidence = ctx.genes(id.as_str())?.get(gene)?;
                    Some(TermAssociation {
                        term: id.clone(),
                        evidence: options.report_evidence.then_some(*evidence),
                    })
                })
                .collect();
            if !associations.is_empty() {
                res.insert(gene.to_string(), associations);
            }
        }
        debug!("Found {} genes for {} terms", res.len(), requested.len());
        Ok(res)
    }

    /// Returns the closest slim terms of `term`
    ///
    /// # Errors
    ///
    /// - [`GoError::MissingSlimSubset`] if the `TermFinder` has no slim subset
    /// - [`GoError::DoesNotExist`] if the term is not part of the ontology
    ///
    /// # Examples
    ///
    /// ```
    /// use goterm::{Annotation, Ontology, TermFinder, TermId};
    ///
    /// let ontology = Ontology::from_terms([
    ///     ("root", vec![]),
    ///     ("a", vec!["root"]),
    ///     ("b", vec!["a"]),
    /// ]).unwrap();
    /// let go_slim = ontology.slim_subset(["root", "a"]);
    /// let annotation = Annotation::default();
    ///
    /// let finder = TermFinder::new(&ontology, &annotation).with_slim(&go_slim);
    /// assert_eq!(finder.map_to_slims("b").unwrap(), vec![TermId::from("a")]);
    /// assert!(finder.map_to_slims("x").is_err());
    /// ```
    pub fn map_to_slims(&self, term: &str) -> GoResult<Vec<TermId>> {
        let slim = self.slim.ok_or(GoError::MissingSlimSubset)?;
        let term = self
            .ontology
            .resolve(term)
            .ok_or_else(|| GoError::DoesNotExist(term.to_string()))?;
        let mut ctx = QueryContext::new();
        Ok(slim::closest(term, slim, &mut ctx).into_iter().collect())
    }

    fn slim_for(&self, slims_only: bool) -> GoResult<Option<&'a Ontology>> {
        match (slims_only, self.slim) {
            (false, _) => Ok(None),
            (true, Some(slim)) => Ok(Some(slim)),
            (true, None) => Err(GoError::MissingSlimSubset),
        }
    }

    /// The terms of all records of `gene` that pass the filters
    fn annotated_terms(&self, gene: &str, evidence: Evidence, aspect: Aspect) -> Vec<(Evidence, GoTerm<'a>)> {
        let Some(records) = self.annotation.records(gene) else {
            warn!("Unknown gene {}", gene);
            return Vec::new();
        };
        records
            .iter()
            .filter(|record| record.matches(evidence, aspect))
            .filter_map(|record| match self.ontology.resolve(record.term().as_str()) {
                Some(term) => Some((record.evidence(), term)),
                None => {
                    warn!("Unknown term {} of gene {}", record.term(), gene);
                    None
                }
            })
            .collect()
    }

    #[allow(clippy::too_many_arguments)]
    fn mark_slims(
        &self,
        term: GoTerm<'a>,
        slim: &Ontology,
        gene: &str,
        evidence: Evidence,
        propagate: bool,
        ctx: &mut QueryContext,
        matched: &mut TermGroup,
    ) {
        let closest = slim::closest(term, slim, ctx);
        for slim_term in closest.terms(self.ontology) {
            ctx.mark(slim_term, gene, evidence, propagate, matched);
        }
    }
}

/// Gene names in input order, without duplicates
fn unique<S: AsRef<str>>(genes: &[S]) -> IndexSet<&str> {
    genes.iter().map(|gene| gene.as_ref()).collect()
}
