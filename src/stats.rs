//! Enrichment statistics for GO terms
//!
//! The enrichment of a term in a study set of genes is tested against a
//! reference population using a binomial approximation of the
//! hypergeometric test: the probability that a gene of the reference
//! population is annotated to the term is used as success rate, and the
//! p-value is the probability to observe at least as many annotated genes
//! in the study set.
//!
//! All calculations happen in log-space with a precomputed table of
//! log-factorials ([`LogFactorials`]).

use std::ops::Index;

/// The fold enrichment and p-value of a GO term
///
/// [`TermEnrichment`] is returned from [`crate::TermFinder::enrichment`]
#[derive(Debug, Clone, PartialEq)]
pub struct TermEnrichment {
    genes: Vec<String>,
    pvalue: f64,
    reference_support: usize,
    enrichment: f64,
}

impl TermEnrichment {
    /// Constructs a new `TermEnrichment`
    pub fn new(genes: Vec<String>, pvalue: f64, reference_support: usize, enrichment: f64) -> Self {
        Self {
            genes,
            pvalue,
            reference_support,
            enrichment,
        }
    }

    /// Returns the study genes that are annotated to the term
    ///
    /// Genes can be annotated directly or to one of the descendants of the term.
    pub fn genes(&self) -> &[String] {
        &self.genes
    }

    /// Returns the number of study genes annotated to the term
    pub fn count(&self) -> usize {
        self.genes.len()
    }

    /// Returns the p-value of the enrichment
    ///
    /// The p-value indicates the probability that the enrichment
    /// occurred by chance. Terms without reference support have a
    /// p-value of `1.0`.
    pub fn pvalue(&self) -> f64 {
        self.pvalue
    }

    /// Returns the number of reference genes annotated to the term
    pub fn reference_support(&self) -> usize {
        self.reference_support
    }

    /// Returns the fold enrichment over the reference population
    pub fn enrichment(&self) -> f64 {
        self.enrichment
    }
}

/// Table of `ln(i!)` for `i` in `0..=n`
///
/// # Examples
///
/// ```
/// use goterm::stats::LogFactorials;
///
/// let table = LogFactorials::new(5);
/// assert_eq!(table.len(), 6);
/// assert_eq!(table[0], 0.0);
/// assert!((table[5] - 120f64.ln()).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct LogFactorials {
    table: Vec<f64>,
}

impl LogFactorials {
    /// Computes the log-factorials up to and including `n`
    pub fn new(n: usize) -> Self {
        let mut table = Vec::with_capacity(n + 1);
        table.push(0.0);
        let mut sum = 0.0;
        for i in 1..=n {
            sum += f64_from_usize(i).ln();
            table.push(sum);
        }
        Self { table }
    }

    /// Returns the number of entries, `n + 1`
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Always `false`, the table contains at least `ln(0!)`
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl Index<usize> for LogFactorials {
    type Output = f64;
    fn index(&self, index: usize) -> &Self::Output {
        &self.table[index]
    }
}

/// `ln(n choose r)`
///
/// # Panics
///
/// If `r > n` or `n` exceeds the size of `table`
pub fn log_binomial_coefficient(n: usize, r: usize, table: &LogFactorials) -> f64 {
    table[n] - table[n - r] - table[r]
}

/// Probability of exactly `r` successes in `n` trials with success rate `p`
///
/// The edge cases follow the needs of [`enrichment_p_value`]: with `p == 0`
/// the result is `0` for `r == 0` and `1` for any other `r`. With
/// `p == 1` the result is `1` if `r == n` and `0` otherwise.
///
/// # Examples
///
/// ```
/// use goterm::stats::{binomial_pmf, LogFactorials};
///
/// let table = LogFactorials::new(4);
/// assert!((binomial_pmf(4, 2, 0.5, &table) - 0.375).abs() < 1e-12);
/// assert_eq!(binomial_pmf(4, 2, 0.0, &table), 1.0);
/// assert_eq!(binomial_pmf(4, 4, 1.0, &table), 1.0);
/// ```
#[allow(clippy::float_cmp)]
pub fn binomial_pmf(n: usize, r: usize, p: f64, table: &LogFactorials) -> f64 {
    if p == 0.0 {
        return if r == 0 { 0.0 } else { 1.0 };
    }
    if p == 1.0 {
        return if n == r { 1.0 } else { 0.0 };
    }
    (log_binomial_coefficient(n, r, table)
        + f64_from_usize(r) * p.ln()
        + f64_from_usize(n - r) * (1.0 - p).ln())
    .exp()
}

/// Probability of at least `study_hits` annotated genes in the study set
///
/// The success rate is `ref_hits / ref_size`. `table` must cover `study_size`.
/// A term without reference support has a p-value of `1.0`.
///
/// # Examples
///
/// ```
/// use goterm::stats::{enrichment_p_value, LogFactorials};
///
/// let table = LogFactorials::new(10);
///
/// // 5 of 10 study genes vs. 10 of 100 reference genes
/// let pvalue = enrichment_p_value(10, 100, 5, 10, &table);
/// assert!(pvalue < 0.002);
///
/// // nothing observed is nothing unusual
/// assert!((enrichment_p_value(10, 100, 0, 10, &table) - 1.0).abs() < 1e-9);
/// ```
pub fn enrichment_p_value(
    study_size: usize,
    ref_size: usize,
    study_hits: usize,
    ref_hits: usize,
    table: &LogFactorials,
) -> f64 {
    if ref_hits == 0 {
        return 1.0;
    }
    let p = f64_from_usize(ref_hits) / f64_from_usize(ref_size);
    (study_hits..=study_size)
        .map(|i| binomial_pmf(study_size, i, p, table))
        .sum()
}

/// Ratio of the study frequency to the reference frequency of a term
///
/// Returns `f64::INFINITY` if the term has no reference support, but
/// study hits.
pub fn fold_enrichment(study_size: usize, ref_size: usize, study_hits: usize, ref_hits: usize) -> f64 {
    (f64_from_usize(study_hits) / f64_from_usize(study_size))
        / (f64_from_usize(ref_hits) / f64_from_usize(ref_size))
}

#[allow(clippy::cast_precision_loss)]
fn f64_from_usize(n: usize) -> f64 {
    n as f64
}
