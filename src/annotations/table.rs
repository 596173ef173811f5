use core::fmt::Debug;

use tracing::{debug, warn};

use crate::alias::{self, SharedAliases};
use crate::annotations::{AnnotationRecord, Aspect, Evidence};
use crate::index::IndexedMap;
use crate::{GoError, GoResult, TermId};

/// The gene to term annotations
///
/// Records are kept in input order. The input must be grouped by gene, i.e.
/// all records of one gene must form a contiguous run. Each run is indexed
/// by the gene name.
///
/// The table is immutable after construction and can be shared between
/// threads.
///
/// # Examples
///
/// ```
/// use goterm::{Annotation, Aspect, Evidence, EvidenceCode};
///
/// let annotation = Annotation::from_records([
///     ("BRCA1", "GO:0006281", Evidence::from(EvidenceCode::IDA), Aspect::PROCESS),
///     ("BRCA1", "GO:0005634", Evidence::from(EvidenceCode::IDA), Aspect::COMPONENT),
///     ("TP53", "GO:0006281", Evidence::from(EvidenceCode::IEA), Aspect::PROCESS),
/// ]).unwrap();
///
/// assert_eq!(annotation.len(), 3);
/// assert_eq!(annotation.num_genes(), 2);
/// assert_eq!(annotation.records("BRCA1").unwrap().len(), 2);
/// assert!(annotation.records("KRAS").is_none());
/// ```
#[derive(Default, Clone)]
pub struct Annotation {
    records: Vec<AnnotationRecord>,
    genes: IndexedMap<usize>,
    gene_names: Vec<String>,
    aliases: Option<SharedAliases>,
}

impl Debug for Annotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Annotation with {} records of {} genes",
            self.records.len(),
            self.gene_names.len()
        )
    }
}

impl Annotation {
    /// Builds the table from `(gene, term id, evidence, aspect)` tuples
    ///
    /// # Errors
    ///
    /// [`GoError::MalformedRecord`] if a gene name or term id is empty
    pub fn from_records<I, S, T>(records: I) -> GoResult<Self>
    where
        I: IntoIterator<Item = (S, T, Evidence, Aspect)>,
        S: Into<String>,
        T: Into<String>,
    {
        Self::build(records, None)
    }

    /// Builds the table with an alias resolver for gene names
    ///
    /// # Errors
    ///
    /// [`GoError::MalformedRecord`] if a gene name or term id is empty
    pub fn from_records_with_aliases<I, S, T>(records: I, aliases: SharedAliases) -> GoResult<Self>
    where
        I: IntoIterator<Item = (S, T, Evidence, Aspect)>,
        S: Into<String>,
        T: Into<String>,
    {
        Self::build(records, Some(aliases))
    }

    fn build<I, S, T>(records: I, aliases: Option<SharedAliases>) -> GoResult<Self>
    where
        I: IntoIterator<Item = (S, T, Evidence, Aspect)>,
        S: Into<String>,
        T: Into<String>,
    {
        let records = records.into_iter();
        let n_records = records.size_hint().0;
        let mut table = Annotation {
            records: Vec::with_capacity(n_records),
            genes: IndexedMap::with_capacity(n_records / crate::DEFAULT_RECORDS_PER_GENE),
            gene_names: Vec::new(),
            aliases,
        };

        for (index, (gene, term, evidence, aspect)) in records.enumerate() {
            let gene: String = gene.into();
            let term = TermId::from(term.into());
            if gene.is_empty() || term.is_empty() {
                return Err(GoError::MalformedRecord { index });
            }

            let is_new_run = table
                .records
                .last()
                .map_or(true, |previous| previous.gene() != gene);
            if is_new_run {
                if table.genes.put(gene.as_str(), index).is_some() {
                    warn!("Records of gene {} are not contiguous", gene);
                } else {
                    table.gene_names.push(gene.clone());
                }
            }
            table
                .records
                .push(AnnotationRecord::new(gene, term, evidence, aspect));
        }
        debug!("Built {:?}", table);
        Ok(table)
    }

    /// Returns the number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the table has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the number of distinct genes
    pub fn num_genes(&self) -> usize {
        self.gene_names.len()
    }

    /// Returns the distinct gene names in record order
    pub fn gene_names(&self) -> impl Iterator<Item = &str> {
        self.gene_names.iter().map(String::as_str)
    }

    /// Returns all records of a gene
    ///
    /// If the gene is not known, the alias resolver is consulted once.
    pub fn records(&self, gene: &str) -> Option<&[AnnotationRecord]> {
        let start = *alias::resolve_with(self.aliases.as_ref(), gene, move |key| self.genes.get(key))?;
        let name = self.records[start].gene();
        let len = self.records[start..]
            .iter()
            .take_while(|record| record.gene() == name)
            .count();
        Some(&self.records[start..start + len])
    }

    /// Returns the attached alias resolver
    pub fn aliases(&self) -> Option<&SharedAliases> {
        self.aliases.as_ref()
    }

    /// Returns an iterator of all records in input order
    pub fn iter(&self) -> std::slice::Iter<'_, AnnotationRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a Annotation {
    type Item = &'a AnnotationRecord;
    type IntoIter = std::slice::Iter<'a, AnnotationRecord>;
    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
