use crate::annotations::{Aspect, Evidence};
use crate::TermId;

/// A single gene to term annotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRecord {
    gene: String,
    term: TermId,
    evidence: Evidence,
    aspect: Aspect,
}

impl AnnotationRecord {
    /// Constructs a new record
    pub fn new(gene: String, term: TermId, evidence: Evidence, aspect: Aspect) -> Self {
        Self {
            gene,
            term,
            evidence,
            aspect,
        }
    }

    /// The name of the annotated gene
    pub fn gene(&self) -> &str {
        &self.gene
    }

    /// The id of the annotated term, as provided
    ///
    /// The id might be an alias of the term in the ontology.
    pub fn term(&self) -> &TermId {
        &self.term
    }

    /// The evidence of the annotation
    pub fn evidence(&self) -> Evidence {
        self.evidence
    }

    /// The namespace of the annotated term
    pub fn aspect(&self) -> Aspect {
        self.aspect
    }

    /// Returns `true` if the record passes both filters
    pub fn matches(&self, evidence: Evidence, aspect: Aspect) -> bool {
        self.evidence.intersects(evidence) && self.aspect.intersects(aspect)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::EvidenceCode;

    #[test]
    fn filters() {
        let record = AnnotationRecord::new(
            "BRCA1".to_string(),
            "GO:0006281".into(),
            EvidenceCode::IDA.into(),
            Aspect::PROCESS,
        );
        assert!(record.matches(Evidence::ALL, Aspect::ALL));
        assert!(!record.matches(EvidenceCode::IEA.into(), Aspect::ALL));
        assert!(!record.matches(Evidence::ALL, Aspect::FUNCTION));
    }
}
