#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
use core::fmt::Debug;
use thiserror::Error;

pub mod alias;
pub mod annotations;
pub mod index;
pub mod ontology;
pub mod query;
pub mod slim;
pub mod stats;
pub mod term;

pub use alias::AliasResolver;
pub use annotations::{Annotation, AnnotationRecord, Aspect, Evidence, EvidenceCode};
pub use ontology::Ontology;
pub use query::{Progress, TermFinder};
pub use term::{GoTerm, TermGroup, TermId};

const DEFAULT_NUM_PARENTS: usize = 4;
const DEFAULT_RECORDS_PER_GENE: usize = 8;

/// Ratio of hash capacity to the expected number of terms
const TERM_CAPACITY_FACTOR: f32 = 1.5;

/// Main Error type for this crate
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GoError {
    /// Term does not exist in the [`Ontology`]
    #[error("term {0} does not exist")]
    DoesNotExist(String),
    /// A term tuple passed to the [`Ontology`] builder has an empty identifier
    #[error("term #{index} has an empty identifier")]
    MalformedTerm {
        /// Position of the term in the input
        index: usize,
    },
    /// An annotation tuple has an empty gene name or term identifier
    #[error("annotation record #{index} has an empty gene name or term id")]
    MalformedRecord {
        /// Position of the record in the input
        index: usize,
    },
    /// A slim-only query was started without a slim subset
    #[error("slim mapping requested, but no slim subset was provided")]
    MissingSlimSubset,
    /// The evidence code is unknown
    #[error("unknown evidence code {0}")]
    InvalidEvidenceCode(String),
    /// The aspect (namespace) is unknown
    #[error("unknown aspect {0}")]
    InvalidAspect(String),
    /// The progress callback aborted the query
    #[error("query aborted: {0}")]
    Aborted(String),
}

/// Shortcut for `Result<T, GoError>`
pub type GoResult<T> = Result<T, GoError>;

/// Capacity used for hash based indices sized after the number of terms
fn term_capacity(n_terms: usize) -> usize {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let capacity = (n_terms as f32 * TERM_CAPACITY_FACTOR) as usize;
    capacity.max(1)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn capacity_is_never_zero() {
        assert_eq!(term_capacity(0), 1);
        assert_eq!(term_capacity(2), 3);
        assert_eq!(term_capacity(100), 150);
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            GoError::DoesNotExist("GO:0000001".to_string()).to_string(),
            "term GO:0000001 does not exist"
        );
        assert_eq!(
            GoError::MalformedRecord { index: 3 }.to_string(),
            "annotation record #3 has an empty gene name or term id"
        );
    }
}
