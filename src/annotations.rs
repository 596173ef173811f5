//! Genes are linked to GO terms through annotation records
//!
//! Each [`AnnotationRecord`] connects one gene to one term and carries the
//! [`Evidence`] that supports the connection and the [`Aspect`] (namespace)
//! of the term. The [`Annotation`] table owns all records, grouped by gene.
//!
//! Both [`Evidence`] and [`Aspect`] are bitmasks, so that queries can filter
//! records for several evidence codes or aspects at once.

mod aspect;
mod evidence;
mod record;
mod table;

pub use aspect::Aspect;
pub use evidence::{Evidence, EvidenceCode};
pub use record::AnnotationRecord;
pub use table::Annotation;
