//! Inclusion/exclusion filtering and taxonomy tagging
//!
//! The classifier is a pure function of (records, seen-set, policy): the
//! seen-set is passed in and handed back, never held as ambient state.

mod classifier;
mod matcher;
mod policy;

pub use classifier::{classify, ClassifyError, ClassifyOutcome, ClassifyReport, Classifier, Decision};
pub use matcher::KeywordTable;
pub use policy::{Category, Policy, PolicyError, TableKind, FALLBACK_LABEL};
