//! Paper records, the seen-set ledger, and the accumulated corpus

mod merge;
mod record;
mod seen;

pub use merge::{Corpus, MergeReport};
pub use record::{parse_publication_date, Classification, Paper, RawRecord, RecordError, DEFAULT_VENUE};
pub use seen::SeenSet;
