//! # iobkit Corpus
//!
//! Filesystem-side helpers for assembling a literature corpus before
//! annotation: identifier lists from a literature search, resolution of
//! identifiers to accessible full-text records, the plain-text layout for
//! parsed articles, and topical relevance filtering.
//!
//! Network access and XML parsing are left to the caller.
pub mod error;
pub mod filter;
pub mod identifiers;
pub mod parsed;
pub mod records;

pub use error::{CorpusError, Result};
pub use filter::{
    load_reference_counts, reference_counts_from_reader, FilterReport, TopicFilter,
    TopicFilterConfig,
};
pub use identifiers::IdentifierSet;
pub use parsed::{LayoutWriter, Paragraph, ParsedArticle};
pub use records::{
    load_index, parse_manuscript_file_list, parse_oa_file_list, resolve, RecordEntry,
    RecordSource, Resolution,
};
