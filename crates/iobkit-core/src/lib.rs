//! # iobkit Core
//!
//! Data model and transformations for IOB-tagged NER training data:
//! sentence-grouped tag stores, train/validation and k-fold partitioning,
//! tag category merging, and BILUO-based character span extraction for
//! annotation review tools.
//!
//! ## Quick Start
//!
//! ```rust
//! use iobkit_core::TagStore;
//!
//! let store: TagStore = "Heart\tB-tissue\ntissue\tI-tissue\n.\tO\n".parse().unwrap();
//!
//! assert_eq!(store.aggregate_entity_values("tissue")["heart tissue"], 1);
//!
//! let doc = store.to_annotation_document("PMC0000001").unwrap();
//! assert_eq!(doc.text, "Heart tissue .");
//! assert_eq!(doc.spans[0].label, "tissue");
//! ```
pub mod dataset;
pub mod detok;
pub mod error;
pub mod partition;
pub mod span;
pub mod store;
pub mod tags;
pub mod transform;

// Re-export primary API
pub use dataset::{convert_coded, load_coded_jsonl, Anomaly, CodedExample, Conversion};
pub use detok::{join_punct, join_punct_rear};
pub use error::{IobError, Result};
pub use partition::{Fold, Folds, Sample, Split, SplitWarning};
pub use span::{reconstruct_text, write_jsonl, AnnotationDocument, AnnotationMeta, FlatSequence, Span};
pub use store::{LoadReport, Sentence, TagStore};
pub use tags::{iob_to_biluo, BiluoTag, IobTag};
pub use transform::MatchMode;

// Callers pass the generator explicitly
pub use oorandom::Rand64;
