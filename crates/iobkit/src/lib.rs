//! # iobkit
//!
//! Toolkit for preparing IOB-tagged biomedical literature for NER
//! training. Re-exports the tag-sequence core and the corpus helpers.
//!
//! ```rust
//! use iobkit::core::{MatchMode, TagStore};
//!
//! let store: TagStore = "T\tB-cell\ncells\tI-cell\n.\tO\n".parse().unwrap();
//! let merged = store.merge_tags("cell", "cell_type", MatchMode::ExactType);
//! assert_eq!(merged.tag_stats()["B-cell_type"], 1);
//! ```
pub use iobkit_core as core;
pub use iobkit_corpus as corpus;

pub use iobkit_core::{IobError, MatchMode, Sentence, TagStore};
