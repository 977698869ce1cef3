//! # Tag Transforms
//!
//! Merge, remove or remap tag categories across a store. Each operation
//! returns a new store.

use crate::store::TagStore;
use crate::tags::IobTag;

/// How a tag argument is matched against tag literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// Parse the literal and compare its entity type exactly.
    #[default]
    ExactType,
    /// Match anywhere inside the raw literal, prefix included.
    Substring,
}

impl TagStore {
    /// Rewrite every tag literal with `f`.
    pub fn map_tags<F>(&self, mut f: F) -> TagStore
    where
        F: FnMut(&str) -> String,
    {
        self.iter().map(|sentence| sentence.map_tags(&mut f)).collect()
    }

    /// Fold tag category `source` into `target`.
    ///
    /// With [`MatchMode::ExactType`], `source` and `target` are entity
    /// types: `B-cell` becomes `B-cell_type` and the prefix is kept.
    /// With [`MatchMode::Substring`], every occurrence of `source` inside a
    /// literal is replaced, so pass `"B-DISEASE"` rather than `"DISEASE"`
    /// to change only one prefix.
    ///
    /// # Examples
    /// ```
    /// use iobkit_core::{MatchMode, TagStore};
    ///
    /// let store: TagStore = "T\tB-cell\ncells\tI-cell\n".parse().unwrap();
    /// let merged = store.merge_tags("cell", "cell_type", MatchMode::ExactType);
    /// assert_eq!(merged.sentences()[0].tags(), ["B-cell_type", "I-cell_type"]);
    /// ```
    pub fn merge_tags(&self, source: &str, target: &str, mode: MatchMode) -> TagStore {
        match mode {
            MatchMode::Substring => self.map_tags(|tag| tag.replace(source, target)),
            MatchMode::ExactType => self.map_tags(|tag| match IobTag::parse(tag) {
                Ok(parsed) if parsed.entity_type() == Some(source) => {
                    parsed.with_entity_type(target).to_string()
                }
                _ => tag.to_string(),
            }),
        }
    }

    /// Reset every tag matching `needle` to `O`.
    pub fn remove_tag_type(&self, needle: &str, mode: MatchMode) -> TagStore {
        self.map_tags(|tag| {
            if tag_matches(tag, needle, mode) {
                "O".to_string()
            } else {
                tag.to_string()
            }
        })
    }
}

fn tag_matches(tag: &str, needle: &str, mode: MatchMode) -> bool {
    match mode {
        MatchMode::Substring => tag.contains(needle),
        MatchMode::ExactType => IobTag::parse(tag)
            .ok()
            .is_some_and(|parsed| parsed.entity_type() == Some(needle)),
    }
}
