//! Tag and entity tallies over a store.

use std::collections::BTreeMap;

use super::TagStore;
use crate::tags::IobTag;

impl TagStore {
    /// Count occurrences of each tag literal.
    pub fn tag_stats(&self) -> BTreeMap<String, usize> {
        let mut tally = BTreeMap::new();
        for tag in self.sentences.iter().flat_map(|s| &s.tags) {
            *tally.entry(tag.clone()).or_insert(0) += 1;
        }
        tally
    }

    /// Tally the surface strings of `target_type` entities, ignoring the
    /// B-/I- distinction.
    ///
    /// Any token whose tag, minus its two-character prefix, equals
    /// `target_type` extends the current run; runs close on any other tag
    /// and at the end of every sentence. Values are lowercased.
    ///
    /// Two adjacent entities of the same type with no `O` between them are
    /// counted as one value. [`TagStore::aggregate_entity_values`] keeps
    /// them apart.
    pub fn aggregate_entity_values_conflated(&self, target_type: &str) -> BTreeMap<String, usize> {
        let mut tally = RunTally::default();
        for sentence in &self.sentences {
            for (token, tag) in sentence.pairs() {
                if tag.get(2..) == Some(target_type) {
                    tally.extend(token);
                } else {
                    tally.close();
                }
            }
            tally.close();
        }
        tally.counts
    }

    /// Tally the surface strings of `target_type` entities, starting a new
    /// value at every `B-` tag.
    ///
    /// An `I-` tag with no open run starts one. Malformed tags close the
    /// run like `O`.
    pub fn aggregate_entity_values(&self, target_type: &str) -> BTreeMap<String, usize> {
        let mut tally = RunTally::default();
        for sentence in &self.sentences {
            for (token, tag) in sentence.pairs() {
                match IobTag::parse(tag) {
                    Ok(parsed) if parsed.entity_type() == Some(target_type) => {
                        if parsed.is_begin() {
                            tally.close();
                        }
                        tally.extend(token);
                    }
                    _ => tally.close(),
                }
            }
            tally.close();
        }
        tally.counts
    }
}

/// Accumulates the tokens of the open run and counts closed runs.
#[derive(Default)]
struct RunTally {
    current: Vec<String>,
    counts: BTreeMap<String, usize>,
}

impl RunTally {
    fn extend(&mut self, token: &str) {
        self.current.push(token.to_string());
    }

    fn close(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let value = self.current.join(" ").trim().to_lowercase();
        self.current.clear();
        if !value.is_empty() {
            *self.counts.entry(value).or_insert(0) += 1;
        }
    }
}
