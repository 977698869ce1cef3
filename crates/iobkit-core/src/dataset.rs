//! Conversion from integer-coded token-classification datasets.
//!
//! Each example carries a list of tokens and a parallel list of codes,
//! `0` = outside, `1` = begin, `2` = inside, for a single entity type.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{IobError, Result};
use crate::store::{Sentence, TagStore};
use crate::tags::IobTag;

/// One example of a coded dataset, as exported to JSON lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodedExample {
    pub id: String,
    pub tokens: Vec<String>,
    pub ner_tags: Vec<i64>,
}

/// A tag code outside `0..=2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anomaly {
    pub example_id: String,
    pub position: usize,
    pub code: i64,
}

/// A converted store plus the codes that were skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub store: TagStore,
    pub anomalies: Vec<Anomaly>,
}

/// Map one integer code to an IOB tag of `tag_name`.
pub fn decode_tag(code: i64, tag_name: &str) -> Option<IobTag> {
    match code {
        0 => Some(IobTag::Outside),
        1 => Some(IobTag::Begin(tag_name.to_string())),
        2 => Some(IobTag::Inside(tag_name.to_string())),
        _ => None,
    }
}

/// Convert coded examples into a store, one sentence per example.
///
/// A token whose code is unknown is dropped together with its code and
/// reported in [`Conversion::anomalies`]. Examples left without tokens are
/// skipped.
///
/// # Errors
///
/// Returns `IobError::ShapeMismatch` if an example has a different number
/// of tokens and codes.
pub fn convert_coded<'a, I>(examples: I, tag_name: &str) -> Result<Conversion>
where
    I: IntoIterator<Item = &'a CodedExample>,
{
    let mut store = TagStore::new();
    let mut anomalies = Vec::new();

    for example in examples {
        if example.tokens.len() != example.ner_tags.len() {
            return Err(IobError::ShapeMismatch {
                left: example.tokens.len(),
                right: example.ner_tags.len(),
            });
        }

        let mut pairs = Vec::with_capacity(example.tokens.len());
        for (position, (token, &code)) in example.tokens.iter().zip(&example.ner_tags).enumerate() {
            match decode_tag(code, tag_name) {
                Some(tag) => pairs.push((token.clone(), tag.to_string())),
                None => {
                    warn!(example = %example.id, position, code, "strange tag code, skipping token");
                    anomalies.push(Anomaly {
                        example_id: example.id.clone(),
                        position,
                        code,
                    });
                }
            }
        }

        if !pairs.is_empty() {
            store.push(Sentence::from_pairs(pairs)?);
        }
    }

    Ok(Conversion { store, anomalies })
}

/// Read coded examples from a JSON lines file. Blank lines are ignored.
pub fn load_coded_jsonl<P: AsRef<Path>>(path: P) -> Result<Vec<CodedExample>> {
    let reader = BufReader::new(File::open(path)?);
    let mut examples = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        examples.push(serde_json::from_str(&line)?);
    }
    Ok(examples)
}
