//! # Span Conversion
//!
//! Flattens a store into one token stream, rebuilds the text by joining
//! tokens with single spaces, and derives character-offset entity spans
//! through the BILUO scheme. The resulting [`AnnotationDocument`] is the
//! JSONL record consumed by span-review tooling.
//!
//! Offsets count Unicode scalar values, not bytes, and `end` is exclusive.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::{IobError, Result};
use crate::store::TagStore;
use crate::tags::{iob_to_biluo, BiluoTag};

/// Sentence boundaries removed: parallel token and tag streams.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatSequence {
    pub tokens: Vec<String>,
    pub tags: Vec<String>,
}

impl FlatSequence {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The text all span offsets refer to.
    pub fn text(&self) -> String {
        reconstruct_text(&self.tokens)
    }

    /// Character spans for each entity run.
    ///
    /// # Errors
    ///
    /// Fails with `IobError::TagConsistency` or `IobError::MalformedTag`
    /// when the tag stream cannot be converted to BILUO.
    pub fn spans(&self) -> Result<Vec<Span>> {
        let biluo = iob_to_biluo(&self.tags)?;

        let mut spans = Vec::new();
        let mut offset = 0;
        let mut open: Option<usize> = None;

        for (token, tag) in self.tokens.iter().zip(&biluo) {
            let start = offset;
            let end = start + token.chars().count();

            if tag.starts_entity() {
                open = Some(start);
            }
            if tag.ends_entity() {
                if let (Some(span_start), Some(label)) = (open.take(), tag.entity_type()) {
                    spans.push(Span {
                        start: span_start,
                        end,
                        label: label.to_string(),
                    });
                }
            }

            // One separating space
            offset = end + 1;
        }

        Ok(spans)
    }
}

/// A labeled character range of the reconstructed text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub label: String,
}

/// Provenance carried with an annotation document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationMeta {
    pub source: String,
}

/// Text plus entity spans, one line of a review-tool JSONL file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationDocument {
    pub text: String,
    pub spans: Vec<Span>,
    pub meta: AnnotationMeta,
}

/// Join tokens with one ASCII space.
pub fn reconstruct_text<S: AsRef<str>>(tokens: &[S]) -> String {
    let mut text = String::new();
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            text.push(' ');
        }
        text.push_str(token.as_ref());
    }
    text
}

impl TagStore {
    /// Concatenate every sentence into one token stream.
    pub fn flatten(&self) -> FlatSequence {
        let mut flat = FlatSequence {
            tokens: Vec::with_capacity(self.token_count()),
            tags: Vec::with_capacity(self.token_count()),
        };
        for sentence in self {
            flat.tokens.extend_from_slice(sentence.tokens());
            flat.tags.extend_from_slice(sentence.tags());
        }
        flat
    }

    /// BILUO tags for the flattened store.
    pub fn to_biluo(&self) -> Result<Vec<BiluoTag>> {
        iob_to_biluo(&self.flatten().tags)
    }

    /// Entity spans over the flattened text.
    pub fn compute_spans(&self) -> Result<Vec<Span>> {
        self.flatten().spans()
    }

    /// Wrap the flattened text and its spans for review tooling.
    ///
    /// # Examples
    /// ```
    /// use iobkit_core::TagStore;
    ///
    /// let store: TagStore = "Heart\tB-tissue\ntissue\tI-tissue\n.\tO\n".parse().unwrap();
    /// let doc = store.to_annotation_document("PMC123").unwrap();
    /// assert_eq!(doc.text, "Heart tissue .");
    /// assert_eq!((doc.spans[0].start, doc.spans[0].end), (0, 12));
    /// ```
    pub fn to_annotation_document(&self, source: &str) -> Result<AnnotationDocument> {
        let flat = self.flatten();
        Ok(AnnotationDocument {
            spans: flat.spans()?,
            text: flat.text(),
            meta: AnnotationMeta {
                source: source.to_string(),
            },
        })
    }

    /// Like [`TagStore::to_annotation_document`], with the spans of
    /// `other` appended. Both stores must carry the same tokens.
    ///
    /// # Errors
    ///
    /// Returns `IobError::ShapeMismatch` when the token counts differ and
    /// `IobError::TokenMismatch` at the first differing token.
    pub fn to_annotation_document_two_tag_sets(
        &self,
        other: &TagStore,
        source: &str,
    ) -> Result<AnnotationDocument> {
        let first = self.flatten();
        let second = other.flatten();

        if first.len() != second.len() {
            return Err(IobError::ShapeMismatch {
                left: first.len(),
                right: second.len(),
            });
        }
        if let Some((index, (left, right))) = first
            .tokens
            .iter()
            .zip(&second.tokens)
            .enumerate()
            .find(|(_, (left, right))| left != right)
        {
            return Err(IobError::TokenMismatch {
                index,
                left: left.clone(),
                right: right.clone(),
            });
        }

        let mut spans = first.spans()?;
        spans.extend(second.spans()?);

        Ok(AnnotationDocument {
            text: first.text(),
            spans,
            meta: AnnotationMeta {
                source: source.to_string(),
            },
        })
    }
}

/// Write documents as JSON lines.
pub fn write_jsonl<'a, W, I>(mut writer: W, documents: I) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a AnnotationDocument>,
{
    for doc in documents {
        serde_json::to_writer(&mut writer, doc)?;
        writeln!(writer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(text: &str) -> TagStore {
        text.parse().unwrap()
    }

    fn char_slice(text: &str, span: &Span) -> String {
        text.chars().skip(span.start).take(span.end - span.start).collect()
    }

    const TWO_SENTENCES: &str = "\
Heart\tB-tissue
tissue\tI-tissue
was\tO
dissociated\tO
.\tO
CD4+\tB-cell_type
T\tI-cell_type
cells\tI-cell_type
expand\tO
.\tO
";

    #[test]
    fn test_flatten_counts_every_token() {
        let s = store(TWO_SENTENCES);
        let flat = s.flatten();
        let expected: usize = s.iter().map(|sentence| sentence.len()).sum();
        assert_eq!(flat.len(), expected);
        assert_eq!(flat.tags.len(), expected);
        assert_eq!(flat.tokens[5], "CD4+");
    }

    #[test]
    fn test_reconstruct_text() {
        assert_eq!(reconstruct_text(&["a", "b", "."]), "a b .");
        assert_eq!(reconstruct_text(&["solo"]), "solo");
        let empty: [&str; 0] = [];
        assert_eq!(reconstruct_text(&empty), "");
    }

    #[test]
    fn test_spans_cover_entity_tokens() {
        let s = store(TWO_SENTENCES);
        let flat = s.flatten();
        let text = flat.text();
        let spans = flat.spans().unwrap();

        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].label, "tissue");
        assert_eq!(char_slice(&text, &spans[0]), "Heart tissue");
        assert_eq!(spans[1].label, "cell_type");
        assert_eq!(char_slice(&text, &spans[1]), "CD4+ T cells");
    }

    #[test]
    fn test_single_token_entity() {
        let spans = store("in\tO\nlung\tB-tissue\n").compute_spans().unwrap();
        assert_eq!(
            spans,
            [Span {
                start: 3,
                end: 7,
                label: "tissue".into()
            }]
        );
    }

    #[test]
    fn test_offsets_count_characters() {
        let s = store("µm\tO\nβ-cells\tB-cell_type\n");
        let doc = s.to_annotation_document("x").unwrap();
        assert_eq!(doc.spans[0].start, 3);
        assert_eq!(doc.spans[0].end, 10);
        assert_eq!(char_slice(&doc.text, &doc.spans[0]), "β-cells");
    }

    #[test]
    fn test_inconsistent_tags_surface_index() {
        let err = store("a\tO\n.\tO\nb\tI-tissue\n").compute_spans().unwrap_err();
        assert!(matches!(err, IobError::TagConsistency { index: 2, .. }));
    }

    #[test]
    fn test_annotation_document_json_shape() {
        let doc = store("Heart\tB-tissue\n").to_annotation_document("PMC42").unwrap();
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "text": "Heart",
                "spans": [{"start": 0, "end": 5, "label": "tissue"}],
                "meta": {"source": "PMC42"}
            })
        );
    }

    #[test]
    fn test_two_tag_sets_concatenate_spans() {
        let tissues = store("Heart\tB-tissue\ncells\tO\n");
        let cells = store("Heart\tO\ncells\tB-cell_type\n");
        let doc = tissues
            .to_annotation_document_two_tag_sets(&cells, "PMC1")
            .unwrap();
        assert_eq!(doc.text, "Heart cells");
        let labels: Vec<_> = doc.spans.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, ["tissue", "cell_type"]);
        assert_eq!((doc.spans[1].start, doc.spans[1].end), (6, 11));
    }

    #[test]
    fn test_two_tag_sets_shape_mismatch() {
        let a = store("Heart\tO\ncells\tO\n");
        let b = store("Heart\tO\n");
        let err = a.to_annotation_document_two_tag_sets(&b, "x").unwrap_err();
        assert!(matches!(err, IobError::ShapeMismatch { left: 2, right: 1 }));
    }

    #[test]
    fn test_two_tag_sets_token_mismatch() {
        let a = store("Heart\tO\ncells\tO\n");
        let b = store("Heart\tO\ntissue\tO\n");
        let err = a.to_annotation_document_two_tag_sets(&b, "x").unwrap_err();
        assert!(matches!(err, IobError::TokenMismatch { index: 1, .. }));
    }

    #[test]
    fn test_write_jsonl_one_document_per_line() {
        let docs = [
            store("a\tB-x\n").to_annotation_document("1").unwrap(),
            store("b\tO\n").to_annotation_document("2").unwrap(),
        ];
        let mut out = Vec::new();
        write_jsonl(&mut out, &docs).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let back: AnnotationDocument = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(back, docs[1]);
    }
}
