//! # Tag Sequence Store
//!
//! Sentence-grouped token/tag sequences. Tags are kept as raw literals: a
//! store loaded from disk may contain anything the annotation tool wrote,
//! and validation happens only where a transformation needs parsed tags.

mod io;
mod stats;

pub use io::LoadReport;

use crate::error::{IobError, Result};

/// One sentence: parallel token and tag lists of equal, non-zero length.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sentence {
    tokens: Vec<String>,
    tags: Vec<String>,
}

impl Sentence {
    /// Build a sentence from parallel token and tag lists.
    ///
    /// # Errors
    ///
    /// Returns `IobError::ShapeMismatch` if the lists differ in length and
    /// `IobError::EmptySentence` if they are empty.
    pub fn new(tokens: Vec<String>, tags: Vec<String>) -> Result<Self> {
        if tokens.len() != tags.len() {
            return Err(IobError::ShapeMismatch {
                left: tokens.len(),
                right: tags.len(),
            });
        }
        if tokens.is_empty() {
            return Err(IobError::EmptySentence);
        }
        Ok(Self { tokens, tags })
    }

    /// Build a sentence from (token, tag) pairs.
    pub fn from_pairs<T, U, I>(pairs: I) -> Result<Self>
    where
        T: Into<String>,
        U: Into<String>,
        I: IntoIterator<Item = (T, U)>,
    {
        let (tokens, tags) = pairs
            .into_iter()
            .map(|(token, tag)| (token.into(), tag.into()))
            .unzip();
        Self::new(tokens, tags)
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Always false for a constructed sentence.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Iterate over (token, tag) pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tokens
            .iter()
            .zip(&self.tags)
            .map(|(token, tag)| (token.as_str(), tag.as_str()))
    }

    /// Same tokens, tags rewritten by `f`.
    pub(crate) fn map_tags<F>(&self, mut f: F) -> Sentence
    where
        F: FnMut(&str) -> String,
    {
        Sentence {
            tokens: self.tokens.clone(),
            tags: self.tags.iter().map(|tag| f(tag)).collect(),
        }
    }
}

/// An ordered collection of sentences.
///
/// Treated as immutable: transformations return new stores. The one
/// exception is [`TagStore::take_random`], which drains sentences from
/// `self`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagStore {
    sentences: Vec<Sentence>,
}

impl TagStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sentences(sentences: Vec<Sentence>) -> Self {
        Self { sentences }
    }

    /// Number of sentences.
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// Total number of tokens across all sentences.
    pub fn token_count(&self) -> usize {
        self.sentences.iter().map(Sentence::len).sum()
    }

    pub fn sentences(&self) -> &[Sentence] {
        &self.sentences
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sentence> {
        self.sentences.iter()
    }

    pub fn push(&mut self, sentence: Sentence) {
        self.sentences.push(sentence);
    }

    pub fn into_sentences(self) -> Vec<Sentence> {
        self.sentences
    }

    pub(crate) fn sentences_mut(&mut self) -> &mut Vec<Sentence> {
        &mut self.sentences
    }

    /// New store holding a copy of the sentences in `range`.
    pub(crate) fn slice(&self, range: std::ops::Range<usize>) -> TagStore {
        TagStore::from_sentences(self.sentences[range].to_vec())
    }
}

impl FromIterator<Sentence> for TagStore {
    fn from_iter<I: IntoIterator<Item = Sentence>>(iter: I) -> Self {
        Self {
            sentences: iter.into_iter().collect(),
        }
    }
}

impl Extend<Sentence> for TagStore {
    fn extend<I: IntoIterator<Item = Sentence>>(&mut self, iter: I) {
        self.sentences.extend(iter);
    }
}

impl IntoIterator for TagStore {
    type Item = Sentence;
    type IntoIter = std::vec::IntoIter<Sentence>;

    fn into_iter(self) -> Self::IntoIter {
        self.sentences.into_iter()
    }
}

impl<'a> IntoIterator for &'a TagStore {
    type Item = &'a Sentence;
    type IntoIter = std::slice::Iter<'a, Sentence>;

    fn into_iter(self) -> Self::IntoIter {
        self.sentences.iter()
    }
}
