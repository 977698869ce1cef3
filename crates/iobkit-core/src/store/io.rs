//! Tab-delimited token/tag files.
//!
//! One `token\ttag` pair per line. A `.` token closes the current sentence.
//! Single-field lines and the `begin`/`end` markers some annotation tools
//! emit are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use super::{Sentence, TagStore};
use crate::error::{IobError, Result};

/// Token that terminates a sentence.
const SENTENCE_END: &str = ".";

/// Tag values that mark tool output rather than annotations.
const MARKER_TAGS: &[&str] = &["begin", "end"];

/// Counters collected while reading a tag file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// (token, tag) pairs kept.
    pub pairs: usize,
    /// Sentences emitted.
    pub sentences: usize,
    /// Lines with fewer than two fields.
    pub short_lines: usize,
    /// Lines whose tag was a `begin`/`end` marker.
    pub marker_lines: usize,
}

impl LoadReport {
    /// Number of artifact lines skipped.
    pub fn skipped(&self) -> usize {
        self.short_lines + self.marker_lines
    }
}

impl TagStore {
    /// Load a store from a tab-delimited token/tag file.
    ///
    /// # Errors
    ///
    /// Returns `IobError::Io` if the file cannot be opened or read.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let (store, report) = Self::read_with_report(BufReader::new(File::open(path)?))?;
        debug!(
            path = %path.display(),
            sentences = report.sentences,
            pairs = report.pairs,
            skipped = report.skipped(),
            "loaded tag file"
        );
        Ok(store)
    }

    /// Read a store from any buffered reader.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        Self::read_with_report(reader).map(|(store, _)| store)
    }

    /// Read a store and report how many artifact lines were skipped.
    pub fn read_with_report<R: BufRead>(reader: R) -> Result<(Self, LoadReport)> {
        let mut report = LoadReport::default();
        let mut sentences = Vec::new();
        let mut tokens = Vec::new();
        let mut tags = Vec::new();

        for line in reader.lines() {
            let line = line?;
            let mut fields = line.trim().split('\t');

            let (Some(token), Some(tag)) = (fields.next(), fields.next()) else {
                report.short_lines += 1;
                continue;
            };

            if MARKER_TAGS.contains(&tag) {
                report.marker_lines += 1;
                continue;
            }

            tokens.push(token.to_string());
            tags.push(tag.to_string());
            report.pairs += 1;

            if token == SENTENCE_END {
                sentences.push(Sentence {
                    tokens: std::mem::take(&mut tokens),
                    tags: std::mem::take(&mut tags),
                });
            }
        }

        // Trailing sentence without a closing period
        if !tokens.is_empty() {
            sentences.push(Sentence { tokens, tags });
        }

        report.sentences = sentences.len();
        Ok((Self::from_sentences(sentences), report))
    }

    /// Write the store as tab-delimited pairs, sentences back to back.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        for sentence in &self.sentences {
            for (token, tag) in sentence.pairs() {
                writeln!(writer, "{token}\t{tag}")?;
            }
        }
        Ok(())
    }
}

impl FromStr for TagStore {
    type Err = IobError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_reader(s.as_bytes())
    }
}
