//! # Topic Filter
//!
//! Literature searches do not enforce exact phrase matches, so parsed
//! articles are re-checked for the study's topic phrases before they are
//! annotated. Articles with too few references are dropped as well.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CorpusError, Result};

const DEFAULT_TOPICS: &[&str] = &[
    "scRNA",
    "single cell RNA",
    "single-cell RNA",
    "single-cell-RNA",
    "single cell transcriptom",
];

/// Configuration for [`TopicFilter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicFilterConfig {
    /// Case-sensitive phrases; an article matches if it contains any.
    pub topics: Vec<String>,
    /// Articles need strictly more references than this.
    pub min_references: u32,
}

impl Default for TopicFilterConfig {
    fn default() -> Self {
        Self {
            topics: DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect(),
            min_references: 10,
        }
    }
}

impl TopicFilterConfig {
    /// Create a configuration with the default single-cell topics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON file. Missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }

    /// Replace the topic phrases.
    pub fn with_topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topics = topics.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_min_references(mut self, min_references: u32) -> Self {
        self.min_references = min_references;
        self
    }
}

/// Outcome of [`TopicFilter::filter_dir`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterReport {
    /// Files looked at in the source directory.
    pub scanned: usize,
    /// Files missing from the reference table or under the threshold.
    pub too_few_references: usize,
    /// Eligible files without any topic phrase.
    pub off_topic: usize,
    /// Destination paths of copied files.
    pub copied: Vec<PathBuf>,
}

pub struct TopicFilter {
    config: TopicFilterConfig,
}

impl TopicFilter {
    pub fn new(config: TopicFilterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TopicFilterConfig {
        &self.config
    }

    /// True if `text` contains any topic phrase.
    pub fn is_relevant(&self, text: &str) -> bool {
        self.config.topics.iter().any(|topic| text.contains(topic.as_str()))
    }

    /// True if `name` is listed with more than `min_references` references.
    pub fn has_enough_references(&self, name: &str, counts: &BTreeMap<String, u32>) -> bool {
        counts
            .get(name)
            .is_some_and(|&count| count > self.config.min_references)
    }

    /// Copy relevant, well-referenced `.txt` files from `src` to `dst`.
    ///
    /// `counts` is keyed by file stem (`PMC123` for `PMC123.txt`). Files
    /// with any other extension are ignored.
    pub fn filter_dir(
        &self,
        src: &Path,
        dst: &Path,
        counts: &BTreeMap<String, u32>,
    ) -> Result<FilterReport> {
        std::fs::create_dir_all(dst)?;
        let mut report = FilterReport::default();

        let mut paths: Vec<PathBuf> = std::fs::read_dir(src)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<_>>()?;
        paths.sort();

        for path in paths {
            if !path.is_file() || path.extension().is_none_or(|ext| ext != "txt") {
                continue;
            }
            let (Some(stem), Some(file_name)) = (
                path.file_stem().and_then(|s| s.to_str()),
                path.file_name(),
            ) else {
                continue;
            };
            report.scanned += 1;

            if !self.has_enough_references(stem, counts) {
                report.too_few_references += 1;
                continue;
            }

            let text = std::fs::read_to_string(&path)?;
            if !self.is_relevant(&text) {
                debug!(file = %path.display(), "no topic phrase");
                report.off_topic += 1;
                continue;
            }

            let target = dst.join(file_name);
            std::fs::copy(&path, &target)?;
            report.copied.push(target);
        }

        info!(
            scanned = report.scanned,
            copied = report.copied.len(),
            off_topic = report.off_topic,
            too_few_references = report.too_few_references,
            "filtered parsed articles"
        );
        Ok(report)
    }
}

/// Read a `name\tcount` table. The first line is a header.
pub fn load_reference_counts<P: AsRef<Path>>(path: P) -> Result<BTreeMap<String, u32>> {
    reference_counts_from_reader(BufReader::new(File::open(path)?))
}

pub fn reference_counts_from_reader<R: BufRead>(reader: R) -> Result<BTreeMap<String, u32>> {
    let mut counts = BTreeMap::new();

    for (idx, line) in reader.lines().enumerate().skip(1) {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut fields = line.split('\t');
        let (Some(name), Some(count)) = (fields.next(), fields.next()) else {
            return Err(CorpusError::MalformedLine {
                line: idx + 1,
                reason: "expected name and count".into(),
            });
        };
        let count = count.trim().parse::<u32>().map_err(|_| CorpusError::MalformedLine {
            line: idx + 1,
            reason: format!("count {count:?} is not a number"),
        })?;
        counts.insert(name.to_string(), count);
    }

    Ok(counts)
}
