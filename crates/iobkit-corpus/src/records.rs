//! Resolution of wanted identifiers to accessible full-text records.
//!
//! Two tab-separated indexes list what can be fetched: the open-access
//! file list (`path, citation, accession, PMID:<id>, license`) and the
//! author-manuscript file lists (`member, accession, id, ...`). Both start
//! with a header line. Fetching and unpacking the archives is left to the
//! caller.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::{CorpusError, Result};
use crate::identifiers::IdentifierSet;

/// Which index a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordSource {
    OpenAccess,
    AuthorManuscript,
}

/// One fetchable full-text record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordEntry {
    /// Archive path (open access) or archive member (manuscripts).
    pub archive_path: String,
    /// Full-text accession, e.g. `PMC13900`.
    pub accession: String,
    /// Literature index identifier, e.g. `11250746`.
    pub pmid: String,
    pub source: RecordSource,
}

impl RecordEntry {
    /// File name the extracted XML is stored under.
    pub fn xml_file_name(&self) -> String {
        match self.source {
            RecordSource::OpenAccess => format!("{}.nxml", self.accession),
            RecordSource::AuthorManuscript => format!("{}.xml", self.accession),
        }
    }
}

/// Records found for the wanted identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// One entry per accession, first occurrence wins.
    pub accessible: Vec<RecordEntry>,
    /// Wanted identifiers with no record.
    pub missing: IdentifierSet,
}

pub fn parse_oa_file_list<R: BufRead>(reader: R) -> Result<Vec<RecordEntry>> {
    parse_index(reader, 4, |fields| RecordEntry {
        archive_path: fields[0].to_string(),
        accession: fields[2].to_string(),
        pmid: fields[3].trim_start_matches("PMID:").to_string(),
        source: RecordSource::OpenAccess,
    })
}

pub fn parse_manuscript_file_list<R: BufRead>(reader: R) -> Result<Vec<RecordEntry>> {
    parse_index(reader, 3, |fields| RecordEntry {
        archive_path: fields[0].to_string(),
        accession: fields[1].to_string(),
        pmid: fields[2].to_string(),
        source: RecordSource::AuthorManuscript,
    })
}

/// Read an index file from disk with `parse`.
pub fn load_index<P, F>(path: P, parse: F) -> Result<Vec<RecordEntry>>
where
    P: AsRef<Path>,
    F: FnOnce(BufReader<File>) -> Result<Vec<RecordEntry>>,
{
    parse(BufReader::new(File::open(path)?))
}

fn parse_index<R, F>(reader: R, min_fields: usize, build: F) -> Result<Vec<RecordEntry>>
where
    R: BufRead,
    F: Fn(&[&str]) -> RecordEntry,
{
    let mut entries = Vec::new();

    // Header line
    for (idx, line) in reader.lines().enumerate().skip(1) {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < min_fields {
            return Err(CorpusError::MalformedLine {
                line: idx + 1,
                reason: format!("expected at least {min_fields} columns, got {}", fields.len()),
            });
        }
        entries.push(build(&fields));
    }

    Ok(entries)
}

/// Keep the entries whose identifier is wanted.
pub fn resolve<I>(wanted: &IdentifierSet, entries: I) -> Resolution
where
    I: IntoIterator<Item = RecordEntry>,
{
    let mut seen = BTreeSet::new();
    let mut found = IdentifierSet::new();
    let mut accessible = Vec::new();

    for entry in entries {
        if !wanted.contains(&entry.pmid) || !seen.insert(entry.accession.clone()) {
            continue;
        }
        found.insert(entry.pmid.clone());
        accessible.push(entry);
    }

    let missing: IdentifierSet = wanted.iter().filter(|id| !found.contains(id)).collect();

    debug!(
        wanted = wanted.len(),
        accessible = accessible.len(),
        missing = missing.len(),
        "resolved records"
    );

    Resolution {
        accessible,
        missing,
    }
}
