//! Plain-text layout for parsed articles.
//!
//! ```text
//! <title>
//! <abstract>
//! <section name>
//! <paragraph>
//! <paragraph>
//! <next section name>
//! <paragraph>
//! ```
//!
//! A section name is written only when it differs from the previous
//! paragraph's section. Whitespace runs inside every line collapse to a
//! single space.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::warn;

use crate::error::Result;

/// One body paragraph and the section it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub section: String,
    pub text: String,
}

/// Title, abstract and body of one article, as extracted from its XML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedArticle {
    /// Full-text accession, used as the output file stem.
    pub accession: String,
    pub title: String,
    pub abstract_text: String,
    pub paragraphs: Vec<Paragraph>,
}

impl ParsedArticle {
    pub fn new(
        accession: impl Into<String>,
        title: impl Into<String>,
        abstract_text: impl Into<String>,
    ) -> Self {
        Self {
            accession: accession.into(),
            title: title.into(),
            abstract_text: abstract_text.into(),
            paragraphs: Vec::new(),
        }
    }

    pub fn with_paragraph(mut self, section: impl Into<String>, text: impl Into<String>) -> Self {
        self.paragraphs.push(Paragraph {
            section: section.into(),
            text: text.into(),
        });
        self
    }
}

/// Renders [`ParsedArticle`]s in the line layout.
pub struct LayoutWriter {
    re_whitespace: Regex,
}

impl LayoutWriter {
    /// # Errors
    ///
    /// Returns `CorpusError::RegexError` if the whitespace pattern fails to
    /// compile (should never happen with the static pattern).
    pub fn new() -> Result<Self> {
        Ok(Self {
            re_whitespace: Regex::new(r"[ \t\n\r]+")?,
        })
    }

    /// Collapse whitespace runs, including newlines, to one space.
    pub fn normalize(&self, text: &str) -> String {
        self.re_whitespace.replace_all(text, " ").into_owned()
    }

    pub fn write_to<W: Write>(&self, article: &ParsedArticle, mut writer: W) -> Result<()> {
        writeln!(writer, "{}", self.normalize(&article.title))?;
        writeln!(writer, "{}", self.normalize(&article.abstract_text))?;

        if article.paragraphs.is_empty() {
            warn!(accession = %article.accession, "no body paragraphs");
            return Ok(());
        }

        let mut section: Option<&str> = None;
        for paragraph in &article.paragraphs {
            if section != Some(paragraph.section.as_str()) {
                section = Some(paragraph.section.as_str());
                writeln!(writer, "{}", self.normalize(&paragraph.section))?;
            }
            writeln!(writer, "{}", self.normalize(&paragraph.text))?;
        }
        Ok(())
    }

    pub fn render(&self, article: &ParsedArticle) -> Result<String> {
        let mut out = Vec::new();
        self.write_to(article, &mut out)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// Write `<dir>/<accession>.txt` and return its path.
    pub fn save(&self, article: &ParsedArticle, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.txt", article.accession));
        let mut writer = BufWriter::new(File::create(&path)?);
        self.write_to(article, &mut writer)?;
        writer.flush()?;
        Ok(path)
    }
}
