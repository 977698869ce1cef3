use thiserror::Error;

/// Errors that can occur while handling corpus files.
#[derive(Debug, Error)]
pub enum CorpusError {
    /// Reading or writing a corpus file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration file is not valid JSON for the expected shape.
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// A whitespace-normalization pattern failed to compile.
    #[error("regex compilation error: {0}")]
    RegexError(#[from] regex::Error),

    /// A line of a tabular index file could not be interpreted.
    #[error("malformed line {line}: {reason}")]
    MalformedLine {
        /// 1-based line number in the source file.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },
}

/// Result type alias for corpus operations.
pub type Result<T> = std::result::Result<T, CorpusError>;
