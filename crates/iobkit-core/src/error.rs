use thiserror::Error;

/// Errors that can occur during iobkit core operations.
#[derive(Debug, Error)]
pub enum IobError {
    /// A sentence was built with no tokens.
    #[error("sentence has no tokens")]
    EmptySentence,

    /// Two sequences that must line up have different lengths.
    #[error("shape mismatch: {left} vs {right} elements")]
    ShapeMismatch {
        /// Length of the left-hand sequence.
        left: usize,
        /// Length of the right-hand sequence.
        right: usize,
    },

    /// Two token sequences that must be identical differ at a position.
    #[error("token mismatch at index {index}: {left:?} vs {right:?}")]
    TokenMismatch {
        /// Flat token index of the first difference.
        index: usize,
        /// Token from the left-hand sequence.
        left: String,
        /// Token from the right-hand sequence.
        right: String,
    },

    /// A tag literal is not `O`, `B-<type>` or `I-<type>`.
    #[error("malformed tag {tag:?} at token {index}")]
    MalformedTag {
        /// Flat token index of the offending tag.
        index: usize,
        /// The literal that failed to parse.
        tag: String,
    },

    /// An `I-` tag that does not continue an entity of the same type.
    #[error("inconsistent IOB sequence: {tag:?} at token {index} does not continue an entity")]
    TagConsistency {
        /// Flat token index of the offending tag.
        index: usize,
        /// The offending tag literal.
        tag: String,
    },

    /// A random sample asked for more sentences than the pool holds.
    #[error("cannot sample {requested} sentences from a pool of {available}")]
    SampleTooLarge {
        /// Number of sentences requested.
        requested: usize,
        /// Number of sentences available.
        available: usize,
    },

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON record could not be read or written.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for iobkit core operations.
pub type Result<T> = std::result::Result<T, IobError>;
