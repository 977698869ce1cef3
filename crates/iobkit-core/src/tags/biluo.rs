//! # BILUO Tags
//!
//! Begin/Inside/Last/Unit/Outside tags and the strict IOB to BILUO
//! conversion used for span extraction.

use std::fmt;

use crate::error::{IobError, Result};
use crate::tags::iob::IobTag;

/// A BILUO tag. Every entity run is either a single `U-` or a
/// `B- I-* L-` sequence of one type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BiluoTag {
    Begin(String),
    Inside(String),
    Last(String),
    Unit(String),
    Outside,
}

impl BiluoTag {
    /// Get the entity type for this tag, `None` for `O`.
    pub fn entity_type(&self) -> Option<&str> {
        match self {
            BiluoTag::Begin(t) | BiluoTag::Inside(t) | BiluoTag::Last(t) | BiluoTag::Unit(t) => {
                Some(t)
            }
            BiluoTag::Outside => None,
        }
    }

    /// True for the tag that opens an entity run (`B-` or `U-`).
    pub fn starts_entity(&self) -> bool {
        matches!(self, BiluoTag::Begin(_) | BiluoTag::Unit(_))
    }

    /// True for the tag that closes an entity run (`L-` or `U-`).
    pub fn ends_entity(&self) -> bool {
        matches!(self, BiluoTag::Last(_) | BiluoTag::Unit(_))
    }
}

impl fmt::Display for BiluoTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BiluoTag::Begin(t) => write!(f, "B-{t}"),
            BiluoTag::Inside(t) => write!(f, "I-{t}"),
            BiluoTag::Last(t) => write!(f, "L-{t}"),
            BiluoTag::Unit(t) => write!(f, "U-{t}"),
            BiluoTag::Outside => write!(f, "O"),
        }
    }
}

/// Convert a flat IOB sequence to BILUO.
///
/// # Errors
///
/// Returns `IobError::MalformedTag` for a literal that is not an IOB tag,
/// and `IobError::TagConsistency` for an `I-` tag that does not continue
/// an entity of the same type. Both carry the index of the offending tag.
pub fn iob_to_biluo<S: AsRef<str>>(tags: &[S]) -> Result<Vec<BiluoTag>> {
    let parsed = tags
        .iter()
        .enumerate()
        .map(|(index, tag)| {
            IobTag::parse(tag.as_ref()).map_err(|e| IobError::MalformedTag {
                index,
                tag: e.literal,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut out = Vec::with_capacity(parsed.len());
    let mut prev: Option<&IobTag> = None;

    for (index, tag) in parsed.iter().enumerate() {
        if !IobTag::is_valid_transition(prev, tag) {
            return Err(IobError::TagConsistency {
                index,
                tag: tag.to_string(),
            });
        }

        // The run goes on only if the next tag is an I- of the same type
        let continues = tag.entity_type().is_some()
            && parsed
                .get(index + 1)
                .is_some_and(|next| next.is_inside() && next.entity_type() == tag.entity_type());

        out.push(match tag {
            IobTag::Outside => BiluoTag::Outside,
            IobTag::Begin(t) if continues => BiluoTag::Begin(t.clone()),
            IobTag::Begin(t) => BiluoTag::Unit(t.clone()),
            IobTag::Inside(t) if continues => BiluoTag::Inside(t.clone()),
            IobTag::Inside(t) => BiluoTag::Last(t.clone()),
        });
        prev = Some(tag);
    }

    Ok(out)
}
