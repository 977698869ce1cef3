//! # IOB Tags
//!
//! Parses tag literals of the IOB (Inside-Outside-Begin) scheme into a
//! prefix and an entity type. Entity types are an open namespace
//! (`tissue`, `cell_type`, ...), so the type is kept as a string.

use std::fmt;
use std::str::FromStr;

/// A parsed IOB tag literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IobTag {
    /// `B-<type>`
    Begin(String),
    /// `I-<type>`
    Inside(String),
    /// `O`
    Outside,
}

/// A tag literal that is not `O`, `B-<type>` or `I-<type>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTagError {
    pub literal: String,
}

impl fmt::Display for ParseTagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not an IOB tag: {:?}", self.literal)
    }
}

impl std::error::Error for ParseTagError {}

impl IobTag {
    /// Parse a tag literal.
    ///
    /// # Examples
    /// ```
    /// use iobkit_core::tags::IobTag;
    ///
    /// assert_eq!(IobTag::parse("B-tissue").unwrap(), IobTag::Begin("tissue".into()));
    /// assert_eq!(IobTag::parse("O").unwrap(), IobTag::Outside);
    /// assert!(IobTag::parse("begin").is_err());
    /// ```
    pub fn parse(literal: &str) -> Result<Self, ParseTagError> {
        if literal == "O" {
            return Ok(IobTag::Outside);
        }

        let malformed = || ParseTagError {
            literal: literal.to_string(),
        };

        let (prefix, entity_type) = literal.split_once('-').ok_or_else(malformed)?;
        if entity_type.is_empty() {
            return Err(malformed());
        }

        match prefix {
            "B" => Ok(IobTag::Begin(entity_type.to_string())),
            "I" => Ok(IobTag::Inside(entity_type.to_string())),
            _ => Err(malformed()),
        }
    }

    /// Get the entity type for this tag, `None` for `O`.
    pub fn entity_type(&self) -> Option<&str> {
        match self {
            IobTag::Begin(t) | IobTag::Inside(t) => Some(t),
            IobTag::Outside => None,
        }
    }

    /// Check if this is a "Begin" tag.
    pub fn is_begin(&self) -> bool {
        matches!(self, IobTag::Begin(_))
    }

    /// Check if this is an "Inside" tag.
    pub fn is_inside(&self) -> bool {
        matches!(self, IobTag::Inside(_))
    }

    /// Same prefix, different entity type. `O` stays `O`.
    pub fn with_entity_type(&self, entity_type: &str) -> IobTag {
        match self {
            IobTag::Begin(_) => IobTag::Begin(entity_type.to_string()),
            IobTag::Inside(_) => IobTag::Inside(entity_type.to_string()),
            IobTag::Outside => IobTag::Outside,
        }
    }

    /// Check if `to` may directly follow `from` (`None` = sequence start).
    ///
    /// The only forbidden case is an `I-<type>` that is not preceded by a
    /// `B-` or `I-` of the same type.
    pub fn is_valid_transition(from: Option<&IobTag>, to: &IobTag) -> bool {
        !to.is_inside() || from.and_then(IobTag::entity_type) == to.entity_type()
    }
}

impl FromStr for IobTag {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IobTag::parse(s)
    }
}

impl fmt::Display for IobTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IobTag::Begin(t) => write!(f, "B-{t}"),
            IobTag::Inside(t) => write!(f, "I-{t}"),
            IobTag::Outside => write!(f, "O"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_literals() {
        assert_eq!(
            IobTag::parse("B-cell_type").unwrap(),
            IobTag::Begin("cell_type".into())
        );
        assert_eq!(
            IobTag::parse("I-tissue").unwrap(),
            IobTag::Inside("tissue".into())
        );
        assert_eq!(IobTag::parse("O").unwrap(), IobTag::Outside);
    }

    #[test]
    fn test_type_may_contain_dashes() {
        let tag = IobTag::parse("B-T-cell").unwrap();
        assert_eq!(tag.entity_type(), Some("T-cell"));
        assert_eq!(tag.to_string(), "B-T-cell");
    }

    #[test]
    fn test_parse_rejects_artifacts() {
        for literal in ["", "begin", "end", "B-", "X-tissue", "o", "B"] {
            let err = IobTag::parse(literal).unwrap_err();
            assert_eq!(err.literal, literal);
        }
    }

    #[test]
    fn test_display_roundtrip() {
        for literal in ["O", "B-DISEASE", "I-DISEASE"] {
            assert_eq!(IobTag::parse(literal).unwrap().to_string(), literal);
        }
    }

    #[test]
    fn test_valid_transitions() {
        let b = IobTag::Begin("tissue".into());
        let i = IobTag::Inside("tissue".into());
        assert!(IobTag::is_valid_transition(Some(&b), &i));
        assert!(IobTag::is_valid_transition(Some(&i), &i));
        assert!(IobTag::is_valid_transition(None, &b));
        assert!(IobTag::is_valid_transition(Some(&i), &IobTag::Outside));
    }

    #[test]
    fn test_invalid_transitions() {
        let i = IobTag::Inside("tissue".into());
        let other = IobTag::Begin("cell_type".into());
        assert!(!IobTag::is_valid_transition(None, &i));
        assert!(!IobTag::is_valid_transition(Some(&IobTag::Outside), &i));
        assert!(!IobTag::is_valid_transition(Some(&other), &i));
    }

    #[test]
    fn test_prefix_predicates() {
        assert!(IobTag::Begin("x".into()).is_begin());
        assert!(!IobTag::Begin("x".into()).is_inside());
        assert!(IobTag::Inside("x".into()).is_inside());
        assert!(!IobTag::Outside.is_begin());
        assert!(!IobTag::Outside.is_inside());
    }

    #[test]
    fn test_with_entity_type_keeps_prefix() {
        let tag = IobTag::Inside("cell".into()).with_entity_type("cell_type");
        assert!(tag.is_inside());
        assert_eq!(tag.entity_type(), Some("cell_type"));
        assert_eq!(IobTag::Outside.with_entity_type("x"), IobTag::Outside);
    }
}
