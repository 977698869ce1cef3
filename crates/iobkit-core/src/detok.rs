//! Reattach detached punctuation to neighbouring tokens.
//!
//! Tokenizers split `cells.` into `cells` and `.`. These helpers merge such
//! tokens back for display or export. They work on plain token streams and
//! do not touch tags, so they are not used for span offsets.

/// Characters merged into the preceding token by [`join_punct`].
pub const TRAILING_PUNCT: &str = ".,;?!)-";

/// Characters merged into the following token by [`join_punct_rear`].
pub const LEADING_PUNCT: &str = "(-";

fn is_single_char_of(token: &str, chars: &str) -> bool {
    let mut it = token.chars();
    matches!((it.next(), it.next()), (Some(c), None) if chars.contains(c))
}

/// Append every token that is exactly one of `chars` to the token before
/// it.
///
/// The first token is never merged backwards. Empty input gives an empty
/// result.
///
/// # Examples
/// ```
/// use iobkit_core::detok::{join_punct, TRAILING_PUNCT};
///
/// let joined = join_punct(["human", "heart", ",", "lung", "."], TRAILING_PUNCT);
/// assert_eq!(joined, ["human", "heart,", "lung."]);
/// ```
pub fn join_punct<I, S>(tokens: I, chars: &str) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut tokens = tokens.into_iter().map(Into::into);
    let Some(mut current) = tokens.next() else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for next in tokens {
        if is_single_char_of(&next, chars) {
            current.push_str(&next);
        } else {
            out.push(std::mem::replace(&mut current, next));
        }
    }
    out.push(current);
    out
}

/// Prepend a token to the next one when it is one of `chars` or ends with
/// one of them.
///
/// Merging chains: `["(", "-", "x"]` becomes `["(-x"]`. A trailing
/// opener with nothing after it stays as is.
///
/// # Examples
/// ```
/// use iobkit_core::detok::{join_punct_rear, LEADING_PUNCT};
///
/// let joined = join_punct_rear(["cells", "(", "CD4", ")"], LEADING_PUNCT);
/// assert_eq!(joined, ["cells", "(CD4", ")"]);
/// ```
pub fn join_punct_rear<I, S>(tokens: I, chars: &str) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut tokens = tokens.into_iter().map(Into::into);
    let Some(mut current) = tokens.next() else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for next in tokens {
        if current.chars().last().is_some_and(|c| chars.contains(c)) {
            current.push_str(&next);
        } else {
            out.push(std::mem::replace(&mut current, next));
        }
    }
    out.push(current);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_punct_attaches_to_previous() {
        let joined = join_punct(
            ["T", "cells", "(", "CD4", ")", ",", "B", "cells", ".", "."],
            TRAILING_PUNCT,
        );
        assert_eq!(joined, ["T", "cells", "(", "CD4),", "B", "cells.."]);
    }

    #[test]
    fn test_join_punct_only_whole_tokens() {
        // A token that merely contains punctuation is not merged
        let joined = join_punct(["p", "<0.05", ".,"], TRAILING_PUNCT);
        assert_eq!(joined, ["p", "<0.05", ".,"]);
    }

    #[test]
    fn test_join_punct_first_token_stays() {
        assert_eq!(join_punct([".", "a"], TRAILING_PUNCT), [".", "a"]);
        assert_eq!(join_punct([","], TRAILING_PUNCT), [","]);
    }

    #[test]
    fn test_join_punct_custom_chars() {
        let joined = join_punct(["a", ":", "b", "."], ":");
        assert_eq!(joined, ["a:", "b", "."]);
    }

    #[test]
    fn test_join_punct_rear_attaches_to_next() {
        let joined = join_punct_rear(["single", "-", "cell", "(", "scRNA", ")"], LEADING_PUNCT);
        assert_eq!(joined, ["single", "-cell", "(scRNA", ")"]);
    }

    #[test]
    fn test_join_punct_rear_token_ending_in_char() {
        let joined = join_punct_rear(["anti-", "PD1", "therapy"], LEADING_PUNCT);
        assert_eq!(joined, ["anti-PD1", "therapy"]);
    }

    #[test]
    fn test_join_punct_rear_chains_and_trailing_opener() {
        assert_eq!(join_punct_rear(["(", "-", "x"], LEADING_PUNCT), ["(-x"]);
        assert_eq!(join_punct_rear(["x", "("], LEADING_PUNCT), ["x", "("]);
    }

    #[test]
    fn test_empty_input() {
        let empty: [&str; 0] = [];
        assert!(join_punct(empty, TRAILING_PUNCT).is_empty());
        assert!(join_punct_rear(empty, LEADING_PUNCT).is_empty());
    }
}
