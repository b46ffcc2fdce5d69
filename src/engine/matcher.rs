//! Decomposition pattern matching.
//!
//! A decomposition pattern is a short sequence of literals, `*` wildcards
//! and `@class` synonym references, matched against the whole token
//! sequence. The matcher is a recursive backtracker over
//! `(pattern, remaining tokens)`:
//!
//! ```text
//! pattern: [*, "you", *]
//! tokens:  [i, think, you, are, wrong]
//!
//! *        tries [i think you are wrong], [i think you are], ... (longest first)
//! "you"    pins the split: the leading * must stop at [i, think]
//! *        takes the rest: [are, wrong]
//! ```
//!
//! The search order is part of the observable contract: a wildcard tries the
//! longest span first and the first fully successful assignment wins, not a
//! globally "best" one. Captured spans come back in pattern order, one per
//! wildcard or synonym element; literals capture nothing.
//!
//! Worst-case cost is exponential in the number of adjacent wildcards, which
//! is fine for the short, human-authored patterns scripts contain.

use std::collections::{HashMap, HashSet};

use crate::PatternElement;
use crate::error::EngineError;

/// Match `pattern` against `words`.
///
/// Returns the captured spans for the first match found in the documented
/// search order, or `None` when the pattern does not fit. The only error is
/// a pattern referencing a synonym class the script never defined.
pub(crate) fn match_pattern(
    synonyms: &HashMap<String, HashSet<String>>,
    pattern: &[PatternElement],
    words: &[String],
) -> Result<Option<Vec<Vec<String>>>, EngineError> {
    let mut captures = Vec::new();
    if match_rest(synonyms, pattern, words, &mut captures)? { Ok(Some(captures)) } else { Ok(None) }
}

/// Recursive worker. `captures` is an accumulator: every branch that pushes
/// a speculative capture pops it again before reporting failure, so on the
/// way out the accumulator holds exactly the committed spans.
fn match_rest(
    synonyms: &HashMap<String, HashSet<String>>,
    pattern: &[PatternElement],
    words: &[String],
    captures: &mut Vec<Vec<String>>,
) -> Result<bool, EngineError> {
    let Some((head, rest)) = pattern.split_first() else {
        return Ok(words.is_empty());
    };
    // Out of tokens: only a single trailing wildcard can still match.
    if words.is_empty() && !matches!(pattern, [PatternElement::Wildcard]) {
        return Ok(false);
    }

    match head {
        PatternElement::Wildcard => {
            for split in (0..=words.len()).rev() {
                captures.push(words[..split].to_vec());
                if match_rest(synonyms, rest, &words[split..], captures)? {
                    return Ok(true);
                }
                captures.pop();
            }
            Ok(false)
        }
        PatternElement::Synonym(class) => {
            let members =
                synonyms.get(class).ok_or_else(|| EngineError::UnknownSynonymClass(class.clone()))?;
            if !members.contains(&words[0].to_lowercase()) {
                return Ok(false);
            }
            captures.push(vec![words[0].clone()]);
            if match_rest(synonyms, rest, &words[1..], captures)? {
                Ok(true)
            } else {
                captures.pop();
                Ok(false)
            }
        }
        PatternElement::Literal(expected) => {
            if expected.to_lowercase() != words[0].to_lowercase() {
                return Ok(false);
            }
            match_rest(synonyms, rest, &words[1..], captures)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PatternElement::{Literal, Synonym, Wildcard};

    fn synonyms() -> HashMap<String, HashSet<String>> {
        let mut map = HashMap::new();
        map.insert("sad".to_string(), ["sad", "unhappy", "depressed"].iter().map(|s| s.to_string()).collect());
        map
    }

    fn words(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    fn lit(w: &str) -> PatternElement {
        Literal(w.to_string())
    }

    fn matched(pattern: &[PatternElement], input: &str) -> Option<Vec<Vec<String>>> {
        match_pattern(&synonyms(), pattern, &words(input)).unwrap()
    }

    #[test]
    fn wildcards_are_greedy_longest_first() {
        let captures = matched(&[Wildcard, lit("you"), Wildcard], "i think you are wrong").unwrap();
        assert_eq!(captures, vec![words("i think"), words("are wrong")]);
    }

    #[test]
    fn first_success_wins_over_later_splits() {
        // "you" occurs twice; the longest leading span compatible with the
        // rest of the pattern stops at the second occurrence.
        let captures = matched(&[Wildcard, lit("you"), Wildcard], "you and you again").unwrap();
        assert_eq!(captures, vec![words("you and"), words("again")]);
    }

    #[test]
    fn literals_match_case_insensitively_and_capture_nothing() {
        let captures = matched(&[lit("hello"), Wildcard], "HELLO there").unwrap();
        assert_eq!(captures, vec![words("there")]);
    }

    #[test]
    fn a_trailing_wildcard_matches_the_empty_span() {
        let captures = matched(&[lit("hi"), Wildcard], "hi").unwrap();
        assert_eq!(captures, vec![Vec::<String>::new()]);
    }

    #[test]
    fn exhausted_tokens_fail_anything_but_a_lone_wildcard() {
        assert!(matched(&[lit("hi"), lit("there")], "hi").is_none());
        assert!(matched(&[Wildcard, Wildcard], "").is_none());
        assert!(matched(&[Wildcard], "").is_some());
    }

    #[test]
    fn synonyms_match_case_insensitively() {
        let captures = matched(&[Wildcard, Synonym("sad".into()), Wildcard], "i am Unhappy today").unwrap();
        assert_eq!(captures, vec![words("i am"), words("Unhappy"), words("today")]);
    }

    #[test]
    fn unknown_synonym_class_is_an_error() {
        let err = match_pattern(&synonyms(), &[Synonym("mad".into())], &words("furious")).unwrap_err();
        assert_eq!(err, EngineError::UnknownSynonymClass("mad".into()));
    }

    #[test]
    fn backtracking_discards_speculative_captures() {
        // The synonym at the longer split matches but its continuation
        // fails; the abandoned capture must not leak into the spans of the
        // match eventually found at the shorter split.
        let captures =
            matched(&[Wildcard, Synonym("sad".into()), lit("x"), Wildcard], "unhappy x a unhappy y b").unwrap();
        assert_eq!(captures, vec![Vec::<String>::new(), words("unhappy"), words("a unhappy y b")]);

        let captures = matched(&[Wildcard, Synonym("sad".into()), lit("you")], "i am unhappy today");
        assert!(captures.is_none());
    }

    #[test]
    fn no_match_returns_none_not_an_error() {
        assert!(matched(&[lit("bicycle")], "tricycle").is_none());
    }
}
