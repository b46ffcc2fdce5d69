//! Input tokenization and punctuation normalization.

/// Split raw input into word and punctuation tokens.
///
/// Any run of `.`, `,` or `;` characters, together with surrounding
/// whitespace, becomes a single standalone token of that character, so
/// `"fine, thanks..."` tokenizes to `["fine", ",", "thanks", "."]`. The
/// result is the non-empty pieces between single spaces. Case is preserved;
/// comparisons elsewhere are case-insensitive.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    let text = regex!(r"\s*\.+\s*").replace_all(text, " . ");
    let text = regex!(r"\s*,+\s*").replace_all(&text, " , ");
    let text = regex!(r"\s*;+\s*").replace_all(&text, " ; ");
    text.split(' ').filter(|w| !w.is_empty()).map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(text: &str) -> Vec<String> {
        tokenize(text)
    }

    #[test]
    fn splits_words() {
        assert_eq!(toks("I think so"), ["I", "think", "so"]);
    }

    #[test]
    fn punctuation_runs_collapse_to_one_token() {
        assert_eq!(toks("fine, thanks..."), ["fine", ",", "thanks", "."]);
        assert_eq!(toks("well;; yes"), ["well", ";", "yes"]);
        assert_eq!(toks("a..b"), ["a", ".", "b"]);
    }

    #[test]
    fn leading_and_trailing_space_is_dropped() {
        assert_eq!(toks("  hello  world "), ["hello", "world"]);
        assert!(toks("").is_empty());
        assert!(toks("   ").is_empty());
    }

    #[test]
    fn case_is_preserved() {
        assert_eq!(toks("I AM Here"), ["I", "AM", "Here"]);
    }
}
