//! Word-level substitution.
//!
//! One table drives two passes: the `pre` table rewrites the whole input
//! before keyword ranking (`dont` -> `don't`, `machines` -> `computer`), and
//! the `post` table rewrites each captured span before it is inserted into a
//! reply (`me` -> `you`, `my` -> `your`), which is what turns an echoed
//! fragment into the second person.

use std::collections::HashMap;

/// Apply a rewrite `table` to `words`.
///
/// Each token is looked up by its lowercased form; a hit splices the
/// replacement sequence in place of the single token, a miss keeps the
/// original token with its casing intact.
pub(crate) fn substitute(words: &[String], table: &HashMap<String, Vec<String>>) -> Vec<String> {
    let mut output = Vec::with_capacity(words.len());
    for word in words {
        match table.get(&word.to_lowercase()) {
            Some(replacement) => output.extend(replacement.iter().cloned()),
            None => output.push(word.clone()),
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, &[&str])]) -> HashMap<String, Vec<String>> {
        entries.iter().map(|(k, v)| (k.to_string(), v.iter().map(|w| w.to_string()).collect())).collect()
    }

    fn words(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn replaces_by_lowercased_lookup() {
        let table = table(&[("me", &["you"]), ("my", &["your"])]);
        assert_eq!(substitute(&words("My dog likes ME"), &table), ["your", "dog", "likes", "you"]);
    }

    #[test]
    fn splices_multi_word_replacements() {
        let table = table(&[("you're", &["you", "are"])]);
        assert_eq!(substitute(&words("you're right"), &table), ["you", "are", "right"]);
    }

    #[test]
    fn keeps_unmatched_tokens_untouched() {
        let table = table(&[("me", &["you"])]);
        assert_eq!(substitute(&words("Leave Rex alone"), &table), ["Leave", "Rex", "alone"]);
    }
}
