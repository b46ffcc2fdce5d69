//! Reassembly template expansion.

use crate::TemplatePart;
use crate::error::EngineError;

/// Punctuation tokens that cut off an inserted capture.
const CUT_TOKENS: [&str; 3] = [",", ".", ";"];

/// Expand `parts` into output tokens using the matcher's captured spans.
///
/// Literal words pass through verbatim. A `(N)` insertion resolves the
/// N-th span (1-based) and truncates it at the first `,`, `.` or `;` token:
/// that token and everything after it are dropped, so an echoed fragment
/// never drags the rest of the user's sentence along. Goto reassemblies
/// never reach this function; they are resolved by the responder.
pub(crate) fn reassemble(parts: &[TemplatePart], captures: &[Vec<String>]) -> Result<Vec<String>, EngineError> {
    let mut output = Vec::new();
    for part in parts {
        match part {
            TemplatePart::Word(word) => output.push(word.clone()),
            TemplatePart::Capture(index) => {
                let span = index
                    .checked_sub(1)
                    .and_then(|i| captures.get(i))
                    .ok_or(EngineError::InvalidCaptureIndex { index: *index, available: captures.len() })?;
                let cut = span.iter().position(|token| CUT_TOKENS.contains(&token.as_str())).unwrap_or(span.len());
                output.extend(span[..cut].iter().cloned());
            }
        }
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use TemplatePart::{Capture, Word};

    fn span(text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }

    fn word(w: &str) -> TemplatePart {
        Word(w.to_string())
    }

    #[test]
    fn inserts_captures_between_words() {
        let parts = [word("Why"), word("do"), word("you"), Capture(1), word("?")];
        let output = reassemble(&parts, &[span("dream at night")]).unwrap();
        assert_eq!(output, ["Why", "do", "you", "dream", "at", "night", "?"]);
    }

    #[test]
    fn truncates_a_capture_at_punctuation() {
        let parts = [word("You"), word("said"), Capture(1)];
        let output = reassemble(&parts, &[span("fine , thanks")]).unwrap();
        assert_eq!(output, ["You", "said", "fine"]);

        let output = reassemble(&parts, &[span(". nothing left")]).unwrap();
        assert_eq!(output, ["You", "said"]);
    }

    #[test]
    fn capture_indexes_are_one_based() {
        let parts = [Capture(2), Capture(1)];
        let output = reassemble(&parts, &[span("first"), span("second")]).unwrap();
        assert_eq!(output, ["second", "first"]);
    }

    #[test]
    fn out_of_range_captures_are_errors() {
        let parts = [Capture(3)];
        let err = reassemble(&parts, &[span("only one")]).unwrap_err();
        assert_eq!(err, EngineError::InvalidCaptureIndex { index: 3, available: 1 });

        let err = reassemble(&[Capture(0)], &[span("only one")]).unwrap_err();
        assert_eq!(err, EngineError::InvalidCaptureIndex { index: 0, available: 1 });

        let err = reassemble(&[Capture(1)], &[]).unwrap_err();
        assert_eq!(err, EngineError::InvalidCaptureIndex { index: 1, available: 0 });
    }
}
