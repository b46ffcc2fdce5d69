//! Response orchestration.
//!
//! `respond` is the single ordered search the public API wraps: collect the
//! keywords the input names, heaviest first, and return the first
//! decomposition match that yields a direct reply. Everything a conversation
//! mutates (the per-decomposition round-robin cursors and the deferred
//! memory queue) lives in [`SessionState`], never on the script, so one
//! script instance can back many sessions.

use std::collections::{HashSet, VecDeque};

use tracing::{debug, trace};

use crate::api::ReplyOutcome;
use crate::error::EngineError;
use crate::script::Script;
use crate::{Decomp, Keyword, Reassembly};

use super::{match_pattern, reassemble, substitute, tokenize};

/// Per-session mutable state: one round-robin cursor per decomposition plus
/// the deferred-reply memory queue.
#[derive(Debug, Clone)]
pub(crate) struct SessionState {
    cursors: Vec<usize>,
    memory: VecDeque<String>,
}

impl SessionState {
    pub(crate) fn new(script: &Script) -> SessionState {
        SessionState { cursors: vec![0; script.decomp_count], memory: VecDeque::new() }
    }

    /// Rewind every cursor and drop the memory queue, as if the session had
    /// just started.
    pub(crate) fn reset(&mut self) {
        self.cursors.fill(0);
        self.memory.clear();
    }

    pub(crate) fn memory(&self) -> impl Iterator<Item = &str> {
        self.memory.iter().map(String::as_str)
    }

    /// Advance the cursor for `decomp` and return the selected reassembly.
    /// The stored cursor always stays below the reassembly count.
    fn next_reassembly<'a>(&mut self, decomp: &'a Decomp) -> &'a Reassembly {
        let cursor = &mut self.cursors[decomp.id];
        let reassembly = &decomp.reassemblies[*cursor];
        *cursor = (*cursor + 1) % decomp.reassemblies.len();
        reassembly
    }
}

/// Produce a reply for `text` against `script`, mutating `state`.
///
/// An input whose lowercased whole text equals a quit phrase ends the
/// session. Anything else yields a reply: from the ranked keyword search
/// when a decomposition matches, from the catch-all keyword otherwise.
pub(crate) fn respond(script: &Script, state: &mut SessionState, text: &str) -> Result<ReplyOutcome, EngineError> {
    if script.quits.iter().any(|quit| *quit == text.to_lowercase()) {
        debug!("input matches a quit phrase");
        return Ok(ReplyOutcome::SessionEnded);
    }

    let words = tokenize(text);
    let words = substitute(&words, &script.pre);

    let ranked = rank_keywords(script, &words);
    debug!(candidates = ranked.len(), "ranked candidate keywords");

    for key in ranked {
        if let Some(output) = try_keyword(script, state, key, &words)? {
            return Ok(ReplyOutcome::Reply(output.join(" ")));
        }
    }

    let reply = fallback_reply(script, state)?;
    Ok(ReplyOutcome::Reply(reply))
}

/// Collect the keywords named by the input tokens, deduplicated in encounter
/// order and stable-sorted by descending weight, so equally heavy keywords
/// keep the order the user typed them in.
fn rank_keywords<'a>(script: &'a Script, words: &[String]) -> Vec<&'a Keyword> {
    let mut seen = HashSet::new();
    let mut keys: Vec<&Keyword> = Vec::new();
    for word in words {
        let lower = word.to_lowercase();
        if let Some(key) = script.keyword(&lower) {
            if seen.insert(lower) {
                keys.push(key);
            }
        }
    }
    keys.sort_by_key(|key| std::cmp::Reverse(key.weight));
    keys
}

/// Ordered first-match search over one keyword's decompositions.
///
/// A goto re-enters the search on the target keyword with the same token
/// sequence and abandons the remaining decompositions here, whatever the
/// target yields. A memory decomposition appends its reassembly to the queue
/// and keeps searching; it never produces the visible reply.
fn try_keyword(
    script: &Script,
    state: &mut SessionState,
    key: &Keyword,
    words: &[String],
) -> Result<Option<Vec<String>>, EngineError> {
    trace!(keyword = %key.word, weight = key.weight, "trying keyword");
    for decomp in &key.decomps {
        let Some(captures) = match_pattern(&script.synonyms, &decomp.pattern, words)? else {
            continue;
        };
        let captures: Vec<Vec<String>> = captures.iter().map(|span| substitute(span, &script.post)).collect();

        match state.next_reassembly(decomp) {
            Reassembly::Goto(target) => {
                let target_key =
                    script.keyword(target).ok_or_else(|| EngineError::UnknownGotoTarget(target.clone()))?;
                debug!(from = %key.word, to = %target_key.word, "following goto");
                return try_keyword(script, state, target_key, words);
            }
            Reassembly::Template(parts) => {
                let output = reassemble(parts, &captures)?;
                if decomp.saves_to_memory {
                    debug!(keyword = %key.word, "deferring reply to memory");
                    state.memory.push_back(output.join(" "));
                    continue;
                }
                return Ok(Some(output));
            }
        }
    }
    Ok(None)
}

/// Produce the catch-all reply from the fallback keyword's first
/// decomposition, without pattern matching. A goto here forwards through
/// first decompositions until a template turns up.
fn fallback_reply(script: &Script, state: &mut SessionState) -> Result<String, EngineError> {
    let mut key = script.fallback_keyword();
    loop {
        let decomp = key.decomps.first().expect("keywords are validated non-empty at load time");
        match state.next_reassembly(decomp) {
            Reassembly::Template(parts) => {
                debug!(keyword = %key.word, "falling back to catch-all reply");
                return Ok(reassemble(parts, &[])?.join(" "));
            }
            Reassembly::Goto(target) => {
                key = script.keyword(target).ok_or_else(|| EngineError::UnknownGotoTarget(target.clone()))?;
            }
        }
    }
}
