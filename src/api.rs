//! Public API surface.

use std::sync::Arc;

use rand::seq::SliceRandom;

use crate::engine::{SessionState, respond};
use crate::error::EngineError;
use crate::script::Script;

/// Outcome of a [`Responder::respond`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// A reply to show the user.
    Reply(String),
    /// The input matched a quit phrase; the conversation is over.
    SessionEnded,
}

/// A single conversation session over a loaded [`Script`].
///
/// The script is immutable and shareable; the responder privately owns the
/// per-session round-robin cursors and the deferred-reply memory queue, so
/// sessions sharing one script never see each other's state.
///
/// # Example
/// ```
/// use rogerian::{ReplyOutcome, Responder, Script};
///
/// let script = Script::parse("key: hello\ndecomp: *\nreasmb: Hi. What brings you here?").unwrap();
/// let mut session = Responder::from_script(script);
///
/// match session.respond("hello there").unwrap() {
///     ReplyOutcome::Reply(reply) => assert_eq!(reply, "Hi. What brings you here?"),
///     ReplyOutcome::SessionEnded => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Responder {
    script: Arc<Script>,
    state: SessionState,
}

impl Responder {
    /// Create a session over a shared script.
    pub fn new(script: Arc<Script>) -> Responder {
        let state = SessionState::new(&script);
        Responder { script, state }
    }

    /// Convenience constructor for a session that exclusively owns its script.
    pub fn from_script(script: Script) -> Responder {
        Responder::new(Arc::new(script))
    }

    /// The script this session runs against.
    pub fn script(&self) -> &Script {
        &self.script
    }

    /// Produce a reply for `text`, or signal the end of the session.
    ///
    /// Arbitrary input never fails: unmatched text resolves through the
    /// guaranteed catch-all keyword. An error indicates an inconsistent
    /// script (unknown synonym class or goto target, bad capture reference).
    pub fn respond(&mut self, text: &str) -> Result<ReplyOutcome, EngineError> {
        let script = Arc::clone(&self.script);
        respond(&script, &mut self.state, text)
    }

    /// A uniformly random greeting drawn from the script's `initial` phrases.
    pub fn initial_greeting(&self) -> Result<String, EngineError> {
        pick_phrase(&self.script.initials, "initial")
    }

    /// A uniformly random farewell drawn from the script's `final` phrases.
    pub fn final_statement(&self) -> Result<String, EngineError> {
        pick_phrase(&self.script.finals, "final")
    }

    /// Replies deferred by memory decompositions, oldest first.
    ///
    /// The engine only ever appends here; whether to surface these back into
    /// the conversation is left to the caller.
    pub fn memory(&self) -> impl Iterator<Item = &str> {
        self.state.memory()
    }

    /// Start the session over: clears the memory queue and rewinds every
    /// reassembly cursor, as if the responder had just been created.
    pub fn reset(&mut self) {
        self.state.reset();
    }
}

fn pick_phrase(phrases: &[String], kind: &'static str) -> Result<String, EngineError> {
    phrases.choose(&mut rand::thread_rng()).cloned().ok_or(EngineError::EmptyPhraseList { kind })
}
