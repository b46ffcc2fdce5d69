//! Error types for script loading and response generation.
//!
//! Uses `thiserror` for ergonomic error definitions. Loading and responding
//! fail for different reasons and stay separate enums: a [`ScriptError`]
//! means no script was produced at all, while an [`EngineError`] means a
//! loaded script turned out to be internally inconsistent when a rule was
//! exercised. Arbitrary user input never raises either; "no match" resolves
//! through the guaranteed fallback keyword and is not an error.

use thiserror::Error;

/// Errors raised while parsing a rule script.
///
/// All variants are fatal: no partial [`Script`](crate::Script) is ever
/// returned. Line numbers are 1-based.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    #[error("line {line}: unknown tag `{tag}`")]
    UnknownTag { line: usize, tag: String },

    #[error("line {line}: `decomp` without a preceding `key`")]
    DecompWithoutKey { line: usize },

    #[error("line {line}: `reasmb` without a preceding `decomp`")]
    ReassemblyWithoutDecomp { line: usize },

    #[error("line {line}: duplicate keyword `{word}`")]
    DuplicateKeyword { line: usize, word: String },

    #[error("keyword `{word}` has no decompositions")]
    EmptyKeyword { word: String },

    #[error("keyword `{word}` has a decomposition with no reassemblies")]
    EmptyDecomposition { word: String },
}

/// Script-consistency errors surfaced while producing a reply.
///
/// These indicate a script that references names or captures that do not
/// exist; they are authoring mistakes, never runtime conditions, so nothing
/// retries or recovers from them internally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("unknown synonym class `@{0}`")]
    UnknownSynonymClass(String),

    #[error("goto target `{0}` is not a keyword in the script")]
    UnknownGotoTarget(String),

    #[error("reassembly references capture ({index}) but the pattern captured {available} spans")]
    InvalidCaptureIndex { index: usize, available: usize },

    #[error("the script defines no `{kind}` phrases")]
    EmptyPhraseList { kind: &'static str },
}
