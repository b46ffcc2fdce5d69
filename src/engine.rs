//! Matching and response engine.
//!
//! This module is the operational core of the crate. Producing a reply is a
//! pipeline over token sequences:
//!
//! ```text
//! raw text ── tokenize ──┐          (tokenize.rs)
//!                        │ punctuation runs become standalone tokens
//!                        v
//!              substitute(pre table)  (subst.rs)
//!                        │
//!                        v
//!              rank candidate keywords           (respond.rs)
//!                        │  weight-descending, encounter order on ties
//!                        v
//!              match_pattern per decomposition   (matcher.rs)
//!                        │  backtracking wildcards, synonym classes
//!                        v
//!              substitute(post table) on each captured span
//!                        │
//!                        v
//!              reassemble template + captures    (reassemble.rs)
//!                        │  or: follow goto / defer to memory
//!                        v
//!                 joined reply text
//! ```
//!
//! The search is strictly ordered: the first decomposition of the heaviest
//! candidate keyword that matches and carries a direct (non-deferred)
//! reassembly wins. When nothing wins, the reserved `xnone` keyword supplies
//! a catch-all reply, so arbitrary input always produces something.
//!
//! ## Responsibilities by module
//!
//! - `tokenize.rs`: raw text to word/punctuation tokens.
//! - `subst.rs`: word-level rewrite tables (pre and post).
//! - `matcher.rs`: recursive backtracking decomposition matching.
//! - `reassemble.rs`: template expansion with capture truncation.
//! - `respond.rs`: keyword ranking, the ordered search, goto resolution, the
//!   memory queue and the per-session cursor table.
//!
//! All per-conversation mutation lives in [`SessionState`]; the
//! [`Script`](crate::Script) passed in is never written to.

#[path = "engine/matcher.rs"]
mod matcher;
#[path = "engine/reassemble.rs"]
mod reassemble;
#[path = "engine/respond.rs"]
mod respond;
#[path = "engine/subst.rs"]
mod subst;
#[path = "engine/tokenize.rs"]
mod tokenize;

pub(crate) use matcher::match_pattern;
pub(crate) use reassemble::reassemble;
pub(crate) use respond::{SessionState, respond};
pub(crate) use subst::substitute;
pub(crate) use tokenize::tokenize;
