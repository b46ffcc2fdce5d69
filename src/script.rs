//! Script data model and loader.
//!
//! A script is a line-oriented rule file. Blank lines are skipped; every
//! other line is `tag: content` (split at the first colon, both sides
//! trimmed, so indentation is free-form). Tags:
//!
//! ```text
//! initial: <greeting phrase>
//! final:   <farewell phrase>
//! quit:    <phrase that ends the session>
//! pre:     <source> <replacement...>      applied before keyword ranking
//! post:    <source> <replacement...>      applied to captured spans
//! synon:   <name> <member...>             the name is itself a member
//! key:     <word> [weight]                weight defaults to 1
//! decomp:  [$] <pattern element...>       $ defers the reply to memory
//! reasmb:  <template word...> | goto <keyword>
//! ```
//!
//! `decomp` and `reasmb` lines attach to the most recent `key` / `decomp`.
//! Pattern elements are `*` (wildcard), `@name` (synonym class reference) or
//! a literal word; template words of the form `(N)` insert the N-th captured
//! span. Structural problems (unknown tags, dangling `decomp`/`reasmb`
//! lines, duplicate keywords, keywords that end up with no rules) fail the
//! whole load: a [`Script`] is either complete and well-formed or absent.
//!
//! The reserved fallback keyword `xnone` always exists in a loaded script:
//! when the source does not define it, a built-in catch-all (a single `*`
//! decomposition with five canned replies) is installed.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::ScriptError;
use crate::{Decomp, Keyword, PatternElement, Reassembly, TemplatePart};

/// Name of the reserved catch-all keyword consulted when nothing matches.
pub(crate) const FALLBACK_KEYWORD: &str = "xnone";

/// Canned replies installed under `xnone` when the script defines none.
const FALLBACK_REPLIES: &[&str] = &[
    "Can you tell me more about that?",
    "Please go on.",
    "What does that suggest to you?",
    "I see. Can you elaborate on that?",
    "That is interesting. Please continue.",
];

/// A fully loaded rule script.
///
/// Immutable after construction: all per-conversation state (reassembly
/// cursors, the memory queue) lives in the session that runs against it, so
/// one `Script` can safely back any number of concurrent sessions.
#[derive(Debug, Clone)]
pub struct Script {
    /// Keywords by lowercased word.
    pub(crate) keys: HashMap<String, Keyword>,
    /// Synonym classes by lowercased name; members are lowercased too.
    pub(crate) synonyms: HashMap<String, HashSet<String>>,
    /// Pre-substitution table, applied before keyword ranking.
    pub(crate) pre: HashMap<String, Vec<String>>,
    /// Post-substitution table, applied to captured spans.
    pub(crate) post: HashMap<String, Vec<String>>,
    pub(crate) initials: Vec<String>,
    pub(crate) finals: Vec<String>,
    /// Quit phrases, stored lowercased and compared to the lowercased input.
    pub(crate) quits: Vec<String>,
    /// Total number of decomposition ids handed out; sizes the per-session
    /// cursor table.
    pub(crate) decomp_count: usize,
}

impl Script {
    /// Parse a script from its text form.
    ///
    /// # Example
    /// ```
    /// use rogerian::Script;
    ///
    /// let script = Script::parse("key: hello\ndecomp: *\nreasmb: Hi. How are you?");
    /// assert!(script.is_ok());
    /// ```
    pub fn parse(source: &str) -> Result<Script, ScriptError> {
        Loader::new().parse(source)
    }

    /// Read and parse a script file.
    pub fn load(path: impl AsRef<Path>) -> Result<Script, ScriptError> {
        let source = std::fs::read_to_string(path)?;
        Script::parse(&source)
    }

    pub(crate) fn keyword(&self, word: &str) -> Option<&Keyword> {
        self.keys.get(word)
    }

    pub(crate) fn fallback_keyword(&self) -> &Keyword {
        self.keys.get(FALLBACK_KEYWORD).expect("fallback keyword is installed at load time")
    }

    fn empty() -> Script {
        Script {
            keys: HashMap::new(),
            synonyms: HashMap::new(),
            pre: HashMap::new(),
            post: HashMap::new(),
            initials: Vec::new(),
            finals: Vec::new(),
            quits: Vec::new(),
            decomp_count: 0,
        }
    }

    /// Shape invariants the responder relies on: every keyword has at least
    /// one decomposition and every decomposition at least one reassembly.
    fn validate(&self) -> Result<(), ScriptError> {
        for key in self.keys.values() {
            if key.decomps.is_empty() {
                return Err(ScriptError::EmptyKeyword { word: key.word.clone() });
            }
            for decomp in &key.decomps {
                if decomp.reassemblies.is_empty() {
                    return Err(ScriptError::EmptyDecomposition { word: key.word.clone() });
                }
            }
        }
        Ok(())
    }
}

// --- Loader -----------------------------------------------------------------

/// Line-by-line script builder. `current_key`/`has_decomp` track the
/// attachment point for `decomp` and `reasmb` lines.
struct Loader {
    script: Script,
    current_key: Option<String>,
    has_decomp: bool,
    next_decomp_id: usize,
}

impl Loader {
    fn new() -> Loader {
        Loader { script: Script::empty(), current_key: None, has_decomp: false, next_decomp_id: 0 }
    }

    fn parse(mut self, source: &str) -> Result<Script, ScriptError> {
        for (index, raw) in source.lines().enumerate() {
            let line = index + 1;
            if raw.trim().is_empty() {
                continue;
            }
            let Some((tag, content)) = raw.split_once(':') else {
                return Err(ScriptError::Malformed { line, reason: "expected `tag: content`".into() });
            };
            let tag = tag.trim();
            let content = content.trim();
            if content.is_empty() {
                return Err(ScriptError::Malformed { line, reason: format!("`{tag}` line has no content") });
            }
            match tag {
                "initial" => self.script.initials.push(content.to_string()),
                "final" => self.script.finals.push(content.to_string()),
                "quit" => self.script.quits.push(content.to_lowercase()),
                "pre" => self.substitution(line, content, Table::Pre)?,
                "post" => self.substitution(line, content, Table::Post)?,
                "synon" => self.synonym(content),
                "key" => self.keyword(line, content)?,
                "decomp" => self.decomposition(line, content)?,
                "reasmb" => self.reassembly(line, content)?,
                _ => return Err(ScriptError::UnknownTag { line, tag: tag.to_string() }),
            }
        }

        self.install_fallback();
        self.script.decomp_count = self.next_decomp_id;
        self.script.validate()?;
        Ok(self.script)
    }

    fn substitution(&mut self, line: usize, content: &str, table: Table) -> Result<(), ScriptError> {
        let mut parts = content.split_whitespace();
        let source = parts.next().expect("content is checked non-empty").to_lowercase();
        let replacement: Vec<String> = parts.map(str::to_string).collect();
        if replacement.is_empty() {
            return Err(ScriptError::Malformed {
                line,
                reason: "substitution needs a source word and a replacement".into(),
            });
        }
        let table = match table {
            Table::Pre => &mut self.script.pre,
            Table::Post => &mut self.script.post,
        };
        table.insert(source, replacement);
        Ok(())
    }

    fn synonym(&mut self, content: &str) {
        let members: HashSet<String> = content.split_whitespace().map(str::to_lowercase).collect();
        let name = content.split_whitespace().next().expect("content is checked non-empty").to_lowercase();
        self.script.synonyms.insert(name, members);
    }

    fn keyword(&mut self, line: usize, content: &str) -> Result<(), ScriptError> {
        let mut parts = content.split_whitespace();
        let word = parts.next().expect("content is checked non-empty").to_lowercase();
        let weight = match parts.next() {
            None => 1,
            Some(raw) => raw.parse::<u32>().ok().filter(|&w| w >= 1).ok_or_else(|| ScriptError::Malformed {
                line,
                reason: format!("keyword weight `{raw}` is not a positive integer"),
            })?,
        };
        if parts.next().is_some() {
            return Err(ScriptError::Malformed { line, reason: "trailing words after keyword weight".into() });
        }
        if self.script.keys.contains_key(&word) {
            return Err(ScriptError::DuplicateKeyword { line, word });
        }
        self.script.keys.insert(word.clone(), Keyword { word: word.clone(), weight, decomps: Vec::new() });
        self.current_key = Some(word);
        self.has_decomp = false;
        Ok(())
    }

    fn decomposition(&mut self, line: usize, content: &str) -> Result<(), ScriptError> {
        let word = self.current_key.clone().ok_or(ScriptError::DecompWithoutKey { line })?;
        let mut parts: Vec<&str> = content.split_whitespace().collect();
        let saves_to_memory = parts.first() == Some(&"$");
        if saves_to_memory {
            parts.remove(0);
        }
        if parts.is_empty() {
            return Err(ScriptError::Malformed { line, reason: "`decomp` needs at least one pattern element".into() });
        }
        let pattern = parts.iter().map(|part| parse_element(line, part)).collect::<Result<Vec<_>, _>>()?;

        let decomp = Decomp { id: self.next_decomp_id, pattern, saves_to_memory, reassemblies: Vec::new() };
        self.next_decomp_id += 1;
        self.script.keys.get_mut(&word).expect("current key was just looked up").decomps.push(decomp);
        self.has_decomp = true;
        Ok(())
    }

    fn reassembly(&mut self, line: usize, content: &str) -> Result<(), ScriptError> {
        if !self.has_decomp {
            return Err(ScriptError::ReassemblyWithoutDecomp { line });
        }
        let word = self.current_key.clone().expect("has_decomp implies a current key");

        let parts: Vec<&str> = content.split_whitespace().collect();
        let reassembly = if parts[0] == "goto" {
            if parts.len() != 2 {
                return Err(ScriptError::Malformed { line, reason: "`goto` expects exactly one target keyword".into() });
            }
            Reassembly::Goto(parts[1].to_lowercase())
        } else {
            Reassembly::Template(parts.iter().map(|part| parse_template_part(part)).collect())
        };

        let key = self.script.keys.get_mut(&word).expect("current key was just looked up");
        key.decomps.last_mut().expect("has_decomp guarantees a decomposition").reassemblies.push(reassembly);
        Ok(())
    }

    fn install_fallback(&mut self) {
        if self.script.keys.contains_key(FALLBACK_KEYWORD) {
            return;
        }
        let reassemblies = FALLBACK_REPLIES
            .iter()
            .map(|text| Reassembly::Template(text.split_whitespace().map(|w| TemplatePart::Word(w.to_string())).collect()))
            .collect();
        let decomp = Decomp {
            id: self.next_decomp_id,
            pattern: vec![PatternElement::Wildcard],
            saves_to_memory: false,
            reassemblies,
        };
        self.next_decomp_id += 1;
        self.script.keys.insert(
            FALLBACK_KEYWORD.to_string(),
            Keyword { word: FALLBACK_KEYWORD.to_string(), weight: 1, decomps: vec![decomp] },
        );
    }
}

enum Table {
    Pre,
    Post,
}

fn parse_element(line: usize, part: &str) -> Result<PatternElement, ScriptError> {
    if part == "*" {
        return Ok(PatternElement::Wildcard);
    }
    if let Some(class) = part.strip_prefix('@') {
        if class.is_empty() {
            return Err(ScriptError::Malformed { line, reason: "`@` needs a synonym class name".into() });
        }
        return Ok(PatternElement::Synonym(class.to_lowercase()));
    }
    Ok(PatternElement::Literal(part.to_string()))
}

/// `(N)` with a numeric N is a capture reference; every other word, including
/// parenthesized prose, is a literal.
fn parse_template_part(part: &str) -> TemplatePart {
    if let Some(inner) = part.strip_prefix('(').and_then(|p| p.strip_suffix(')')) {
        if let Ok(index) = inner.parse::<usize>() {
            return TemplatePart::Capture(index);
        }
    }
    TemplatePart::Word(part.to_string())
}
