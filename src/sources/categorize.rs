//! Heuristic category assignment for feed entries.
//!
//! Rules are plain data evaluated top to bottom; the first match wins and
//! anything unmatched lands in [`DEFAULT_CATEGORY`].

use crate::storage::DEFAULT_CATEGORY;

pub const CLAUDE_CODE: &str = "Claude Code";
pub const CODEX: &str = "Codex";
pub const OPENCLAW: &str = "OpenClaw";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Predicate {
    /// Title contains the needle, ignoring case. Needles are lowercase.
    TitleContains(&'static str),
    /// Source name equals the value exactly.
    SourceIs(&'static str),
}

#[derive(Debug, Clone, Copy)]
struct Rule {
    predicate: Predicate,
    category: &'static str,
}

#[rustfmt::skip]
const RULES: &[Rule] = &[
    // Tool keywords in the title
    Rule { predicate: Predicate::TitleContains("claude code"), category: CLAUDE_CODE },
    Rule { predicate: Predicate::TitleContains("codex"), category: CODEX },
    Rule { predicate: Predicate::TitleContains("openclaw"), category: OPENCLAW },
    // Channels dedicated to one tool
    Rule { predicate: Predicate::SourceIs("Claude Log"), category: CLAUDE_CODE },
    Rule { predicate: Predicate::SourceIs("OpenClaw"), category: OPENCLAW },
    // Vendor defaults
    Rule { predicate: Predicate::SourceIs("Anthropic"), category: CLAUDE_CODE },
    Rule { predicate: Predicate::SourceIs("OpenAI"), category: CODEX },
];

impl Predicate {
    fn matches(self, title_lower: &str, source: &str) -> bool {
        match self {
            Predicate::TitleContains(needle) => title_lower.contains(needle),
            Predicate::SourceIs(name) => source == name,
        }
    }
}

/// Category for an entry titled `title` from the feed named `source`.
pub fn categorize(title: &str, source: &str) -> &'static str {
    let title_lower = title.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.predicate.matches(&title_lower, source))
        .map(|rule| rule.category)
        .unwrap_or(DEFAULT_CATEGORY)
}
