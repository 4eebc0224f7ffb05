// ABOUTME: .dockerignore parsing and matching.
// ABOUTME: Last matching rule wins; `!` re-includes; a matching directory excludes its contents.

use glob::{MatchOptions, Pattern};
use std::path::Path;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[derive(Debug)]
struct Rule {
    pattern: Pattern,
    negated: bool,
}

/// Exclusion rules read from a `.dockerignore` file.
#[derive(Debug, Default)]
pub struct IgnoreRules {
    rules: Vec<Rule>,
}

impl IgnoreRules {
    /// Parse `.dockerignore` content. Invalid patterns are skipped with a warning.
    pub fn parse(content: &str) -> Self {
        let rules = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| {
                let (negated, raw) = match line.strip_prefix('!') {
                    Some(rest) => (true, rest.trim()),
                    None => (false, line),
                };
                let normalized = raw.trim_start_matches("./").trim_start_matches('/');
                let normalized = normalized.trim_end_matches('/');
                if normalized.is_empty() {
                    return None;
                }
                match Pattern::new(normalized) {
                    Ok(pattern) => Some(Rule { pattern, negated }),
                    Err(e) => {
                        tracing::warn!("ignoring invalid .dockerignore pattern {:?}: {}", line, e);
                        None
                    }
                }
            })
            .collect();
        Self { rules }
    }

    /// Load `<context>/.dockerignore`, or no rules if it does not exist.
    pub fn load(context: &Path) -> std::io::Result<Self> {
        match std::fs::read_to_string(context.join(".dockerignore")) {
            Ok(content) => Ok(Self::parse(&content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn has_negations(&self) -> bool {
        self.rules.iter().any(|r| r.negated)
    }

    /// Whether `relative` (slash-separated, relative to the context) is excluded.
    pub fn is_excluded(&self, relative: &str) -> bool {
        let mut excluded = false;
        for rule in &self.rules {
            if matches_self_or_parent(&rule.pattern, relative) {
                excluded = !rule.negated;
            }
        }
        excluded
    }
}

fn matches_self_or_parent(pattern: &Pattern, relative: &str) -> bool {
    if pattern.matches_with(relative, MATCH_OPTIONS) {
        return true;
    }
    relative
        .match_indices('/')
        .any(|(i, _)| pattern.matches_with(&relative[..i], MATCH_OPTIONS))
}
