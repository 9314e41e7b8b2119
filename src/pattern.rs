//! Glob matching over in-memory file paths.
//!
//! The build host selects files with glob patterns rather than walking a
//! directory tree: every candidate is already a key of the
//! [`FileSet`](crate::files::FileSet), so matching is a pure string operation.
//!
//! # Pattern Syntax
//!
//! - `*` matches any sequence of characters within a single path component
//! - `**` matches any sequence of path components, including none
//! - `?` matches any single character
//! - `[abc]` / `[a-z]` match one character from a set or range
//! - `{foo,bar}` matches either alternative (expanded before compiling, may nest)
//! - a leading `!` turns a pattern into an exclusion
//!
//! Matching is case sensitive and `*` never crosses a `/`. Candidate paths are
//! normalized to forward slashes before matching.
//!
//! # Examples
//!
//! ```rust
//! use handlebars_x::pattern::match_paths;
//!
//! let paths = vec![
//!     "index.hbs".to_string(),
//!     "posts/a.handlebars".to_string(),
//!     "partials/nav.hbs".to_string(),
//!     "style.css".to_string(),
//! ];
//! let patterns = vec!["**/*.{hbs,handlebars}".to_string(), "!partials/**".to_string()];
//!
//! let matched = match_paths(&patterns, &paths).unwrap();
//! assert_eq!(matched, vec!["index.hbs", "posts/a.handlebars"]);
//! ```

use glob::{MatchOptions, Pattern};
use tracing::{debug, trace};

use crate::core::{PluginError, Result};
use crate::files::normalize_path;

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A compiled glob pattern, possibly expanded into several alternatives.
///
/// # Examples
///
/// ```rust
/// use handlebars_x::pattern::PatternMatcher;
///
/// let matcher = PatternMatcher::new("posts/**/*.{hbs,handlebars}").unwrap();
/// assert!(matcher.matches("posts/a.hbs"));
/// assert!(matcher.matches("posts/2024/b.handlebars"));
/// assert!(!matcher.matches("pages/a.hbs"));
/// ```
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    alternatives: Vec<Pattern>,
}

impl PatternMatcher {
    /// Compiles `pattern_str`, expanding brace alternatives first.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Pattern`] if any expansion is invalid glob syntax
    /// or the braces are unbalanced.
    pub fn new(pattern_str: &str) -> Result<Self> {
        let alternatives = expand_braces(pattern_str)
            .map_err(|message| PluginError::Pattern {
                pattern: pattern_str.to_string(),
                message,
            })?
            .iter()
            .map(|expanded| {
                Pattern::new(expanded).map_err(|e| PluginError::Pattern {
                    pattern: pattern_str.to_string(),
                    message: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            alternatives,
        })
    }

    /// Checks whether `path` matches any alternative of the pattern.
    pub fn matches(&self, path: &str) -> bool {
        let normalized = normalize_path(path);
        self.alternatives.iter().any(|p| p.matches_with(&normalized, MATCH_OPTIONS))
    }
}

/// Selects the `candidates` matched by `patterns`, keeping candidate order.
///
/// A candidate is selected when it matches at least one positive pattern and
/// no `!`-prefixed pattern. A list consisting only of exclusions selects
/// nothing.
///
/// # Errors
///
/// Returns [`PluginError::Pattern`] for the first pattern that fails to compile.
pub fn match_paths<S: AsRef<str>>(patterns: &[String], candidates: &[S]) -> Result<Vec<String>> {
    let mut include = Vec::new();
    let mut exclude = Vec::new();
    for pattern in patterns {
        match pattern.strip_prefix('!') {
            Some(negated) => exclude.push(PatternMatcher::new(negated)?),
            None => include.push(PatternMatcher::new(pattern)?),
        }
    }

    let matched: Vec<String> = candidates
        .iter()
        .map(|candidate| -> &str { candidate.as_ref() })
        .filter(|path| {
            let selected = include.iter().any(|m| m.matches(path))
                && !exclude.iter().any(|m| m.matches(path));
            trace!("Pattern check {} -> {}", path, selected);
            selected
        })
        .map(str::to_string)
        .collect();

    debug!("Patterns {:?} matched {} of {} paths", patterns, matched.len(), candidates.len());
    Ok(matched)
}

/// Expands `{a,b}` alternatives into separate glob patterns.
///
/// Nested braces expand recursively; `a{b,c{d,e}}` yields `ab`, `acd`, `ace`.
/// Braces inside `[...]` character classes are left alone.
fn expand_braces(pattern: &str) -> std::result::Result<Vec<String>, String> {
    let Some((open, close)) = find_brace_group(pattern)? else {
        return Ok(vec![pattern.to_string()]);
    };

    let prefix = &pattern[..open];
    let body = &pattern[open + 1..close];
    let suffix = &pattern[close + 1..];

    let mut expanded = Vec::new();
    for alternative in split_top_level(body) {
        let combined = format!("{prefix}{alternative}{suffix}");
        expanded.extend(expand_braces(&combined)?);
    }
    Ok(expanded)
}

/// Byte offsets of the first top-level `{` and its matching `}`.
fn find_brace_group(pattern: &str) -> std::result::Result<Option<(usize, usize)>, String> {
    let mut depth = 0usize;
    let mut open = None;
    let mut in_class = false;

    for (idx, ch) in pattern.char_indices() {
        match ch {
            '[' if !in_class => in_class = true,
            ']' if in_class => in_class = false,
            '{' if !in_class => {
                if depth == 0 {
                    open = Some(idx);
                }
                depth += 1;
            }
            '}' if !in_class => {
                if depth == 0 {
                    return Err("unmatched '}'".to_string());
                }
                depth -= 1;
                if depth == 0 {
                    // `open` is always set once depth went above zero
                    return Ok(open.map(|start| (start, idx)));
                }
            }
            _ => {}
        }
    }

    if depth > 0 {
        Err("unclosed '{'".to_string())
    } else {
        Ok(None)
    }
}

/// Splits a brace body on commas that are not inside a nested group.
fn split_top_level(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (idx, ch) in body.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&body[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&body[start..]);
    parts
}
