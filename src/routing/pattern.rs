//! Pattern compilation.
//!
//! # Responsibilities
//! - Compile URI templates (`/events/{id}`) into anchored regexes
//! - Compile layout globs (`/blog/**`, `*.html`, `page-?`) into anchored regexes
//! - Extract placeholder names in declaration order
//!
//! # Design Decisions
//! - Patterns compile once at load time; matching never allocates a regex
//! - A placeholder matches one or more non-`/` characters
//! - Capture group *i* belongs to the *i*-th placeholder

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([a-zA-Z_][a-zA-Z0-9_]*)\}").expect("valid variable regex")
});

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").expect("valid identifier regex"));

/// Error compiling a route or layout pattern.
#[derive(Debug, Error)]
pub enum PatternError {
    #[error("unclosed variable in pattern: {0}")]
    Unclosed(String),
    #[error("invalid variable name '{name}' in pattern: {pattern}")]
    InvalidVariable { pattern: String, name: String },
    #[error("invalid pattern {pattern}: {source}")]
    Regex {
        pattern: String,
        source: regex::Error,
    },
}

/// Whether `name` is a valid placeholder identifier.
pub fn is_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}

/// Placeholder names of a URI template, left to right.
pub fn extract_variable_names(pattern: &str) -> Vec<String> {
    VARIABLE
        .captures_iter(pattern)
        .map(|c| c[1].to_string())
        .collect()
}

fn push_literal(regex: &mut String, c: char) {
    if matches!(
        c,
        '.' | '*' | '+' | '?' | '^' | '$' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '\\'
    ) {
        regex.push('\\');
    }
    regex.push(c);
}

/// A compiled URI template.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    source: String,
    regex: Regex,
    variables: Vec<String>,
}

impl RoutePattern {
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        let mut regex = String::with_capacity(pattern.len() + 8);
        let mut variables = Vec::new();
        regex.push('^');

        let mut rest = pattern;
        while let Some(c) = rest.chars().next() {
            if c == '{' {
                let close = rest
                    .find('}')
                    .ok_or_else(|| PatternError::Unclosed(pattern.to_string()))?;
                let name = &rest[1..close];
                if !is_identifier(name) {
                    return Err(PatternError::InvalidVariable {
                        pattern: pattern.to_string(),
                        name: name.to_string(),
                    });
                }
                variables.push(name.to_string());
                regex.push_str("([^/]+)");
                rest = &rest[close + 1..];
            } else {
                push_literal(&mut regex, c);
                rest = &rest[c.len_utf8()..];
            }
        }
        regex.push('$');

        let regex = Regex::new(&regex).map_err(|source| PatternError::Regex {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
            variables,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Match a full path, returning `(name, value)` pairs in declaration order.
    pub fn captures(&self, path: &str) -> Option<Vec<(String, String)>> {
        let caps = self.regex.captures(path)?;
        Some(
            self.variables
                .iter()
                .enumerate()
                .filter_map(|(i, name)| {
                    caps.get(i + 1)
                        .map(|m| (name.clone(), m.as_str().to_string()))
                })
                .collect(),
        )
    }
}

/// A compiled layout glob.
///
/// `?` is one non-`/` character, `*` is any run of non-`/` characters and
/// `**` spans whole segments (`**/` also absorbs its separator).
#[derive(Debug, Clone)]
pub struct GlobPattern {
    source: String,
    regex: Regex,
}

impl GlobPattern {
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        let chars: Vec<char> = pattern.chars().collect();
        let mut regex = String::with_capacity(pattern.len() + 8);
        regex.push('^');

        let mut i = 0;
        while i < chars.len() {
            match chars[i] {
                '*' if chars.get(i + 1) == Some(&'*') => {
                    if chars.get(i + 2) == Some(&'/') {
                        regex.push_str("(?:.*/)?");
                        i += 3;
                    } else {
                        regex.push_str(".*");
                        i += 2;
                    }
                }
                '*' => {
                    regex.push_str("[^/]*");
                    i += 1;
                }
                '?' => {
                    regex.push_str("[^/]");
                    i += 1;
                }
                c => {
                    push_literal(&mut regex, c);
                    i += 1;
                }
            }
        }
        regex.push('$');

        let regex = Regex::new(&regex).map_err(|source| PatternError::Regex {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn matches(&self, path: &str) -> bool {
        self.source == path || self.regex.is_match(path)
    }
}
