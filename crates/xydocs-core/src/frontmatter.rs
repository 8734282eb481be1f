//! Front-matter extraction.
//!
//! A document may open with a YAML block fenced by `---` lines:
//!
//! ```text
//! ---
//! title: CPU Monitoring
//! description: Reading per-core load
//! ---
//! # CPU Monitoring
//! ```
//!
//! Anything that does not parse as a YAML mapping is treated as if no block
//! were present, so one broken file cannot take the whole site down.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

const OPEN_DELIMITER: &str = "---";
const CLOSE_DELIMITERS: [&str; 2] = ["---", "..."];

/// Key/value metadata from a document header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frontmatter(BTreeMap<String, Value>);

impl Frontmatter {
    /// Empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String value for `key`. Numbers and booleans are stringified.
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// The `title` key.
    pub fn title(&self) -> Option<String> {
        self.get_str("title").filter(|t| !t.trim().is_empty())
    }

    /// The `description` key.
    pub fn description(&self) -> Option<String> {
        self.get_str("description").filter(|d| !d.trim().is_empty())
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Result of splitting a file into header and body.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSource {
    /// Metadata from the header block.
    pub frontmatter: Frontmatter,
    /// Markdown after the header block.
    pub body: String,
}

/// Split raw file text into front-matter and body.
///
/// Without a header block the metadata is empty and the body is `text`
/// unchanged. An unterminated block or one that is not a YAML mapping is
/// handled the same way, with a warning.
pub fn parse_frontmatter(text: &str) -> ParsedSource {
    let unchanged = || ParsedSource {
        frontmatter: Frontmatter::new(),
        body: text.to_string(),
    };

    let Some((yaml, body)) = split_block(text) else {
        return unchanged();
    };

    if yaml.trim().is_empty() {
        return ParsedSource {
            frontmatter: Frontmatter::new(),
            body: body.to_string(),
        };
    }

    match serde_yaml::from_str::<Value>(yaml) {
        Ok(Value::Object(map)) => ParsedSource {
            frontmatter: Frontmatter(map.into_iter().collect()),
            body: body.to_string(),
        },
        Ok(Value::Null) => ParsedSource {
            frontmatter: Frontmatter::new(),
            body: body.to_string(),
        },
        Ok(other) => {
            warn!(
                "Front-matter is not a mapping (found {}), ignoring it",
                json_kind(&other)
            );
            unchanged()
        },
        Err(e) => {
            warn!("Malformed front-matter, ignoring it: {e}");
            unchanged()
        },
    }
}

/// Locate the header block. Returns `(yaml, body)`.
fn split_block(text: &str) -> Option<(&str, &str)> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let first_line_end = text.find('\n')?;
    if text[..first_line_end].trim_end() != OPEN_DELIMITER {
        return None;
    }

    let yaml_start = first_line_end + 1;
    let mut cursor = yaml_start;
    while cursor <= text.len() {
        let rest = &text[cursor..];
        let (line, next) = match rest.find('\n') {
            Some(end) => (&rest[..end], cursor + end + 1),
            None => (rest, text.len() + 1),
        };

        if CLOSE_DELIMITERS.contains(&line.trim_end()) {
            let body_start = next.min(text.len());
            return Some((&text[yaml_start..cursor], &text[body_start..]));
        }

        if next > text.len() {
            break;
        }
        cursor = next;
    }

    None
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
