//! Inline callout markers inside code samples.
//!
//! A marker looks like `[[!<id>|<text>]]`, for example
//! `app.listen(3000); [[!port|Any free port works]]`. Displayed code turns the
//! marker into an interactive element; copied code and search text drop it.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[allow(clippy::unwrap_used)] // constant pattern
static MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[!([A-Za-z0-9_-]+)\|([^\]\n]*)\]\]").unwrap());

/// One callout extracted from a code sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Marker identifier.
    pub id: String,
    /// Explanatory text shown on interaction.
    pub text: String,
}

/// A piece of annotated source, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Plain code.
    Code(&'a str),
    /// A callout marker.
    Marker(Annotation),
}

/// Split `source` into plain code and markers.
pub fn segments(source: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut last = 0;

    for caps in MARKER.captures_iter(source) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            out.push(Segment::Code(&source[last..whole.start()]));
        }
        out.push(Segment::Marker(Annotation {
            id: caps[1].to_string(),
            text: caps[2].trim().to_string(),
        }));
        last = whole.end();
    }

    if last < source.len() {
        out.push(Segment::Code(&source[last..]));
    }
    out
}

/// All markers in `source`.
pub fn extract(source: &str) -> Vec<Annotation> {
    segments(source)
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Marker(annotation) => Some(annotation),
            Segment::Code(_) => None,
        })
        .collect()
}

/// `source` with every marker removed.
///
/// Lines that carried a marker lose the trailing whitespace it leaves behind.
/// Other lines are untouched.
pub fn strip(source: &str) -> String {
    if !MARKER.is_match(source) {
        return source.to_string();
    }

    let mut out = String::with_capacity(source.len());
    for line in source.split_inclusive('\n') {
        let (body, newline) = match line.strip_suffix('\n') {
            Some(body) => (body, "\n"),
            None => (line, ""),
        };
        if MARKER.is_match(body) {
            out.push_str(MARKER.replace_all(body, "").trim_end());
        } else {
            out.push_str(body);
        }
        out.push_str(newline);
    }
    out
}
