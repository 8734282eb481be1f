//! Heading outline of a document body.
//!
//! ```rust
//! let toc = xydocs_core::outline("# Guide\n\n## Install\n").unwrap();
//! assert_eq!(toc[0].children[0].anchor, "install");
//! ```

use crate::render::heading_text;
use crate::slug::AnchorAllocator;
use crate::{Error, Result, TocEntry};
use tree_sitter::{Node, Parser, TreeCursor};

/// Heading outline extractor backed by the tree-sitter markdown grammar.
///
/// Headings inside code fences are not headings to the grammar, so they never
/// show up in the outline. Anchors match the `id` attributes produced by
/// [`MarkdownRenderer`](crate::MarkdownRenderer) for the same body.
pub struct OutlineParser {
    parser: Parser,
}

impl OutlineParser {
    /// Load the markdown grammar.
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_md::LANGUAGE.into())
            .map_err(|e| Error::Parse(format!("Failed to set language: {e}")))?;

        Ok(Self { parser })
    }

    /// Nested outline of `text`.
    pub fn parse(&mut self, text: &str) -> Result<Vec<TocEntry>> {
        let tree = self
            .parser
            .parse(text, None)
            .ok_or_else(|| Error::Parse("Failed to parse markdown".into()))?;

        let mut toc = Vec::new();
        let mut stack: Vec<usize> = Vec::new();
        let mut anchors = AnchorAllocator::new();

        walk_tree(&mut tree.root_node().walk(), |node| {
            let Some(level) = heading_level(node) else {
                return;
            };
            let title = heading_text(&text[node.byte_range()]).trim().to_string();

            while stack.last().is_some_and(|&open| open >= level) {
                stack.pop();
            }
            stack.push(level);

            let entry = TocEntry {
                level,
                anchor: anchors.allocate(&title),
                text: title,
                line: node.start_position().row + 1,
                children: Vec::new(),
            };
            add_to_toc(&mut toc, entry, stack.len());
        });

        Ok(toc)
    }
}

/// Outline of `text` using a fresh parser.
pub fn outline(text: &str) -> Result<Vec<TocEntry>> {
    OutlineParser::new()?.parse(text)
}

fn walk_tree<F>(cursor: &mut TreeCursor, mut callback: F)
where
    F: FnMut(Node),
{
    loop {
        callback(cursor.node());

        if cursor.goto_first_child() || cursor.goto_next_sibling() {
            continue;
        }

        loop {
            if !cursor.goto_parent() {
                return;
            }
            if cursor.goto_next_sibling() {
                break;
            }
        }
    }
}

fn heading_level(node: Node) -> Option<usize> {
    let kind = node.kind();
    if kind != "atx_heading" && kind != "setext_heading" {
        return None;
    }

    for child in node.children(&mut node.walk()) {
        let level = match child.kind() {
            "atx_h1_marker" | "setext_h1_underline" => 1,
            "atx_h2_marker" | "setext_h2_underline" => 2,
            "atx_h3_marker" => 3,
            "atx_h4_marker" => 4,
            "atx_h5_marker" => 5,
            "atx_h6_marker" => 6,
            _ => continue,
        };
        return Some(level);
    }
    Some(1)
}

fn add_to_toc(toc: &mut Vec<TocEntry>, entry: TocEntry, depth: usize) {
    if depth <= 1 {
        toc.push(entry);
    } else if let Some(parent) = toc.last_mut() {
        add_to_toc(&mut parent.children, entry, depth - 1);
    } else {
        toc.push(entry);
    }
}

/// Flatten a nested outline in document order.
pub fn flatten(toc: &[TocEntry]) -> Vec<&TocEntry> {
    let mut out = Vec::new();
    for entry in toc {
        out.push(entry);
        out.extend(flatten(&entry.children));
    }
    out
}
