//! Top-level block view of a Markdown body
//!
//! Comrak builds the full CommonMark tree; the reader only cares about four
//! kinds of top-level block. This module flattens the tree into that closed
//! set so the reader can match on it exhaustively.

use comrak::nodes::{AstNode, NodeValue};
use comrak::{parse_document, Arena, ComrakOptions};

/// A top-level block the reader interprets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph { text: String },
    FencedCode { info: String, literal: String },
    Html { literal: String },
}

/// A block plus the 1-based body line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedBlock {
    pub line: usize,
    pub block: Block,
}

/// Parse `body` and return its top-level blocks in document order. Blocks of
/// any other kind (lists, quotes, indented code, thematic breaks) are dropped.
pub fn top_level_blocks(body: &str) -> Vec<LocatedBlock> {
    let arena = Arena::new();
    let options = ComrakOptions::default();
    let root = parse_document(&arena, body, &options);

    root.children()
        .filter_map(|node| {
            let line = node.data.borrow().sourcepos.start.line;
            to_block(node).map(|block| LocatedBlock { line, block })
        })
        .collect()
}

fn to_block<'a>(node: &'a AstNode<'a>) -> Option<Block> {
    let block = match &node.data.borrow().value {
        NodeValue::Heading(heading) => Block::Heading {
            level: heading.level,
            text: text_content(node),
        },
        NodeValue::Paragraph => Block::Paragraph {
            text: text_content(node),
        },
        NodeValue::CodeBlock(code) if code.fenced => Block::FencedCode {
            info: code.info.clone(),
            literal: code.literal.clone(),
        },
        NodeValue::HtmlBlock(html) => Block::Html {
            literal: html.literal.clone(),
        },
        _ => return None,
    };
    Some(block)
}

/// Plain text of an inline container: text and code spans verbatim, soft
/// breaks as a single space, hard breaks as a newline, any other markup
/// reduced to its text.
fn text_content<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    for child in node.children() {
        collect_text(child, &mut text);
    }
    text
}

fn collect_text<'a>(node: &'a AstNode<'a>, output: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(text) => output.push_str(text),
        NodeValue::Code(code) => output.push_str(&code.literal),
        NodeValue::SoftBreak => output.push(' '),
        NodeValue::LineBreak => output.push('\n'),
        _ => {
            for child in node.children() {
                collect_text(child, output);
            }
        }
    }
}
