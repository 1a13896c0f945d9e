//! Markdown-like text → virtual nodes.
//!
//! Three substitutions, applied in this order:
//!
//! 1. Fenced blocks (```` ```lang ... ``` ````) become `pre > code.language-LANG`.
//!    The body is trimmed and kept as a single text node.
//! 2. Single-backtick spans outside fenced blocks become `code` elements.
//! 3. Remaining newlines become `br` elements.
//!
//! Fenced bodies are split out before steps 2 and 3 run, so they never pick
//! up line breaks or nested inline code.

use std::sync::LazyLock;

use regex::Regex;

use super::node::{Element, Html, Node, serialize};

static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```([a-z]*)([\s\S]*?)```").expect("fenced block pattern is valid"));

static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`([^`]+)`").expect("inline code pattern is valid"));

/// Language class used when a fence carries no tag.
pub const DEFAULT_LANGUAGE: &str = "plaintext";

/// Renders text to markup. Everything outside code elements is escaped.
pub fn format(text: &str) -> Html {
    serialize(&format_nodes(text))
}

/// Renders text to a fragment of sibling nodes.
pub fn format_nodes(text: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut cursor = 0;

    for caps in FENCED_BLOCK.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        push_inline(&mut nodes, &text[cursor..whole.start()]);

        let language = caps
            .get(1)
            .map(|m| m.as_str())
            .filter(|lang| !lang.is_empty())
            .unwrap_or(DEFAULT_LANGUAGE);
        let body = caps.get(2).map_or("", |m| m.as_str()).trim();
        nodes.push(code_block(language, body).into());

        cursor = whole.end();
    }
    push_inline(&mut nodes, &text[cursor..]);

    nodes
}

fn code_block(language: &str, body: &str) -> Element {
    Element::new("pre").child(
        Element::new("code")
            .class(format!("language-{language}"))
            .text(body),
    )
}

fn push_inline(nodes: &mut Vec<Node>, segment: &str) {
    let mut cursor = 0;
    for caps in INLINE_CODE.captures_iter(segment) {
        let (Some(whole), Some(content)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        push_text_with_breaks(nodes, &segment[cursor..whole.start()]);

        let mut code = Vec::new();
        push_text_with_breaks(&mut code, content.as_str());
        nodes.push(Element::new("code").children_from(code).into());

        cursor = whole.end();
    }
    push_text_with_breaks(nodes, &segment[cursor..]);
}

fn push_text_with_breaks(nodes: &mut Vec<Node>, text: &str) {
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            nodes.push(Element::new("br").into());
        }
        if !line.is_empty() {
            nodes.push(Node::text(line));
        }
    }
}
