//! Node tree → ratatui `Text` painter.
//!
//! Walks the page's virtual nodes and converts the handful of tags the page
//! produces into styled `Line`/`Span` values: paragraphs, headings, `<br>`,
//! inline `<code>`, and `pre > code.language-X` blocks (with syntect
//! highlighting). Container tags are transparent.

use std::sync::LazyLock;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::render::{DEFAULT_LANGUAGE, Element, Node};

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const THEME: &str = "base16-ocean.dark";
const LANGUAGE_CLASS_PREFIX: &str = "language-";

/// Paint nodes into styled `Text`, with `base` as the default text style.
pub fn render(nodes: &[Node], base: Style) -> Text<'static> {
    let mut w = Writer::new(base);
    for node in nodes {
        w.node(node);
    }
    w.text
}

/// Paint a single element (including the element itself).
pub fn render_element(element: &Element, base: Style) -> Text<'static> {
    let mut w = Writer::new(base);
    w.element(element);
    w.text
}

// ── Writer ──────────────────────────────────────────────────────────────────

struct Writer {
    text: Text<'static>,
    base: Style,
    /// Inline style stack. Styles compose via `patch`.
    styles: Vec<Style>,
    /// Per-line prefix spans (code block `│`).
    line_prefixes: Vec<Span<'static>>,
    /// Whether inline content can continue the last line.
    line_open: bool,
    /// Whether the next block or inline run should be preceded by a blank line.
    needs_newline: bool,
}

impl Writer {
    fn new(base: Style) -> Self {
        Self {
            text: Text::default(),
            base,
            styles: vec![],
            line_prefixes: vec![],
            line_open: false,
            needs_newline: false,
        }
    }

    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or(self.base)
    }

    fn push_style(&mut self, overlay: Style) {
        self.styles.push(self.style().patch(overlay));
    }

    fn pop_style(&mut self) {
        self.styles.pop();
    }

    // ── Line/span helpers ───────────────────────────────────────────────

    fn push_line(&mut self, line: Line<'static>) {
        let mut out = line;
        for pfx in self.line_prefixes.iter().rev().cloned() {
            out.spans.insert(0, pfx);
        }
        self.text.lines.push(out);
    }

    fn blank_line_if_needed(&mut self) {
        if self.needs_newline {
            self.push_line(Line::default());
            self.needs_newline = false;
        }
    }

    fn open_line(&mut self) {
        if !self.line_open {
            self.blank_line_if_needed();
            self.push_line(Line::default());
            self.line_open = true;
        }
    }

    fn push_span(&mut self, span: Span<'static>) {
        self.open_line();
        if let Some(line) = self.text.lines.last_mut() {
            line.push_span(span);
        }
    }

    fn end_block(&mut self) {
        self.line_open = false;
        self.needs_newline = true;
    }

    // ── Dispatch ────────────────────────────────────────────────────────

    fn node(&mut self, node: &Node) {
        match node {
            Node::Text(t) => self.text(t),
            Node::Element(el) => self.element(el),
        }
    }

    fn children(&mut self, el: &Element) {
        for child in el.children() {
            self.node(child);
        }
    }

    fn element(&mut self, el: &Element) {
        match el.tag() {
            "br" => {
                self.open_line();
                self.push_line(Line::default());
            }
            "p" => {
                self.end_block_if_open();
                let overlay = if el.has_class("error-text") || el.has_class("error") {
                    Style::default().fg(Color::Red)
                } else {
                    Style::default()
                };
                self.push_style(overlay);
                self.open_line();
                self.children(el);
                self.pop_style();
                self.end_block();
            }
            "h2" => {
                self.end_block_if_open();
                self.push_style(Style::default().add_modifier(Modifier::BOLD));
                self.open_line();
                self.children(el);
                self.pop_style();
                self.end_block();
            }
            "pre" => self.code_block(el),
            "code" => self.inline_code(el),
            _ => self.children(el),
        }
    }

    fn end_block_if_open(&mut self) {
        if self.line_open {
            self.end_block();
        }
    }

    // ── Content handlers ────────────────────────────────────────────────

    fn text(&mut self, raw: &str) {
        // Expand tabs → 4 spaces (ratatui renders \t as zero-width)
        let text = raw.replace('\t', "    ");
        let style = self.style();
        for (i, part) in text.split('\n').enumerate() {
            if i > 0 {
                self.open_line();
                self.push_line(Line::default());
            }
            if !part.is_empty() {
                self.push_span(Span::styled(part.to_owned(), style));
            }
        }
    }

    fn inline_code(&mut self, el: &Element) {
        let style = Style::default().fg(Color::White).bg(Color::DarkGray);
        self.push_span(Span::styled(el.text_content().replace('\t', "    "), style));
    }

    fn code_block(&mut self, pre: &Element) {
        let code = pre.find(&|el| el.tag() == "code");
        let lang = code
            .and_then(|c| {
                c.classes()
                    .iter()
                    .find_map(|class| class.strip_prefix(LANGUAGE_CLASS_PREFIX))
            })
            .unwrap_or(DEFAULT_LANGUAGE)
            .to_owned();
        let content = code.map_or_else(|| pre.text_content(), Element::text_content);

        if !self.text.lines.is_empty() {
            self.push_line(Line::default());
        }
        self.line_open = false;
        self.needs_newline = false;

        // Top border: ╭── lang ──
        let bs = Style::default().fg(Color::DarkGray);
        self.push_line(Line::from(vec![
            Span::styled("╭── ", bs),
            Span::styled(lang.clone(), bs.add_modifier(Modifier::BOLD)),
            Span::styled(" ──", bs),
        ]));
        self.line_prefixes.push(Span::styled("│ ", bs));

        let highlighter = (lang != DEFAULT_LANGUAGE)
            .then(|| SYNTAX_SET.find_syntax_by_token(&lang))
            .flatten()
            .zip(THEME_SET.themes.get(THEME))
            .map(|(syntax, theme)| HighlightLines::new(syntax, theme));

        match highlighter {
            Some(mut hl) => {
                for line in LinesWithEndings::from(content.as_str()) {
                    let spans = match hl.highlight_line(line, &SYNTAX_SET) {
                        Ok(ranges) => ranges
                            .into_iter()
                            .filter_map(|(hl_style, frag)| {
                                let content = frag.trim_end_matches('\n').replace('\t', "    ");
                                if content.is_empty() {
                                    return None;
                                }
                                let fg = Color::Rgb(
                                    hl_style.foreground.r,
                                    hl_style.foreground.g,
                                    hl_style.foreground.b,
                                );
                                Some(Span::styled(content, Style::default().fg(fg)))
                            })
                            .collect(),
                        Err(_) => vec![Span::raw(
                            line.trim_end_matches('\n').replace('\t', "    "),
                        )],
                    };
                    self.push_line(Line::from(spans));
                }
            }
            None => {
                let code_style = Style::default().fg(Color::White);
                for line in content.lines() {
                    self.push_line(Line::from(Span::styled(
                        line.replace('\t', "    "),
                        code_style,
                    )));
                }
            }
        }

        self.line_prefixes.pop();
        self.push_line(Line::from(Span::styled("╰──", bs)));
        self.end_block();
    }
}
