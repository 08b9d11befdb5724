//! Markdown → ratatui `Text` renderer.
//!
//! Walks `pulldown_cmark` events and emits styled `Line`/`Span` values:
//! headings, emphasis, inline code, fenced code blocks (syntect-highlighted,
//! falling back to plain text when the declared language is unknown), lists,
//! blockquotes, rules, and links.
//!
//! Raw HTML events are dropped on the floor. Server content therefore never
//! reaches the terminal as markup — this is the crate's sanitization boundary.

use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const HIGHLIGHT_THEME: &str = "base16-eighties.dark";
/// Left gutter for fenced code lines.
const CODE_GUTTER: &str = "▌ ";

/// Render markdown into owned styled text, using `base_fg` for body copy.
pub fn render(source: &str, base_fg: Color) -> Text<'static> {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TASKLISTS);

    let mut renderer = Renderer::new(base_fg);
    for event in Parser::new_ext(source, opts) {
        renderer.handle(event);
    }
    renderer.out
}

/// What the renderer is doing inside a fenced code block.
enum CodeMode {
    /// A syntect grammar matched the fence language.
    Highlighted(Box<HighlightLines<'static>>),
    /// Unknown or absent language: verbatim plain text.
    Plain,
}

struct Renderer {
    out: Text<'static>,
    base_fg: Color,
    /// Inline style stack; nested emphasis composes via `patch`.
    inline: Vec<Style>,
    /// Per-line prefixes (blockquote bars, code gutters).
    prefixes: Vec<Span<'static>>,
    /// List nesting: None = bulleted, Some(n) = numbered at n.
    lists: Vec<Option<u64>>,
    /// Some while inside a fenced/indented code block.
    code: Option<CodeMode>,
    /// Link destination, emitted after the link text closes.
    link: Option<String>,
    /// A blank separator line is owed before the next block.
    gap_pending: bool,
}

impl Renderer {
    fn new(base_fg: Color) -> Self {
        Self {
            out: Text::default(),
            base_fg,
            inline: vec![],
            prefixes: vec![],
            lists: vec![],
            code: None,
            link: None,
            gap_pending: false,
        }
    }

    fn current_style(&self) -> Style {
        self.inline
            .last()
            .copied()
            .unwrap_or_else(|| Style::default().fg(self.base_fg))
    }

    fn push_inline(&mut self, overlay: Style) {
        self.inline.push(self.current_style().patch(overlay));
    }

    fn open_line(&mut self, mut line: Line<'static>) {
        for prefix in self.prefixes.iter().rev().cloned() {
            line.spans.insert(0, prefix);
        }
        self.out.lines.push(line);
    }

    fn append_span(&mut self, span: Span<'static>) {
        match self.out.lines.last_mut() {
            Some(line) => line.push_span(span),
            None => self.open_line(Line::from(vec![span])),
        }
    }

    fn flush_gap(&mut self) {
        if self.gap_pending {
            self.open_line(Line::default());
            self.gap_pending = false;
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(text),
            Event::Code(code) => {
                let style = Style::default().fg(Color::White).bg(Color::DarkGray);
                self.append_span(Span::styled(code.to_string(), style));
            }
            Event::SoftBreak => self.append_span(Span::raw(" ")),
            Event::HardBreak => self.open_line(Line::default()),
            Event::Rule => {
                self.flush_gap();
                self.open_line(Line::from(Span::styled(
                    "─".repeat(32),
                    Style::default().fg(Color::DarkGray),
                )));
                self.gap_pending = true;
            }
            Event::TaskListMarker(done) => {
                self.append_span(Span::raw(if done { "[x] " } else { "[ ] " }));
            }
            // Inline and block HTML are intentionally not rendered.
            Event::Html(_) | Event::InlineHtml(_) => {}
            _ => {} // footnotes, math — skip
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.flush_gap();
                self.open_line(Line::default());
            }
            Tag::Heading { level, .. } => {
                self.flush_gap();
                self.open_line(Line::default());
                self.push_inline(heading_style(self.base_fg, level));
            }
            Tag::BlockQuote(_) => {
                self.flush_gap();
                self.prefixes
                    .push(Span::styled("┃ ", Style::default().fg(Color::DarkGray)));
                self.push_inline(
                    Style::default()
                        .fg(self.base_fg)
                        .add_modifier(Modifier::DIM | Modifier::ITALIC),
                );
            }
            Tag::CodeBlock(kind) => self.open_code_block(kind),
            Tag::List(start) => {
                if self.lists.is_empty() {
                    self.flush_gap();
                }
                self.lists.push(start);
            }
            Tag::Item => {
                self.open_line(Line::default());
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let m = format!("{indent}{n}. ");
                        *n += 1;
                        m
                    }
                    _ => format!("{indent}• "),
                };
                self.append_span(Span::styled(marker, Style::default().fg(Color::DarkGray)));
            }
            Tag::Emphasis => self.push_inline(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_inline(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_inline(Style::default().add_modifier(Modifier::CROSSED_OUT));
            }
            Tag::Link { dest_url, .. } => {
                self.link = Some(dest_url.to_string());
                self.push_inline(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::UNDERLINED),
                );
            }
            _ => {} // tables, images, definitions — skip
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.gap_pending = true,
            TagEnd::Heading(_) => {
                self.inline.pop();
                self.gap_pending = true;
            }
            TagEnd::BlockQuote(_) => {
                self.prefixes.pop();
                self.inline.pop();
                self.gap_pending = true;
            }
            TagEnd::CodeBlock => {
                self.code = None;
                self.prefixes.pop();
                self.gap_pending = true;
            }
            TagEnd::List(_) => {
                self.lists.pop();
                self.gap_pending = true;
            }
            TagEnd::Item => {}
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.inline.pop();
            }
            TagEnd::Link => {
                self.inline.pop();
                if let Some(url) = self.link.take() {
                    self.append_span(Span::raw(" ("));
                    self.append_span(Span::styled(
                        url,
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::UNDERLINED),
                    ));
                    self.append_span(Span::raw(")"));
                }
            }
            _ => {}
        }
    }

    fn open_code_block(&mut self, kind: CodeBlockKind<'_>) {
        self.flush_gap();
        let lang = match &kind {
            CodeBlockKind::Fenced(l) => l.as_ref().trim(),
            CodeBlockKind::Indented => "",
        };

        // Language tag header, only when a language was declared.
        if !lang.is_empty() {
            self.open_line(Line::from(Span::styled(
                format!("· {lang}"),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )));
        }

        self.prefixes.push(Span::styled(
            CODE_GUTTER,
            Style::default().fg(Color::DarkGray),
        ));

        // Unrecognized languages fall back to plain text.
        self.code = Some(match SYNTAX_SET.find_syntax_by_token(lang) {
            Some(syntax) if !lang.is_empty() => CodeMode::Highlighted(Box::new(
                HighlightLines::new(syntax, &THEME_SET.themes[HIGHLIGHT_THEME]),
            )),
            _ => CodeMode::Plain,
        });
    }

    fn text(&mut self, cow: CowStr<'_>) {
        // Tabs render zero-width in ratatui; expand them up front.
        let text = cow.replace('\t', "    ");

        match self.code.take() {
            Some(CodeMode::Highlighted(mut hl)) => {
                for line in LinesWithEndings::from(&text) {
                    let Ok(regions) = hl.highlight_line(line, &SYNTAX_SET) else {
                        continue;
                    };
                    let spans: Vec<Span<'static>> = regions
                        .into_iter()
                        .filter_map(|(style, fragment)| {
                            let content = fragment.trim_end_matches('\n');
                            if content.is_empty() {
                                return None;
                            }
                            let fg = Color::Rgb(
                                style.foreground.r,
                                style.foreground.g,
                                style.foreground.b,
                            );
                            Some(Span::styled(content.to_owned(), Style::default().fg(fg)))
                        })
                        .collect();
                    self.open_line(Line::from(spans));
                }
                self.code = Some(CodeMode::Highlighted(hl));
            }
            Some(CodeMode::Plain) => {
                let style = Style::default().fg(Color::Gray);
                for line in text.lines() {
                    self.open_line(Line::from(Span::styled(line.to_owned(), style)));
                }
                self.code = Some(CodeMode::Plain);
            }
            None => {
                let style = self.current_style();
                self.append_span(Span::styled(text, style));
            }
        }
    }
}

fn heading_style(base_fg: Color, level: HeadingLevel) -> Style {
    match level {
        HeadingLevel::H1 => Style::default()
            .fg(base_fg)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        HeadingLevel::H2 => Style::default().fg(base_fg).add_modifier(Modifier::BOLD),
        _ => Style::default()
            .fg(base_fg)
            .add_modifier(Modifier::BOLD | Modifier::ITALIC),
    }
}
