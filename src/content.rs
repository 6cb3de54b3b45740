//! Content dispatch: body files into HTML, keyed by file extension.
//!
//! | Extension | Conversion |
//! |-----------|------------|
//! | `.txt`    | line-based plain text → `<p>`/`<pre>` blocks |
//! | `.html`   | passed through as-is |
//! | `.md`     | CommonMark + raw HTML + automatic heading ids |
//! | `.gfm`    | GitHub-flavoured: tables, strikethrough, task lists, footnotes, hard wraps, heading ids |
//! | `.cm`     | strict CommonMark, raw HTML dropped |
//!
//! Markdown rendering goes through pulldown-cmark. Heading ids are generated
//! by rewriting the event stream before it reaches the HTML writer, and raw
//! HTML is filtered out of that stream for `.cm`.
//!
//! Bare URLs are not turned into links in any dialect; pulldown-cmark has no
//! autolink extension, so write `<https://...>` or `[text](url)` instead.

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd, html as md_html};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("content is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Recognized content file types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Text,
    Html,
    Markdown,
    GithubMarkdown,
    CommonMark,
}

impl ContentKind {
    /// Match a file extension (without the dot, case-insensitive).
    pub fn from_ext(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "txt" => Some(Self::Text),
            "html" => Some(Self::Html),
            "md" => Some(Self::Markdown),
            "gfm" => Some(Self::GithubMarkdown),
            "cm" => Some(Self::CommonMark),
            _ => None,
        }
    }
}

/// Convert raw file bytes to an HTML fragment.
pub fn convert(kind: ContentKind, bytes: Vec<u8>) -> Result<String, ContentError> {
    let source = String::from_utf8(bytes)?;
    Ok(match kind {
        ContentKind::Text => text_to_html(&source),
        ContentKind::Html => source,
        ContentKind::Markdown => markdown_to_html(&source, MarkdownFlavor::Extended),
        ContentKind::GithubMarkdown => markdown_to_html(&source, MarkdownFlavor::Github),
        ContentKind::CommonMark => markdown_to_html(&source, MarkdownFlavor::Strict),
    })
}

#[derive(Clone, Copy, PartialEq)]
enum Block {
    None,
    Paragraph,
    Pre,
}

/// Convert plain text line by line.
///
/// - A blank (whitespace-only) line closes the open block.
/// - A tab-indented line with no open block opens `<pre>`; the tab is dropped.
/// - A non-tab line inside `<pre>` closes it and opens `<p>`.
/// - Consecutive lines inside `<p>` are joined with a single space.
pub fn text_to_html(text: &str) -> String {
    let mut html = String::with_capacity(text.len() + 32);
    let mut block = Block::None;

    for line in text.lines() {
        let tabbed = line.starts_with('\t');
        if line.trim().is_empty() {
            match block {
                Block::Paragraph => html.push_str("</p>\n"),
                Block::Pre => html.push_str("</pre>\n"),
                Block::None => {}
            }
            block = Block::None;
        } else if block == Block::None && tabbed {
            block = Block::Pre;
            html.push_str("<pre>");
            html.push_str(&line[1..]);
            html.push('\n');
        } else if block == Block::None || (block == Block::Pre && !tabbed) {
            if block == Block::Pre {
                html.push_str("</pre>\n");
            }
            block = Block::Paragraph;
            html.push_str("<p>");
            html.push_str(line);
        } else if block == Block::Paragraph {
            html.push(' ');
            html.push_str(line);
        } else {
            html.push_str(&line[1..]);
            html.push('\n');
        }
    }

    match block {
        Block::Paragraph => html.push_str("</p>"),
        Block::Pre => html.push_str("</pre>"),
        Block::None => {}
    }
    html
}

#[derive(Clone, Copy, PartialEq)]
enum MarkdownFlavor {
    Extended,
    Github,
    Strict,
}

impl MarkdownFlavor {
    fn options(self) -> Options {
        match self {
            MarkdownFlavor::Strict => Options::empty(),
            MarkdownFlavor::Extended => Options::ENABLE_HEADING_ATTRIBUTES,
            MarkdownFlavor::Github => {
                Options::ENABLE_TABLES
                    | Options::ENABLE_STRIKETHROUGH
                    | Options::ENABLE_TASKLISTS
                    | Options::ENABLE_FOOTNOTES
                    | Options::ENABLE_HEADING_ATTRIBUTES
                    | Options::ENABLE_GFM
            }
        }
    }
}

fn markdown_to_html(source: &str, flavor: MarkdownFlavor) -> String {
    let mut events: Vec<Event> = Parser::new_ext(source, flavor.options())
        .filter(|event| {
            flavor != MarkdownFlavor::Strict
                || !matches!(event, Event::Html(_) | Event::InlineHtml(_))
        })
        .collect();

    if flavor != MarkdownFlavor::Strict {
        assign_heading_ids(&mut events);
    }
    if flavor == MarkdownFlavor::Github {
        for event in events.iter_mut() {
            if matches!(event, Event::SoftBreak) {
                *event = Event::HardBreak;
            }
        }
    }

    let mut html = String::with_capacity(source.len() * 3 / 2);
    md_html::push_html(&mut html, events.into_iter());
    html
}

/// Give every heading without an explicit id a slug of its text.
fn assign_heading_ids(events: &mut [Event]) {
    let mut seen: HashMap<String, usize> = HashMap::new();

    for i in 0..events.len() {
        let needs_id = matches!(&events[i], Event::Start(Tag::Heading { id: None, .. }));
        if !needs_id {
            continue;
        }

        let mut text = String::new();
        for event in &events[i + 1..] {
            match event {
                Event::End(TagEnd::Heading(_)) => break,
                Event::Text(t) | Event::Code(t) => text.push_str(t),
                _ => {}
            }
        }

        let base = slugify(&text);
        let count = seen.entry(base.clone()).or_insert(0);
        let slug = if *count == 0 {
            base
        } else {
            format!("{base}-{count}")
        };
        *count += 1;

        if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
            *id = Some(CowStr::from(slug));
        }
    }
}

/// Lowercase alphanumerics; whitespace, dashes and underscores collapse to one dash.
fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        slug.push_str("heading");
    }
    slug
}
