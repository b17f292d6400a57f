//! Markdown bodies as renderer-agnostic blocks, heading anchors and the
//! table of contents.

use once_cell::sync::Lazy;
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use regex::Regex;

static HEADING_LINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})\s(.*)$").expect("valid heading regex"));
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// A heading as listed in the table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: u8,
    pub text: String,
}

impl Heading {
    /// Jump target for this entry. The literal text goes through the same
    /// parse as the rendered body, so inline markup and closing hashes never
    /// end up in the id.
    pub fn anchor(&self) -> String {
        let line = format!("{} {}", "#".repeat(usize::from(self.level.max(1))), self.text);
        parse_blocks(&line)
            .into_iter()
            .find_map(|block| match block {
                Block::Heading { anchor, .. } => Some(anchor),
                _ => None,
            })
            .unwrap_or_else(|| anchor_id(self.text.trim()))
    }
}

/// Anchor for a heading: lowercased, every whitespace run collapsed to `-`.
pub fn anchor_id(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, "-").to_lowercase()
}

/// Heading lines (`#` through `######` followed by whitespace) in document
/// order. Works on raw lines, so the text is kept literally.
pub fn extract_headings(markdown: &str) -> Vec<Heading> {
    markdown
        .split('\n')
        .filter_map(|line| {
            let line = line.strip_suffix('\r').unwrap_or(line);
            let captures = HEADING_LINE.captures(line)?;
            Some(Heading {
                level: captures[1].len() as u8,
                text: captures[2].to_string(),
            })
        })
        .collect()
}

/// Inline run inside a paragraph, list item or quote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Emphasis(String),
    Strong(String),
    Code(String),
    Link { text: String, url: String },
}

impl Inline {
    pub fn text(&self) -> &str {
        match self {
            Inline::Text(text) | Inline::Emphasis(text) | Inline::Strong(text) | Inline::Code(text) => text,
            Inline::Link { text, .. } => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    /// 0 for top-level items, 1 for items of a nested list, ...
    pub depth: usize,
    /// Ordinal for ordered lists.
    pub number: Option<u64>,
    /// The item's first paragraph.
    pub inlines: Vec<Inline>,
    /// Blocks nested under the item (code, quotes, later paragraphs, ...).
    /// Nested lists are not kept here; their items follow in the flat list
    /// with a greater `depth`.
    pub children: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, text: String, anchor: String },
    Paragraph(Vec<Inline>),
    List { items: Vec<ListItem> },
    CodeBlock { lang: Option<String>, code: String },
    Quote(Vec<Inline>),
    Rule,
    Image { alt: String, url: String },
}

/// Plain text of a run of inlines.
pub fn inline_text(inlines: &[Inline]) -> String {
    inlines.iter().map(Inline::text).collect()
}

/// Parses `markdown` into blocks.
///
/// Raw HTML is skipped. When that leaves nothing for non-blank input, the
/// trimmed source comes back as a single plain paragraph.
pub fn parse_blocks(markdown: &str) -> Vec<Block> {
    let mut builder = BlockBuilder::default();
    for event in Parser::new_ext(markdown, Options::ENABLE_STRIKETHROUGH) {
        builder.handle(event);
    }
    let blocks = builder.finish();
    let raw = markdown.trim();
    if blocks.is_empty() && !raw.is_empty() {
        return vec![Block::Paragraph(vec![Inline::Text(raw.to_string())])];
    }
    blocks
}

/// First paragraph's plain text, if any.
pub fn first_paragraph(markdown: &str) -> Option<String> {
    parse_blocks(markdown).into_iter().find_map(|block| match block {
        Block::Paragraph(inlines) => Some(inline_text(&inlines)),
        _ => None,
    })
}

struct ListFrame {
    next_number: Option<u64>,
    /// Quote nesting where the list started.
    quote_depth: usize,
    /// Index into `BlockBuilder::list_items` of the open item.
    item: Option<usize>,
}

#[derive(Default)]
struct BlockBuilder {
    blocks: Vec<Block>,
    inlines: Vec<Inline>,
    emphasis: usize,
    strong: usize,
    link: Option<(String, String)>,
    image: Option<(String, String)>,
    heading: Option<(u8, String)>,
    code: Option<(Option<String>, String)>,
    quote_depth: usize,
    lists: Vec<ListFrame>,
    list_items: Vec<ListItem>,
}

impl BlockBuilder {
    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.code_span(&code),
            Event::SoftBreak | Event::HardBreak => self.text(" "),
            Event::Rule => {
                self.flush_inlines();
                self.push_block(Block::Rule);
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush_inlines();
                self.heading = Some((heading_level(level), String::new()));
            }
            Tag::CodeBlock(kind) => {
                self.flush_inlines();
                let lang = match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                    _ => None,
                };
                self.code = Some((lang, String::new()));
            }
            Tag::BlockQuote(_) => {
                self.flush_inlines();
                self.quote_depth += 1;
            }
            Tag::List(start) => {
                self.flush_inlines();
                self.lists.push(ListFrame {
                    next_number: start,
                    quote_depth: self.quote_depth,
                    item: None,
                });
            }
            Tag::Item => {
                self.flush_inlines();
                let depth = self.lists.len().saturating_sub(1);
                let index = self.list_items.len();
                let Some(frame) = self.lists.last_mut() else {
                    return;
                };
                let number = frame.next_number;
                frame.next_number = number.map(|n| n + 1);
                frame.item = Some(index);
                self.list_items.push(ListItem {
                    depth,
                    number,
                    inlines: Vec::new(),
                    children: Vec::new(),
                });
            }
            Tag::Emphasis => self.emphasis += 1,
            Tag::Strong => self.strong += 1,
            Tag::Link { dest_url, .. } => self.link = Some((dest_url.to_string(), String::new())),
            Tag::Image { dest_url, .. } => self.image = Some((dest_url.to_string(), String::new())),
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Heading(_) => {
                if let Some((level, text)) = self.heading.take() {
                    let text = text.trim().to_string();
                    let anchor = anchor_id(&text);
                    self.push_block(Block::Heading { level, text, anchor });
                }
            }
            TagEnd::Paragraph => self.flush_inlines(),
            TagEnd::CodeBlock => {
                if let Some((lang, code)) = self.code.take() {
                    self.push_block(Block::CodeBlock {
                        lang,
                        code: code.trim_end_matches('\n').to_string(),
                    });
                }
            }
            TagEnd::BlockQuote(_) => {
                self.quote_depth = self.quote_depth.saturating_sub(1);
                let inlines = std::mem::take(&mut self.inlines);
                if !inlines.is_empty() {
                    self.push_block(Block::Quote(inlines));
                }
            }
            TagEnd::Item => {
                self.flush_inlines();
                if let Some(frame) = self.lists.last_mut() {
                    frame.item = None;
                }
            }
            TagEnd::List(_) => {
                self.flush_inlines();
                self.lists.pop();
                if self.lists.is_empty() && !self.list_items.is_empty() {
                    let items = std::mem::take(&mut self.list_items);
                    self.push_block(Block::List { items });
                }
            }
            TagEnd::Emphasis => self.emphasis = self.emphasis.saturating_sub(1),
            TagEnd::Strong => self.strong = self.strong.saturating_sub(1),
            TagEnd::Link => {
                if let Some((url, text)) = self.link.take() {
                    self.inlines.push(Inline::Link { text, url });
                }
            }
            TagEnd::Image => {
                if let Some((url, alt)) = self.image.take() {
                    self.flush_inlines();
                    self.push_block(Block::Image { alt, url });
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if let Some((_, code)) = self.code.as_mut() {
            code.push_str(text);
        } else if let Some((_, heading)) = self.heading.as_mut() {
            heading.push_str(text);
        } else if let Some((_, alt)) = self.image.as_mut() {
            alt.push_str(text);
        } else if let Some((_, link_text)) = self.link.as_mut() {
            link_text.push_str(text);
        } else if self.strong > 0 {
            self.inlines.push(Inline::Strong(text.to_string()));
        } else if self.emphasis > 0 {
            self.inlines.push(Inline::Emphasis(text.to_string()));
        } else {
            self.inlines.push(Inline::Text(text.to_string()));
        }
    }

    fn code_span(&mut self, code: &str) {
        if let Some((_, heading)) = self.heading.as_mut() {
            heading.push_str(code);
        } else if let Some((_, link_text)) = self.link.as_mut() {
            link_text.push_str(code);
        } else {
            self.inlines.push(Inline::Code(code.to_string()));
        }
    }

    fn open_item(&mut self) -> Option<&mut ListItem> {
        let index = self.lists.last()?.item?;
        self.list_items.get_mut(index)
    }

    /// Completed blocks go under the open list item, or to the top level.
    fn push_block(&mut self, block: Block) {
        match self.open_item() {
            Some(item) => item.children.push(block),
            None => self.blocks.push(block),
        }
    }

    /// Moves pending inline text into the open item (its first paragraph,
    /// then child paragraphs) or a top-level paragraph. Text of a quote
    /// opened inside the innermost list keeps accumulating until the quote
    /// closes.
    fn flush_inlines(&mut self) {
        let list_quote_depth = self.lists.last().map_or(0, |frame| frame.quote_depth);
        if self.quote_depth > list_quote_depth || self.inlines.is_empty() {
            return;
        }
        let inlines = std::mem::take(&mut self.inlines);
        match self.open_item() {
            Some(item) if item.inlines.is_empty() && item.children.is_empty() => item.inlines = inlines,
            Some(item) => item.children.push(Block::Paragraph(inlines)),
            None => self.blocks.push(Block::Paragraph(inlines)),
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush_inlines();
        self.blocks
    }
}

fn heading_level(level: HeadingLevel) -> u8 {
    level as u8
}
