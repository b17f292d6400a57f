//! Turns parsed markdown blocks into styled terminal lines.
//!
//! Used by the content pane for markdown topics and by the chat panel for
//! assistant replies. Lines are left unwrapped; callers render them through
//! a wrapping `Paragraph` and use [`wrapped_offsets`] to locate headings.

use docent_content::{Block, Inline, ListItem};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::ui::theme::Theme;

const RULE_WIDTH: usize = 40;

/// Styled lines plus the logical line index of every heading anchor.
#[derive(Debug, Default)]
pub struct RenderedMarkdown {
    pub lines: Vec<Line<'static>>,
    pub headings: Vec<(String, usize)>,
}

pub fn render_blocks(blocks: &[Block], theme: &dyn Theme) -> RenderedMarkdown {
    let mut out = RenderedMarkdown::default();
    for (index, block) in blocks.iter().enumerate() {
        if index > 0 {
            out.lines.push(Line::default());
        }
        match block {
            Block::Heading { level, text, anchor } => {
                out.headings.push((anchor.clone(), out.lines.len()));
                let prefix = if *level > 2 { "#".repeat(*level as usize) + " " } else { String::new() };
                out.lines
                    .push(Line::from(Span::styled(format!("{prefix}{text}"), theme.heading_style(*level))));
            }
            Block::Paragraph(inlines) => {
                out.lines.push(Line::from(inline_spans(inlines, theme.text_primary_style(), theme)));
            }
            Block::List { items } => {
                for item in items {
                    out.lines.push(list_item_line(item, theme));
                    let indent = "  ".repeat(item.depth + 2);
                    let nested = render_blocks(&item.children, theme);
                    out.lines.extend(nested.lines.into_iter().map(|line| indented(line, &indent)));
                }
            }
            Block::CodeBlock { lang, code } => {
                if let Some(lang) = lang {
                    out.lines.push(Line::from(Span::styled(format!("  {lang}"), theme.text_muted_style())));
                }
                out.lines.extend(
                    code.lines()
                        .map(|line| Line::from(Span::styled(format!("  {line}"), theme.code_style()))),
                );
            }
            Block::Quote(inlines) => {
                let base = theme.text_secondary_style().add_modifier(Modifier::ITALIC);
                let mut spans = vec![Span::styled("│ ", theme.accent_primary_style())];
                spans.extend(inline_spans(inlines, base, theme));
                out.lines.push(Line::from(spans));
            }
            Block::Rule => {
                out.lines
                    .push(Line::from(Span::styled("─".repeat(RULE_WIDTH), theme.text_muted_style())));
            }
            Block::Image { alt, url } => {
                let label = if alt.is_empty() { url.clone() } else { format!("{alt} ({url})") };
                out.lines
                    .push(Line::from(Span::styled(format!("▣ image: {label}"), theme.text_muted_style())));
            }
        }
    }
    out
}

fn list_item_line(item: &ListItem, theme: &dyn Theme) -> Line<'static> {
    let indent = "  ".repeat(item.depth + 1);
    let bullet = match item.number {
        Some(number) => format!("{number}. "),
        None => "• ".to_string(),
    };
    let mut spans = vec![Span::raw(indent), Span::styled(bullet, theme.accent_primary_style())];
    spans.extend(inline_spans(&item.inlines, theme.text_primary_style(), theme));
    Line::from(spans)
}

fn indented(line: Line<'static>, indent: &str) -> Line<'static> {
    let mut spans = vec![Span::raw(indent.to_string())];
    spans.extend(line.spans);
    Line::from(spans).style(line.style)
}

/// Inline runs as spans layered over `base`.
pub fn inline_spans(inlines: &[Inline], base: Style, theme: &dyn Theme) -> Vec<Span<'static>> {
    inlines
        .iter()
        .map(|inline| match inline {
            Inline::Text(text) => Span::styled(text.clone(), base),
            Inline::Emphasis(text) => Span::styled(text.clone(), base.add_modifier(Modifier::ITALIC)),
            Inline::Strong(text) => Span::styled(text.clone(), base.add_modifier(Modifier::BOLD)),
            Inline::Code(text) => Span::styled(text.clone(), theme.code_style()),
            Inline::Link { text, .. } => Span::styled(text.clone(), theme.link_style()),
        })
        .collect()
}

/// Wrapped row of each logical line index in `targets`, at `width` columns.
pub fn wrapped_offsets(lines: &[Line<'static>], targets: &[(String, usize)], width: u16) -> Vec<(String, u16)> {
    targets
        .iter()
        .map(|(anchor, index)| {
            let end = (*index).min(lines.len());
            let rows = Paragraph::new(lines[..end].to_vec()).wrap(Wrap { trim: false }).line_count(width);
            (anchor.clone(), rows as u16)
        })
        .collect()
}
