use std::ops::Range;

use docent_content::Icon;
use ratatui::{
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders},
};

use super::roles::{Theme, ThemeRoles};

/// Build a standard Block with theme surfaces and borders.
pub fn block<'a, T: Theme + ?Sized>(theme: &'a T, title: Option<&'a str>, focused: bool) -> Block<'a> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(theme.border_style(focused))
        .style(panel_style(theme));
    if let Some(t) = title {
        block = block.title(Span::styled(t, theme.text_secondary_style().add_modifier(Modifier::BOLD)));
    }
    block
}

/// Style for panel-like containers (set background on widget using `.style`).
pub fn panel_style<T: Theme + ?Sized>(theme: &T) -> Style {
    let ThemeRoles { surface, text, .. } = *theme.roles();
    Style::default().bg(surface).fg(text)
}

/// Key/description pairs for the hint bar: key in the accent color,
/// description muted.
pub fn build_hint_spans<T: Theme + ?Sized>(theme: &T, hints: &[(&str, &str)]) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, description) in hints {
        spans.push(Span::styled(key.to_string(), theme.accent_emphasis_style()));
        spans.push(Span::styled(description.to_string(), theme.text_muted_style()));
    }
    spans
}

/// Splits `text` into spans, styling the byte `ranges` with `highlight`.
pub fn highlight_spans(text: &str, ranges: &[Range<usize>], base: Style, highlight: Style) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(ranges.len() * 2 + 1);
    let mut cursor = 0;
    for range in ranges {
        if range.start > cursor {
            spans.push(Span::styled(text[cursor..range.start].to_string(), base));
        }
        spans.push(Span::styled(text[range.clone()].to_string(), highlight));
        cursor = range.end;
    }
    if cursor < text.len() {
        spans.push(Span::styled(text[cursor..].to_string(), base));
    }
    spans
}

/// Single-column glyph shown before a sidebar title.
pub fn icon_glyph(icon: Icon) -> &'static str {
    match icon {
        Icon::Book => "§",
        Icon::Building => "⌂",
        Icon::Users => "☺",
        Icon::Help => "?",
        Icon::Settings => "✱",
        Icon::Calendar => "◷",
        Icon::Message => "✉",
        Icon::Chart => "▤",
        Icon::File => "▢",
        Icon::Zap => "↯",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::DraculaTheme;

    #[test]
    fn highlight_splits_around_matches() {
        let base = Style::default();
        let hi = Style::default().add_modifier(Modifier::BOLD);
        let spans = highlight_spans("Team Chat", &[5..9], base, hi);
        let parts: Vec<_> = spans.iter().map(|s| (s.content.as_ref(), s.style == hi)).collect();
        assert_eq!(parts, vec![("Team ", false), ("Chat", true)]);
    }

    #[test]
    fn hint_spans_alternate_key_and_description() {
        let theme = DraculaTheme::new();
        let spans = build_hint_spans(&theme, &[("Tab", " Focus "), ("q", " Quit ")]);
        assert_eq!(spans.len(), 4);
        assert_eq!(spans[0].content, "Tab");
        assert_eq!(spans[3].content, " Quit ");
    }

    #[test]
    fn every_icon_has_a_single_column_glyph() {
        for icon in Icon::ALL {
            assert_eq!(unicode_width::UnicodeWidthStr::width(icon_glyph(icon)), 1, "{icon}");
        }
    }
}
