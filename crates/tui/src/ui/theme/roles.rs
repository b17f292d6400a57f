use std::fmt::Debug;

use ratatui::style::{Color, Modifier, Style};

/// Semantic color roles used throughout the UI.
#[derive(Debug, Clone)]
pub struct ThemeRoles {
    pub background: Color,
    pub surface: Color,
    pub border: Color,

    pub text: Color,
    pub text_secondary: Color,
    pub text_muted: Color,

    pub accent_primary: Color,
    /// Failed requests, such as the chat apology.
    pub error: Color,

    pub selection_bg: Color,
    pub selection_fg: Color,
    pub focus: Color,

    /// Document headings inside the content pane.
    pub heading: Color,
    /// Hyperlinks and clickable breadcrumbs.
    pub link: Color,
    /// Inline code and fenced code blocks.
    pub code: Color,

    pub scrollbar_thumb: Color,
}

/// Theme trait exposes semantic roles and common style builders.
pub trait Theme: Send + Sync + Debug {
    fn roles(&self) -> &ThemeRoles;

    fn text_primary_style(&self) -> Style {
        Style::default().fg(self.roles().text)
    }
    fn text_secondary_style(&self) -> Style {
        Style::default().fg(self.roles().text_secondary)
    }
    fn text_muted_style(&self) -> Style {
        Style::default().fg(self.roles().text_muted)
    }

    fn border_style(&self, focused: bool) -> Style {
        let color = if focused { self.roles().focus } else { self.roles().border };
        Style::default().fg(color)
    }

    fn selection_style(&self) -> Style {
        Style::default().fg(self.roles().selection_fg).bg(self.roles().selection_bg)
    }

    fn accent_primary_style(&self) -> Style {
        Style::default().fg(self.roles().accent_primary)
    }
    fn accent_emphasis_style(&self) -> Style {
        Style::default().fg(self.roles().accent_primary).add_modifier(Modifier::BOLD)
    }

    /// Heading style; level 1 is underlined as well as bold.
    fn heading_style(&self, level: u8) -> Style {
        let style = Style::default().fg(self.roles().heading).add_modifier(Modifier::BOLD);
        if level <= 1 { style.add_modifier(Modifier::UNDERLINED) } else { style }
    }
    fn link_style(&self) -> Style {
        Style::default().fg(self.roles().link).add_modifier(Modifier::UNDERLINED)
    }
    fn code_style(&self) -> Style {
        Style::default().fg(self.roles().code)
    }

    fn error_style(&self) -> Style {
        Style::default().fg(self.roles().error)
    }
}
