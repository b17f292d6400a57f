//! Breadcrumbs strip above the content pane.
//!
//! Renders `Home › Ancestor › Current`. Every crumb but the last is a link;
//! clicking one selects its topic.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use docent_content::BreadcrumbTrail;
use docent_types::Effect;
use ratatui::{
    Frame,
    layout::{Position, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::ui::components::component::Component;
use crate::ui::theme::Theme;

const SEPARATOR: &str = " › ";

#[derive(Debug, Default)]
pub struct BreadcrumbsComponent {
    /// Clickable crumbs recorded during the last render.
    hits: Vec<(Rect, String)>,
}

impl Component for BreadcrumbsComponent {
    fn handle_mouse_events(&mut self, _app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return Vec::new();
        }
        let pos = Position {
            x: mouse.column,
            y: mouse.row,
        };
        self.hits
            .iter()
            .find(|(rect, _)| rect.contains(pos))
            .map(|(_, target)| vec![Effect::SelectTopic(target.clone())])
            .unwrap_or_default()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let trail = app.breadcrumbs();
        let (line, hits) = trail_line(&*app.ctx.theme, &trail, rect);
        frame.render_widget(Paragraph::new(line), rect);
        self.hits = hits;
    }
}

/// The styled trail and the screen area of each link within `rect`.
fn trail_line(theme: &dyn Theme, trail: &BreadcrumbTrail, rect: Rect) -> (Line<'static>, Vec<(Rect, String)>) {
    let mut spans = vec![Span::raw(" ")];
    let mut hits = Vec::new();
    let mut x = rect.x.saturating_add(1);
    for (index, crumb) in trail.crumbs.iter().enumerate() {
        if index > 0 {
            spans.push(Span::styled(SEPARATOR, theme.text_muted_style()));
            x = x.saturating_add(SEPARATOR.width() as u16);
        }
        let width = crumb.label.width() as u16;
        let style = match &crumb.target {
            Some(target) => {
                hits.push((Rect::new(x, rect.y, width, 1).intersection(rect), target.clone()));
                theme.link_style()
            }
            None => theme.text_primary_style().add_modifier(Modifier::BOLD),
        };
        spans.push(Span::styled(crumb.label.clone(), style));
        x = x.saturating_add(width);
    }
    (Line::from(spans), hits)
}
