//! Application state for the Docent TUI.
//!
//! [`App`] owns every piece of per-session state: the active topic, the
//! sidebar, content and chat pane states, and the focus ring. Cross-cutting
//! changes arrive as [`Effect`]s and asynchronous results as [`Msg`]s.

use std::rc::Rc;
use std::sync::Arc;

use docent_api::ChatTransport;
use docent_content::{BreadcrumbTrail, ContentStore, ContentView, Resolution};
use docent_types::{Effect, Msg};
use rat_focus::{Focus, FocusBuilder, FocusFlag, HasFocus};
use ratatui::layout::Rect;
use tracing::{debug, warn};

use crate::ui::components::chat::ChatState;
use crate::ui::components::content::ContentState;
use crate::ui::components::sidebar::SidebarState;
use crate::ui::theme::Theme;

/// Shared, read-only collaborators handed to the app at startup.
pub struct SharedCtx {
    pub theme: Box<dyn Theme>,
    pub store: Arc<ContentStore>,
    pub transport: Arc<dyn ChatTransport>,
}

impl SharedCtx {
    pub fn new(theme: Box<dyn Theme>, store: Arc<ContentStore>, transport: Arc<dyn ChatTransport>) -> Self {
        Self { theme, store, transport }
    }
}

pub struct App {
    pub ctx: SharedCtx,
    /// Only [`App::navigate`] writes this.
    active_topic: Option<String>,
    pub sidebar: SidebarState,
    pub content: ContentState,
    pub chat: ChatState,
    pub sidebar_visible: bool,
    pub focus: Rc<Focus>,
    root_focus: FocusFlag,
    pub should_quit: bool,
}

impl App {
    pub fn new(ctx: SharedCtx, initial_topic: Option<String>) -> Self {
        let sidebar = SidebarState::new(Arc::clone(&ctx.store));
        let overview_id = ctx.store.overview_id.clone();
        let mut app = Self {
            ctx,
            active_topic: None,
            sidebar,
            content: ContentState::default(),
            chat: ChatState::default(),
            sidebar_visible: true,
            focus: Rc::new(Focus::default()),
            root_focus: FocusFlag::named("docent.root"),
            should_quit: false,
        };
        app.navigate(&initial_topic.unwrap_or(overview_id));
        app.focus = Rc::new(FocusBuilder::build_for(&app));
        app
    }

    pub fn active_topic(&self) -> Option<&str> {
        self.active_topic.as_deref()
    }

    /// Change the active topic. Every pane derives its view from it.
    pub fn navigate(&mut self, id: &str) {
        if !self.ctx.store.contains(id) {
            warn!(topic = id, "navigating to an unknown topic");
        }
        debug!(from = ?self.active_topic, to = id, "navigate");
        self.active_topic = Some(id.to_string());
        self.content.reset();
        self.sidebar.reveal(id);
    }

    pub fn resolution(&self) -> Resolution<'_> {
        match self.active_topic.as_deref() {
            Some(id) => self.ctx.store.resolve(id),
            None => Resolution::absent(),
        }
    }

    pub fn content_view(&self) -> ContentView {
        ContentView::from_resolution(&self.resolution())
    }

    pub fn breadcrumbs(&self) -> BreadcrumbTrail {
        self.resolution().breadcrumbs(&self.ctx.store.overview_id)
    }

    /// Nearest ancestor of the active topic, or the overview when it is
    /// top-level or absent.
    pub fn parent_topic(&self) -> String {
        self.resolution()
            .parent_id()
            .map(str::to_string)
            .unwrap_or_else(|| self.ctx.store.overview_id.clone())
    }

    /// True while the chat request animation should keep ticking.
    pub fn is_animating(&self) -> bool {
        self.chat.is_pending()
    }

    /// Applies a message to app-level state.
    pub fn update(&mut self, msg: &Msg) -> Vec<Effect> {
        match msg {
            Msg::Tick => {
                self.chat.tick();
            }
            Msg::Resize(_, _) => {}
            Msg::ChatReplied(reply) => self.chat.complete(reply.clone()),
        }
        Vec::new()
    }

    /// Applies effects that only touch app state and returns the rest for
    /// the command layer.
    pub fn apply_effects(&mut self, effects: Vec<Effect>) -> Vec<Effect> {
        let mut remaining = Vec::new();
        for effect in effects {
            match effect {
                Effect::SelectTopic(id) => self.navigate(&id),
                Effect::ToggleSidebar => {
                    self.sidebar_visible = !self.sidebar_visible;
                    if !self.sidebar_visible && self.sidebar.container_focus.get() {
                        self.focus.focus(&self.content.container_focus);
                    }
                }
                Effect::ToggleChat => self.toggle_chat(),
                Effect::Quit => self.should_quit = true,
                other => remaining.push(other),
            }
        }
        remaining
    }

    fn toggle_chat(&mut self) {
        self.chat.open = !self.chat.open;
        debug!(open = self.chat.open, "toggled chat panel");
        // The focus tree is rebuilt before the next frame; the chat leaf
        // must exist in it before it can take focus.
        let old_focus = std::mem::take(&mut self.focus);
        self.focus = Rc::new(FocusBuilder::rebuild_for(self, Some(Rc::unwrap_or_clone(old_focus))));
        if self.chat.open {
            self.focus.focus(&self.chat.f_input);
        } else if self.chat.container_focus.get() || self.focus.focused().is_none() {
            self.focus.focus(&self.content.container_focus);
        }
    }
}

impl HasFocus for App {
    fn build(&self, builder: &mut FocusBuilder) {
        if self.sidebar_visible {
            builder.widget(&self.sidebar);
        }
        builder.widget(&self.content);
        if self.chat.open {
            builder.widget(&self.chat);
        }
    }

    fn focus(&self) -> FocusFlag {
        self.root_focus.clone()
    }

    fn area(&self) -> Rect {
        Rect::default()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use async_trait::async_trait;
    use docent_api::ChatError;

    use super::*;
    use crate::ui::theme::DraculaTheme;

    pub(crate) struct EchoTransport;

    #[async_trait]
    impl ChatTransport for EchoTransport {
        async fn ask(&self, question: &str) -> Result<String, ChatError> {
            Ok(format!("echo: {question}"))
        }
    }

    /// Every request fails as if the webhook were unreachable.
    pub(crate) struct FailingTransport;

    #[async_trait]
    impl ChatTransport for FailingTransport {
        async fn ask(&self, _question: &str) -> Result<String, ChatError> {
            Err(ChatError::Transport("connection refused".into()))
        }
    }

    pub(crate) fn test_app() -> App {
        test_app_with(Arc::new(EchoTransport))
    }

    pub(crate) fn test_app_with(transport: Arc<dyn ChatTransport>) -> App {
        let store = ContentStore::from_json_str(
            r##"{"version":1,"title":"T","navigation":[
                {"id":"overview","title":"Overview","content":"Welcome"},
                {"id":"agency","title":"Agency Space","children":[
                    {"id":"users","title":"Managing Users","content":"x"}
                ]},
                {"id":"templates","title":"Templates","content":"# Use `/` templates\n\nPick one.\n\n## Setup **now**\n\nSteps.\n\n## Closed ##\n\nDone.\n"}
            ]}"##,
        )
        .expect("fixture");
        let ctx = SharedCtx::new(Box::new(DraculaTheme::new()), Arc::new(store), transport);
        App::new(ctx, None)
    }

    #[test]
    fn starts_on_the_overview() {
        let app = test_app();
        assert_eq!(app.active_topic(), Some("overview"));
        assert_eq!(app.breadcrumbs().crumbs.len(), 1);
    }

    #[test]
    fn select_topic_is_the_only_navigation_path() {
        let mut app = test_app();
        let rest = app.apply_effects(vec![Effect::SelectTopic("users".into()), Effect::SendChat("q".into())]);
        assert_eq!(rest, vec![Effect::SendChat("q".into())]);
        assert_eq!(app.active_topic(), Some("users"));
        assert_eq!(app.parent_topic(), "agency");
        assert_eq!(app.content_view().title(), Some("Managing Users"));
    }

    #[test]
    fn unknown_topic_renders_the_empty_state() {
        let mut app = test_app();
        app.navigate("nope");
        assert_eq!(app.content_view(), ContentView::Empty);
        assert_eq!(app.parent_topic(), "overview");
    }

    #[test]
    fn toggles_flip_pane_visibility() {
        let mut app = test_app();
        app.apply_effects(vec![Effect::ToggleChat, Effect::ToggleSidebar]);
        assert!(app.chat.open);
        assert!(!app.sidebar_visible);
        assert!(app.chat.f_input.get());
        app.apply_effects(vec![Effect::Quit]);
        assert!(app.should_quit);
    }

    #[test]
    fn chat_reply_message_completes_the_request() {
        let mut app = test_app();
        app.chat.input.set_input("hello");
        assert!(app.chat.begin_send().is_some());
        assert!(app.is_animating());
        app.update(&Msg::ChatReplied("hi".into()));
        assert!(!app.is_animating());
        assert_eq!(app.chat.transcript().len(), 2);
    }
}
