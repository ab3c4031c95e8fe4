use std::rc::Rc;

use tracing::{debug, error, info, warn};

use docwing_core::{
    ChatMessage, EnvironmentLabel, Point, SessionId, WidgetConfig, WidgetError, WidgetState,
};
use docwing_gesture::{DragUpdate, GestureArbiter, GestureOutcome};
use docwing_sanitize::linkify;
use docwing_store::StateStore;
use docwing_transport::{ChatAnswer, ChatBackend};

use crate::dialog::DialogState;
use crate::surface::RenderSurface;

/// Everything a platform layer needs to carry a send across its own
/// spawn boundary: `begin_submit` hands this out, the transport call runs
/// detached, and `settle_submit` folds the result back in.
pub struct PendingSend {
    pub query: String,
    pub session: SessionId,
    pub config: WidgetConfig,
}

/// The one widget instance on a page.
///
/// Owns the persisted state, the dialog state machine, and the gesture
/// arbiter; renders through a `RenderSurface` and talks to the chat
/// service through a `ChatBackend`.
pub struct WidgetController {
    config: WidgetConfig,
    state: WidgetState,
    dialog: DialogState,
    in_flight: bool,
    session: SessionId,
    environment: EnvironmentLabel,
    store: StateStore,
    surface: Rc<dyn RenderSurface>,
    backend: Rc<dyn ChatBackend>,
    arbiter: GestureArbiter,
}

impl WidgetController {
    /// Build the controller, restoring any persisted state onto the
    /// surface.
    pub fn init(
        config: WidgetConfig,
        store: StateStore,
        surface: Rc<dyn RenderSurface>,
        backend: Rc<dyn ChatBackend>,
        environment: EnvironmentLabel,
    ) -> Result<Self, WidgetError> {
        let state = store.load().unwrap_or_default();
        let session = store.session_id();

        surface.mount(&config, &state)?;
        for message in &state.messages {
            surface.append_message(message.role, &linkify(&message.text));
        }
        surface.set_open(state.is_open);
        if let Some(position) = state.position {
            surface.set_position(position);
        }

        let dialog = if state.is_open {
            DialogState::Open { sending: false }
        } else {
            DialogState::Closed
        };
        let arbiter = GestureArbiter::new(surface.launcher_size());

        info!(
            environment = environment.as_str(),
            restored_messages = state.messages.len(),
            "widget initialized"
        );

        let mut controller = Self {
            config,
            state,
            dialog,
            in_flight: false,
            session,
            environment,
            store,
            surface,
            backend,
            arbiter,
        };

        if controller.state.messages.is_empty() {
            if let Some(greeting) = controller.config.initial_message.clone() {
                controller.append_and_render(ChatMessage::bot(greeting));
            }
        }

        Ok(controller)
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub fn state(&self) -> &WidgetState {
        &self.state
    }

    pub fn dialog(&self) -> DialogState {
        self.dialog
    }

    pub fn environment(&self) -> EnvironmentLabel {
        self.environment
    }

    /// Apply a later `init` call: merge the new config over the current
    /// one and persist. Never creates a second host.
    pub fn merge_config(&mut self, other: WidgetConfig) {
        self.config.merge(other);
        self.persist();
    }

    /// Flip the dialog open/closed.
    pub fn toggle(&mut self) {
        self.dialog = self.dialog.toggled(self.in_flight);
        self.state.is_open = self.dialog.is_open();
        self.surface.set_open(self.state.is_open);
        self.persist();
    }

    /// Explicit close affordance.
    pub fn close(&mut self) {
        self.dialog = self.dialog.closed();
        self.state.is_open = false;
        self.surface.set_open(false);
        self.persist();
    }

    /// Start a submission if the dialog allows one.
    ///
    /// Returns `None` when the text is blank, the dialog is closed, or a
    /// send is already pending; excess input is dropped, never queued.
    pub fn begin_submit(&mut self, text: &str) -> Option<PendingSend> {
        let query = text.trim();
        if query.is_empty() {
            return None;
        }
        if !self.dialog.can_submit() || self.in_flight {
            debug!("submission dropped; dialog closed or send already pending");
            return None;
        }

        self.append_and_render(ChatMessage::user(query));
        self.in_flight = true;
        self.dialog = self.dialog.with_sending(true);
        self.surface.set_input_enabled(false);
        self.surface.set_loading(true);

        Some(PendingSend {
            query: query.to_string(),
            session: self.session.clone(),
            config: self.config.clone(),
        })
    }

    /// Fold a settled transport call back into the widget.
    ///
    /// Also runs when the dialog was closed mid-flight; the answer still
    /// lands in the transcript.
    pub fn settle_submit(&mut self, result: Result<ChatAnswer, WidgetError>) {
        self.surface.set_loading(false);
        self.surface.set_input_enabled(true);
        self.in_flight = false;
        self.dialog = self.dialog.with_sending(false);

        let message = match result {
            Ok(answer) => ChatMessage::bot(answer.answer),
            Err(err) => {
                if err.is_user_visible() {
                    warn!(error = %err, "chat request failed");
                } else {
                    error!(error = %err, "chat request failed internally");
                }
                ChatMessage::bot(err.user_copy())
            }
        };
        self.append_and_render(message);
    }

    /// Submit inline: begin, await the transport, settle.
    pub async fn submit(&mut self, text: &str) {
        let Some(pending) = self.begin_submit(text) else {
            return;
        };
        let backend = Rc::clone(&self.backend);
        let result = backend
            .ask(&pending.query, &pending.session, &pending.config)
            .await;
        self.settle_submit(result);
    }

    /// Pointer-down on the launcher.
    pub fn pointer_down(&mut self, at: Point) {
        let origin = self.surface.launcher_origin();
        self.arbiter.pointer_down(at, origin);
    }

    /// Pointer-move; returns true when the event's default action must be
    /// suppressed because the launcher is being dragged.
    pub fn pointer_move(&mut self, at: Point) -> bool {
        match self.arbiter.pointer_move(at, self.surface.viewport()) {
            DragUpdate::Moved(position) => {
                self.surface.set_position(position);
                true
            }
            DragUpdate::Ignored => false,
        }
    }

    /// Pointer-up; persists the final position when the gesture was a drag.
    pub fn pointer_up(&mut self, at: Point, timestamp_ms: i64) {
        match self.arbiter.pointer_up(at, timestamp_ms, self.surface.viewport()) {
            GestureOutcome::DragEnd(position) => {
                self.state.position = Some(position);
                self.surface.set_position(position);
                self.persist();
            }
            GestureOutcome::Tap | GestureOutcome::Ignored => {}
        }
    }

    /// Native click on the launcher; toggles unless it is the synthetic
    /// click trailing a drag.
    pub fn click(&mut self, timestamp_ms: i64) {
        if self.arbiter.accept_click(timestamp_ms) {
            self.toggle();
        }
    }

    /// On SPA hosts, re-attach the host element if a client-side render
    /// removed it. No-op on MPA hosts.
    pub fn ensure_attached(&mut self) {
        if self.environment != EnvironmentLabel::Spa {
            return;
        }
        if self.surface.is_attached() {
            return;
        }
        info!("widget host orphaned by client-side render; re-attaching");
        if let Err(err) = self.surface.reattach() {
            error!(error = %err, "failed to re-attach widget host");
        }
    }

    fn append_and_render(&mut self, message: ChatMessage) {
        self.surface
            .append_message(message.role, &linkify(&message.text));
        self.state.push_message(message);
        self.persist();
        self.surface.scroll_to_latest();
    }

    fn persist(&self) {
        self.store.save(&self.state);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::sync::Arc;

    use async_trait::async_trait;

    use docwing_core::{MessageRole, Size, Viewport};
    use docwing_store::MemoryTabStorage;

    use super::*;
    use crate::surface::HeadlessSurface;

    /// Backend returning pre-scripted results, counting every request.
    struct ScriptedBackend {
        calls: Cell<usize>,
        results: RefCell<VecDeque<Result<ChatAnswer, WidgetError>>>,
    }

    impl ScriptedBackend {
        fn new() -> Self {
            Self {
                calls: Cell::new(0),
                results: RefCell::new(VecDeque::new()),
            }
        }

        fn answering(text: &str) -> Self {
            let backend = Self::new();
            backend.push(Ok(ChatAnswer {
                answer: text.to_string(),
                sources: Vec::new(),
            }));
            backend
        }

        fn push(&self, result: Result<ChatAnswer, WidgetError>) {
            self.results.borrow_mut().push_back(result);
        }

        fn calls(&self) -> usize {
            self.calls.get()
        }
    }

    #[async_trait(?Send)]
    impl ChatBackend for ScriptedBackend {
        async fn ask(
            &self,
            _query: &str,
            _session: &SessionId,
            config: &WidgetConfig,
        ) -> Result<ChatAnswer, WidgetError> {
            config.validate()?;
            self.calls.set(self.calls.get() + 1);
            self.results
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(WidgetError::Connection("no scripted result".into())))
        }
    }

    struct Fixture {
        controller: WidgetController,
        surface: Rc<HeadlessSurface>,
        backend: Rc<ScriptedBackend>,
        store: StateStore,
    }

    fn fixture_with(
        config: WidgetConfig,
        store: StateStore,
        backend: ScriptedBackend,
        environment: EnvironmentLabel,
    ) -> Fixture {
        let surface = Rc::new(HeadlessSurface::new());
        let backend = Rc::new(backend);
        let controller = WidgetController::init(
            config,
            store.clone(),
            surface.clone(),
            backend.clone(),
            environment,
        )
        .unwrap();
        Fixture {
            controller,
            surface,
            backend,
            store,
        }
    }

    fn fixture(backend: ScriptedBackend) -> Fixture {
        fixture_with(
            WidgetConfig::new("acme", "dw-1"),
            StateStore::new(Arc::new(MemoryTabStorage::new())),
            backend,
            EnvironmentLabel::Mpa,
        )
    }

    #[test]
    fn test_init_restores_persisted_state_onto_surface() {
        let store = StateStore::new(Arc::new(MemoryTabStorage::new()));
        let mut prior = WidgetState {
            is_open: true,
            position: Some(Point::new(10, 20)),
            messages: Vec::new(),
        };
        prior.push_message(ChatMessage::user("hello"));
        prior.push_message(ChatMessage::bot("hi there"));
        store.save(&prior);

        let f = fixture_with(
            WidgetConfig::new("acme", "dw-1"),
            store,
            ScriptedBackend::new(),
            EnvironmentLabel::Mpa,
        );

        assert!(f.surface.is_open());
        assert_eq!(f.surface.position(), Some(Point::new(10, 20)));
        assert_eq!(f.surface.transcript().len(), 2);
        assert_eq!(f.controller.dialog(), DialogState::Open { sending: false });
    }

    #[test]
    fn test_initial_message_greets_fresh_conversations_only() {
        let store = StateStore::new(Arc::new(MemoryTabStorage::new()));
        let mut config = WidgetConfig::new("acme", "dw-1");
        config.initial_message = Some("Hi! Ask me about our docs.".into());

        let f = fixture_with(
            config.clone(),
            store.clone(),
            ScriptedBackend::new(),
            EnvironmentLabel::Mpa,
        );
        assert_eq!(
            f.surface.last_message(),
            Some((MessageRole::Bot, "Hi! Ask me about our docs.".into()))
        );

        // a second init against the same tab does not greet again
        let again = fixture_with(config, store, ScriptedBackend::new(), EnvironmentLabel::Mpa);
        assert_eq!(again.surface.transcript().len(), 1);
    }

    #[test]
    fn test_toggle_and_close_persist() {
        let mut f = fixture(ScriptedBackend::new());
        f.controller.toggle();
        assert!(f.surface.is_open());
        assert!(f.store.load().unwrap().is_open);

        f.controller.close();
        assert!(!f.surface.is_open());
        assert!(!f.store.load().unwrap().is_open);
    }

    #[tokio::test]
    async fn test_submit_round_trip() {
        let mut f = fixture(ScriptedBackend::answering("See https://example.com/docs"));
        f.controller.toggle();
        f.controller.submit("where are the docs?").await;

        let transcript = f.surface.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(
            transcript[0],
            (MessageRole::User, "where are the docs?".into())
        );
        assert_eq!(
            transcript[1],
            (MessageRole::Bot, "See https://example.com/docs".into())
        );
        assert_eq!(f.backend.calls(), 1);
        assert!(!f.surface.is_loading());
        assert!(f.surface.input_enabled());
        // both appends persisted
        assert_eq!(f.store.load().unwrap().messages.len(), 2);
        assert!(f.surface.scroll_count() >= 2);
    }

    #[test]
    fn test_begin_submit_disables_input_and_shows_placeholder() {
        let mut f = fixture(ScriptedBackend::new());
        f.controller.toggle();
        let pending = f.controller.begin_submit("  question  ").unwrap();

        assert_eq!(pending.query, "question");
        assert!(f.surface.is_loading());
        assert!(!f.surface.input_enabled());
        assert_eq!(f.controller.dialog(), DialogState::Open { sending: true });
        // placeholder is not part of the persisted transcript
        assert_eq!(f.store.load().unwrap().messages.len(), 1);
    }

    #[test]
    fn test_second_submit_is_dropped_while_pending() {
        let mut f = fixture(ScriptedBackend::new());
        f.controller.toggle();

        assert!(f.controller.begin_submit("first").is_some());
        assert!(f.controller.begin_submit("second").is_none());

        f.controller.settle_submit(Ok(ChatAnswer {
            answer: "done".into(),
            sources: Vec::new(),
        }));
        assert!(f.controller.begin_submit("third").is_some());
    }

    #[test]
    fn test_submit_rejected_when_closed_or_blank() {
        let mut f = fixture(ScriptedBackend::new());
        assert!(f.controller.begin_submit("hello").is_none());

        f.controller.toggle();
        assert!(f.controller.begin_submit("   ").is_none());
        assert!(f.surface.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_missing_api_key_yields_config_copy_and_no_request() {
        let f = fixture_with(
            WidgetConfig::new("acme", ""),
            StateStore::new(Arc::new(MemoryTabStorage::new())),
            ScriptedBackend::answering("never used"),
            EnvironmentLabel::Mpa,
        );
        let mut controller = f.controller;
        controller.toggle();
        controller.submit("hello?").await;

        assert_eq!(f.backend.calls(), 0);
        let (role, text) = f.surface.last_message().unwrap();
        assert_eq!(role, MessageRole::Bot);
        assert_eq!(
            text,
            WidgetError::Configuration("missing".into()).user_copy()
        );
    }

    #[tokio::test]
    async fn test_transport_errors_render_bucketed_copy() {
        let backend = ScriptedBackend::new();
        backend.push(Err(WidgetError::Transport {
            status: 429,
            body: "slow down".into(),
        }));
        let mut f = fixture(backend);
        f.controller.toggle();
        f.controller.submit("hello").await;

        let (_, text) = f.surface.last_message().unwrap();
        assert!(text.contains("too many requests"));
        assert!(!f.surface.is_loading());
    }

    #[test]
    fn test_close_during_flight_still_lands_answer() {
        let mut f = fixture(ScriptedBackend::new());
        f.controller.toggle();
        f.controller.begin_submit("are you there?").unwrap();
        f.controller.close();

        f.controller.settle_submit(Ok(ChatAnswer {
            answer: "still here".into(),
            sources: Vec::new(),
        }));

        assert_eq!(f.controller.dialog(), DialogState::Closed);
        let transcript = f.surface.transcript();
        assert_eq!(transcript.last().unwrap().1, "still here");
        assert_eq!(f.store.load().unwrap().messages.len(), 2);
    }

    #[test]
    fn test_drag_updates_position_without_toggling() {
        let mut f = fixture(ScriptedBackend::new());
        let origin = f.surface.launcher_origin();

        f.controller.pointer_down(Point::new(origin.x + 5, origin.y + 5));
        assert!(f.controller.pointer_move(Point::new(origin.x - 35, origin.y + 5)));
        f.controller.pointer_up(Point::new(origin.x - 35, origin.y + 5), 1_000);
        // trailing synthetic click is swallowed
        f.controller.click(1_050);

        assert!(!f.surface.is_open());
        let stored = f.store.load().unwrap().position.unwrap();
        assert_eq!(stored, Point::new(origin.x - 40, origin.y));
    }

    #[test]
    fn test_tap_toggles_without_moving() {
        let mut f = fixture(ScriptedBackend::new());
        let origin = f.surface.launcher_origin();

        f.controller.pointer_down(Point::new(origin.x + 5, origin.y + 5));
        f.controller.pointer_up(Point::new(origin.x + 7, origin.y + 5), 2_000);
        f.controller.click(2_010);

        assert!(f.surface.is_open());
        assert_eq!(f.store.load().unwrap().position, None);
    }

    #[test]
    fn test_drag_release_offscreen_clamps() {
        let mut f = fixture(ScriptedBackend::new());
        f.surface.set_viewport(Viewport::new(800, 600));
        let origin = f.surface.launcher_origin();

        f.controller.pointer_down(Point::new(origin.x, origin.y));
        f.controller.pointer_move(Point::new(origin.x + 500, origin.y + 500));
        f.controller.pointer_up(Point::new(origin.x + 2_000, origin.y + 2_000), 3_000);

        let launcher = Size::new(60, 60);
        let stored = f.store.load().unwrap().position.unwrap();
        assert_eq!(
            stored,
            Point::new(800 - launcher.width, 600 - launcher.height)
        );
    }

    #[test]
    fn test_spa_host_reattaches_orphaned_widget() {
        let mut f = fixture_with(
            WidgetConfig::new("acme", "dw-1"),
            StateStore::new(Arc::new(MemoryTabStorage::new())),
            ScriptedBackend::new(),
            EnvironmentLabel::Spa,
        );
        f.surface.detach();
        f.controller.ensure_attached();
        assert!(f.surface.is_attached());
        assert_eq!(f.surface.reattach_count(), 1);
    }

    #[test]
    fn test_mpa_host_never_reattaches() {
        let mut f = fixture(ScriptedBackend::new());
        f.surface.detach();
        f.controller.ensure_attached();
        assert_eq!(f.surface.reattach_count(), 0);
    }
}
