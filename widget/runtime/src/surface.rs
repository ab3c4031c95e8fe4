use std::cell::{Cell, RefCell};

use docwing_core::{MessageRole, Point, Size, Viewport, WidgetConfig, WidgetError, WidgetState};
use docwing_sanitize::{to_plain_text, FragmentNode};

/// Margin between an anchored launcher and the viewport edge, px.
pub const ANCHOR_MARGIN: i32 = 24;

/// What the controller needs from a rendering host.
///
/// The production implementation is Shadow-DOM-backed; `HeadlessSurface`
/// keeps everything in memory for tests and the terminal harness, which do
/// not need style isolation.
pub trait RenderSurface {
    /// Build the widget chrome. Called once per controller.
    fn mount(&self, config: &WidgetConfig, state: &WidgetState) -> Result<(), WidgetError>;

    /// Reflect the dialog's open/closed state.
    fn set_open(&self, open: bool);

    /// Move the launcher to an explicit viewport position.
    fn set_position(&self, position: Point);

    /// Append one rendered message to the transcript view.
    fn append_message(&self, role: MessageRole, nodes: &[FragmentNode]);

    /// Show or hide the transient typing placeholder. The placeholder is
    /// never part of the persisted transcript.
    fn set_loading(&self, loading: bool);

    /// Enable or disable the input affordances while a send is pending.
    fn set_input_enabled(&self, enabled: bool);

    /// Scroll the transcript to its newest entry.
    fn scroll_to_latest(&self);

    /// Current viewport dimensions of the host page.
    fn viewport(&self) -> Viewport;

    /// Bounding-box size of the launcher element.
    fn launcher_size(&self) -> Size;

    /// The launcher's current top-left corner.
    fn launcher_origin(&self) -> Point;

    /// Whether the host element is still attached to the page document.
    fn is_attached(&self) -> bool;

    /// Re-attach the host element after the page orphaned it.
    fn reattach(&self) -> Result<(), WidgetError>;
}

/// In-memory surface recording everything the controller asks for.
pub struct HeadlessSurface {
    mounted: Cell<bool>,
    open: Cell<bool>,
    position: Cell<Option<Point>>,
    loading: Cell<bool>,
    input_enabled: Cell<bool>,
    attached: Cell<bool>,
    reattach_count: Cell<usize>,
    scroll_count: Cell<usize>,
    viewport: Cell<Viewport>,
    launcher: Size,
    transcript: RefCell<Vec<(MessageRole, String)>>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self {
            mounted: Cell::new(false),
            open: Cell::new(false),
            position: Cell::new(None),
            loading: Cell::new(false),
            input_enabled: Cell::new(true),
            attached: Cell::new(true),
            reattach_count: Cell::new(0),
            scroll_count: Cell::new(0),
            viewport: Cell::new(Viewport::new(1280, 720)),
            launcher: Size::new(60, 60),
            transcript: RefCell::new(Vec::new()),
        }
    }

    /// Rendered transcript as plain text, in append order.
    pub fn transcript(&self) -> Vec<(MessageRole, String)> {
        self.transcript.borrow().clone()
    }

    pub fn last_message(&self) -> Option<(MessageRole, String)> {
        self.transcript.borrow().last().cloned()
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    pub fn input_enabled(&self) -> bool {
        self.input_enabled.get()
    }

    pub fn position(&self) -> Option<Point> {
        self.position.get()
    }

    pub fn scroll_count(&self) -> usize {
        self.scroll_count.get()
    }

    pub fn reattach_count(&self) -> usize {
        self.reattach_count.get()
    }

    /// Simulate the host page wiping the widget's subtree.
    pub fn detach(&self) {
        self.attached.set(false);
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        self.viewport.set(viewport);
    }
}

impl Default for HeadlessSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSurface for HeadlessSurface {
    fn mount(&self, _config: &WidgetConfig, _state: &WidgetState) -> Result<(), WidgetError> {
        self.mounted.set(true);
        self.attached.set(true);
        Ok(())
    }

    fn set_open(&self, open: bool) {
        self.open.set(open);
    }

    fn set_position(&self, position: Point) {
        self.position.set(Some(position));
    }

    fn append_message(&self, role: MessageRole, nodes: &[FragmentNode]) {
        self.transcript
            .borrow_mut()
            .push((role, to_plain_text(nodes)));
    }

    fn set_loading(&self, loading: bool) {
        self.loading.set(loading);
    }

    fn set_input_enabled(&self, enabled: bool) {
        self.input_enabled.set(enabled);
    }

    fn scroll_to_latest(&self) {
        self.scroll_count.set(self.scroll_count.get() + 1);
    }

    fn viewport(&self) -> Viewport {
        self.viewport.get()
    }

    fn launcher_size(&self) -> Size {
        self.launcher
    }

    fn launcher_origin(&self) -> Point {
        match self.position.get() {
            Some(position) => position,
            None => {
                // default bottom-right anchor
                let viewport = self.viewport.get();
                Point::new(
                    viewport.width - self.launcher.width - ANCHOR_MARGIN,
                    viewport.height - self.launcher.height - ANCHOR_MARGIN,
                )
            }
        }
    }

    fn is_attached(&self) -> bool {
        self.attached.get()
    }

    fn reattach(&self) -> Result<(), WidgetError> {
        self.attached.set(true);
        self.reattach_count.set(self.reattach_count.get() + 1);
        Ok(())
    }
}
