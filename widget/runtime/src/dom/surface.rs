use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_sys::{Document, HtmlButtonElement, HtmlElement, HtmlInputElement, ShadowRootInit, ShadowRootMode};

use docwing_core::{
    Anchor, MessageRole, Point, Size, Viewport, WidgetConfig, WidgetError, WidgetState,
};
use docwing_sanitize::FragmentNode;

use crate::surface::{RenderSurface, ANCHOR_MARGIN};

/// Stylesheet injected into the shadow root. The host page's CSS cannot
/// reach past the shadow boundary, and nothing here leaks out.
const WIDGET_CSS: &str = r#"
:host { all: initial; }
* { box-sizing: border-box; font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; }
.dw-root { position: relative; }
.dw-launcher {
  width: 60px; height: 60px; border-radius: 50%;
  border: none; cursor: pointer; font-size: 26px;
  background: #2f6fed; color: #fff;
  box-shadow: 0 4px 14px rgba(0, 0, 0, 0.25);
  touch-action: none;
}
.dw-launcher:active { transform: scale(0.96); }
.dw-panel {
  display: none; flex-direction: column;
  position: absolute; bottom: 72px; right: 0;
  width: 340px; height: 460px;
  background: #fff; color: #1b1f24;
  border-radius: 12px; overflow: hidden;
  box-shadow: 0 8px 28px rgba(0, 0, 0, 0.3);
}
.dw-panel.dw-open { display: flex; }
.dw-header {
  display: flex; align-items: center; justify-content: space-between;
  padding: 12px 16px; background: #2f6fed; color: #fff; font-size: 15px;
}
.dw-close { border: none; background: none; color: inherit; font-size: 18px; cursor: pointer; }
.dw-transcript { flex: 1; overflow-y: auto; padding: 12px; }
.dw-msg { max-width: 85%; margin: 6px 0; padding: 8px 12px; border-radius: 10px; font-size: 14px; line-height: 1.4; white-space: pre-wrap; word-break: break-word; }
.dw-msg-user { margin-left: auto; background: #2f6fed; color: #fff; }
.dw-msg-bot { margin-right: auto; background: #eef1f5; color: #1b1f24; }
.dw-msg a { color: inherit; text-decoration: underline; }
.dw-loading { display: none; margin: 6px 0; padding: 8px 12px; font-size: 13px; color: #6b7480; }
.dw-loading.dw-visible { display: block; }
.dw-input-row { display: flex; gap: 8px; padding: 12px; border-top: 1px solid #e2e6eb; }
.dw-input-row input {
  flex: 1; padding: 8px 10px; font-size: 14px;
  border: 1px solid #c7ced6; border-radius: 8px; outline: none;
}
.dw-input-row input:disabled { background: #f2f4f7; }
.dw-send {
  border: none; border-radius: 8px; padding: 8px 14px;
  background: #2f6fed; color: #fff; font-size: 14px; cursor: pointer;
}
.dw-send:disabled { opacity: 0.5; cursor: default; }
.dw-theme-dark .dw-panel { background: #20252c; color: #e7ebf0; }
.dw-theme-dark .dw-msg-bot { background: #2c333c; color: #e7ebf0; }
.dw-theme-dark .dw-input-row { border-top-color: #39414c; }
.dw-theme-dark .dw-input-row input { background: #2c333c; border-color: #39414c; color: #e7ebf0; }
"#;

/// Shadow-DOM-backed render surface.
///
/// Owns the single host element anchored to the page body; everything the
/// user sees lives inside its shadow root.
pub struct DomSurface {
    document: Document,
    host: HtmlElement,
    root: HtmlElement,
    launcher: HtmlButtonElement,
    panel: HtmlElement,
    transcript: HtmlElement,
    loading: HtmlElement,
    input: HtmlInputElement,
    send: HtmlButtonElement,
    close: HtmlButtonElement,
}

impl DomSurface {
    /// Create the (unmounted) surface and its shadow tree.
    pub fn create() -> Result<Self, WidgetError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| WidgetError::Initialization("document is unavailable".into()))?;

        let host = make_element(&document, "div")?;
        host.set_id("docwing-widget-host");
        let shadow = host
            .attach_shadow(&ShadowRootInit::new(ShadowRootMode::Open))
            .map_err(init_err("attach_shadow rejected"))?;

        let style = make_element(&document, "style")?;
        style.set_text_content(Some(WIDGET_CSS));
        shadow
            .append_child(&style)
            .map_err(init_err("failed to append stylesheet"))?;

        let root = make_element(&document, "div")?;
        root.set_class_name("dw-root");

        let launcher: HtmlButtonElement = make_element(&document, "button")?
            .dyn_into()
            .map_err(|_| WidgetError::Initialization("launcher is not a button".into()))?;
        launcher.set_class_name("dw-launcher");
        launcher
            .set_attribute("aria-label", "Open chat")
            .map_err(init_err("failed to label launcher"))?;
        launcher.set_text_content(Some("💬"));

        let panel = make_element(&document, "div")?;
        panel.set_class_name("dw-panel");

        let header = make_element(&document, "div")?;
        header.set_class_name("dw-header");
        let title = make_element(&document, "span")?;
        title.set_text_content(Some("Ask our docs"));
        let close: HtmlButtonElement = make_element(&document, "button")?
            .dyn_into()
            .map_err(|_| WidgetError::Initialization("close affordance is not a button".into()))?;
        close.set_class_name("dw-close");
        close
            .set_attribute("aria-label", "Close chat")
            .map_err(init_err("failed to label close"))?;
        close.set_text_content(Some("×"));
        header
            .append_child(&title)
            .and_then(|_| header.append_child(&close))
            .map_err(init_err("failed to assemble header"))?;

        let transcript = make_element(&document, "div")?;
        transcript.set_class_name("dw-transcript");

        let loading = make_element(&document, "div")?;
        loading.set_class_name("dw-loading");
        loading.set_text_content(Some("Thinking…"));
        transcript
            .append_child(&loading)
            .map_err(init_err("failed to append placeholder"))?;

        let input_row = make_element(&document, "div")?;
        input_row.set_class_name("dw-input-row");
        let input: HtmlInputElement = make_element(&document, "input")?
            .dyn_into()
            .map_err(|_| WidgetError::Initialization("input is not an input element".into()))?;
        input
            .set_attribute("placeholder", "Ask a question…")
            .map_err(init_err("failed to set input placeholder"))?;
        let send: HtmlButtonElement = make_element(&document, "button")?
            .dyn_into()
            .map_err(|_| WidgetError::Initialization("send affordance is not a button".into()))?;
        send.set_class_name("dw-send");
        send.set_text_content(Some("Send"));
        input_row
            .append_child(&input)
            .and_then(|_| input_row.append_child(&send))
            .map_err(init_err("failed to assemble input row"))?;

        panel
            .append_child(&header)
            .and_then(|_| panel.append_child(&transcript))
            .and_then(|_| panel.append_child(&input_row))
            .map_err(init_err("failed to assemble panel"))?;
        root.append_child(&launcher)
            .and_then(|_| root.append_child(&panel))
            .map_err(init_err("failed to assemble root"))?;
        shadow
            .append_child(&root)
            .map_err(init_err("failed to populate shadow root"))?;

        Ok(Self {
            document,
            host,
            root,
            launcher,
            panel,
            transcript,
            loading,
            input,
            send,
            close,
        })
    }

    pub fn launcher_element(&self) -> &HtmlButtonElement {
        &self.launcher
    }

    pub fn send_element(&self) -> &HtmlButtonElement {
        &self.send
    }

    pub fn close_element(&self) -> &HtmlButtonElement {
        &self.close
    }

    pub fn input_element(&self) -> &HtmlInputElement {
        &self.input
    }

    fn apply_anchor(&self, anchor: Anchor) {
        let style = self.host.style();
        let margin = format!("{ANCHOR_MARGIN}px");
        let _ = style.set_property("position", "fixed");
        let _ = style.set_property("z-index", "2147483000");
        let (vertical, horizontal) = match anchor {
            Anchor::BottomRight => ("bottom", "right"),
            Anchor::BottomLeft => ("bottom", "left"),
            Anchor::TopRight => ("top", "right"),
            Anchor::TopLeft => ("top", "left"),
        };
        let _ = style.set_property(vertical, &margin);
        let _ = style.set_property(horizontal, &margin);
    }
}

fn make_element(document: &Document, tag: &str) -> Result<HtmlElement, WidgetError> {
    document
        .create_element(tag)
        .map_err(init_err("create_element rejected"))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| WidgetError::Initialization(format!("{tag} is not an HtmlElement")))
}

fn init_err(context: &'static str) -> impl Fn(JsValue) -> WidgetError {
    move |err| WidgetError::Initialization(format!("{context}: {err:?}"))
}

impl RenderSurface for DomSurface {
    fn mount(&self, config: &WidgetConfig, state: &WidgetState) -> Result<(), WidgetError> {
        let theme = match config.theme.as_deref() {
            Some("dark") => "dw-theme-dark",
            _ => "dw-theme-light",
        };
        self.root.set_class_name(&format!("dw-root {theme}"));
        self.apply_anchor(config.position.unwrap_or_default());
        if let Some(position) = state.position {
            self.set_position(position);
        }

        let body = self
            .document
            .body()
            .ok_or_else(|| WidgetError::Initialization("document body is unavailable".into()))?;
        body.append_child(&self.host)
            .map_err(init_err("failed to append widget host"))?;
        Ok(())
    }

    fn set_open(&self, open: bool) {
        let class = if open { "dw-panel dw-open" } else { "dw-panel" };
        self.panel.set_class_name(class);
        if open {
            let _ = self.input.focus();
        }
    }

    fn set_position(&self, position: Point) {
        let style = self.host.style();
        let _ = style.set_property("left", &format!("{}px", position.x));
        let _ = style.set_property("top", &format!("{}px", position.y));
        let _ = style.set_property("right", "auto");
        let _ = style.set_property("bottom", "auto");
    }

    fn append_message(&self, role: MessageRole, nodes: &[FragmentNode]) {
        let Ok(bubble) = make_element(&self.document, "div") else {
            return;
        };
        let class = match role {
            MessageRole::User => "dw-msg dw-msg-user",
            MessageRole::Bot => "dw-msg dw-msg-bot",
        };
        bubble.set_class_name(class);

        for node in nodes {
            match node {
                FragmentNode::Text { text } => {
                    let text_node = self.document.create_text_node(text);
                    let _ = bubble.append_child(&text_node);
                }
                FragmentNode::Link { href } => {
                    let Ok(anchor) = make_element(&self.document, "a") else {
                        continue;
                    };
                    let _ = anchor.set_attribute("href", href);
                    let _ = anchor.set_attribute("target", "_blank");
                    let _ = anchor.set_attribute("rel", "noopener noreferrer");
                    let _ = anchor
                        .set_attribute("aria-label", &FragmentNode::accessible_label(href));
                    anchor.set_text_content(Some(href));
                    let _ = bubble.append_child(&anchor);
                }
            }
        }

        // keep the placeholder as the last transcript entry
        let _ = self
            .transcript
            .insert_before(&bubble, Some(self.loading.as_ref()));
    }

    fn set_loading(&self, loading: bool) {
        let class = if loading {
            "dw-loading dw-visible"
        } else {
            "dw-loading"
        };
        self.loading.set_class_name(class);
    }

    fn set_input_enabled(&self, enabled: bool) {
        self.input.set_disabled(!enabled);
        self.send.set_disabled(!enabled);
    }

    fn scroll_to_latest(&self) {
        self.transcript.set_scroll_top(self.transcript.scroll_height());
    }

    fn viewport(&self) -> Viewport {
        let window = web_sys::window();
        let read = |value: Option<Result<JsValue, JsValue>>| {
            value
                .and_then(|v| v.ok())
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0) as i32
        };
        Viewport::new(
            read(window.as_ref().map(|w| w.inner_width())),
            read(window.as_ref().map(|w| w.inner_height())),
        )
    }

    fn launcher_size(&self) -> Size {
        let rect = self.launcher.get_bounding_client_rect();
        if rect.width() > 0.0 {
            Size::new(rect.width() as i32, rect.height() as i32)
        } else {
            Size::new(60, 60)
        }
    }

    fn launcher_origin(&self) -> Point {
        let rect = self.host.get_bounding_client_rect();
        Point::new(rect.left() as i32, rect.top() as i32)
    }

    fn is_attached(&self) -> bool {
        match self.document.body() {
            Some(body) => body.contains(Some(self.host.as_ref())),
            None => false,
        }
    }

    fn reattach(&self) -> Result<(), WidgetError> {
        let body = self
            .document
            .body()
            .ok_or_else(|| WidgetError::Initialization("document body is unavailable".into()))?;
        body.append_child(&self.host)
            .map_err(init_err("failed to re-append widget host"))?;
        Ok(())
    }
}
