use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Function, Reflect};
use tracing::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

use docwing_environment::{HostProbe, NavigationCallback, NavigationHooks, NavigationKind};

/// Probe for framework globals on the real `window`.
pub struct WindowProbe;

impl HostProbe for WindowProbe {
    fn has_global(&self, symbol: &str) -> bool {
        match web_sys::window() {
            Some(window) => {
                Reflect::has(window.as_ref(), &JsValue::from_str(symbol)).unwrap_or(false)
            }
            None => false,
        }
    }
}

/// Interceptor over the browser's history primitives.
///
/// Wraps `history.pushState` / `history.replaceState` and listens for
/// `popstate`; installed callbacks fire on every observed mutation. The
/// wrappers delegate to the original functions, so host-page routing is
/// unaffected.
pub struct BrowserNavigationHooks {
    callbacks: Rc<RefCell<Vec<NavigationCallback>>>,
    patched: RefCell<bool>,
}

impl BrowserNavigationHooks {
    pub fn new() -> Self {
        Self {
            callbacks: Rc::new(RefCell::new(Vec::new())),
            patched: RefCell::new(false),
        }
    }

    fn patch_once(&self) {
        if *self.patched.borrow() {
            return;
        }
        *self.patched.borrow_mut() = true;

        if let Err(err) = self.patch_history() {
            warn!(error = ?err, "failed to wrap history primitives");
        }
        if let Err(err) = self.listen_popstate() {
            warn!(error = ?err, "failed to listen for back/forward navigation");
        }
    }

    fn patch_history(&self) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let history = window.history()?;

        for (name, kind) in [
            ("pushState", NavigationKind::Push),
            ("replaceState", NavigationKind::Replace),
        ] {
            let original: Function =
                Reflect::get(history.as_ref(), &JsValue::from_str(name))?.dyn_into()?;
            let callbacks = self.callbacks.clone();

            let wrapper = Closure::<dyn FnMut(JsValue, JsValue, JsValue) -> JsValue>::new(
                move |data: JsValue, title: JsValue, url: JsValue| {
                    let this = web_sys::window()
                        .and_then(|w| w.history().ok())
                        .map(JsValue::from)
                        .unwrap_or(JsValue::NULL);
                    let args = Array::of3(&data, &title, &url);
                    let result = original.apply(&this, &args).unwrap_or(JsValue::UNDEFINED);
                    for callback in callbacks.borrow().iter() {
                        callback(kind);
                    }
                    result
                },
            );

            Reflect::set(
                history.as_ref(),
                &JsValue::from_str(name),
                wrapper.as_ref().unchecked_ref(),
            )?;
            // wrappers live for the page's lifetime
            wrapper.forget();
        }
        Ok(())
    }

    fn listen_popstate(&self) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let callbacks = self.callbacks.clone();
        let listener = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
            for callback in callbacks.borrow().iter() {
                callback(NavigationKind::BackForward);
            }
        });
        window
            .add_event_listener_with_callback("popstate", listener.as_ref().unchecked_ref())?;
        listener.forget();
        Ok(())
    }
}

impl Default for BrowserNavigationHooks {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationHooks for BrowserNavigationHooks {
    fn install(&self, on_navigate: NavigationCallback) {
        self.patch_once();
        self.callbacks.borrow_mut().push(on_navigate);
    }
}
