//! Browser bootstrap.
//!
//! Replaces the loader snippet's command queue with the real dispatcher,
//! wires DOM events to the controller, and keeps the widget alive on
//! client-routed hosts.

mod navigation;
mod storage;
mod surface;

pub use navigation::{BrowserNavigationHooks, WindowProbe};
pub use storage::SessionStorageBackend;
pub use surface::DomSurface;

use std::rc::Rc;
use std::sync::Arc;

use js_sys::{Array, JSON};
use js_sys::Reflect;
use tracing::{error, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlInputElement, KeyboardEvent, MouseEvent, PointerEvent};

use docwing_core::{EnvironmentLabel, Point, WidgetConfig, WidgetError};
use docwing_environment::EnvironmentClassifier;
use docwing_store::{MemoryTabStorage, StateStore, TabStorage};
use docwing_transport::{ChatBackend, HttpChatClient};

use crate::controller::WidgetController;
use crate::registry::{WidgetCommand, WidgetRegistry};

/// Loader snippets may rename the page global by setting this first.
const GLOBAL_NAME_KEY: &str = "DocwingObject";
const DEFAULT_GLOBAL_NAME: &str = "docwing";

thread_local! {
    static REGISTRY: WidgetRegistry = WidgetRegistry::new();
    static BACKEND: Rc<HttpChatClient> = Rc::new(HttpChatClient::new());
}

fn with_registry<R>(f: impl FnOnce(&WidgetRegistry) -> R) -> R {
    REGISTRY.with(f)
}

/// Entry point, runs when the compiled script loads.
#[wasm_bindgen(start)]
pub fn boot() {
    let storage: Arc<dyn TabStorage> = match SessionStorageBackend::acquire() {
        Ok(backend) => Arc::new(backend),
        Err(err) => {
            warn!(error = %err, "sessionStorage unavailable; state will not survive navigation");
            Arc::new(MemoryTabStorage::new())
        }
    };
    let store = StateStore::new(storage);

    let classifier = EnvironmentClassifier::new(store.clone());
    let environment = classifier.detect(&WindowProbe, &BrowserNavigationHooks::new());

    with_registry(|registry| {
        registry.activate(Box::new(move |config| {
            build_controller(config, store.clone(), environment)
        }));
    });

    drain_and_replace_queue();
}

fn build_controller(
    config: WidgetConfig,
    store: StateStore,
    environment: EnvironmentLabel,
) -> Result<WidgetController, WidgetError> {
    let surface = Rc::new(DomSurface::create()?);
    wire_surface(&surface);

    let backend: Rc<dyn ChatBackend> = BACKEND.with(|backend| backend.clone());
    let controller =
        WidgetController::init(config, store, surface.clone(), backend, environment)?;

    if environment == EnvironmentLabel::Spa {
        install_orphan_watch();
    }
    Ok(controller)
}

/// Replay whatever the loader queued, then swap the queue-pusher for the
/// real dispatcher.
fn drain_and_replace_queue() {
    let Some(window) = web_sys::window() else {
        return;
    };
    let name = Reflect::get(window.as_ref(), &JsValue::from_str(GLOBAL_NAME_KEY))
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_else(|| DEFAULT_GLOBAL_NAME.to_string());

    if let Ok(existing) = Reflect::get(window.as_ref(), &JsValue::from_str(&name)) {
        if let Ok(queue) = Reflect::get(&existing, &JsValue::from_str("q")) {
            if let Some(queue) = queue.dyn_ref::<Array>() {
                for entry in queue.iter() {
                    dispatch_js_command(&entry);
                }
            }
        }
    }

    let dispatcher = Closure::<dyn FnMut(JsValue, JsValue)>::new(
        move |command: JsValue, payload: JsValue| {
            let entry: JsValue = Array::of2(&command, &payload).into();
            dispatch_js_command(&entry);
        },
    );
    if Reflect::set(
        window.as_ref(),
        &JsValue::from_str(&name),
        dispatcher.as_ref().unchecked_ref(),
    )
    .is_err()
    {
        error!("failed to publish the widget dispatcher");
    }
    dispatcher.forget();
}

fn dispatch_js_command(entry: &JsValue) {
    let entry = Array::from(entry);
    let Some(command) = entry.get(0).as_string() else {
        warn!("widget command without a name");
        return;
    };
    match command.as_str() {
        "init" => match parse_config(&entry.get(1)) {
            Ok(config) => with_registry(|registry| {
                registry.dispatch(WidgetCommand::Init(config));
            }),
            Err(err) => error!(error = %err, "init command carried an invalid config"),
        },
        other => warn!(command = other, "unknown widget command"),
    }
}

fn parse_config(value: &JsValue) -> Result<WidgetConfig, WidgetError> {
    let json = JSON::stringify(value)
        .map_err(|err| WidgetError::Configuration(format!("config is not serializable: {err:?}")))?;
    serde_json::from_str(&String::from(json))
        .map_err(|err| WidgetError::Configuration(format!("config did not decode: {err}")))
}

fn wire_surface(surface: &Rc<DomSurface>) {
    let Some(window) = web_sys::window() else {
        return;
    };

    let on_pointer_down = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
        with_registry(|registry| {
            registry.with_controller(|controller| {
                controller.pointer_down(Point::new(event.client_x(), event.client_y()));
            });
        });
    });
    let _ = surface.launcher_element().add_event_listener_with_callback(
        "pointerdown",
        on_pointer_down.as_ref().unchecked_ref(),
    );
    on_pointer_down.forget();

    // move/up live on the window so fast drags cannot escape the launcher
    let on_pointer_move = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
        let dragging = with_registry(|registry| {
            registry.with_controller(|controller| {
                controller.pointer_move(Point::new(event.client_x(), event.client_y()))
            })
        });
        if dragging == Some(true) {
            event.prevent_default();
        }
    });
    let _ = window.add_event_listener_with_callback(
        "pointermove",
        on_pointer_move.as_ref().unchecked_ref(),
    );
    on_pointer_move.forget();

    let on_pointer_up = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
        with_registry(|registry| {
            registry.with_controller(|controller| {
                controller.pointer_up(
                    Point::new(event.client_x(), event.client_y()),
                    event.time_stamp() as i64,
                );
            });
        });
    });
    let _ = window
        .add_event_listener_with_callback("pointerup", on_pointer_up.as_ref().unchecked_ref());
    on_pointer_up.forget();

    let on_click = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
        with_registry(|registry| {
            registry.with_controller(|controller| {
                controller.click(event.time_stamp() as i64);
            });
        });
    });
    let _ = surface
        .launcher_element()
        .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref());
    on_click.forget();

    let on_close = Closure::<dyn FnMut(MouseEvent)>::new(move |_event: MouseEvent| {
        with_registry(|registry| {
            registry.with_controller(|controller| controller.close());
        });
    });
    let _ = surface
        .close_element()
        .add_event_listener_with_callback("click", on_close.as_ref().unchecked_ref());
    on_close.forget();

    let input = surface.input_element().clone();
    let on_send = Closure::<dyn FnMut(MouseEvent)>::new(move |_event: MouseEvent| {
        submit_from_input(&input);
    });
    let _ = surface
        .send_element()
        .add_event_listener_with_callback("click", on_send.as_ref().unchecked_ref());
    on_send.forget();

    let input = surface.input_element().clone();
    let on_keydown = Closure::<dyn FnMut(KeyboardEvent)>::new(move |event: KeyboardEvent| {
        if event.key() == "Enter" {
            submit_from_input(&input);
        }
    });
    let _ = surface
        .input_element()
        .add_event_listener_with_callback("keydown", on_keydown.as_ref().unchecked_ref());
    on_keydown.forget();
}

fn submit_from_input(input: &HtmlInputElement) {
    let text = input.value();
    let pending = with_registry(|registry| {
        registry.with_controller(|controller| controller.begin_submit(&text))
    })
    .flatten();
    let Some(pending) = pending else {
        return;
    };
    input.set_value("");

    let backend: Rc<dyn ChatBackend> = BACKEND.with(|backend| backend.clone());
    wasm_bindgen_futures::spawn_local(async move {
        let result = backend
            .ask(&pending.query, &pending.session, &pending.config)
            .await;
        with_registry(|registry| {
            registry.with_controller(|controller| controller.settle_submit(result));
        });
    });
}

/// Watch for the host element being dropped by a client-side re-render.
fn install_orphan_watch() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let Some(body) = document.body() else {
        return;
    };

    let on_mutation = Closure::<dyn FnMut(Array, web_sys::MutationObserver)>::new(
        move |_records: Array, _observer: web_sys::MutationObserver| {
            with_registry(|registry| {
                registry.with_controller(|controller| controller.ensure_attached());
            });
        },
    );
    match web_sys::MutationObserver::new(on_mutation.as_ref().unchecked_ref()) {
        Ok(observer) => {
            let init = web_sys::MutationObserverInit::new();
            init.set_child_list(true);
            init.set_subtree(true);
            if observer.observe_with_options(&body, &init).is_err() {
                warn!("failed to observe host document mutations");
            }
            on_mutation.forget();
        }
        Err(err) => warn!(error = ?err, "MutationObserver unavailable"),
    }
}
