use std::cell::RefCell;
use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::{debug, error, info};

use docwing_core::{WidgetConfig, WidgetError};

use crate::controller::WidgetController;

/// Commands accepted at the embedding boundary.
///
/// The loader snippet queues these before the runtime is ready; `init` is
/// the only documented command.
pub enum WidgetCommand {
    Init(WidgetConfig),
}

type ControllerBuilder = Box<dyn FnMut(WidgetConfig) -> Result<WidgetController, WidgetError>>;

/// Single-slot registry behind the page-global command queue.
///
/// Holds at most one controller; `init` is get-or-create-and-merge, so no
/// sequence of commands ever produces a second widget host. Commands
/// dispatched before `activate` are queued and replayed in order.
pub struct WidgetRegistry {
    builder: RefCell<Option<ControllerBuilder>>,
    controller: RefCell<Option<WidgetController>>,
    pending: RefCell<Vec<WidgetCommand>>,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self {
            builder: RefCell::new(None),
            controller: RefCell::new(None),
            pending: RefCell::new(Vec::new()),
        }
    }

    /// Provide the platform's controller builder and replay anything the
    /// loader queued before the runtime arrived.
    pub fn activate(&self, builder: ControllerBuilder) {
        *self.builder.borrow_mut() = Some(builder);
        let queued: Vec<WidgetCommand> = self.pending.borrow_mut().drain(..).collect();
        if !queued.is_empty() {
            debug!(count = queued.len(), "replaying queued widget commands");
        }
        for command in queued {
            self.dispatch(command);
        }
    }

    /// Run one command. The host page never observes an escaping failure:
    /// errors and panics are logged and swallowed here.
    pub fn dispatch(&self, command: WidgetCommand) {
        if catch_unwind(AssertUnwindSafe(|| self.apply(command))).is_err() {
            error!("widget command panicked");
        }
    }

    /// Access the live controller, if any.
    pub fn with_controller<R>(&self, f: impl FnOnce(&mut WidgetController) -> R) -> Option<R> {
        self.controller.borrow_mut().as_mut().map(f)
    }

    pub fn is_initialized(&self) -> bool {
        self.controller.borrow().is_some()
    }

    fn apply(&self, command: WidgetCommand) {
        match command {
            WidgetCommand::Init(config) => self.init(config),
        }
    }

    fn init(&self, config: WidgetConfig) {
        let mut slot = self.controller.borrow_mut();
        if let Some(controller) = slot.as_mut() {
            debug!("init on a live widget; merging config");
            controller.merge_config(config);
            return;
        }

        let mut builder = self.builder.borrow_mut();
        let Some(build) = builder.as_mut() else {
            debug!("runtime not ready; queueing init");
            drop(builder);
            drop(slot);
            self.pending.borrow_mut().push(WidgetCommand::Init(config));
            return;
        };

        match build(config) {
            Ok(controller) => {
                *slot = Some(controller);
                info!("widget instance created");
            }
            Err(err) => {
                // Nowhere safe to render an error before the host exists.
                error!(error = %err, "widget failed to initialize");
            }
        }
    }
}

impl Default for WidgetRegistry {
    fn default() -> Self {
        Self::new()
    }
}
