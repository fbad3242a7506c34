//! Minimal observer registration used for dock size notifications.

use std::cell::{Cell, RefCell};

/// Handle returned by [`SizeSignal::connect`]; pass it back to disconnect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Box<dyn Fn()>;

/// A "size changed" notification with explicit connect/disconnect.
///
/// Handlers run synchronously on [`emit`](Self::emit). A handler must not
/// connect or disconnect on the signal that is currently emitting.
#[derive(Default)]
pub struct SizeSignal {
    next_id: Cell<u64>,
    handlers: RefCell<Vec<(SubscriptionId, Handler)>>,
}

impl SizeSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connect(&self, handler: impl Fn() + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.handlers.borrow_mut().push((id, Box::new(handler)));
        id
    }

    /// Returns `false` if the subscription was not connected.
    pub fn disconnect(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(sub, _)| *sub != id);
        handlers.len() != before
    }

    pub fn emit(&self) {
        for (_, handler) in self.handlers.borrow().iter() {
            handler();
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.borrow().len()
    }
}

impl std::fmt::Debug for SizeSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SizeSignal")
            .field("handlers", &self.handler_count())
            .finish()
    }
}
