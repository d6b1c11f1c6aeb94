//! Ready Gate - defer work until the document has been parsed

use std::cell::{Cell, RefCell};

use zest_dom::{EventType, ListenerOptions, NodeId, ReadyState};

use crate::{Handler, Host};

/// Per-host state of the ready gate
#[derive(Debug)]
pub(crate) struct ReadyGate {
    unload_fix: bool,
    applied: Cell<bool>,
}

impl ReadyGate {
    pub(crate) fn new(unload_fix: bool) -> Self {
        Self {
            unload_fix,
            applied: Cell::new(false),
        }
    }

    /// True exactly once per gate
    fn claim(&self) -> bool {
        !self.applied.replace(true)
    }

    pub(crate) fn is_applied(&self) -> bool {
        self.applied.get()
    }
}

impl Host {
    /// Run `callback` once the document is ready
    ///
    /// If `DOMContentLoaded` has already fired the callback runs before
    /// this returns. Otherwise it runs once, from a self-removing
    /// listener, in registration order with other pending callbacks.
    ///
    /// The first call on a host registers a no-op `unload` listener on
    /// the window, which keeps the page out of the back/forward cache.
    pub fn ready<F>(&self, callback: F)
    where
        F: FnOnce(&Host) + 'static,
    {
        let gate = self.ready_gate();
        if gate.claim() && gate.unload_fix {
            tracing::debug!("ready gate: registering unload listener");
            self.add_event_listener(
                NodeId::WINDOW,
                EventType::Unload,
                Handler::new(|_, _, _| {}),
                ListenerOptions::default(),
            );
        }

        if self.ready_state() != ReadyState::Loading {
            callback(self);
            return;
        }

        let pending = RefCell::new(Some(callback));
        let handler = Handler::new(move |host, _, _| {
            let callback = pending.borrow_mut().take();
            if let Some(callback) = callback {
                callback(host);
            }
        });
        self.add_event_listener(
            NodeId::ROOT,
            EventType::DOMContentLoaded,
            handler,
            ListenerOptions::once(),
        );
    }

    /// Whether `ready` has been called on this host
    pub fn ready_fix_applied(&self) -> bool {
        self.ready_gate().is_applied()
    }
}
