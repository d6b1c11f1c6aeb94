//! Event binding and delegation on matched sets

use std::fmt;
use std::rc::Rc;

use zest_dom::{Event, EventType, ListenerOptions, NodeId};

use crate::{Host, Result, Set};

/// Event callback, compared by identity
///
/// Invoked with the host, the receiving node and the event. Clones share
/// identity, so the clone passed to `bind` is the one `unbind` removes.
#[derive(Clone)]
pub struct Handler(Rc<dyn Fn(&Host, NodeId, &mut Event)>);

impl Handler {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Host, NodeId, &mut Event) + 'static,
    {
        Self(Rc::new(f))
    }

    pub(crate) fn call(&self, host: &Host, receiver: NodeId, event: &mut Event) {
        (self.0)(host, receiver, event)
    }
}

impl PartialEq for Handler {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handler({:p})", Rc::as_ptr(&self.0))
    }
}

impl Set {
    /// Add a bubbling-phase listener to every element
    pub fn bind(&self, event_type: impl Into<EventType>, handler: &Handler) -> &Self {
        let event_type = event_type.into();
        for node in self.iter() {
            self.host().add_event_listener(
                node,
                event_type.clone(),
                handler.clone(),
                ListenerOptions::default(),
            );
        }
        self
    }

    /// Remove a listener added with `bind`
    pub fn unbind(&self, event_type: impl Into<EventType>, handler: &Handler) -> &Self {
        let event_type = event_type.into();
        for node in self.iter() {
            self.host()
                .remove_event_listener(node, event_type.clone(), handler, false);
        }
        self
    }

    /// Listen on every element for events coming from descendants
    /// matching `selector`
    ///
    /// The matching descendants are collected once, now. Elements added
    /// later never trigger `callback`, even if they match. The callback
    /// receives the matched descendant, never the bound element itself.
    pub fn delegate(
        &self,
        selector: &str,
        event_type: impl Into<EventType>,
        callback: Handler,
    ) -> Result<&Self> {
        let event_type = event_type.into();
        let targets: Rc<[NodeId]> = self.find(selector)?.to_vec().into();
        tracing::debug!(
            "delegate {} on {} element(s) to {} target(s) matching {:?}",
            event_type,
            self.len(),
            targets.len(),
            selector
        );

        for el in self.iter() {
            let targets = Rc::clone(&targets);
            let callback = callback.clone();
            let wrapper = Handler::new(move |host, _, event| {
                let origin = std::iter::successors(Some(event.target), |&node| host.parent(node))
                    .find(|node| targets.contains(node));
                if let Some(node) = origin.filter(|&node| node != el) {
                    callback.call(host, node, event);
                }
            });
            self.host()
                .add_event_listener(el, event_type.clone(), wrapper, ListenerOptions::default());
        }
        Ok(self)
    }

    /// Dispatch a fresh event of `event_type` at every element
    pub fn trigger(&self, event_type: impl Into<EventType>) -> &Self {
        let event_type = event_type.into();
        for node in self.iter() {
            self.host().dispatch_event(node, &mut Event::new(event_type.clone()));
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[test]
    fn test_handler_identity() {
        let a = Handler::new(|_, _, _| {});
        let b = Handler::new(|_, _, _| {});
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_bind_unbind() {
        let host = Host::from_html("<p>1</p><p>2</p>").unwrap();
        let hits = Rc::new(RefCell::new(Vec::new()));
        let handler = {
            let hits = Rc::clone(&hits);
            Handler::new(move |_, node, _| hits.borrow_mut().push(node))
        };

        let paragraphs = host.select("p").unwrap();
        paragraphs.bind("click", &handler).trigger("click");
        assert_eq!(*hits.borrow(), paragraphs.to_vec());

        paragraphs.unbind("click", &handler).trigger("click");
        assert_eq!(hits.borrow().len(), 2);
    }

    #[test]
    fn test_unbind_unknown_handler_is_ignored() {
        let host = Host::from_html("<p>1</p>").unwrap();
        let stranger = Handler::new(|_, _, _| {});
        host.select("p").unwrap().unbind("click", &stranger);
    }
}
