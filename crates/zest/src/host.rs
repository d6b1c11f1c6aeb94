//! Host - the document, its event listeners and the ready gate
//!
//! Every primitive the matched-set layer needs from the node tree lives
//! here: selector queries, listener registration and dispatch, markup
//! insertion, attribute and text access. Handles are cheap to clone and
//! all clones share one document.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use zest_dom::{
    Document, DomError, Event, EventPhase, EventType, ListenerOptions, ListenerRegistry, NodeId,
    ReadyState,
};
use zest_html::HtmlParser;

use crate::events::Handler;
use crate::ready::ReadyGate;
use crate::{Config, Error, Result};

/// Where `insert_adjacent_html` puts the parsed nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    /// Before the element itself
    BeforeBegin,
    /// Before its first child
    AfterBegin,
    /// After its last child
    BeforeEnd,
    /// After the element itself
    AfterEnd,
}

impl InsertPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BeforeBegin => "beforebegin",
            Self::AfterBegin => "afterbegin",
            Self::BeforeEnd => "beforeend",
            Self::AfterEnd => "afterend",
        }
    }
}

impl FromStr for InsertPosition {
    type Err = Error;

    /// Case-insensitive, so `beforeEnd` works too
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "beforebegin" => Ok(Self::BeforeBegin),
            "afterbegin" => Ok(Self::AfterBegin),
            "beforeend" => Ok(Self::BeforeEnd),
            "afterend" => Ok(Self::AfterEnd),
            _ => Err(Error::InvalidPosition(s.to_string())),
        }
    }
}

/// Shared handle to a document and everything attached to it
#[derive(Clone)]
pub struct Host {
    inner: Rc<HostInner>,
}

struct HostInner {
    config: Config,
    document: RefCell<Document>,
    listeners: RefCell<ListenerRegistry<Handler>>,
    ready: ReadyGate,
}

impl Host {
    /// Host with an empty `<html><head><body>` document
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let mut document = Document::new(&config.url);
        document.set_ready_state(config.ready_state);
        Self::from_document(document, config)
    }

    /// Host over a parsed HTML document
    pub fn from_html(html: &str) -> Result<Self> {
        Self::from_html_with_config(html, Config::default())
    }

    pub fn from_html_with_config(html: &str, config: Config) -> Result<Self> {
        let mut document = HtmlParser::new().parse_with_url(html, &config.url)?;
        document.set_ready_state(config.ready_state);
        Ok(Self::from_document(document, config))
    }

    fn from_document(document: Document, config: Config) -> Self {
        tracing::debug!("Creating host for {}", document.url());
        let ready = ReadyGate::new(config.unload_fix);
        Self {
            inner: Rc::new(HostInner {
                config,
                document: RefCell::new(document),
                listeners: RefCell::new(ListenerRegistry::new()),
                ready,
            }),
        }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Borrow the document
    ///
    /// Drop the guard before calling anything that mutates the tree.
    pub fn document(&self) -> Ref<'_, Document> {
        self.inner.document.borrow()
    }

    pub fn document_mut(&self) -> RefMut<'_, Document> {
        self.inner.document.borrow_mut()
    }

    pub(crate) fn ready_gate(&self) -> &ReadyGate {
        &self.inner.ready
    }

    /// True when both handles share one document
    pub fn ptr_eq(&self, other: &Host) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn ready_state(&self) -> ReadyState {
        self.document().ready_state()
    }

    pub fn body(&self) -> NodeId {
        self.document().body()
    }

    pub fn head(&self) -> NodeId {
        self.document().head()
    }

    // ----- Tree -----

    /// Create a detached element
    pub fn create_element(&self, tag: &str) -> NodeId {
        self.document_mut().tree_mut().create_element(tag)
    }

    pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<NodeId> {
        Ok(self.document_mut().tree_mut().append_child(parent, child)?)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.document().tree().parent(node)
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        self.document().tree().is_element(node)
    }

    pub fn tag_name(&self, node: NodeId) -> Option<String> {
        self.document().tree().tag_name(node).map(str::to_string)
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.document().get_element_by_id(id)
    }

    /// Descendants of `scope` matching `selector`, in document order
    ///
    /// `scope` must be an element or the document node.
    pub fn query_selector_all(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>> {
        let doc = self.document();
        let tree = doc.tree();
        if !tree.is_queryable(scope) {
            return Err(DomError::InvalidNodeType(scope).into());
        }
        Ok(zest_css::select(tree, scope, selector)?)
    }

    // ----- Markup -----

    pub fn inner_html(&self, node: NodeId) -> String {
        zest_html::inner_html(self.document().tree(), node)
    }

    pub fn outer_html(&self, node: NodeId) -> String {
        zest_html::outer_html(self.document().tree(), node)
    }

    /// Replace the children of an element with parsed markup
    pub fn set_inner_html(&self, node: NodeId, html: &str) -> Result<()> {
        let mut doc = self.document_mut();
        let tree = doc.tree_mut();
        if !tree.is_element(node) {
            return Err(DomError::InvalidNodeType(node).into());
        }

        tree.remove_children(node)?;
        for child in HtmlParser::new().parse_fragment(tree, html)? {
            tree.append_child(node, child)?;
        }
        Ok(())
    }

    /// Parse markup and insert it relative to an element
    ///
    /// `BeforeBegin` and `AfterEnd` need a parent element.
    pub fn insert_adjacent_html(
        &self,
        node: NodeId,
        position: InsertPosition,
        html: &str,
    ) -> Result<()> {
        let mut doc = self.document_mut();
        let tree = doc.tree_mut();
        let Some(current) = tree.get(node).filter(|n| n.is_element()) else {
            return Err(DomError::InvalidNodeType(node).into());
        };
        let (first_child, next_sibling) = (current.first_child, current.next_sibling);

        let outside = match tree.parent(node) {
            Some(parent) if tree.is_element(parent) => Ok(parent),
            Some(parent) => Err(DomError::HierarchyRequest { parent, child: node }),
            None => Err(DomError::NoParent(node)),
        };
        let (parent, reference) = match position {
            InsertPosition::BeforeBegin => (outside?, node),
            InsertPosition::AfterBegin => (node, first_child),
            InsertPosition::BeforeEnd => (node, NodeId::NONE),
            InsertPosition::AfterEnd => (outside?, next_sibling),
        };

        for child in HtmlParser::new().parse_fragment(tree, html)? {
            tree.insert_before(parent, child, reference)?;
        }
        Ok(())
    }

    // ----- Attributes -----

    /// Attribute value; `None` when absent or when `node` is not an element
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.document().tree().attribute(node, name).map(str::to_string)
    }

    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) -> Result<()> {
        Ok(self.document_mut().tree_mut().set_attribute(node, name, value)?)
    }

    pub fn remove_attribute(&self, node: NodeId, name: &str) -> Result<()> {
        self.document_mut().tree_mut().remove_attribute(node, name)?;
        Ok(())
    }

    /// Append declarations to the inline `style` attribute
    pub fn append_style(&self, node: NodeId, css: &str) -> Result<()> {
        let mut doc = self.document_mut();
        let tree = doc.tree_mut();
        let style = match tree.attribute(node, "style").map(str::trim_end) {
            Some(current) if current.is_empty() => css.to_string(),
            Some(current) if current.ends_with(';') => format!("{}{}", current, css),
            Some(current) => format!("{};{}", current, css),
            None => css.to_string(),
        };
        Ok(tree.set_attribute(node, "style", &style)?)
    }

    // ----- Text -----

    pub fn text_content(&self, node: NodeId) -> String {
        self.document().tree().text_content(node)
    }

    /// Append a text node as the last child of `node`
    pub fn append_text(&self, node: NodeId, text: &str) -> Result<()> {
        let mut doc = self.document_mut();
        let tree = doc.tree_mut();
        let text = tree.create_text(text);
        tree.append_child(node, text)?;
        Ok(())
    }

    // ----- Events -----

    /// Register a listener; returns `false` when it was already registered
    pub fn add_event_listener(
        &self,
        target: NodeId,
        event_type: impl Into<EventType>,
        handler: Handler,
        options: ListenerOptions,
    ) -> bool {
        let event_type = event_type.into();
        tracing::trace!("add {} listener on {}", event_type, target);
        self.inner
            .listeners
            .borrow_mut()
            .add_listener(target, event_type, handler, options)
    }

    /// Remove a listener; unknown listeners are ignored
    pub fn remove_event_listener(
        &self,
        target: NodeId,
        event_type: impl Into<EventType>,
        handler: &Handler,
        capture: bool,
    ) -> bool {
        let event_type = event_type.into();
        self.inner
            .listeners
            .borrow_mut()
            .remove_listener(target, &event_type, handler, capture)
    }

    /// Number of listeners on `target` for `event_type`
    pub fn listener_count(&self, target: NodeId, event_type: impl Into<EventType>) -> usize {
        self.inner
            .listeners
            .borrow()
            .count(target, &event_type.into())
    }

    /// Dispatch an event at `target`
    ///
    /// Capture runs from the window down to the parent of the target,
    /// then the target's own listeners, then (for bubbling events) the
    /// ancestors back up to the window. The window is on the path only
    /// when the target is attached to the document.
    ///
    /// Returns `false` when a listener called `prevent_default`.
    pub fn dispatch_event(&self, target: NodeId, event: &mut Event) -> bool {
        let path = self.propagation_path(target);
        tracing::trace!(
            "dispatch {} at {} ({} ancestor(s))",
            event.event_type,
            target,
            path.len()
        );
        event.target = target;

        event.phase = EventPhase::Capturing;
        for &node in &path {
            if event.is_propagation_stopped() {
                break;
            }
            self.invoke(node, event, true);
        }

        if !event.is_propagation_stopped() {
            event.phase = EventPhase::AtTarget;
            self.invoke(target, event, true);
            if !event.is_immediate_propagation_stopped() {
                self.invoke(target, event, false);
            }
        }

        if event.bubbles {
            event.phase = EventPhase::Bubbling;
            for &node in path.iter().rev() {
                if event.is_propagation_stopped() {
                    break;
                }
                self.invoke(node, event, false);
            }
        }

        event.phase = EventPhase::None;
        event.current_target = NodeId::NONE;
        !event.is_default_prevented()
    }

    /// Ancestors of `target`, outermost first
    fn propagation_path(&self, target: NodeId) -> Vec<NodeId> {
        if target.is_window() {
            return Vec::new();
        }
        let doc = self.document();
        let mut path: Vec<NodeId> = doc.tree().ancestors(target).collect();
        let attached = target == NodeId::ROOT || path.last() == Some(&NodeId::ROOT);
        if attached {
            path.push(NodeId::WINDOW);
        }
        path.reverse();
        path
    }

    /// Run one phase's listeners on one node
    ///
    /// The listener list is snapshotted first; no borrow is held while
    /// handlers run, so they may freely use the host.
    fn invoke(&self, node: NodeId, event: &mut Event, capture: bool) {
        let handlers = self
            .inner
            .listeners
            .borrow_mut()
            .take_for_dispatch(node, &event.event_type, capture);

        for handler in handlers {
            event.current_target = node;
            handler.call(self, node, event);
            if event.is_immediate_propagation_stopped() {
                break;
            }
        }
    }

    // ----- Lifecycle -----

    /// Mark parsing finished and fire `DOMContentLoaded` at the document
    pub fn finish_parsing(&self) {
        if self.ready_state() != ReadyState::Loading {
            return;
        }
        self.document_mut().set_ready_state(ReadyState::Interactive);
        self.dispatch_event(NodeId::ROOT, &mut Event::content_loaded());
    }

    /// Mark the document complete and fire `load` at the window
    pub fn finish_loading(&self) {
        if self.ready_state() == ReadyState::Complete {
            return;
        }
        self.finish_parsing();
        self.document_mut().set_ready_state(ReadyState::Complete);
        self.dispatch_event(NodeId::WINDOW, &mut Event::load());
    }

    /// Fire `unload` at the window
    pub fn unload(&self) {
        self.dispatch_event(NodeId::WINDOW, &mut Event::unload());
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("url", &self.inner.config.url)
            .field("ready_fix_applied", &self.inner.ready.is_applied())
            .finish_non_exhaustive()
    }
}
