//! DOM Events
//!
//! Event values and the per-target listener registry. Dispatch itself
//! (walking the propagation path and calling listeners) belongs to the
//! host, which owns the registry alongside the document.

use std::collections::HashMap;

use crate::NodeId;

/// Event type identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    Click,
    DblClick,
    MouseDown,
    MouseUp,
    MouseMove,
    MouseOver,
    MouseOut,
    MouseEnter,
    MouseLeave,
    KeyDown,
    KeyUp,
    Input,
    Change,
    Focus,
    Blur,
    Submit,
    Scroll,
    TouchStart,
    TouchMove,
    TouchEnd,
    TouchCancel,
    DOMContentLoaded,
    Load,
    Unload,
    BeforeUnload,
    ReadyStateChange,
    /// Any other event name, stored verbatim
    Other(String),
}

impl EventType {
    /// Map an event name (`"click"`, `"DOMContentLoaded"`, ...) to its type
    pub fn parse(name: &str) -> Self {
        match name {
            "click" => Self::Click,
            "dblclick" => Self::DblClick,
            "mousedown" => Self::MouseDown,
            "mouseup" => Self::MouseUp,
            "mousemove" => Self::MouseMove,
            "mouseover" => Self::MouseOver,
            "mouseout" => Self::MouseOut,
            "mouseenter" => Self::MouseEnter,
            "mouseleave" => Self::MouseLeave,
            "keydown" => Self::KeyDown,
            "keyup" => Self::KeyUp,
            "input" => Self::Input,
            "change" => Self::Change,
            "focus" => Self::Focus,
            "blur" => Self::Blur,
            "submit" => Self::Submit,
            "scroll" => Self::Scroll,
            "touchstart" => Self::TouchStart,
            "touchmove" => Self::TouchMove,
            "touchend" => Self::TouchEnd,
            "touchcancel" => Self::TouchCancel,
            "DOMContentLoaded" => Self::DOMContentLoaded,
            "load" => Self::Load,
            "unload" => Self::Unload,
            "beforeunload" => Self::BeforeUnload,
            "readystatechange" => Self::ReadyStateChange,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Click => "click",
            Self::DblClick => "dblclick",
            Self::MouseDown => "mousedown",
            Self::MouseUp => "mouseup",
            Self::MouseMove => "mousemove",
            Self::MouseOver => "mouseover",
            Self::MouseOut => "mouseout",
            Self::MouseEnter => "mouseenter",
            Self::MouseLeave => "mouseleave",
            Self::KeyDown => "keydown",
            Self::KeyUp => "keyup",
            Self::Input => "input",
            Self::Change => "change",
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::Submit => "submit",
            Self::Scroll => "scroll",
            Self::TouchStart => "touchstart",
            Self::TouchMove => "touchmove",
            Self::TouchEnd => "touchend",
            Self::TouchCancel => "touchcancel",
            Self::DOMContentLoaded => "DOMContentLoaded",
            Self::Load => "load",
            Self::Unload => "unload",
            Self::BeforeUnload => "beforeunload",
            Self::ReadyStateChange => "readystatechange",
            Self::Other(name) => name,
        }
    }

    /// Check if this event type bubbles
    pub fn bubbles(&self) -> bool {
        !matches!(
            self,
            Self::Focus
                | Self::Blur
                | Self::Load
                | Self::Unload
                | Self::MouseEnter
                | Self::MouseLeave
                | Self::Scroll
                | Self::ReadyStateChange
        )
    }

    /// Lifecycle signals cannot be cancelled
    pub fn cancelable(&self) -> bool {
        !matches!(
            self,
            Self::DOMContentLoaded | Self::Load | Self::Unload | Self::ReadyStateChange
        )
    }
}

impl From<&str> for EventType {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Propagation phase an event is currently in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventPhase {
    #[default]
    None,
    Capturing,
    AtTarget,
    Bubbling,
}

/// DOM event
#[derive(Debug, Clone)]
pub struct Event {
    pub event_type: EventType,
    /// Origin node, set when dispatched
    pub target: NodeId,
    /// Node whose listeners are currently running
    pub current_target: NodeId,
    pub phase: EventPhase,
    pub bubbles: bool,
    pub cancelable: bool,
    pub timestamp: f64,
    default_prevented: bool,
    propagation_stopped: bool,
    immediate_propagation_stopped: bool,
}

impl Event {
    /// Create an event with the bubbling/cancelable defaults of its type
    pub fn new(event_type: impl Into<EventType>) -> Self {
        let event_type = event_type.into();
        Self {
            bubbles: event_type.bubbles(),
            cancelable: event_type.cancelable(),
            event_type,
            target: NodeId::NONE,
            current_target: NodeId::NONE,
            phase: EventPhase::None,
            timestamp: 0.0,
            default_prevented: false,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
        }
    }

    /// Create DOMContentLoaded event
    pub fn content_loaded() -> Self {
        Self::new(EventType::DOMContentLoaded)
    }

    pub fn load() -> Self {
        Self::new(EventType::Load)
    }

    pub fn unload() -> Self {
        Self::new(EventType::Unload)
    }

    pub fn with_bubbles(mut self, bubbles: bool) -> Self {
        self.bubbles = bubbles;
        self
    }

    /// Prevent default action (no-op for non-cancelable events)
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stop propagation and skip the remaining listeners on the current node
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub fn is_immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped
    }
}

/// Listener options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    pub capture: bool,
    pub passive: bool,
    /// Remove the listener before its first invocation
    pub once: bool,
}

impl ListenerOptions {
    pub fn once() -> Self {
        Self { once: true, ..Self::default() }
    }
}

#[derive(Debug, Clone)]
struct Entry<L> {
    listener: L,
    options: ListenerOptions,
}

/// Listeners keyed by (target, event type), in registration order
///
/// A listener is a duplicate when an equal listener with the same
/// `capture` flag is already registered for the same target and type.
#[derive(Debug)]
pub struct ListenerRegistry<L> {
    handlers: HashMap<(NodeId, EventType), Vec<Entry<L>>>,
}

impl<L: Clone + PartialEq> ListenerRegistry<L> {
    pub fn new() -> Self {
        Self { handlers: HashMap::new() }
    }

    /// Add a listener; returns `false` for a duplicate
    pub fn add_listener(
        &mut self,
        target: NodeId,
        event_type: EventType,
        listener: L,
        options: ListenerOptions,
    ) -> bool {
        let entries = self.handlers.entry((target, event_type)).or_default();
        if entries
            .iter()
            .any(|e| e.listener == listener && e.options.capture == options.capture)
        {
            return false;
        }
        entries.push(Entry { listener, options });
        true
    }

    /// Remove a listener; returns `false` when it was not registered
    pub fn remove_listener(
        &mut self,
        target: NodeId,
        event_type: &EventType,
        listener: &L,
        capture: bool,
    ) -> bool {
        let key = (target, event_type.clone());
        let Some(entries) = self.handlers.get_mut(&key) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|e| !(e.listener == *listener && e.options.capture == capture));
        let removed = entries.len() < before;
        if entries.is_empty() {
            self.handlers.remove(&key);
        }
        removed
    }

    /// Snapshot the listeners to run for one phase on one target
    ///
    /// `once` listeners are unregistered here, before they run.
    pub fn take_for_dispatch(
        &mut self,
        target: NodeId,
        event_type: &EventType,
        capture: bool,
    ) -> Vec<L> {
        let key = (target, event_type.clone());
        let Some(entries) = self.handlers.get_mut(&key) else {
            return Vec::new();
        };
        let snapshot = entries
            .iter()
            .filter(|e| e.options.capture == capture)
            .map(|e| e.listener.clone())
            .collect();
        entries.retain(|e| !(e.options.once && e.options.capture == capture));
        if entries.is_empty() {
            self.handlers.remove(&key);
        }
        snapshot
    }

    /// Number of listeners registered on a target for a type
    pub fn count(&self, target: NodeId, event_type: &EventType) -> usize {
        self.handlers
            .get(&(target, event_type.clone()))
            .map_or(0, Vec::len)
    }

    /// Total number of registered listeners
    pub fn len(&self) -> usize {
        self.handlers.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<L: Clone + PartialEq> Default for ListenerRegistry<L> {
    fn default() -> Self {
        Self::new()
    }
}
