//! zest DOM - Document Object Model
//!
//! Arena-allocated node tree, the document wrapper around it and the
//! listener registry the host dispatches events through.

mod document;
mod events;
mod interner;
mod node;
mod operations;
mod tree;

pub use document::{Document, ReadyState};
pub use events::{Event, EventPhase, EventType, ListenerOptions, ListenerRegistry};
pub use interner::{InternedString, StringInterner};
pub use node::{Attribute, ElementData, Node, NodeData, TextData};
pub use operations::{DomError, DomResult};
pub use tree::{Ancestors, Children, Descendants, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID (the document node)
    pub const ROOT: NodeId = NodeId(0);
    /// The window event target. Never stored in the arena.
    pub const WINDOW: NodeId = NodeId(u32::MAX - 1);
    /// Absent node
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// True for anything except `NONE`
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    #[inline]
    pub fn is_window(self) -> bool {
        self == Self::WINDOW
    }

    /// Arena index, `None` for the reserved ids
    #[inline]
    pub fn index(self) -> Option<usize> {
        if self == Self::NONE || self == Self::WINDOW {
            None
        } else {
            Some(self.0 as usize)
        }
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::WINDOW => f.write_str("#window"),
            Self::NONE => f.write_str("#none"),
            NodeId(n) => write!(f, "#{}", n),
        }
    }
}
