//! What a set can be built from, and what a query is scoped to

use std::fmt;

use zest_dom::NodeId;

use crate::{Host, Set};

/// Deferred callback for the ready gate
pub type ReadyCallback = Box<dyn FnOnce(&Host)>;

/// Input to [`Host::select`]
pub enum Selector {
    /// Nothing: an empty set
    Empty,
    /// The window event target
    Window,
    /// A single node
    Node(NodeId),
    /// An existing set, copied as is
    Set(Set),
    /// A selector string resolved against the context
    Query(String),
    /// Run once the document is ready
    Ready(ReadyCallback),
}

impl Selector {
    pub fn ready<F>(callback: F) -> Self
    where
        F: FnOnce(&Host) + 'static,
    {
        Self::Ready(Box::new(callback))
    }
}

impl From<&str> for Selector {
    fn from(selector: &str) -> Self {
        if selector.is_empty() {
            Self::Empty
        } else {
            Self::Query(selector.to_string())
        }
    }
}

impl From<String> for Selector {
    fn from(selector: String) -> Self {
        if selector.is_empty() {
            Self::Empty
        } else {
            Self::Query(selector)
        }
    }
}

impl From<&String> for Selector {
    fn from(selector: &String) -> Self {
        Self::from(selector.as_str())
    }
}

impl From<NodeId> for Selector {
    fn from(node: NodeId) -> Self {
        match node {
            NodeId::WINDOW => Self::Window,
            NodeId::NONE => Self::Empty,
            node => Self::Node(node),
        }
    }
}

impl From<Set> for Selector {
    fn from(set: Set) -> Self {
        Self::Set(set)
    }
}

impl From<&Set> for Selector {
    fn from(set: &Set) -> Self {
        Self::Set(set.clone())
    }
}

impl<T: Into<Selector>> From<Option<T>> for Selector {
    fn from(selector: Option<T>) -> Self {
        selector.map_or(Self::Empty, Into::into)
    }
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Window => f.write_str("Window"),
            Self::Node(node) => f.debug_tuple("Node").field(node).finish(),
            Self::Set(set) => f.debug_tuple("Set").field(set).finish(),
            Self::Query(query) => f.debug_tuple("Query").field(query).finish(),
            Self::Ready(_) => f.write_str("Ready(..)"),
        }
    }
}

/// Scope a selector string is resolved against
#[derive(Debug, Clone, Default)]
pub enum Context {
    /// The whole document
    #[default]
    Document,
    /// Descendants of one node
    Node(NodeId),
    /// Descendants of every node in a set
    Set(Box<Set>),
}

impl From<NodeId> for Context {
    fn from(node: NodeId) -> Self {
        if node == NodeId::ROOT {
            Self::Document
        } else {
            Self::Node(node)
        }
    }
}

impl From<Set> for Context {
    fn from(set: Set) -> Self {
        Self::Set(Box::new(set))
    }
}

impl From<&Set> for Context {
    fn from(set: &Set) -> Self {
        Self::Set(Box::new(set.clone()))
    }
}

impl From<Option<NodeId>> for Context {
    fn from(node: Option<NodeId>) -> Self {
        node.map_or(Self::Document, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_inputs() {
        assert!(matches!(Selector::from(""), Selector::Empty));
        assert!(matches!(Selector::from(String::new()), Selector::Empty));
        assert!(matches!(Selector::from("li"), Selector::Query(q) if q == "li"));
        // Whitespace is a (malformed) query, not an empty input
        assert!(matches!(Selector::from(" "), Selector::Query(_)));
    }

    #[test]
    fn test_node_inputs() {
        assert!(matches!(Selector::from(NodeId::WINDOW), Selector::Window));
        assert!(matches!(Selector::from(NodeId::NONE), Selector::Empty));
        assert!(matches!(Selector::from(NodeId::ROOT), Selector::Node(NodeId::ROOT)));
        assert!(matches!(Selector::from(None::<NodeId>), Selector::Empty));
    }

    #[test]
    fn test_context_inputs() {
        assert!(matches!(Context::from(NodeId::ROOT), Context::Document));
        assert!(matches!(Context::from(None::<NodeId>), Context::Document));
        assert!(matches!(Context::default(), Context::Document));
    }
}
