//! Document - High-level document API

use crate::{DomTree, NodeId};

/// Document loading state, as exposed by `document.readyState`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadyState {
    /// Still parsing
    #[default]
    Loading,
    /// Parsed, `DOMContentLoaded` has fired, subresources pending
    Interactive,
    /// Fully loaded
    Complete,
}

impl ReadyState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Interactive => "interactive",
            Self::Complete => "complete",
        }
    }
}

/// HTML Document
#[derive(Debug)]
pub struct Document {
    pub tree: DomTree,
    url: String,
    ready_state: ReadyState,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
}

impl Document {
    /// Create a document with an empty `<html><head><body>` skeleton
    pub fn new(url: &str) -> Self {
        let mut doc = Self::empty(url);
        let tree = &mut doc.tree;

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        // Freshly created nodes cannot violate the hierarchy rules.
        let _ = tree.append_child(tree.root(), html);
        let _ = tree.append_child(html, head);
        let _ = tree.append_child(html, body);

        doc.html_element = html;
        doc.head_element = head;
        doc.body_element = body;
        doc
    }

    /// Create an empty document (no structure)
    pub fn empty(url: &str) -> Self {
        Self {
            tree: DomTree::new(),
            url: url.to_string(),
            ready_state: ReadyState::Loading,
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    pub fn set_ready_state(&mut self, state: ReadyState) {
        tracing::debug!("document {} ready state -> {}", self.url, state.as_str());
        self.ready_state = state;
    }

    /// Re-detect the cached `<html>`, `<head>` and `<body>` elements
    pub fn finalize(&mut self) {
        let tree = &self.tree;
        let html = tree
            .element_children(tree.root())
            .find(|&id| tree.tag_name(id) == Some("html"))
            .unwrap_or(NodeId::NONE);
        let find_child = |tag: &str| {
            tree.element_children(html)
                .find(|&id| tree.tag_name(id) == Some(tag))
                .unwrap_or(NodeId::NONE)
        };
        let head = find_child("head");
        let body = find_child("body");

        self.html_element = html;
        self.head_element = head;
        self.body_element = body;
    }

    /// Text of the first `<title>` in `<head>`
    pub fn title(&self) -> String {
        self.tree
            .element_children(self.head_element)
            .find(|&id| self.tree.tag_name(id) == Some("title"))
            .map(|id| self.tree.text_content(id).trim().to_string())
            .unwrap_or_default()
    }

    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    pub fn head(&self) -> NodeId {
        self.head_element
    }

    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// First element in document order with the given id
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree
            .descendants(self.tree.root())
            .find(|&node| self.tree.attribute(node, "id") == Some(id))
    }

    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_structure() {
        let doc = Document::new("about:blank");
        assert_eq!(doc.tree().tag_name(doc.document_element()), Some("html"));
        assert_eq!(doc.tree().tag_name(doc.head()), Some("head"));
        assert_eq!(doc.tree().tag_name(doc.body()), Some("body"));
        assert_eq!(doc.ready_state(), ReadyState::Loading);
    }

    #[test]
    fn test_finalize_finds_elements() {
        let mut doc = Document::empty("about:blank");
        let tree = doc.tree_mut();
        let html = tree.create_element("html");
        let body = tree.create_element("body");
        tree.append_child(tree.root(), html).unwrap();
        tree.append_child(html, body).unwrap();

        doc.finalize();
        assert_eq!(doc.body(), body);
        assert!(!doc.head().is_valid());
    }

    #[test]
    fn test_title_and_lookup_by_id() {
        let mut doc = Document::default();
        let (head, body) = (doc.head(), doc.body());
        let tree = doc.tree_mut();
        let title = tree.create_element("title");
        let text = tree.create_text(" Inbox ");
        tree.append_child(head, title).unwrap();
        tree.append_child(title, text).unwrap();
        let main = tree.create_element("main");
        tree.set_attribute(main, "id", "app").unwrap();
        tree.append_child(body, main).unwrap();

        assert_eq!(doc.title(), "Inbox");
        assert_eq!(doc.get_element_by_id("app"), Some(main));
        assert_eq!(doc.get_element_by_id("missing"), None);
    }
}
