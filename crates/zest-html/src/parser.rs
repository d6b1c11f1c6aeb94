//! HTML5 Parser implementation
//!
//! Uses html5ever's RcDom and converts the result into our arena DOM.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use zest_dom::{Document, DomResult, DomTree, NodeId};

/// Puts the tokenizer straight into body content for fragments
const FRAGMENT_PREFIX: &str = "<!DOCTYPE html><body>";

/// HTML5 parser
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlParser;

impl HtmlParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> DomResult<Document> {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a document URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> DomResult<Document> {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = parse_document(RcDom::default(), Default::default()).one(html);

        let mut document = Document::empty(url);
        let tree = document.tree_mut();
        let root = tree.root();
        for child in dom.document.children.borrow().iter() {
            if let Some(id) = self.convert_node(child, tree, false)? {
                tree.append_child(root, id)?;
            }
        }
        document.finalize();

        tracing::debug!("Parsed {} nodes", document.tree().len());
        Ok(document)
    }

    /// Parse markup into detached nodes of an existing tree
    ///
    /// The markup is parsed as `<body>` content and the top-level nodes
    /// are returned in source order.
    pub fn parse_fragment(&self, tree: &mut DomTree, html: &str) -> DomResult<Vec<NodeId>> {
        let source = format!("{}{}", FRAGMENT_PREFIX, html);
        let dom = parse_document(RcDom::default(), Default::default()).one(source);

        let mut nodes = Vec::new();
        if let Some(body) = find_body(&dom.document) {
            for child in body.children.borrow().iter() {
                if let Some(id) = self.convert_node(child, tree, true)? {
                    nodes.push(id);
                }
            }
        }

        tracing::trace!("Parsed fragment into {} top-level node(s)", nodes.len());
        Ok(nodes)
    }

    /// Convert an RcDom node (and its subtree) into a detached arena node
    fn convert_node(
        &self,
        handle: &Handle,
        tree: &mut DomTree,
        keep_whitespace: bool,
    ) -> DomResult<Option<NodeId>> {
        let id = match &handle.data {
            RcNodeData::Doctype { name, .. } => tree.create_doctype(name),
            RcNodeData::Text { contents } => {
                let text = contents.borrow();
                if !keep_whitespace && text.trim().is_empty() {
                    return Ok(None);
                }
                tree.create_text(&text)
            }
            RcNodeData::Comment { contents } => tree.create_comment(contents),
            RcNodeData::Element { name, attrs, .. } => {
                let id = tree.create_element(&name.local);
                for attr in attrs.borrow().iter() {
                    tree.set_attribute(id, &attr.name.local, &attr.value)?;
                }

                // Inter-element whitespace only matters once we are in body content
                let keep = keep_whitespace || !matches!(&*name.local, "html" | "head");
                for child in handle.children.borrow().iter() {
                    if let Some(child_id) = self.convert_node(child, tree, keep)? {
                        tree.append_child(id, child_id)?;
                    }
                }
                id
            }
            RcNodeData::Document | RcNodeData::ProcessingInstruction { .. } => return Ok(None),
        };
        Ok(Some(id))
    }
}

fn find_body(document: &Handle) -> Option<Handle> {
    let html = document
        .children
        .borrow()
        .iter()
        .find(|h| is_element(h, "html"))
        .cloned()?;
    html.children
        .borrow()
        .iter()
        .find(|h| is_element(h, "body"))
        .cloned()
}

fn is_element(handle: &Handle, tag: &str) -> bool {
    matches!(&handle.data, RcNodeData::Element { name, .. } if &*name.local == tag)
}
