//! zest HTML
//!
//! HTML5 parsing built on html5ever, converted into the arena DOM, and
//! serialization back to markup for `innerHTML`.

mod parser;
mod serializer;

pub use parser::HtmlParser;
pub use serializer::HtmlSerializer;
pub use zest_dom::{Document, DomResult, DomTree, NodeId};

/// Parse an HTML string into a Document
pub fn parse(html: &str) -> DomResult<Document> {
    HtmlParser::new().parse(html)
}

/// Parse an HTML string with a document URL
pub fn parse_with_url(html: &str, url: &str) -> DomResult<Document> {
    HtmlParser::new().parse_with_url(html, url)
}

/// Markup of a node's children
pub fn inner_html(tree: &DomTree, node: NodeId) -> String {
    HtmlSerializer::new().serialize_inner(tree, node)
}

/// Markup of a node including itself
pub fn outer_html(tree: &DomTree, node: NodeId) -> String {
    HtmlSerializer::new().serialize_outer(tree, node)
}
