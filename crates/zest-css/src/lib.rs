//! zest CSS Selectors
//!
//! Selector parsing and matching against a `zest_dom::DomTree`. This is
//! the `querySelectorAll` primitive the core resolves selectors with.

mod matching;
mod parser;
mod selectors;

pub use matching::{matches, query_selector, query_selector_all};
pub use parser::parse_selector_list;
pub use selectors::{
    AttributeMatcher, AttributeSelector, Combinator, ComplexSelector, Compound, NthExpression,
    PseudoClass, SelectorComponent, SelectorList,
};

use zest_dom::{DomTree, NodeId};

/// Parse `selectors` and return the matching descendants of `scope`
pub fn select(tree: &DomTree, scope: NodeId, selectors: &str) -> Result<Vec<NodeId>, SelectorError> {
    let list = parse_selector_list(selectors)?;
    let found = query_selector_all(tree, scope, &list);
    tracing::trace!("select {:?} under {} -> {} node(s)", selectors, scope, found.len());
    Ok(found)
}

/// Selector parsing error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,

    #[error("unexpected {found:?} in selector {selector:?}")]
    Unexpected { selector: String, found: String },

    #[error("unbalanced brackets or quotes in selector {0:?}")]
    Unbalanced(String),

    #[error("unsupported pseudo-class {0:?}")]
    UnsupportedPseudo(String),

    #[error("invalid identifier {0:?}")]
    InvalidIdent(String),
}
