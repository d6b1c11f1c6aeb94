//! Set Builder - turns a selector input and a context into a set

use std::collections::HashSet;

use zest_dom::NodeId;

use crate::{Context, Host, Result, Selector, Set};

impl Host {
    /// Build a set, resolving selector strings against the whole document
    pub fn select(&self, selector: impl Into<Selector>) -> Result<Set> {
        resolve(self, selector.into(), Context::Document)
    }

    /// Build a set, resolving selector strings against `context`
    pub fn select_in(
        &self,
        selector: impl Into<Selector>,
        context: impl Into<Context>,
    ) -> Result<Set> {
        resolve(self, selector.into(), context.into())
    }
}

/// Resolve one input
///
/// `context` only matters for `Selector::Query`. A query against a set
/// runs once per node; the combined result keeps the first occurrence of
/// every node.
pub(crate) fn resolve(host: &Host, selector: Selector, context: Context) -> Result<Set> {
    match selector {
        Selector::Empty => Ok(Set::empty(host)),
        Selector::Window => Ok(Set::of_node(host, NodeId::WINDOW)),
        Selector::Node(node) => Ok(Set::of_node(host, node)),
        Selector::Set(set) => Ok(set),
        Selector::Ready(callback) => {
            host.ready(callback);
            Ok(Set::from_parts(host, Vec::new(), None, None))
        }
        Selector::Query(query) => {
            let nodes = match &context {
                Context::Document => host.query_selector_all(NodeId::ROOT, &query)?,
                Context::Node(scope) => host.query_selector_all(*scope, &query)?,
                Context::Set(scopes) => {
                    let mut seen = HashSet::new();
                    let mut nodes = Vec::new();
                    for scope in scopes.iter() {
                        for node in host.query_selector_all(scope, &query)? {
                            if seen.insert(node) {
                                nodes.push(node);
                            }
                        }
                    }
                    nodes
                }
            };
            tracing::debug!("{:?} matched {} node(s)", query, nodes.len());
            Ok(Set::from_parts(host, nodes, Some(query), Some(context)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn nested() -> Host {
        Host::from_html(
            r#"<div class="outer"><div class="inner"><p>1</p><p>2</p></div></div><p>3</p>"#,
        )
        .unwrap()
    }

    #[test]
    fn test_empty_input() {
        let host = nested();
        let set = host.select("").unwrap();
        assert!(set.is_empty());
        assert!(set.selector().is_none());
        assert!(matches!(set.context(), Some(Context::Document)));
    }

    #[test]
    fn test_window_input() {
        let host = nested();
        let set = host.select(NodeId::WINDOW).unwrap();
        assert_eq!(set.to_vec(), vec![NodeId::WINDOW]);
        assert!(set.context().is_none());
    }

    #[test]
    fn test_node_input() {
        let host = nested();
        let body = host.body();
        let set = host.select(body).unwrap();
        assert_eq!(set.to_vec(), vec![body]);
        assert!(set.selector().is_none());
        assert!(matches!(set.context(), Some(Context::Node(n)) if *n == body));
    }

    #[test]
    fn test_document_node_input_has_document_context() {
        let host = nested();
        let set = host.select(NodeId::ROOT).unwrap();
        assert_eq!(set.to_vec(), vec![NodeId::ROOT]);
        assert!(matches!(set.context(), Some(Context::Document)));
        assert_eq!(set.find("p").unwrap().len(), 3);
    }

    #[test]
    fn test_set_input_copies() {
        let host = nested();
        let paragraphs = host.select("p").unwrap();
        let copy = host.select(&paragraphs).unwrap();
        assert_eq!(copy.to_vec(), paragraphs.to_vec());
        assert_eq!(copy.selector(), Some("p"));
    }

    #[test]
    fn test_query_against_set_dedups() {
        let host = nested();
        let divs = host.select("div").unwrap();
        assert_eq!(divs.len(), 2);

        // Both divs contain the two inner paragraphs
        let found = host.select_in("p", &divs).unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.is_unique());
    }

    #[test]
    fn test_query_against_node() {
        let host = nested();
        let inner = host.select(".inner").unwrap().get(0).unwrap();
        assert_eq!(host.select_in("p", inner).unwrap().len(), 2);
        assert_eq!(host.select("p").unwrap().len(), 3);
    }

    #[test]
    fn test_invalid_selector_propagates() {
        let host = nested();
        assert!(matches!(host.select("p["), Err(Error::Selector(_))));
        assert!(matches!(host.select_in("p", NodeId::WINDOW), Err(Error::Dom(_))));
    }

    #[test]
    fn test_ready_input_returns_bare_set() {
        let host = Host::with_config(crate::Config::loaded());
        let set = host.select(Selector::ready(|_| {})).unwrap();
        assert!(set.is_empty());
        assert!(set.selector().is_none());
        assert!(set.context().is_none());
    }
}
