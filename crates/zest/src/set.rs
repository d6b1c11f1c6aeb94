//! Matched Set - the chainable collection of nodes

use std::collections::HashSet;

use zest_dom::NodeId;

use crate::builder::resolve;
use crate::{Context, Host, Result, Selector};

/// Ordered collection of matched nodes
///
/// Sets built from a query never hold the same node twice; `add` does not
/// re-check. Nodes are shared with the document: a mutation through one
/// set is visible through every other set holding the same node.
#[derive(Debug, Clone)]
pub struct Set {
    host: Host,
    nodes: Vec<NodeId>,
    selector: Option<String>,
    context: Option<Context>,
}

impl Set {
    pub(crate) fn from_parts(
        host: &Host,
        nodes: Vec<NodeId>,
        selector: Option<String>,
        context: Option<Context>,
    ) -> Self {
        Self {
            host: host.clone(),
            nodes,
            selector,
            context,
        }
    }

    /// Set holding one node, scoped to that node
    pub(crate) fn of_node(host: &Host, node: NodeId) -> Self {
        if node.is_window() {
            return Self::from_parts(host, vec![node], None, None);
        }
        Self::from_parts(host, vec![node], None, Some(Context::from(node)))
    }

    /// Empty set with the document as context
    pub fn empty(host: &Host) -> Self {
        Self::from_parts(host, Vec::new(), None, Some(Context::Document))
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    /// Selector string the set was resolved from, if any
    pub fn selector(&self) -> Option<&str> {
        self.selector.as_deref()
    }

    pub fn context(&self) -> Option<&Context> {
        self.context.as_ref()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    /// Call `f` with the set and each node, in order
    pub fn each<F>(&self, mut f: F) -> &Self
    where
        F: FnMut(&Set, NodeId),
    {
        for &node in &self.nodes {
            f(self, node);
        }
        self
    }

    /// Descendants of every node in the set matching `selector`
    pub fn find(&self, selector: &str) -> Result<Set> {
        resolve(&self.host, Selector::from(selector), Context::from(self))
    }

    /// Node at `index`
    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.nodes.get(index).copied()
    }

    /// Plain copy of all nodes
    pub fn to_vec(&self) -> Vec<NodeId> {
        self.nodes.clone()
    }

    /// One-node set for `index`, empty when out of range
    pub fn eq(&self, index: usize) -> Set {
        match self.get(index) {
            Some(node) => Self::of_node(&self.host, node),
            None => Self::empty(&self.host),
        }
    }

    /// Append nodes in place, duplicates included
    pub fn add<I>(&mut self, nodes: I) -> &mut Self
    where
        I: IntoIterator<Item = NodeId>,
    {
        self.nodes.extend(nodes);
        self
    }

    /// New set from the nodes `f` returns; `None` results are dropped
    pub fn map<F>(&self, mut f: F) -> Set
    where
        F: FnMut(usize, NodeId) -> Option<NodeId>,
    {
        let nodes = self
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(index, &node)| f(index, node))
            .collect();
        Self::from_parts(&self.host, nodes, None, Some(Context::Document))
    }

    /// Whether the nodes are pairwise distinct
    pub fn is_unique(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.nodes.len());
        self.nodes.iter().all(|node| seen.insert(*node))
    }

    /// Elements only, skipping the window and non-element nodes
    pub(crate) fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.iter().filter(|&node| self.host.is_element(node))
    }
}

impl<'a> IntoIterator for &'a Set {
    type Item = NodeId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, NodeId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter().copied()
    }
}

impl IntoIterator for Set {
    type Item = NodeId;
    type IntoIter = std::vec::IntoIter<NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> Host {
        Host::from_html(r#"<ul><li id="a">a</li><li id="b">b</li><li id="c">c</li></ul>"#).unwrap()
    }

    #[test]
    fn test_get_and_eq() {
        let host = list();
        let items = host.select("li").unwrap();

        assert_eq!(items.len(), 3);
        for i in 0..items.len() {
            assert_eq!(items.eq(i).get(0), items.get(i));
        }
        assert!(items.get(3).is_none());
        assert!(items.eq(3).is_empty());
    }

    #[test]
    fn test_each_visits_in_order() {
        let host = list();
        let items = host.select("li").unwrap();
        let mut seen = Vec::new();
        items.each(|set, node| {
            assert_eq!(set.len(), 3);
            seen.push(node);
        });
        assert_eq!(seen, items.to_vec());
    }

    #[test]
    fn test_add_keeps_duplicates() {
        let host = list();
        let items = host.select("li").unwrap();
        let mut twice = items.clone();
        twice.add(items.iter());

        assert_eq!(twice.len(), 6);
        assert!(!twice.is_unique());
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn test_map_drops_none() {
        let host = list();
        let items = host.select("li").unwrap();
        let parents = items.map(|i, node| (i != 1).then(|| host.parent(node)).flatten());

        assert_eq!(parents.len(), 2);
        assert!(parents.selector().is_none());
        assert!(matches!(parents.context(), Some(Context::Document)));
    }

    #[test]
    fn test_iteration() {
        let host = list();
        let items = host.select("li").unwrap();
        let ids: Vec<_> = (&items)
            .into_iter()
            .filter_map(|n| host.attribute(n, "id"))
            .collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(items.clone().into_iter().count(), 3);
    }
}
