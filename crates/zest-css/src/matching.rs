//! Selector matching against the DOM tree

use zest_dom::{DomTree, NodeData, NodeId};

use crate::selectors::{
    Combinator, ComplexSelector, Compound, PseudoClass, SelectorComponent, SelectorList,
};

/// Matching descendants of `scope`, in document order
///
/// `scope` itself is never part of the result, but combinators may look
/// at its ancestors: `div li` scoped to a `<ul>` inside a `<div>` finds
/// the list items.
pub fn query_selector_all(tree: &DomTree, scope: NodeId, selectors: &SelectorList) -> Vec<NodeId> {
    tree.descendants(scope)
        .filter(|&node| matches(tree, node, selectors))
        .collect()
}

/// First matching descendant of `scope`
pub fn query_selector(tree: &DomTree, scope: NodeId, selectors: &SelectorList) -> Option<NodeId> {
    tree.descendants(scope)
        .find(|&node| matches(tree, node, selectors))
}

/// Check if an element matches any selector of the list
pub fn matches(tree: &DomTree, node: NodeId, selectors: &SelectorList) -> bool {
    tree.is_element(node)
        && selectors
            .iter()
            .any(|sel| matches_complex(tree, node, sel, sel.compounds.len() - 1))
}

/// Right-to-left match of `compounds[..=idx]` with `node` as the subject
fn matches_complex(tree: &DomTree, node: NodeId, sel: &ComplexSelector, idx: usize) -> bool {
    if !matches_compound(tree, node, &sel.compounds[idx]) {
        return false;
    }
    if idx == 0 {
        return true;
    }

    let next = idx - 1;
    match sel.combinators[next] {
        Combinator::Descendant => tree
            .ancestors(node)
            .filter(|&a| tree.is_element(a))
            .any(|a| matches_complex(tree, a, sel, next)),
        Combinator::Child => tree
            .parent(node)
            .is_some_and(|p| tree.is_element(p) && matches_complex(tree, p, sel, next)),
        Combinator::NextSibling => {
            previous_element_siblings(tree, node)
                .next()
                .is_some_and(|s| matches_complex(tree, s, sel, next))
        }
        Combinator::SubsequentSibling => {
            previous_element_siblings(tree, node).any(|s| matches_complex(tree, s, sel, next))
        }
    }
}

fn previous_element_siblings(tree: &DomTree, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
    let first = tree.get(node).map_or(NodeId::NONE, |n| n.prev_sibling);
    std::iter::successors(Some(first), move |&id| tree.get(id).map(|n| n.prev_sibling))
        .take_while(|id| id.is_valid())
        .filter(move |&id| tree.is_element(id))
}

fn matches_compound(tree: &DomTree, node: NodeId, compound: &Compound) -> bool {
    compound.0.iter().all(|c| matches_component(tree, node, c))
}

fn matches_component(tree: &DomTree, node: NodeId, component: &SelectorComponent) -> bool {
    match component {
        SelectorComponent::Universal => true,
        SelectorComponent::Type(tag) => tree
            .tag_name(node)
            .is_some_and(|t| t.eq_ignore_ascii_case(tag)),
        SelectorComponent::Id(id) => tree.attribute(node, "id") == Some(id.as_str()),
        SelectorComponent::Class(class) => tree
            .attribute(node, "class")
            .is_some_and(|c| c.split_whitespace().any(|t| t == class)),
        SelectorComponent::Attribute(attr) => attr.matches(tree.attribute(node, &attr.name)),
        SelectorComponent::PseudoClass(pseudo) => matches_pseudo_class(tree, node, pseudo),
    }
}

/// Position of an element among its element siblings (1-based) and
/// the sibling count, optionally counting only same-tag siblings
fn sibling_position(tree: &DomTree, node: NodeId, same_type: bool) -> (usize, usize) {
    let Some(parent) = tree.parent(node) else {
        return (1, 1);
    };
    let tag = tree.tag_name(node);
    let mut index = 0;
    let mut count = 0;
    for sibling in tree.element_children(parent) {
        if same_type && tree.tag_name(sibling) != tag {
            continue;
        }
        count += 1;
        if sibling == node {
            index = count;
        }
    }
    (index, count)
}

fn matches_pseudo_class(tree: &DomTree, node: NodeId, pseudo: &PseudoClass) -> bool {
    let position = |same_type| sibling_position(tree, node, same_type);
    let from_end = |(index, count): (usize, usize)| (count - index + 1) as i32;

    match pseudo {
        PseudoClass::Root => tree.parent(node) == Some(tree.root()),
        PseudoClass::Empty => tree
            .children(node)
            .all(|(_, child)| matches!(child.data, NodeData::Comment(_))),
        PseudoClass::FirstChild => position(false).0 == 1,
        PseudoClass::LastChild => {
            let (index, count) = position(false);
            index == count
        }
        PseudoClass::OnlyChild => position(false).1 == 1,
        PseudoClass::FirstOfType => position(true).0 == 1,
        PseudoClass::LastOfType => {
            let (index, count) = position(true);
            index == count
        }
        PseudoClass::OnlyOfType => position(true).1 == 1,
        PseudoClass::NthChild(expr) => expr.matches(position(false).0 as i32),
        PseudoClass::NthLastChild(expr) => expr.matches(from_end(position(false))),
        PseudoClass::NthOfType(expr) => expr.matches(position(true).0 as i32),
        PseudoClass::NthLastOfType(expr) => expr.matches(from_end(position(true))),
        PseudoClass::Not(list) => !matches(tree, node, list),
        PseudoClass::Is(list) | PseudoClass::Where(list) => matches(tree, node, list),
        PseudoClass::Link => {
            matches!(tree.tag_name(node), Some("a" | "area"))
                && tree.attribute(node, "href").is_some()
        }
        PseudoClass::Checked => tree.attribute(node, "checked").is_some(),
        PseudoClass::Disabled => tree.attribute(node, "disabled").is_some(),
        PseudoClass::Enabled => tree.attribute(node, "disabled").is_none(),
        PseudoClass::Lang(lang) => std::iter::once(node)
            .chain(tree.ancestors(node))
            .find_map(|n| tree.attribute(n, "lang"))
            .is_some_and(|l| {
                let l = l.to_ascii_lowercase();
                l == *lang || l.starts_with(&format!("{}-", lang))
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_selector_list;

    /// `<div id=app><ul class="menu"><li>a</li><li class="on">b</li><li>c</li></ul></div>`
    fn fixture() -> (DomTree, NodeId, NodeId, Vec<NodeId>) {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        tree.set_attribute(div, "id", "app").unwrap();
        tree.append_child(tree.root(), div).unwrap();
        let ul = tree.create_element("ul");
        tree.set_attribute(ul, "class", "menu").unwrap();
        tree.append_child(div, ul).unwrap();
        let mut items = Vec::new();
        for label in ["a", "b", "c"] {
            let li = tree.create_element("li");
            let text = tree.create_text(label);
            tree.append_child(ul, li).unwrap();
            tree.append_child(li, text).unwrap();
            items.push(li);
        }
        tree.set_attribute(items[1], "class", "on").unwrap();
        (tree, div, ul, items)
    }

    fn query(tree: &DomTree, scope: NodeId, sel: &str) -> Vec<NodeId> {
        query_selector_all(tree, scope, &parse_selector_list(sel).unwrap())
    }

    #[test]
    fn test_scope_excludes_itself() {
        let (tree, _, ul, items) = fixture();
        assert_eq!(query(&tree, ul, "ul, li"), items);
    }

    #[test]
    fn test_combinator_may_reach_outside_scope() {
        let (tree, _, ul, items) = fixture();
        assert_eq!(query(&tree, ul, "#app li"), items);
        assert_eq!(query(&tree, ul, "div > li"), Vec::<NodeId>::new());
    }

    #[test]
    fn test_sibling_combinators() {
        let (tree, _, _, items) = fixture();
        let root = tree.root();
        assert_eq!(query(&tree, root, ".on + li"), vec![items[2]]);
        assert_eq!(query(&tree, root, "li ~ li"), vec![items[1], items[2]]);
    }

    #[test]
    fn test_structural_pseudo_classes() {
        let (tree, _, _, items) = fixture();
        let root = tree.root();
        assert_eq!(query(&tree, root, "li:first-child"), vec![items[0]]);
        assert_eq!(query(&tree, root, "li:last-child"), vec![items[2]]);
        assert_eq!(query(&tree, root, "li:nth-child(odd)"), vec![items[0], items[2]]);
        assert_eq!(query(&tree, root, "li:not(.on)"), vec![items[0], items[2]]);
        assert_eq!(query(&tree, root, "div:root").len(), 1);
    }

    #[test]
    fn test_class_matches_whole_token() {
        let (mut tree, _, _, items) = fixture();
        tree.set_attribute(items[0], "class", "online").unwrap();
        assert_eq!(query(&tree, tree.root(), ".on"), vec![items[1]]);
    }

    #[test]
    fn test_document_order_for_lists() {
        let (tree, div, ul, items) = fixture();
        let found = query(&tree, tree.root(), "li, ul, div");
        assert_eq!(found, vec![div, ul, items[0], items[1], items[2]]);
    }
}
