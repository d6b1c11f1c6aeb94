//! Class Algebra
//!
//! The `class` attribute treated as a set of whitespace-separated tokens.
//! Matching is always by whole token, so `foo` never matches `foobar`.

use zest_dom::NodeId;

use crate::Set;

/// Collapse whitespace runs to one space and trim both ends
pub fn sanitize(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Class tokens of one element, in attribute order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    tokens: Vec<String>,
}

impl ClassList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a space-separated string
    pub fn parse(s: &str) -> Self {
        Self {
            tokens: s.split_whitespace().map(str::to_string).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// Append every token of `names`, then drop repeats (first one wins)
    pub fn add(&mut self, names: &str) {
        let mut merged: Vec<String> = Vec::with_capacity(self.tokens.len());
        for token in self.tokens.drain(..).chain(names.split_whitespace().map(str::to_string)) {
            if !merged.contains(&token) {
                merged.push(token);
            }
        }
        self.tokens = merged;
    }

    /// Drop every token the pattern matches
    pub fn remove(&mut self, pattern: &ClassPattern) {
        self.tokens.retain(|t| !pattern.matches_token(t));
    }

    /// Value to write back to the attribute
    pub fn value(&self) -> String {
        self.tokens.join(" ")
    }
}

impl std::fmt::Display for ClassList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value())
    }
}

/// Which class tokens an operation applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassPattern {
    /// Every token
    Any,
    /// Exactly these tokens; an empty list matches nothing
    Tokens(Vec<String>),
}

impl ClassPattern {
    /// Pattern for the tokens of a space-separated names string
    pub fn new(names: &str) -> Self {
        Self::Tokens(names.split_whitespace().map(str::to_string).collect())
    }

    pub fn matches_token(&self, token: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Tokens(names) => names.iter().any(|n| n == token),
        }
    }

    /// True if any token of the class string matches
    pub fn matches(&self, class: &str) -> bool {
        class.split_whitespace().any(|t| self.matches_token(t))
    }
}

impl Set {
    /// Whether any element has any of the classes in `names`
    pub fn has_class(&self, names: &str) -> bool {
        let pattern = ClassPattern::new(names);
        self.elements().any(|node| {
            self.host()
                .attribute(node, "class")
                .is_some_and(|class| pattern.matches(&class))
        })
    }

    /// Add every class in `names` to each element
    pub fn add_class(&self, names: &str) -> &Self {
        for node in self.elements() {
            self.edit_classes(node, |list| list.add(names));
        }
        self
    }

    /// Remove the classes in `names` from each element
    ///
    /// `None` or a blank string removes every class.
    pub fn remove_class(&self, names: Option<&str>) -> &Self {
        let pattern = match names {
            Some(names) if !names.trim().is_empty() => ClassPattern::new(names),
            _ => ClassPattern::Any,
        };
        for node in self.elements() {
            self.edit_classes(node, |list| list.remove(&pattern));
        }
        self
    }

    /// Toggle the classes in `names`
    ///
    /// With `force` every class is added (`Some(true)`) or removed
    /// (`Some(false)`). Without it each class flips on each element
    /// independently: one class is tested and flipped on every element
    /// before the next class is looked at.
    pub fn toggle_class(&self, names: &str, force: Option<bool>) -> &Self {
        match force {
            Some(true) => self.add_class(names),
            Some(false) => self.remove_class(Some(names)),
            None => {
                let elements: Vec<NodeId> = self.elements().collect();
                for name in names.split_whitespace() {
                    let pattern = ClassPattern::new(name);
                    for &node in &elements {
                        self.edit_classes(node, |list| {
                            if list.iter().any(|t| pattern.matches_token(t)) {
                                list.remove(&pattern);
                            } else {
                                list.add(name);
                            }
                        });
                    }
                }
                self
            }
        }
    }

    /// Read, edit and write back one element's class list
    fn edit_classes(&self, node: NodeId, edit: impl FnOnce(&mut ClassList)) {
        let mut doc = self.host().document_mut();
        let tree = doc.tree_mut();
        let mut list = ClassList::parse(tree.attribute(node, "class").unwrap_or_default());
        edit(&mut list);
        if let Err(err) = tree.set_attribute(node, "class", &list.value()) {
            tracing::debug!(?node, %err, "class list not written");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Host;

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("  a \t b\n\nc  "), "a b c");
        assert_eq!(sanitize("   "), "");
    }

    #[test]
    fn test_add_dedups() {
        let mut list = ClassList::parse("x  a");
        list.add("a a b");
        assert_eq!(list.value(), "x a b");
    }

    #[test]
    fn test_pattern_whole_tokens() {
        let pattern = ClassPattern::new("foo");
        assert!(!pattern.matches("foobar"));
        assert!(!pattern.matches("barfoo"));
        assert!(pattern.matches("bar foo baz"));
        assert!(!ClassPattern::new("").matches("anything"));
        assert!(ClassPattern::Any.matches("anything"));
        assert!(!ClassPattern::Any.matches("   "));
    }

    #[test]
    fn test_remove_every_occurrence() {
        let mut list = ClassList::parse("a b a c a");
        list.remove(&ClassPattern::new("a c"));
        assert_eq!(list.value(), "b");
    }

    #[test]
    fn test_set_class_operations() {
        let host = Host::from_html(r#"<p class=" one  two ">x</p><p>y</p>"#).unwrap();
        let paragraphs = host.select("p").unwrap();

        paragraphs.add_class("two three");
        assert_eq!(host.attribute(paragraphs.get(0).unwrap(), "class").as_deref(), Some("one two three"));
        assert_eq!(host.attribute(paragraphs.get(1).unwrap(), "class").as_deref(), Some("two three"));

        paragraphs.remove_class(Some("two"));
        assert!(!paragraphs.has_class("two"));
        assert!(paragraphs.has_class("one"));

        paragraphs.remove_class(None);
        assert!(!paragraphs.has_class("one three"));
        assert_eq!(host.attribute(paragraphs.get(0).unwrap(), "class").as_deref(), Some(""));
    }

    #[test]
    fn test_has_class_matches_any_token() {
        let host = Host::from_html(r#"<i class="a">x</i><b class="bar foo">y</b>"#).unwrap();
        let italic = host.select("i").unwrap();
        assert!(italic.has_class("zzz a"));
        assert!(italic.has_class("a zzz"));
        assert!(!italic.has_class("zzz"));

        // Only the second element carries the token
        let both = host.select("i, b").unwrap();
        assert!(both.has_class("zzz foo"));
        assert!(!both.has_class("zzz qux"));
    }

    #[test]
    fn test_toggle_per_element() {
        let host = Host::from_html(r#"<p class="a">x</p><p class="b">y</p>"#).unwrap();
        let paragraphs = host.select("p").unwrap();
        let (first, second) = (paragraphs.get(0).unwrap(), paragraphs.get(1).unwrap());

        paragraphs.toggle_class("a b", None);
        assert_eq!(host.attribute(first, "class").as_deref(), Some("b"));
        assert_eq!(host.attribute(second, "class").as_deref(), Some("a"));

        paragraphs.toggle_class("c", Some(true)).toggle_class("a", Some(false));
        assert_eq!(host.attribute(first, "class").as_deref(), Some("b c"));
        assert_eq!(host.attribute(second, "class").as_deref(), Some("c"));
    }

    #[test]
    fn test_window_is_skipped() {
        let host = Host::new();
        let window = host.select(NodeId::WINDOW).unwrap();
        window.add_class("a");
        assert!(!window.has_class("a"));
    }
}
