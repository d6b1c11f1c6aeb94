//! Attribute access

use crate::{Result, Set};

impl Set {
    /// Attribute of the first node; `None` when missing or the set is empty
    pub fn attr(&self, name: &str) -> Option<String> {
        self.get(0).and_then(|node| self.host().attribute(node, name))
    }

    /// Set an attribute on every node
    pub fn set_attr(&self, name: &str, value: &str) -> Result<&Self> {
        for node in self.iter() {
            self.host().set_attribute(node, name, value)?;
        }
        Ok(self)
    }

    /// Remove an attribute from every node
    pub fn remove_attr(&self, name: &str) -> Result<&Self> {
        for node in self.iter() {
            self.host().remove_attribute(node, name)?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::Host;

    #[test]
    fn test_attr_round_trip() {
        let host = Host::from_html(r#"<a href="/one">1</a><a>2</a>"#).unwrap();
        let links = host.select("a").unwrap();

        assert_eq!(links.attr("href").as_deref(), Some("/one"));
        assert_eq!(links.eq(1).attr("href"), None);

        links.set_attr("rel", "next").unwrap();
        assert_eq!(host.select("[rel=next]").unwrap().len(), 2);

        links.remove_attr("href").unwrap().remove_attr("missing").unwrap();
        assert!(links.attr("href").is_none());
    }

    #[test]
    fn test_attr_on_empty_set() {
        let host = Host::new();
        assert!(host.select("a").unwrap().attr("href").is_none());
    }
}
