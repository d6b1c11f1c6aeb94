//! HTML and text manipulation

use crate::{InsertPosition, Result, Set};

impl Set {
    /// Markup inside the first node
    pub fn html(&self) -> Option<String> {
        self.get(0).map(|node| self.host().inner_html(node))
    }

    /// Replace the contents of every node with `html`
    pub fn set_html(&self, html: &str) -> Result<&Self> {
        for node in self.iter() {
            self.host().set_inner_html(node, html)?;
        }
        Ok(self)
    }

    /// Parse `html` and insert it at `position` relative to every node
    pub fn insert_html(&self, position: InsertPosition, html: &str) -> Result<&Self> {
        for node in self.iter() {
            self.host().insert_adjacent_html(node, position, html)?;
        }
        Ok(self)
    }

    /// Insert at the end of every node
    pub fn append(&self, html: &str) -> Result<&Self> {
        self.insert_html(InsertPosition::BeforeEnd, html)
    }

    /// Insert at the start of every node
    pub fn prepend(&self, html: &str) -> Result<&Self> {
        self.insert_html(InsertPosition::AfterBegin, html)
    }

    /// Insert before every node
    pub fn before(&self, html: &str) -> Result<&Self> {
        self.insert_html(InsertPosition::BeforeBegin, html)
    }

    /// Insert after every node
    pub fn after(&self, html: &str) -> Result<&Self> {
        self.insert_html(InsertPosition::AfterEnd, html)
    }

    /// Text of every node, joined by a single space
    pub fn text(&self) -> String {
        self.iter()
            .map(|node| self.host().text_content(node))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Append `text` as a text node to every node; markup is not parsed
    pub fn append_text(&self, text: &str) -> Result<&Self> {
        for node in self.iter() {
            self.host().append_text(node, text)?;
        }
        Ok(self)
    }
}
