//! Inline style helpers

use crate::{Result, Set};

impl Set {
    /// Append declarations to the inline style of every node
    pub fn css(&self, declarations: &str) -> Result<&Self> {
        for node in self.iter() {
            self.host().append_style(node, declarations)?;
        }
        Ok(self)
    }

    /// Start a `-webkit-transform`/`opacity` transition
    pub fn transition(&self) -> Transition<'_> {
        Transition::new(self)
    }
}

/// Transition builder, written out by [`Transition::apply`]
#[derive(Debug, Clone)]
#[must_use = "a transition does nothing until applied"]
pub struct Transition<'a> {
    set: &'a Set,
    transform: Option<String>,
    opacity: Option<String>,
    duration_ms: u64,
    delay_ms: u64,
    ease: String,
}

impl<'a> Transition<'a> {
    fn new(set: &'a Set) -> Self {
        Self {
            set,
            transform: None,
            opacity: None,
            duration_ms: 500,
            delay_ms: 0,
            ease: "ease".to_string(),
        }
    }

    pub fn transform(mut self, transform: impl Into<String>) -> Self {
        self.transform = Some(transform.into());
        self
    }

    pub fn opacity(mut self, opacity: impl ToString) -> Self {
        self.opacity = Some(opacity.to_string());
        self
    }

    pub fn duration(mut self, ms: u64) -> Self {
        self.duration_ms = ms;
        self
    }

    pub fn delay(mut self, ms: u64) -> Self {
        self.delay_ms = ms;
        self
    }

    /// Timing function, `ease` by default
    pub fn ease(mut self, ease: impl Into<String>) -> Self {
        self.ease = ease.into();
        self
    }

    /// The declarations `apply` appends
    pub fn declarations(&self) -> String {
        let mut css = format!(
            "-webkit-transition:-webkit-transform, opacity {d}ms,{d}ms {} {}ms;",
            self.ease,
            self.delay_ms,
            d = self.duration_ms
        );
        if let Some(transform) = &self.transform {
            css.push_str(&format!("-webkit-transform:{};", transform));
        }
        if let Some(opacity) = &self.opacity {
            css.push_str(&format!("opacity:{};", opacity));
        }
        css
    }

    pub fn apply(self) -> Result<&'a Set> {
        self.set.css(&self.declarations())
    }
}
