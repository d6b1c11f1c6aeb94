//! Host Configuration

use zest_dom::ReadyState;

/// Host configuration options
#[derive(Debug, Clone)]
pub struct Config {
    /// Document URL
    pub url: String,

    /// Ready state the document starts in
    pub ready_state: ReadyState,

    /// Register the no-op `unload` listener on first `ready` call
    pub unload_fix: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: "about:blank".to_string(),
            ready_state: ReadyState::Loading,
            unload_fix: true,
        }
    }
}

impl Config {
    /// Configuration for a document that has already finished loading
    pub fn loaded() -> Self {
        Self {
            ready_state: ReadyState::Complete,
            ..Self::default()
        }
    }
}
