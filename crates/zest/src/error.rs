//! Error types

use thiserror::Error;
use zest_css::SelectorError;
use zest_dom::DomError;

/// Errors surfaced by set construction and the mutation helpers
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("selector error: {0}")]
    Selector(#[from] SelectorError),

    #[error("DOM error: {0}")]
    Dom(#[from] DomError),

    #[error("invalid insert position: {0}")]
    InvalidPosition(String),
}

pub type Result<T> = std::result::Result<T, Error>;
