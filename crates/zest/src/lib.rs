//! zest
//!
//! Chainable matched-element sets over a lightweight DOM.
//!
//! A [`Host`] owns a document, its event listeners and the ready gate.
//! Every query goes through [`Host::select`], which resolves a selector,
//! node, set or ready callback into a [`Set`].
//!
//! # Example
//! ```rust,ignore
//! use zest::{Handler, Host};
//!
//! let host = Host::from_html(r#"<ul id="menu"><li>a</li><li>b</li></ul>"#)?;
//! host.select("li")?.add_class("item").toggle_class("on", None);
//!
//! host.select("#menu")?.delegate("li", "click", Handler::new(|host, li, _event| {
//!     let _ = host.set_attribute(li, "aria-selected", "true");
//! }))?;
//! host.ready(|host| tracing::info!("ready: {}", host.document().url()));
//! host.finish_parsing();
//! ```

mod attributes;
mod builder;
mod class_list;
mod config;
mod error;
mod events;
mod host;
mod input;
mod manipulation;
mod ready;
mod set;
mod style;

pub use class_list::{sanitize, ClassList, ClassPattern};
pub use config::Config;
pub use error::{Error, Result};
pub use events::Handler;
pub use host::{Host, InsertPosition};
pub use input::{Context, ReadyCallback, Selector};
pub use set::Set;
pub use style::Transition;

pub use zest_dom::{Event, EventPhase, EventType, ListenerOptions, NodeId, ReadyState};

// Re-export sub-crates for advanced usage
pub use zest_css as css;
pub use zest_dom as dom;
pub use zest_html as html;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
