//! Virtual document layer
//!
//! - `node`: detached markup builder with explicit escaped / trusted content
//! - `document`: arena tree that widgets mount into and mutate
//! - `parse`: HTML fragment parsing for templates and raw HTML values

mod document;
mod node;
mod parse;

pub use document::{Document, NodeId};
pub use node::{escape, render_fragment, Element, Fragment, Node};
pub use parse::{parse_fragment, strip_scripts};
