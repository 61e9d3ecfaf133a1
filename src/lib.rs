//! structblock - composite form-field widgets for structured content editing
//!
//! A struct block groups a fixed, named set of child blocks into one form
//! field. Widgets render into an in-memory [`ui::dom::Document`], exchange
//! state as JSON and can show a read-only summary until the user clicks
//! to edit.

pub mod config;
pub mod error;
pub mod state;
pub mod ui;

pub use error::{Error, Result};
