//! Block data model
//!
//! Metadata, field kinds, validation errors and helpers over the opaque
//! JSON state that blocks exchange.

mod definition;
mod rich_text;
mod schema;
mod validation;
mod value;

pub use definition::{BlockKind, BlockMeta, BlockStrings, Choice, DEFAULT_EDIT_LABEL};
pub use rich_text::plain_text;
pub use schema::BlockSchema;
pub use validation::{
    FieldValidationError, ListBlockValidationError, StructBlockValidationError, ValidationError,
};
pub use value::{display_string, selected_choice};

/// Ordered mapping from child name to child state or value
pub type StructState = serde_json::Map<String, serde_json::Value>;
