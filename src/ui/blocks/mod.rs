//! Block widgets
//!
//! This module contains the live widgets and their definitions:
//! - `widget`: `Widget` and `BlockDefinition` traits shared by every kind
//! - `struct_block`: composite block over a fixed set of named children
//! - `list_block`: variable-length sequence of one child kind
//! - `field_block`: leaf form control
//! - `preview`: read-only summary rendering of block state

mod field_block;
mod list_block;
mod preview;
mod struct_block;
mod widget;

pub use field_block::{FieldBlock, FieldBlockDefinition};
pub use list_block::{ListBlock, ListBlockDefinition};
pub use preview::{render_block_value, render_list_summary, render_struct_summary};
pub use struct_block::{
    PreviewRegions, StructBlock, StructBlockDefinition, CHILD_MOUNT_ATTR, INVISIBLE_CLASS,
    PREFIX_TOKEN,
};
pub(crate) use struct_block::duplicate_name;
pub use widget::{BlockDefRef, BlockDefinition, FocusOptions, TextLabelOptions, Widget};
