//! Trait abstractions shared by every block kind

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;
use crate::state::{BlockKind, BlockMeta, ValidationError};
use crate::ui::dom::{Document, NodeId};

/// Shared handle to an immutable block definition
pub type BlockDefRef = Arc<dyn BlockDefinition>;

/// Options for [`Widget::get_text_label`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextLabelOptions {
    /// Truncate labels longer than this many characters
    pub max_length: Option<usize>,
}

/// Options for [`Widget::focus`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusOptions {
    /// Focus without scrolling the element into view
    pub soft: bool,
}

/// A live, stateful block bound to a region of a [`Document`]
#[cfg_attr(test, mockall::automock)]
pub trait Widget {
    /// Replace the widget's state
    fn set_state(&mut self, doc: &mut Document, state: &Value) -> Result<()>;

    /// Current editable state
    fn get_state(&self) -> Value;

    /// Current clean value
    fn get_value(&self) -> Value;

    /// Display validation errors
    fn set_error(&mut self, doc: &mut Document, errors: &[ValidationError]) -> Result<()>;

    /// Short text describing the current content, if the widget can produce one
    fn get_text_label(&self, _opts: &TextLabelOptions) -> Option<String> {
        None
    }

    fn focus(&mut self, _doc: &mut Document, _opts: &FocusOptions) {}

    /// Id of the element a `<label for>` should point at
    fn id_for_label(&self) -> Option<String> {
        None
    }
}

/// Immutable descriptor of a block that can render live widgets
pub trait BlockDefinition: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    fn meta(&self) -> &BlockMeta;

    fn kind(&self) -> BlockKind {
        BlockKind::from_meta(self.meta())
    }

    /// Child descriptors of a struct block, in declaration order
    fn child_block_defs(&self) -> &[BlockDefRef] {
        &[]
    }

    /// Item descriptor of a list block
    fn child_block_def(&self) -> Option<&BlockDefRef> {
        None
    }

    /// Replace `placeholder` with a live widget for this block
    fn render(
        &self,
        doc: &mut Document,
        placeholder: NodeId,
        prefix: &str,
        initial_state: Option<&Value>,
        initial_error: Option<&[ValidationError]>,
    ) -> Result<Box<dyn Widget>>;
}
