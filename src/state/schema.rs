//! JSON block definitions
//!
//! A block tree is described as nested objects tagged by `type`:
//!
//! ```json
//! {"type": "struct", "name": "address", "meta": {"label": "Address"},
//!  "children": [{"type": "field", "name": "city",
//!                "meta": {"label": "City", "classname": "field char_field"}}]}
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::BlockMeta;
use crate::config::RenderConfig;
use crate::error::{Error, Result};
use crate::ui::blocks::{
    duplicate_name, BlockDefRef, FieldBlockDefinition, ListBlockDefinition, StructBlockDefinition,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BlockSchema {
    Struct {
        name: String,
        #[serde(default)]
        meta: BlockMeta,
        #[serde(default)]
        children: Vec<BlockSchema>,
    },
    List {
        name: String,
        #[serde(default)]
        meta: BlockMeta,
        child: Box<BlockSchema>,
    },
    Field {
        name: String,
        #[serde(default)]
        meta: BlockMeta,
    },
}

impl BlockSchema {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn name(&self) -> &str {
        match self {
            BlockSchema::Struct { name, .. }
            | BlockSchema::List { name, .. }
            | BlockSchema::Field { name, .. } => name,
        }
    }

    fn meta_mut(&mut self) -> &mut BlockMeta {
        match self {
            BlockSchema::Struct { meta, .. }
            | BlockSchema::List { meta, .. }
            | BlockSchema::Field { meta, .. } => meta,
        }
    }

    /// Fill unset edit labels and help icons from `config`, recursively
    pub fn apply_defaults(&mut self, config: &RenderConfig) {
        let meta = self.meta_mut();
        if meta.strings.edit.is_none() {
            meta.strings.edit = config.edit_label.clone();
        }
        if meta.help_icon.is_none() {
            meta.help_icon = config.help_icon.clone();
        }
        match self {
            BlockSchema::Struct { children, .. } => {
                for child in children {
                    child.apply_defaults(config);
                }
            }
            BlockSchema::List { child, .. } => child.apply_defaults(config),
            BlockSchema::Field { .. } => {}
        }
    }

    /// Build the definition tree
    pub fn into_definition(self) -> Result<BlockDefRef> {
        match self {
            BlockSchema::Struct {
                name,
                meta,
                children,
            } => {
                if let Some(field) = duplicate_name(children.iter().map(BlockSchema::name)) {
                    return Err(Error::DuplicateField {
                        block: name,
                        field: field.to_string(),
                    });
                }
                let child_defs = children
                    .into_iter()
                    .map(BlockSchema::into_definition)
                    .collect::<Result<Vec<_>>>()?;
                Ok(Arc::new(StructBlockDefinition::new(&name, child_defs, meta)))
            }
            BlockSchema::List { name, meta, child } => {
                let child_def = child.into_definition()?;
                Ok(Arc::new(ListBlockDefinition::new(&name, child_def, meta)))
            }
            BlockSchema::Field { name, meta } => {
                Ok(Arc::new(FieldBlockDefinition::new(&name, meta)))
            }
        }
    }
}
