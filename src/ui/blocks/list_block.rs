//! Block holding a variable-length sequence of one child kind

use serde_json::Value;

use super::widget::{BlockDefRef, BlockDefinition, FocusOptions, TextLabelOptions, Widget};
use crate::error::Result;
use crate::state::{BlockKind, BlockMeta, ValidationError};
use crate::ui::dom::{Document, Element, NodeId};

/// Definition of a list block
#[derive(Debug, Clone)]
pub struct ListBlockDefinition {
    name: String,
    child_block_def: BlockDefRef,
    meta: BlockMeta,
}

impl ListBlockDefinition {
    pub fn new(name: &str, child_block_def: BlockDefRef, meta: BlockMeta) -> Self {
        Self {
            name: name.to_string(),
            child_block_def,
            meta,
        }
    }
}

impl BlockDefinition for ListBlockDefinition {
    fn name(&self) -> &str {
        &self.name
    }

    fn meta(&self) -> &BlockMeta {
        &self.meta
    }

    fn kind(&self) -> BlockKind {
        BlockKind::List
    }

    fn child_block_def(&self) -> Option<&BlockDefRef> {
        Some(&self.child_block_def)
    }

    fn render(
        &self,
        doc: &mut Document,
        placeholder: NodeId,
        prefix: &str,
        initial_state: Option<&Value>,
        initial_error: Option<&[ValidationError]>,
    ) -> Result<Box<dyn Widget>> {
        let block = ListBlock::new(self, doc, placeholder, prefix, initial_state, initial_error)?;
        Ok(Box::new(block))
    }
}

/// Live list block
pub struct ListBlock {
    child_block_def: BlockDefRef,
    prefix: String,
    container: NodeId,
    items: Vec<Box<dyn Widget>>,
}

impl ListBlock {
    pub fn new(
        def: &ListBlockDefinition,
        doc: &mut Document,
        placeholder: NodeId,
        prefix: &str,
        initial_state: Option<&Value>,
        initial_error: Option<&[ValidationError]>,
    ) -> Result<Self> {
        let container = doc.replace_with_node(
            placeholder,
            Element::new("div")
                .class("list-block")
                .class(def.meta.classname.as_deref().unwrap_or_default())
                .into(),
        )?;
        let mut block = Self {
            child_block_def: def.child_block_def.clone(),
            prefix: prefix.to_string(),
            container,
            items: Vec::new(),
        };
        let states = initial_state
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let errors_by_item = item_errors(initial_error);
        for (index, state) in states.iter().enumerate() {
            let error = errors_by_item
                .and_then(|errors| errors.get(index))
                .and_then(Option::as_deref);
            block.append_item(doc, state, error)?;
        }
        Ok(block)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn append_item(
        &mut self,
        doc: &mut Document,
        state: &Value,
        error: Option<&[ValidationError]>,
    ) -> Result<()> {
        let index = self.items.len();
        let wrapper = doc.append(
            self.container,
            Element::new("div")
                .class("list-item")
                .attr("data-list-index", index.to_string())
                .into(),
        );
        let mount = doc.mount_point(wrapper);
        let widget = self.child_block_def.render(
            doc,
            mount,
            &format!("{}-{}-value", self.prefix, index),
            Some(state),
            error,
        )?;
        self.items.push(widget);
        Ok(())
    }
}

/// Per-item errors, present only when exactly one list error was given
fn item_errors(errors: Option<&[ValidationError]>) -> Option<&[Option<Vec<ValidationError>>]> {
    match errors? {
        [ValidationError::List(error)] => Some(error.block_errors.as_slice()),
        _ => None,
    }
}

impl Widget for ListBlock {
    fn set_state(&mut self, doc: &mut Document, state: &Value) -> Result<()> {
        let states = state.as_array().map(Vec::as_slice).unwrap_or_default();
        if states.len() == self.items.len() {
            for (item, state) in self.items.iter_mut().zip(states) {
                item.set_state(doc, state)?;
            }
            return Ok(());
        }

        tracing::debug!(
            prefix = %self.prefix,
            from = self.items.len(),
            to = states.len(),
            "rebuilding list items"
        );
        doc.clear_children(self.container);
        self.items.clear();
        for state in states {
            self.append_item(doc, state, None)?;
        }
        Ok(())
    }

    fn get_state(&self) -> Value {
        Value::Array(self.items.iter().map(|item| item.get_state()).collect())
    }

    fn get_value(&self) -> Value {
        Value::Array(self.items.iter().map(|item| item.get_value()).collect())
    }

    fn set_error(&mut self, doc: &mut Document, errors: &[ValidationError]) -> Result<()> {
        let Some(item_errors) = item_errors(Some(errors)) else {
            return Ok(());
        };
        for (item, errors) in self.items.iter_mut().zip(item_errors) {
            if let Some(errors) = errors {
                item.set_error(doc, errors)?;
            }
        }
        Ok(())
    }

    fn get_text_label(&self, opts: &TextLabelOptions) -> Option<String> {
        self.items
            .iter()
            .filter_map(|item| item.get_text_label(opts))
            .find(|label| !label.is_empty())
    }

    fn focus(&mut self, doc: &mut Document, opts: &FocusOptions) {
        if let Some(first) = self.items.first_mut() {
            first.focus(doc, opts);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ListBlockValidationError;
    use crate::ui::blocks::FieldBlockDefinition;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    fn tags_def() -> ListBlockDefinition {
        ListBlockDefinition::new(
            "tags",
            Arc::new(FieldBlockDefinition::new(
                "tag",
                BlockMeta {
                    classname: Some("field char_field".to_string()),
                    ..Default::default()
                },
            )),
            BlockMeta::with_label("Tags"),
        )
    }

    fn mount(state: Value, errors: Option<Vec<ValidationError>>) -> (Document, ListBlock) {
        let mut doc = Document::new();
        let root = doc.root();
        let placeholder = doc.mount_point(root);
        let block = ListBlock::new(
            &tags_def(),
            &mut doc,
            placeholder,
            "body-1",
            Some(&state),
            errors.as_deref(),
        )
        .unwrap();
        (doc, block)
    }

    #[test]
    fn test_renders_one_item_per_state_entry() {
        let (doc, block) = mount(json!(["red", "blue"]), None);
        assert_eq!(block.len(), 2);
        let html = doc.to_html();
        assert!(html.contains("<div class=\"list-item\" data-list-index=\"0\">"));
        assert!(html.contains("id=\"body-1-1-value\""));
        assert_eq!(block.get_state(), json!(["red", "blue"]));
    }

    #[test]
    fn test_null_state_is_empty_list() {
        let (_doc, block) = mount(Value::Null, None);
        assert!(block.is_empty());
        assert_eq!(block.get_value(), json!([]));
    }

    #[test]
    fn test_set_state_same_length_forwards() {
        let (mut doc, mut block) = mount(json!(["red", "blue"]), None);
        block.set_state(&mut doc, &json!(["green", "blue"])).unwrap();
        assert_eq!(block.get_state(), json!(["green", "blue"]));
        assert!(doc.to_html().contains("value=\"green\""));
    }

    #[test]
    fn test_set_state_new_length_rebuilds() {
        let (mut doc, mut block) = mount(json!(["red", "blue"]), None);
        block.set_state(&mut doc, &json!(["one"])).unwrap();
        assert_eq!(block.len(), 1);
        assert_eq!(block.get_state(), json!(["one"]));
        assert!(!doc.to_html().contains("data-list-index=\"1\""));
    }

    #[test]
    fn test_item_errors_reach_items() {
        let (mut doc, mut block) = mount(json!(["red", "blue"]), None);
        let error = ValidationError::List(ListBlockValidationError {
            block_errors: vec![None, Some(vec![ValidationError::message("Too dull")])],
        });
        block.set_error(&mut doc, &[error]).unwrap();
        let html = doc.to_html();
        assert_eq!(html.matches("error-message").count(), 1);
        assert!(html.contains("Too dull"));
    }

    #[test]
    fn test_initial_item_errors() {
        let error = ValidationError::List(ListBlockValidationError {
            block_errors: vec![Some(vec![ValidationError::message("Bad")])],
        });
        let (doc, _block) = mount(json!(["x"]), Some(vec![error]));
        assert!(doc.to_html().contains("<span>Bad</span>"));
    }

    #[test]
    fn test_text_label_from_first_non_empty_item() {
        let (_doc, block) = mount(json!(["", "blue"]), None);
        assert_eq!(
            block.get_text_label(&TextLabelOptions::default()),
            Some("blue".to_string())
        );
    }

    #[test]
    fn test_focus_first_item() {
        let (mut doc, mut block) = mount(json!(["red", "blue"]), None);
        block.focus(&mut doc, &FocusOptions::default());
        let focused = doc.focused().unwrap();
        assert_eq!(doc.attr(focused, "id"), Some("body-1-0-value"));
    }
}
