//! Composite block grouping a fixed, named set of child blocks

use std::collections::HashSet;

use indexmap::IndexMap;
use serde_json::Value;

use super::preview::render_struct_summary;
use super::widget::{BlockDefRef, BlockDefinition, FocusOptions, TextLabelOptions, Widget};
use crate::error::{Error, Result};
use crate::state::{BlockKind, BlockMeta, StructBlockValidationError, StructState, ValidationError};
use crate::ui::dom::{parse_fragment, Document, Element, Node, NodeId};

/// Token in a custom form template replaced by the block's prefix
pub const PREFIX_TOKEN: &str = "__PREFIX__";

/// Attribute marking a child mount point inside a custom form template
pub const CHILD_MOUNT_ATTR: &str = "data-structblock-child";

/// Class that hides the inactive preview or edit region
pub const INVISIBLE_CLASS: &str = "invisible";

/// Immutable descriptor of a struct block
#[derive(Debug, Clone)]
pub struct StructBlockDefinition {
    name: String,
    child_block_defs: Vec<BlockDefRef>,
    meta: BlockMeta,
}

impl StructBlockDefinition {
    pub fn new(name: &str, child_block_defs: Vec<BlockDefRef>, meta: BlockMeta) -> Self {
        Self {
            name: name.to_string(),
            child_block_defs,
            meta,
        }
    }

    /// Render a struct block and keep its concrete type
    pub fn render_struct(
        &self,
        doc: &mut Document,
        placeholder: NodeId,
        prefix: &str,
        initial_state: Option<&Value>,
        initial_error: Option<&[ValidationError]>,
    ) -> Result<StructBlock> {
        StructBlock::new(self, doc, placeholder, prefix, initial_state, initial_error)
    }
}

impl BlockDefinition for StructBlockDefinition {
    fn name(&self) -> &str {
        &self.name
    }

    fn meta(&self) -> &BlockMeta {
        &self.meta
    }

    fn kind(&self) -> BlockKind {
        BlockKind::Struct
    }

    fn child_block_defs(&self) -> &[BlockDefRef] {
        &self.child_block_defs
    }

    fn render(
        &self,
        doc: &mut Document,
        placeholder: NodeId,
        prefix: &str,
        initial_state: Option<&Value>,
        initial_error: Option<&[ValidationError]>,
    ) -> Result<Box<dyn Widget>> {
        let block = self.render_struct(doc, placeholder, prefix, initial_state, initial_error)?;
        Ok(Box::new(block))
    }
}

/// The read-only summary region and the live form region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewRegions {
    pub preview: NodeId,
    pub edit: NodeId,
}

/// Live struct block
pub struct StructBlock {
    definition: StructBlockDefinition,
    dom: Vec<NodeId>,
    child_blocks: IndexMap<String, Box<dyn Widget>>,
    regions: Option<PreviewRegions>,
}

/// First name that appears more than once, in order
pub(crate) fn duplicate_name<'a>(names: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    let mut seen = HashSet::new();
    names.into_iter().find(|name| !seen.insert(*name))
}

/// The struct error to honour: present only when exactly one error was given
fn single_struct_error(errors: Option<&[ValidationError]>) -> Option<&StructBlockValidationError> {
    match errors? {
        [ValidationError::Struct(error)] => Some(error),
        _ => None,
    }
}

impl StructBlock {
    pub fn new(
        definition: &StructBlockDefinition,
        doc: &mut Document,
        placeholder: NodeId,
        prefix: &str,
        initial_state: Option<&Value>,
        initial_error: Option<&[ValidationError]>,
    ) -> Result<Self> {
        if let Some(field) =
            duplicate_name(definition.child_block_defs.iter().map(|def| def.name()))
        {
            return Err(Error::DuplicateField {
                block: definition.name.clone(),
                field: field.to_string(),
            });
        }

        let empty = Value::Object(StructState::new());
        let state = initial_state.filter(|s| s.is_object()).unwrap_or(&empty);
        let struct_error = single_struct_error(initial_error);

        let mut block = Self {
            definition: definition.clone(),
            dom: Vec::new(),
            child_blocks: IndexMap::new(),
            regions: None,
        };

        if let Some(template) = &definition.meta.form_template {
            let html = template.replace(PREFIX_TOKEN, prefix);
            block.dom = doc.replace_with(placeholder, parse_fragment(&html))?;
            for child_def in &definition.child_block_defs {
                let mount = block
                    .dom
                    .iter()
                    .find_map(|root| doc.find_by_attr(*root, CHILD_MOUNT_ATTR, child_def.name()))
                    .ok_or_else(|| Error::MissingMountPoint(child_def.name().to_string()))?;
                block.render_child(doc, child_def, mount, prefix, state, struct_error)?;
            }
        } else {
            let container = doc.replace_with_node(
                placeholder,
                Element::new("div")
                    .class(definition.meta.classname.as_deref().unwrap_or_default())
                    .into(),
            )?;
            block.dom = vec![container];

            let mut fields_parent = container;
            if definition.meta.preview {
                let regions = block.render_regions(doc, container, state)?;
                fields_parent = regions.edit;
                block.regions = Some(regions);
            }

            if let Some(help_text) = &definition.meta.help_text {
                // Help text and icon are trusted markup.
                let help = Element::new("div")
                    .class("help")
                    .child(Node::trusted_html(
                        definition.meta.help_icon.as_deref().unwrap_or_default(),
                    ))
                    .child(Node::trusted_html(help_text.as_str()));
                doc.append(fields_parent, Element::new("span").child(help).into());
            }

            for child_def in &definition.child_block_defs {
                let meta = child_def.meta();
                let wrapper = doc.append(
                    fields_parent,
                    Element::new("div")
                        .class("field")
                        .class_if(meta.required, "required")
                        .attr("data-contentpath", child_def.name())
                        .into(),
                );
                let label = doc.append(
                    wrapper,
                    Element::new("label")
                        .class("field__label")
                        .text(meta.label_or_empty())
                        .into(),
                );
                let mount = doc.mount_point(wrapper);
                let child = block.render_child(doc, child_def, mount, prefix, state, struct_error)?;
                if let Some(id) = child.id_for_label() {
                    doc.set_attr(label, "for", id);
                }
            }
        }

        if struct_error.is_some() {
            block.set_preview(doc, false)?;
        }

        tracing::debug!(
            block = %definition.name,
            prefix,
            children = block.child_blocks.len(),
            preview = block.regions.is_some(),
            "rendered struct block"
        );
        Ok(block)
    }

    fn render_child(
        &mut self,
        doc: &mut Document,
        child_def: &BlockDefRef,
        mount: NodeId,
        prefix: &str,
        state: &Value,
        error: Option<&StructBlockValidationError>,
    ) -> Result<&dyn Widget> {
        let name = child_def.name();
        let child = child_def.render(
            doc,
            mount,
            &format!("{prefix}-{name}"),
            state.get(name),
            error
                .and_then(|e| e.block_errors.get(name))
                .map(Vec::as_slice),
        )?;
        let (index, _) = self.child_blocks.insert_full(name.to_string(), child);
        Ok(self.child_blocks[index].as_ref())
    }

    fn render_regions(
        &self,
        doc: &mut Document,
        container: NodeId,
        state: &Value,
    ) -> Result<PreviewRegions> {
        let preview = doc.append(
            container,
            Element::new("div")
                .class("preview-part")
                .children(self.preview_content(state)?)
                .into(),
        );
        let edit = doc.append(
            container,
            Element::new("div")
                .class("edit-part")
                .class(INVISIBLE_CLASS)
                .into(),
        );
        Ok(PreviewRegions { preview, edit })
    }

    fn preview_content(&self, state: &Value) -> Result<Vec<Node>> {
        let mut content = vec![Element::new("div")
            .class("edit-prompt")
            .text(self.definition.meta.edit_label())
            .into()];
        content.extend(render_struct_summary(
            &self.definition.child_block_defs,
            state,
        )?);
        Ok(content)
    }

    pub fn definition(&self) -> &StructBlockDefinition {
        &self.definition
    }

    /// Top-level nodes this block rendered in place of its placeholder
    pub fn dom(&self) -> &[NodeId] {
        &self.dom
    }

    pub fn regions(&self) -> Option<PreviewRegions> {
        self.regions
    }

    /// Whether the read-only summary is currently shown
    pub fn is_preview_visible(&self, doc: &Document) -> bool {
        self.regions
            .is_some_and(|r| !doc.has_class(r.preview, INVISIBLE_CLASS))
    }

    /// Re-render the summary from the children's current state
    pub fn refresh_preview(&self, doc: &mut Document) -> Result<()> {
        let Some(regions) = self.regions else {
            return Ok(());
        };
        let content = self.preview_content(&self.get_state())?;
        doc.set_children(regions.preview, content);
        Ok(())
    }

    /// Show the summary (`true`) or the live form (`false`)
    pub fn set_preview(&mut self, doc: &mut Document, on: bool) -> Result<()> {
        let Some(regions) = self.regions else {
            return Ok(());
        };
        if on {
            self.refresh_preview(doc)?;
            doc.remove_class(regions.preview, INVISIBLE_CLASS);
            doc.add_class(regions.edit, INVISIBLE_CLASS);
        } else {
            doc.add_class(regions.preview, INVISIBLE_CLASS);
            doc.remove_class(regions.edit, INVISIBLE_CLASS);
        }
        Ok(())
    }

    /// Handle a click on `target`; clicks inside the summary switch to the form.
    ///
    /// Returns whether the click was handled.
    pub fn handle_click(&mut self, doc: &mut Document, target: NodeId) -> Result<bool> {
        match self.regions {
            Some(regions) if doc.contains(regions.preview, target) => {
                self.set_preview(doc, false)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn collect_children(&self, read: impl Fn(&dyn Widget) -> Value) -> Value {
        Value::Object(
            self.child_blocks
                .iter()
                .map(|(name, child)| (name.clone(), read(child.as_ref())))
                .collect(),
        )
    }
}

impl Widget for StructBlock {
    fn set_state(&mut self, doc: &mut Document, state: &Value) -> Result<()> {
        let Some(state) = state.as_object() else {
            return Ok(());
        };
        for (name, child_state) in state {
            match self.child_blocks.get_mut(name) {
                Some(child) => child.set_state(doc, child_state)?,
                None => {
                    tracing::warn!(block = %self.definition.name, child = %name, "ignoring state for unknown child")
                }
            }
        }
        Ok(())
    }

    fn get_state(&self) -> Value {
        self.collect_children(|child| child.get_state())
    }

    fn get_value(&self) -> Value {
        self.collect_children(|child| child.get_value())
    }

    fn set_error(&mut self, doc: &mut Document, errors: &[ValidationError]) -> Result<()> {
        let [error] = errors else {
            tracing::debug!(
                block = %self.definition.name,
                count = errors.len(),
                "struct block only displays a single error"
            );
            return Ok(());
        };

        if let ValidationError::Struct(error) = error {
            for (name, child_errors) in &error.block_errors {
                match self.child_blocks.get_mut(name) {
                    Some(child) => child.set_error(doc, child_errors)?,
                    None => {
                        tracing::warn!(block = %self.definition.name, child = %name, "ignoring error for unknown child")
                    }
                }
            }
        }

        self.set_preview(doc, false)
    }

    fn get_text_label(&self, opts: &TextLabelOptions) -> Option<String> {
        self.definition
            .child_block_defs
            .iter()
            .filter_map(|def| self.child_blocks.get(def.name()))
            .filter_map(|child| child.get_text_label(opts))
            .find(|label| !label.is_empty())
    }

    fn focus(&mut self, doc: &mut Document, opts: &FocusOptions) {
        let Some(first) = self.definition.child_block_defs.first() else {
            return;
        };
        if let Some(child) = self.child_blocks.get_mut(first.name()) {
            child.focus(doc, opts);
        }
    }
}
