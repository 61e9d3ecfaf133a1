//! Leaf field block rendering a single form control

use serde_json::Value;

use super::widget::{BlockDefinition, FocusOptions, TextLabelOptions, Widget};
use crate::error::Result;
use crate::state::{
    display_string, plain_text, selected_choice, BlockKind, BlockMeta, ValidationError,
};
use crate::ui::dom::{Document, Element, Node, NodeId};

/// The control a field is edited with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Control {
    Text,
    TextArea,
    Select,
    Color,
    Hidden,
}

impl Control {
    fn for_kind(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Choice => Control::Select,
            BlockKind::RawHtml | BlockKind::Text { rich_text: true } => Control::TextArea,
            BlockKind::NativeColor => Control::Color,
            BlockKind::ImageChooser | BlockKind::DocumentChooser => Control::Hidden,
            _ => Control::Text,
        }
    }
}

/// Definition of a leaf field
#[derive(Debug, Clone)]
pub struct FieldBlockDefinition {
    name: String,
    meta: BlockMeta,
}

impl FieldBlockDefinition {
    pub fn new(name: &str, meta: BlockMeta) -> Self {
        Self {
            name: name.to_string(),
            meta,
        }
    }
}

impl BlockDefinition for FieldBlockDefinition {
    fn name(&self) -> &str {
        &self.name
    }

    fn meta(&self) -> &BlockMeta {
        &self.meta
    }

    fn render(
        &self,
        doc: &mut Document,
        placeholder: NodeId,
        prefix: &str,
        initial_state: Option<&Value>,
        initial_error: Option<&[ValidationError]>,
    ) -> Result<Box<dyn Widget>> {
        let block = FieldBlock::new(self, doc, placeholder, prefix, initial_state, initial_error)?;
        Ok(Box::new(block))
    }
}

/// Live leaf field
#[derive(Debug)]
pub struct FieldBlock {
    kind: BlockKind,
    meta: BlockMeta,
    control: Control,
    id: String,
    container: NodeId,
    input: NodeId,
    errors: NodeId,
    state: Value,
}

impl FieldBlock {
    pub fn new(
        def: &FieldBlockDefinition,
        doc: &mut Document,
        placeholder: NodeId,
        prefix: &str,
        initial_state: Option<&Value>,
        initial_error: Option<&[ValidationError]>,
    ) -> Result<Self> {
        let kind = def.kind();
        let control = Control::for_kind(kind);
        let container = doc.replace_with_node(
            placeholder,
            Element::new("div")
                .class("field-block")
                .class(def.meta.classname.as_deref().unwrap_or_default())
                .into(),
        )?;
        let input = doc.append(container, control_element(control, prefix, &def.meta).into());
        let errors = doc.append(container, Element::new("div").class("field-errors").into());

        let mut block = Self {
            kind,
            meta: def.meta.clone(),
            control,
            id: prefix.to_string(),
            container,
            input,
            errors,
            state: initial_state.cloned().unwrap_or(Value::Null),
        };
        block.sync_control(doc);
        if let Some(errors) = initial_error {
            block.set_error(doc, errors)?;
        }
        Ok(block)
    }

    /// Write the current state into the control's markup
    fn sync_control(&self, doc: &mut Document) {
        match self.control {
            Control::Select => {
                let selected = selected_values(&self.state);
                let options = doc.children(self.input).to_vec();
                for option in options {
                    let is_selected = doc
                        .attr(option, "value")
                        .is_some_and(|v| selected.iter().any(|s| s == v));
                    if is_selected {
                        doc.set_attr(option, "selected", "");
                    } else {
                        doc.remove_attr(option, "selected");
                    }
                }
            }
            Control::TextArea => {
                doc.set_children(self.input, [Node::text(display_string(&self.state))]);
            }
            Control::Text | Control::Color | Control::Hidden => {
                doc.set_attr(self.input, "value", display_string(&self.state));
            }
        }
    }
}

fn control_element(control: Control, id: &str, meta: &BlockMeta) -> Element {
    let el = match control {
        Control::Select => Element::new("select").children(meta.choices.iter().map(|choice| {
            Element::new("option")
                .attr("value", choice.value_string())
                .text(choice.label())
                .into()
        })),
        Control::TextArea => Element::new("textarea"),
        Control::Text => Element::new("input").attr("type", "text"),
        Control::Color => Element::new("input").attr("type", "color"),
        Control::Hidden => Element::new("input").attr("type", "hidden"),
    };
    el.attr("id", id).attr("name", id)
}

fn selected_values(state: &Value) -> Vec<String> {
    match state {
        Value::Array(items) => items.iter().map(display_string).collect(),
        Value::Null => Vec::new(),
        other => vec![display_string(other)],
    }
}

/// Shorten `label` to at most `max_length` characters, ending in an ellipsis.
/// A zero limit leaves no room for a label at all.
fn truncate_label(label: &str, opts: &TextLabelOptions) -> Option<String> {
    match opts.max_length {
        Some(0) => None,
        Some(max) if label.chars().count() > max => {
            let mut truncated: String = label.chars().take(max - 1).collect();
            truncated.push('…');
            Some(truncated)
        }
        _ => Some(label.to_string()),
    }
}

impl Widget for FieldBlock {
    fn set_state(&mut self, doc: &mut Document, state: &Value) -> Result<()> {
        self.state = state.clone();
        self.sync_control(doc);
        Ok(())
    }

    fn get_state(&self) -> Value {
        self.state.clone()
    }

    fn get_value(&self) -> Value {
        match self.kind {
            BlockKind::Choice => selected_choice(&self.state)
                .map(Value::String)
                .unwrap_or(Value::Null),
            _ => self.state.clone(),
        }
    }

    fn set_error(&mut self, doc: &mut Document, errors: &[ValidationError]) -> Result<()> {
        let messages: Vec<Node> = errors
            .iter()
            .flat_map(ValidationError::messages)
            .map(|message| {
                Element::new("p")
                    .class("error-message")
                    .child(Element::new("span").text(message.as_str()))
                    .into()
            })
            .collect();
        if messages.is_empty() {
            doc.remove_class(self.container, "error");
        } else {
            doc.add_class(self.container, "error");
        }
        doc.set_children(self.errors, messages);
        Ok(())
    }

    fn get_text_label(&self, opts: &TextLabelOptions) -> Option<String> {
        let label = match self.kind {
            BlockKind::Choice => {
                let selected = selected_choice(&self.state)?;
                self.meta
                    .choice_label(&selected)
                    .map(str::to_string)
                    .unwrap_or(selected)
            }
            BlockKind::Text { rich_text: true } => {
                let raw = display_string(&self.state);
                plain_text(&raw).ok().flatten().unwrap_or(raw)
            }
            BlockKind::Text { rich_text: false } | BlockKind::Other => {
                display_string(&self.state)
            }
            _ => return None,
        };
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        truncate_label(label, opts)
    }

    fn focus(&mut self, doc: &mut Document, _opts: &FocusOptions) {
        doc.focus(self.input);
    }

    fn id_for_label(&self) -> Option<String> {
        Some(self.id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Choice;
    use serde_json::json;

    fn mount(def: &FieldBlockDefinition, state: Value) -> (Document, Box<dyn Widget>) {
        let mut doc = Document::new();
        let root = doc.root();
        let placeholder = doc.mount_point(root);
        let widget = def
            .render(&mut doc, placeholder, "body-title", Some(&state), None)
            .unwrap();
        (doc, widget)
    }

    fn text_def() -> FieldBlockDefinition {
        FieldBlockDefinition::new(
            "title",
            BlockMeta {
                label: Some("Title".to_string()),
                classname: Some("field char_field".to_string()),
                ..Default::default()
            },
        )
    }

    fn choice_def() -> FieldBlockDefinition {
        FieldBlockDefinition::new(
            "size",
            BlockMeta {
                classname: Some("field choice_field".to_string()),
                choices: vec![Choice::new("s", "Small"), Choice::new("l", "Large")],
                ..Default::default()
            },
        )
    }

    mod text_field {
        use super::*;

        #[test]
        fn test_renders_input_with_value() {
            let (doc, widget) = mount(&text_def(), json!("Hello"));
            let html = doc.to_html();
            assert!(html.starts_with("<div class=\"field-block field char_field\">"));
            assert!(html.contains("<input type=\"text\" id=\"body-title\" name=\"body-title\" value=\"Hello\">"));
            assert_eq!(widget.get_state(), json!("Hello"));
            assert_eq!(widget.id_for_label(), Some("body-title".to_string()));
        }

        #[test]
        fn test_set_state_updates_markup() {
            let (mut doc, mut widget) = mount(&text_def(), json!("Hello"));
            widget.set_state(&mut doc, &json!("Bye")).unwrap();
            assert!(doc.to_html().contains("value=\"Bye\""));
            assert_eq!(widget.get_value(), json!("Bye"));
        }

        #[test]
        fn test_text_label_truncates() {
            let (_doc, widget) = mount(&text_def(), json!("A long headline"));
            let opts = TextLabelOptions {
                max_length: Some(6),
            };
            assert_eq!(widget.get_text_label(&opts), Some("A lon…".to_string()));
            assert_eq!(
                widget.get_text_label(&TextLabelOptions::default()),
                Some("A long headline".to_string())
            );
        }

        #[test]
        fn test_text_label_respects_tiny_limits() {
            let (_doc, widget) = mount(&text_def(), json!("Headline"));
            let limit = |max| TextLabelOptions {
                max_length: Some(max),
            };
            assert_eq!(widget.get_text_label(&limit(0)), None);
            assert_eq!(widget.get_text_label(&limit(1)), Some("…".to_string()));
            assert_eq!(
                widget.get_text_label(&limit(8)),
                Some("Headline".to_string())
            );
        }

        #[test]
        fn test_blank_text_has_no_label() {
            let (_doc, widget) = mount(&text_def(), json!("   "));
            assert_eq!(widget.get_text_label(&TextLabelOptions::default()), None);
        }

        #[test]
        fn test_focus_targets_input() {
            let (mut doc, mut widget) = mount(&text_def(), json!(""));
            widget.focus(&mut doc, &FocusOptions::default());
            let focused = doc.focused().unwrap();
            assert_eq!(doc.attr(focused, "id"), Some("body-title"));
        }
    }

    mod choice_field {
        use super::*;

        #[test]
        fn test_select_marks_selected_option() {
            let (doc, widget) = mount(&choice_def(), json!(["l"]));
            let html = doc.to_html();
            assert!(html.contains("<option value=\"l\" selected=\"\">Large</option>"));
            assert!(html.contains("<option value=\"s\">Small</option>"));
            assert_eq!(widget.get_value(), json!("l"));
            assert_eq!(widget.get_state(), json!(["l"]));
        }

        #[test]
        fn test_empty_selection_value_is_null() {
            let (_doc, widget) = mount(&choice_def(), json!([]));
            assert_eq!(widget.get_value(), Value::Null);
            assert_eq!(widget.get_text_label(&TextLabelOptions::default()), None);
        }

        #[test]
        fn test_numeric_choice_values() {
            let def = FieldBlockDefinition::new(
                "rating",
                BlockMeta {
                    classname: Some("field choice_field".to_string()),
                    choices: vec![Choice::new(1, "One"), Choice::new(2, "Two")],
                    ..Default::default()
                },
            );
            let (doc, widget) = mount(&def, json!([2]));
            let html = doc.to_html();
            assert!(html.contains("<option value=\"2\" selected=\"\">Two</option>"));
            assert!(html.contains("<option value=\"1\">One</option>"));
            assert_eq!(
                widget.get_text_label(&TextLabelOptions::default()),
                Some("Two".to_string())
            );
        }

        #[test]
        fn test_label_uses_choice_text() {
            let (_doc, widget) = mount(&choice_def(), json!(["s"]));
            assert_eq!(
                widget.get_text_label(&TextLabelOptions::default()),
                Some("Small".to_string())
            );
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn test_set_error_renders_messages() {
            let (mut doc, mut widget) = mount(&text_def(), json!(""));
            widget
                .set_error(&mut doc, &[ValidationError::message("Required")])
                .unwrap();
            let html = doc.to_html();
            assert!(html.contains("<p class=\"error-message\"><span>Required</span></p>"));
            assert!(html.starts_with("<div class=\"field-block field char_field error\">"));
        }

        #[test]
        fn test_clearing_errors() {
            let (mut doc, mut widget) = mount(&text_def(), json!(""));
            widget
                .set_error(&mut doc, &[ValidationError::message("Required")])
                .unwrap();
            widget.set_error(&mut doc, &[]).unwrap();
            let html = doc.to_html();
            assert!(!html.contains("error-message"));
            assert!(!html.contains("char_field error"));
        }

        #[test]
        fn test_initial_error_is_shown() {
            let mut doc = Document::new();
            let root = doc.root();
            let placeholder = doc.mount_point(root);
            let errors = vec![ValidationError::message("Too short")];
            text_def()
                .render(&mut doc, placeholder, "p", Some(&json!("x")), Some(errors.as_slice()))
                .unwrap();
            assert!(doc.to_html().contains("Too short"));
        }
    }

    #[test]
    fn test_rich_text_uses_textarea_and_plain_label() {
        let def = FieldBlockDefinition::new(
            "body",
            BlockMeta {
                classname: Some("field char_field widget-draftail_rich_text_area".to_string()),
                ..Default::default()
            },
        );
        let raw = r#"{"blocks":[{"text":"Intro"},{"text":"text"}]}"#;
        let (doc, widget) = mount(&def, json!(raw));
        assert!(doc.to_html().contains("<textarea id=\"body-title\" name=\"body-title\">"));
        assert_eq!(
            widget.get_text_label(&TextLabelOptions::default()),
            Some("Intro text".to_string())
        );
    }

    #[test]
    fn test_chooser_has_no_text_label() {
        let def = FieldBlockDefinition::new(
            "photo",
            BlockMeta {
                block_class: Some("ImageChooserBlock".to_string()),
                ..Default::default()
            },
        );
        let (_doc, widget) = mount(&def, json!({"id": 1}));
        assert_eq!(widget.get_text_label(&TextLabelOptions::default()), None);
    }
}
