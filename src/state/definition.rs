//! Block metadata and field kinds

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::value::display_string;

/// Prompt shown above a preview summary when no string is configured
pub const DEFAULT_EDIT_LABEL: &str = "Edit";

/// One `[value, label]` pair of an enumerated field.
///
/// Values may be any JSON scalar; they compare against state by their
/// display string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice(pub Value, pub String);

impl Choice {
    pub fn new(value: impl Into<Value>, label: &str) -> Self {
        Self(value.into(), label.to_string())
    }

    pub fn value(&self) -> &Value {
        &self.0
    }

    /// The value as written into an `<option value>`
    pub fn value_string(&self) -> String {
        display_string(&self.0)
    }

    pub fn label(&self) -> &str {
        &self.1
    }
}

/// Translatable UI strings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockStrings {
    #[serde(rename = "EDIT", default, skip_serializing_if = "Option::is_none")]
    pub edit: Option<String>,
}

/// Metadata bag attached to every block definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlockMeta {
    pub label: Option<String>,
    pub required: bool,
    /// Space-separated CSS classes
    pub classname: Option<String>,
    /// Server-side block class name, e.g. `ImageChooserBlock`
    pub block_class: Option<String>,
    /// Trusted markup, rendered unescaped
    pub help_text: Option<String>,
    /// Trusted markup, rendered unescaped
    pub help_icon: Option<String>,
    pub choices: Vec<Choice>,
    /// Show a read-only summary until the user clicks to edit
    pub preview: bool,
    /// Custom markup with `__PREFIX__` placeholders and child mount points
    pub form_template: Option<String>,
    pub strings: BlockStrings,
}

impl BlockMeta {
    pub fn with_label(label: &str) -> Self {
        Self {
            label: Some(label.to_string()),
            ..Default::default()
        }
    }

    pub fn classnames(&self) -> impl Iterator<Item = &str> {
        self.classname.as_deref().unwrap_or_default().split_whitespace()
    }

    pub fn has_classname(&self, class: &str) -> bool {
        self.classnames().any(|c| c == class)
    }

    pub fn label_or_empty(&self) -> &str {
        self.label.as_deref().unwrap_or_default()
    }

    pub fn edit_label(&self) -> &str {
        self.strings.edit.as_deref().unwrap_or(DEFAULT_EDIT_LABEL)
    }

    /// Label of the first choice whose value matches
    pub fn choice_label(&self, value: &str) -> Option<&str> {
        self.choices
            .iter()
            .find(|choice| choice.value_string() == value)
            .map(Choice::label)
    }
}

/// The closed set of field kinds the preview summary knows how to format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Struct,
    List,
    ImageChooser,
    DocumentChooser,
    RawHtml,
    NativeColor,
    Choice,
    Text { rich_text: bool },
    Other,
}

impl BlockKind {
    /// Classify a block from its classname and block class, first match wins
    pub fn from_meta(meta: &BlockMeta) -> Self {
        if meta.has_classname("struct-block") {
            return BlockKind::Struct;
        }
        match meta.block_class.as_deref() {
            Some("ListBlock") => return BlockKind::List,
            Some("ImageChooserBlock") => return BlockKind::ImageChooser,
            Some("DocumentChooserBlock") => return BlockKind::DocumentChooser,
            Some("RawHTMLBlock") => return BlockKind::RawHtml,
            Some("NativeColorBlock") => return BlockKind::NativeColor,
            _ => {}
        }
        if meta.has_classname("choice_field") {
            BlockKind::Choice
        } else if meta.has_classname("char_field") {
            BlockKind::Text {
                rich_text: meta.has_classname("widget-draftail_rich_text_area"),
            }
        } else {
            BlockKind::Other
        }
    }
}
