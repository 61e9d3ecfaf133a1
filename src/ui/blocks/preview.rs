//! Read-only summary of block state
//!
//! Formats stored state directly as markup without touching live widgets.
//! Fields whose rendered value is empty are left out of the summary.

use serde_json::Value;

use super::widget::{BlockDefRef, BlockDefinition};
use crate::error::{Error, Result};
use crate::state::{display_string, plain_text, selected_choice, BlockKind};
use crate::ui::dom::{strip_scripts, Element, Fragment, Node};

static NULL: Value = Value::Null;

/// Render one `<dl>` entry per child with a non-empty value
pub fn render_struct_summary(defs: &[BlockDefRef], state: &Value) -> Result<Fragment> {
    let mut items = Fragment::new();
    for def in defs {
        let child_state = state.get(def.name()).unwrap_or(&NULL);
        let value = render_block_value(def.as_ref(), child_state)?;
        if value.is_empty() {
            continue;
        }
        items.push(
            Element::new("dl")
                .child(Element::new("dt").text(def.meta().label_or_empty()))
                .child(Element::new("dd").children(value))
                .into(),
        );
    }
    Ok(items)
}

/// Render each item of a list with `item_def`, skipping empty items
pub fn render_list_summary(item_def: &dyn BlockDefinition, states: &Value) -> Result<Fragment> {
    let Some(states) = states.as_array() else {
        return Ok(Fragment::new());
    };
    let mut items = Fragment::new();
    for state in states {
        let value = render_block_value(item_def, state)?;
        if value.is_empty() {
            continue;
        }
        items.push(
            Element::new("dl")
                .class("list-item")
                .child(Element::new("dd").children(value))
                .into(),
        );
    }
    Ok(items)
}

/// Render a single block's state according to its kind
pub fn render_block_value(def: &dyn BlockDefinition, state: &Value) -> Result<Fragment> {
    match def.kind() {
        BlockKind::Struct => render_struct_summary(def.child_block_defs(), state),
        BlockKind::List => match def.child_block_def() {
            Some(item_def) => render_list_summary(item_def.as_ref(), state),
            None => Ok(Fragment::new()),
        },
        BlockKind::ImageChooser => Ok(render_image(state)),
        BlockKind::DocumentChooser => Ok(text_fragment(
            state.get("title").map(display_string).unwrap_or_default(),
        )),
        BlockKind::RawHtml => render_raw_html(state),
        BlockKind::NativeColor => Ok(render_color(state)),
        BlockKind::Choice => Ok(render_choice(def, state)),
        BlockKind::Text { rich_text: true } => render_rich_text(def, state),
        BlockKind::Text { rich_text: false } | BlockKind::Other => {
            Ok(text_fragment(display_string(state)))
        }
    }
}

fn text_fragment(text: String) -> Fragment {
    if text.is_empty() {
        Fragment::new()
    } else {
        vec![Node::text(text)]
    }
}

fn render_image(state: &Value) -> Fragment {
    let url = state
        .get("preview")
        .and_then(|preview| preview.get("url"))
        .and_then(Value::as_str)
        .unwrap_or_default();
    if url.is_empty() {
        return Fragment::new();
    }
    vec![Element::new("img").attr("src", url).into()]
}

fn render_raw_html(state: &Value) -> Result<Fragment> {
    let html = display_string(state);
    if html.is_empty() {
        return Ok(Fragment::new());
    }
    Ok(vec![Element::new("div")
        .child(Node::trusted_html(strip_scripts(&html)?))
        .into()])
}

fn render_color(state: &Value) -> Fragment {
    let color = display_string(state);
    if color.is_empty() {
        return Fragment::new();
    }
    vec![
        Element::new("span")
            .class("nativecolorvalue")
            .attr("style", format!("background: {color};"))
            .into(),
        Element::new("span").text(color).into(),
    ]
}

fn render_choice(def: &dyn BlockDefinition, state: &Value) -> Fragment {
    let Some(selected) = selected_choice(state) else {
        return Fragment::new();
    };
    let label = def
        .meta()
        .choice_label(&selected)
        .map(str::to_string)
        .unwrap_or(selected);
    text_fragment(label)
}

fn render_rich_text(def: &dyn BlockDefinition, state: &Value) -> Result<Fragment> {
    let raw = display_string(state);
    if raw.is_empty() {
        return Ok(Fragment::new());
    }
    let text = plain_text(&raw).map_err(|source| Error::RichText {
        field: def.name().to_string(),
        source,
    })?;
    Ok(text_fragment(text.unwrap_or(raw)))
}
