//! Plain-text extraction from rich text editor content state

use serde_json::Value;

/// Space-join the `text` of every block in a content-state document.
///
/// Returns `Ok(None)` when the JSON is valid but carries no `blocks` array.
pub fn plain_text(raw: &str) -> serde_json::Result<Option<String>> {
    let data: Value = serde_json::from_str(raw)?;
    let Some(blocks) = data.get("blocks").and_then(Value::as_array) else {
        return Ok(None);
    };
    let texts: Vec<&str> = blocks
        .iter()
        .map(|block| block.get("text").and_then(Value::as_str).unwrap_or_default())
        .collect();
    Ok(Some(texts.join(" ")))
}
