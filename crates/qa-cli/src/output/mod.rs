use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Text => Ok(render_text(&serde_json::to_value(value)?)),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

/// `key: value` lines; nested objects are indented one level per depth.
fn render_text(value: &Value) -> String {
    let mut lines = Vec::new();
    push_lines(value, 0, &mut lines);
    lines.join("\n")
}

fn push_lines(value: &Value, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    match value {
        Value::Object(map) => {
            for (key, field) in map {
                if field.is_object() {
                    lines.push(format!("{indent}{key}:"));
                    push_lines(field, depth + 1, lines);
                } else {
                    lines.push(format!("{indent}{key}: {}", value_to_cell(field)));
                }
            }
        }
        scalar => lines.push(format!("{indent}{}", value_to_cell(scalar))),
    }
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn json_is_pretty_and_raw_is_compact() {
        let value = json!({ "engine": "file" });
        assert_eq!(
            render(&value, OutputFormat::Json).unwrap(),
            "{\n  \"engine\": \"file\"\n}"
        );
        assert_eq!(
            render(&value, OutputFormat::Raw).unwrap(),
            "{\"engine\":\"file\"}"
        );
    }

    #[test]
    fn text_nests_counts_under_their_key() {
        let value = json!({
            "counts": { "Account": 2, "Module": 1 },
            "engine": "networked",
            "exported_at": null
        });
        assert_eq!(
            render(&value, OutputFormat::Text).unwrap(),
            "counts:\n  Account: 2\n  Module: 1\nengine: networked\nexported_at: -"
        );
    }
}
