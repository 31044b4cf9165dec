//! Rendering action results as JSON or an indented key/value table.

use anyhow::Result;
use colored::Colorize;
use serde_json::Value;

pub fn print_output<T: serde::Serialize>(format: &str, data: &T) -> Result<()> {
    let value = serde_json::to_value(data)?;
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&value)?),
        _ => {
            for line in render_table(&value) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

fn render_table(value: &Value) -> Vec<String> {
    let mut lines = Vec::new();
    render_value(value, 0, &mut lines);
    lines
}

fn render_value(value: &Value, indent: usize, out: &mut Vec<String>) {
    let pad = "  ".repeat(indent);
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                let key = key.as_str().bold();
                match val {
                    Value::Object(inner) if inner.is_empty() => out.push(format!("{}{}: {{}}", pad, key)),
                    Value::Object(_) => {
                        out.push(format!("{}{}:", pad, key));
                        render_value(val, indent + 1, out);
                    }
                    Value::Array(arr) if arr.is_empty() => out.push(format!("{}{}: []", pad, key)),
                    Value::Array(arr) if arr.iter().all(is_scalar) => {
                        let items: Vec<String> = arr.iter().map(format_scalar).collect();
                        out.push(format!("{}{}: {}", pad, key, items.join(", ")));
                    }
                    Value::Array(_) => {
                        out.push(format!("{}{}:", pad, key));
                        render_value(val, indent + 1, out);
                    }
                    _ => out.push(format!("{}{}: {}", pad, key, format_scalar(val))),
                }
            }
        }
        Value::Array(arr) => {
            for (i, item) in arr.iter().enumerate() {
                if is_scalar(item) {
                    out.push(format!("{}- {}", pad, format_scalar(item)));
                } else {
                    out.push(format!("{}[{}]:", pad, i));
                    render_value(item, indent + 1, out);
                }
            }
        }
        _ => out.push(format!("{}{}", pad, format_scalar(value))),
    }
}

fn is_scalar(value: &Value) -> bool {
    !value.is_object() && !value.is_array()
}

fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}
