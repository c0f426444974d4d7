// Payload loading for the `build` command
//
// A payload starts from a JSON file (or stdin) and can be extended with
// --set key=value pairs. Dotted keys create nested objects:
// `source.agency=EPA` becomes { "source": { "agency": "EPA" } }

use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde_json::{Map, Value};
use zip_starter_core::Payload;

/// Reads a JSON object from `source`, where `-` means stdin.
pub fn read_payload(source: &str) -> Result<Payload> {
    let text = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read payload from stdin")?;
        buf
    } else {
        std::fs::read_to_string(Path::new(source))
            .with_context(|| format!("Failed to read '{}'", source))?
    };

    parse_payload(&text)
}

/// Parses `text` as a JSON object.
pub fn parse_payload(text: &str) -> Result<Payload> {
    match serde_json::from_str::<Value>(text)? {
        Value::Object(map) => Ok(map),
        other => Err(anyhow!(
            "Payload must be a JSON object, got {}",
            type_name(&other)
        )),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Applies `key=value` assignments to `payload`. Later assignments win.
pub fn apply_assignments(payload: &mut Payload, assignments: &[String]) -> Result<()> {
    for arg in assignments {
        let (key, value) = parse_key_value(arg)?;
        set_nested(payload, key, value)?;
    }
    Ok(())
}

/// Parses a single "key=value" string.
fn parse_key_value(arg: &str) -> Result<(&str, &str)> {
    let (key, value) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("Invalid assignment: '{}'. Expected 'key=value'", arg))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(anyhow!("Empty key in assignment: '{}'", arg));
    }

    Ok((key, value.trim()))
}

/// Sets a string value at a dotted key path, creating intermediate objects.
fn set_nested(root: &mut Map<String, Value>, key: &str, value: &str) -> Result<()> {
    let mut segments = key.split('.').peekable();
    let mut current = root;

    while let Some(segment) = segments.next() {
        if segment.is_empty() {
            return Err(anyhow!("Invalid key path '{}': empty segment", key));
        }

        if segments.peek().is_none() {
            current.insert(segment.to_string(), Value::String(value.to_string()));
            return Ok(());
        }

        let nested = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        current = match nested {
            Value::Object(map) => map,
            _ => {
                return Err(anyhow!(
                    "Cannot set '{}': '{}' is not an object",
                    key,
                    segment
                ))
            }
        };
    }

    Ok(())
}
