use serde_json::Value;

use super::scalar_text;

/// Keys tried, in order, when reducing a response to one value.
const PRIORITY_KEYS: [&str; 7] = [
    "emi_display",
    "formatted",
    "sanitized",
    "display",
    "count",
    "code",
    "deleted",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_text(value));
}

fn minimal_text(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result_obj {
        Value::Object(map) => {
            for key in PRIORITY_KEYS {
                if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                    return scalar_text(val);
                }
            }
            match map.iter().next() {
                Some((key, val)) => format!("{}: {}", key, scalar_text(val)),
                None => String::new(),
            }
        }
        // One line per row, first column only.
        Value::Array(rows) => rows
            .iter()
            .map(|row| match row {
                Value::Object(m) => m.values().next().map(scalar_text).unwrap_or_default(),
                other => scalar_text(other),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        other => scalar_text(other),
    }
}
