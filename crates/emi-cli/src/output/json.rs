use serde_json::Value;

/// Write the response as indented JSON, keys in the order they were built.
pub fn print_json(value: &Value) {
    match render(value) {
        Ok(text) => println!("{text}"),
        Err(e) => eprintln!("JSON output error: {e}"),
    }
}

fn render(value: &Value) -> serde_json::Result<String> {
    serde_json::to_string_pretty(value)
}
