use serde_json::Value;

/// Write the response as a YAML document.
pub fn print_yaml(value: &Value) {
    match serde_yaml::to_string(value) {
        Ok(text) => print!("{text}"),
        Err(e) => eprintln!("YAML output error: {e}"),
    }
}
