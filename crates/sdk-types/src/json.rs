use serde_json::Value;

/// Parse accumulated tool-call arguments.
///
/// Whitespace-only input is an empty argument object. Anything else must be
/// strict JSON; the caller decides how to surface the error.
pub fn parse_tool_arguments(raw: &str) -> Result<Value, serde_json::Error> {
    if raw.trim().is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    serde_json::from_str::<Value>(raw)
}
