use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};

const INDENT: &[u8] = b"    ";

/// Re-encode a JSON document with 4-space indentation and sorted object keys.
pub fn pretty(text: &str) -> Result<String> {
    let value: Value = serde_json::from_str(text).context("response body is not valid JSON")?;
    render(&value)
}

/// Pretty-print a failure body when it is JSON, otherwise show it as-is.
pub fn pretty_or_raw(body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|value| render(&value).ok())
        .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned())
}

// `Value` objects are BTreeMap-backed, so serializing one yields sorted keys.
// Numbers keep their source text (`arbitrary_precision`).
fn render(value: &Value) -> Result<String> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    value
        .serialize(&mut ser)
        .context("failed to serialize JSON")?;
    String::from_utf8(buf).context("serialized JSON is not UTF-8")
}
