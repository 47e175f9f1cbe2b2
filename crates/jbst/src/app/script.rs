//! Low-level helpers for writing JSON and markup that is safe to embed in a page.

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;

/// Serialize `value` as a JavaScript literal that can sit inside a `<script>` element.
///
/// Pretty output is tab-indented.
pub fn script_safe_json(value: &Value, pretty: bool) -> Result<String, serde_json::Error> {
    let json = if pretty {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"\t");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        value.serialize(&mut serializer)?;
        String::from_utf8_lossy(&buf).into_owned()
    } else {
        serde_json::to_string(value)?
    };
    Ok(make_script_safe(&json))
}

/// Quote `value` as a JavaScript string literal.
pub fn js_string_literal(value: &str) -> String {
    make_script_safe(&Value::String(value.to_owned()).to_string())
}

/// Neutralize sequences that would end the enclosing script element early or that JSON allows
/// but JavaScript string literals do not.
///
/// Only valid on JSON text, where `<` can only appear inside string literals.
pub fn make_script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
        .replace("<!--", "<\\!--")
        .replace('\u{2028}', "\\u2028")
        .replace('\u{2029}', "\\u2029")
}

pub fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Wrap `body` in a `<script>` element of the given MIME type.
pub fn script_block(script_type: &str, body: &str) -> String {
    format!(
        "<script type=\"{}\">{}</script>",
        escape_attr(script_type),
        body
    )
}
