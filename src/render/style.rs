//! Style Coercion
//!
//! Converts component style maps into inline CSS strings. Style keys come
//! in camelCase from controllers and are emitted in the markup's native
//! hyphenated form; bare numeric values get a `px` unit unless the
//! property is in the unit-less set.

use serde_json::{Map, Value};

/// CSS properties where numeric values must NOT get `px` appended
///
/// Both camelCase and hyphenated spellings are listed because callers may
/// supply either form.
const UNITLESS_CSS_PROPERTIES: &[&str] = &[
    "opacity",
    "zIndex",
    "z-index",
    "flex",
    "order",
    "flexGrow",
    "flex-grow",
    "flexShrink",
    "flex-shrink",
    "fontWeight",
    "font-weight",
    "lineHeight",
    "line-height",
];

/// Convert a camelCase style key to its hyphenated CSS form
#[must_use]
pub fn to_css_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 2);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Convert a style value to a CSS value string
///
/// Numbers are rendered with a `px` unit unless the key is unit-less;
/// strings pass through raw; anything else falls back to its JSON text.
#[must_use]
pub fn css_value(key: &str, value: &Value) -> String {
    match value {
        Value::Number(n) if !UNITLESS_CSS_PROPERTIES.contains(&key) => format!("{n}px"),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Build an inline CSS style string from a style map
///
/// Null-valued entries are skipped; the rest render as
/// `key:value;key:value` in map order.
#[must_use]
pub fn style_string(style: &Map<String, Value>) -> String {
    let mut parts = Vec::with_capacity(style.len());
    for (key, value) in style {
        if value.is_null() {
            continue;
        }
        parts.push(format!("{}:{}", to_css_key(key), css_value(key, value)));
    }
    parts.join(";")
}

/// Escape the five markup-unsafe characters in literal text content
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Insert a default style property unless the caller already set that key
///
/// Defaults never override explicit style.
pub fn set_default(style: &mut Map<String, Value>, key: &str, value: Value) {
    if !style.contains_key(key) {
        style.insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_css_key() {
        assert_eq!(to_css_key("flexDirection"), "flex-direction");
        assert_eq!(to_css_key("gridTemplateColumns"), "grid-template-columns");
        assert_eq!(to_css_key("color"), "color");
    }

    #[test]
    fn test_css_value_units() {
        assert_eq!(css_value("padding", &json!(24)), "24px");
        assert_eq!(css_value("borderRadius", &json!(1.5)), "1.5px");
        assert_eq!(css_value("opacity", &json!(0.5)), "0.5");
        assert_eq!(css_value("fontWeight", &json!(600)), "600");
        assert_eq!(css_value("zIndex", &json!(10)), "10");
        assert_eq!(css_value("flex", &json!(1)), "1");
        assert_eq!(css_value("width", &json!("100%")), "100%");
    }

    #[test]
    fn test_style_string_skips_nulls_and_keeps_order() {
        let style: Map<String, Value> = serde_json::from_value(json!({
            "display": "flex",
            "flexDirection": "column",
            "gap": 16,
            "border": null
        }))
        .unwrap();
        assert_eq!(
            style_string(&style),
            "display:flex;flex-direction:column;gap:16px"
        );
    }

    #[test]
    fn test_escape_html_five_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
        );
    }

    #[test]
    fn test_set_default_never_overrides() {
        let mut style: Map<String, Value> =
            serde_json::from_value(json!({"color": "#000"})).unwrap();
        set_default(&mut style, "color", json!("#fff"));
        set_default(&mut style, "padding", json!(8));
        assert_eq!(style["color"], "#000");
        assert_eq!(style["padding"], 8);
    }
}
