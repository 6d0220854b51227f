//! Rendering a [`Reply`] as an HTTP response.
//!
//! JSON bodies are written as-is. XML bodies are derived from the same JSON
//! value: objects become nested elements, array items become `<item>`.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use crate::dispatch::Reply;
use crate::routing::ApiFormat;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const XML_ROOT: &str = "response";
const XML_ITEM: &str = "item";

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status == StatusCode::NO_CONTENT {
            return status.into_response();
        }

        let body = match self.format {
            ApiFormat::Json => self.body.to_string(),
            ApiFormat::Xml => to_xml(&self.body),
        };
        (status, [(header::CONTENT_TYPE, self.format.content_type())], body).into_response()
    }
}

/// Render `value` as an XML document rooted at `<response>`.
pub fn to_xml(value: &Value) -> String {
    let mut out = String::from(XML_DECLARATION);
    write_element(&mut out, XML_ROOT, value);
    out
}

fn write_element(out: &mut String, name: &str, value: &Value) {
    let name = element_name(name);
    match value {
        Value::Null => {
            out.push('<');
            out.push_str(&name);
            out.push_str("/>");
            return;
        }
        _ => {
            out.push('<');
            out.push_str(&name);
            out.push('>');
        }
    }

    match value {
        Value::Object(map) => {
            for (key, child) in map {
                write_element(out, key, child);
            }
        }
        Value::Array(items) => {
            for item in items {
                write_element(out, XML_ITEM, item);
            }
        }
        Value::String(s) => escape_into(out, s),
        other => out.push_str(&other.to_string()),
    }

    out.push_str("</");
    out.push_str(&name);
    out.push('>');
}

/// Keys are free-form; element names are not.
fn element_name(key: &str) -> String {
    let mut name: String = key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect();
    if name.is_empty() || !name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        name.insert(0, '_');
    }
    name
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
}
