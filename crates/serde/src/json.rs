//! JSON output.
//!
//! Nodes are `serde_json::Value`s; objects keep property insertion order
//! (`preserve_order`), so the output follows declaration order.

use hateoas_support::ClassInfo;
use serde_json::{Map, Number, Value as JsonValue};

use crate::error::Result;
use crate::visitor::Visitor;

/// Builds a `serde_json::Value` tree and renders it compactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonVisitor;

impl Visitor for JsonVisitor {
    type Node = JsonValue;

    fn null(&self) -> JsonValue {
        JsonValue::Null
    }

    fn boolean(&self, value: bool) -> JsonValue {
        JsonValue::Bool(value)
    }

    fn integer(&self, value: i64) -> JsonValue {
        JsonValue::Number(value.into())
    }

    fn float(&self, value: f64) -> JsonValue {
        Number::from_f64(value).map_or(JsonValue::Null, JsonValue::Number)
    }

    fn string(&self, value: &str) -> JsonValue {
        JsonValue::String(value.to_string())
    }

    fn list(&self, items: Vec<JsonValue>) -> JsonValue {
        JsonValue::Array(items)
    }

    fn map(&self, entries: Vec<(String, JsonValue)>) -> JsonValue {
        JsonValue::Object(entries.into_iter().collect())
    }

    fn object(&self, _class: &'static ClassInfo) -> JsonValue {
        JsonValue::Object(Map::new())
    }

    fn add_property(&self, object: &mut JsonValue, name: &str, value: JsonValue) {
        if let JsonValue::Object(map) = object {
            map.insert(name.to_string(), value);
        }
    }

    fn render(&self, root: JsonValue, _root_name: &str) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&root)?)
    }
}
