use hateoas_serde::{JsonVisitor, SerializationContext, Visited};
use serde_json::{Map, Value as JsonValue};

use super::LinkSerializer;
use crate::model::{EmbeddedResource, Link};

/// HAL: links under `_links`, embedded resources under `_embedded`.
///
/// ```json
/// {
///   "name": "reference1",
///   "_links": {"self": {"href": "/references/1"}},
///   "_embedded": {"reference2": {"name": "reference2", "_embedded": {}}}
/// }
/// ```
///
/// Null and cyclic embeds are written as `null` when null serialization is
/// on and left out otherwise. Embeds below the depth limit are always left
/// out.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonHalSerializer;

impl JsonHalSerializer {
    fn insert(node: &mut JsonValue, key: &str, value: JsonValue) {
        if let JsonValue::Object(map) = node {
            map.insert(key.to_string(), value);
        }
    }
}

impl LinkSerializer for JsonHalSerializer {
    type Visitor = JsonVisitor;

    fn serialize_links(&self, links: &[Link], node: &mut JsonValue, _context: &SerializationContext) {
        let mut serialized = Map::new();
        for link in links {
            let mut entry = Map::new();
            entry.insert("href".to_string(), JsonValue::String(link.href().to_string()));
            for (name, value) in link.attributes() {
                entry.insert(name.clone(), JsonValue::String(value.clone()));
            }
            serialized.insert(link.rel().to_string(), JsonValue::Object(entry));
        }
        Self::insert(node, "_links", JsonValue::Object(serialized));
    }

    fn serialize_embeddeds(
        &self,
        embeddeds: Vec<(&EmbeddedResource, Visited<JsonValue>)>,
        node: &mut JsonValue,
        context: &SerializationContext,
    ) {
        let mut serialized = Map::new();
        for (embedded, visited) in embeddeds {
            match visited {
                Visited::Node(value) => {
                    serialized.insert(embedded.rel().to_string(), value);
                }
                Visited::Null | Visited::Cycle if context.serialize_null() => {
                    serialized.insert(embedded.rel().to_string(), JsonValue::Null);
                }
                Visited::Null | Visited::Cycle | Visited::Excluded => {}
            }
        }
        Self::insert(node, "_embedded", JsonValue::Object(serialized));
    }
}
