use hateoas_serde::{SerializationContext, Visited, XmlElement, XmlNode, XmlVisitor};

use super::LinkSerializer;
use crate::model::{EmbeddedResource, Link};

const ENTRY_ELEMENT: &str = "entry";

/// Links as `<link rel=".." href=".."/>` elements and embeds as
/// `<entry rel="..">` elements, or elements named after the embed's XML
/// element name.
///
/// A null embed becomes `<entry rel=".." xsi:nil="true"/>` when null
/// serialization is on. Null embeds without null serialization, cyclic
/// embeds and embeds below the depth limit become empty elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlSerializer;

impl LinkSerializer for XmlSerializer {
    type Visitor = XmlVisitor;

    fn serialize_links(&self, links: &[Link], node: &mut XmlNode, _context: &SerializationContext) {
        for link in links {
            let mut element = XmlElement::new("link", XmlNode::empty())
                .with_attribute("rel", link.rel())
                .with_attribute("href", link.href());
            for (name, value) in link.attributes() {
                element = element.with_attribute(name.as_str(), value.as_str());
            }
            node.push(element);
        }
    }

    fn serialize_embeddeds(
        &self,
        embeddeds: Vec<(&EmbeddedResource, Visited<XmlNode>)>,
        node: &mut XmlNode,
        context: &SerializationContext,
    ) {
        for (embedded, visited) in embeddeds {
            let content = match visited {
                Visited::Node(content) => content,
                Visited::Null if context.serialize_null() => XmlNode::Nil,
                Visited::Null | Visited::Cycle | Visited::Excluded => XmlNode::empty(),
            };
            let name = embedded.xml_element_name().unwrap_or(ENTRY_ELEMENT);
            node.push(XmlElement::new(name, content).with_attribute("rel", embedded.rel()));
        }
    }
}
