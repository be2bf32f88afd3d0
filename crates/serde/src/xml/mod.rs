//! XML output.
//!
//! The visitor builds a small element tree which [`ser`] writes with
//! quick-xml. The mapping follows the usual object-to-XML conventions:
//!
//! | Value | XML |
//! |-------|-----|
//! | string | `<name><![CDATA[Adrien]]></name>` |
//! | number, boolean | `<number>303</number>` |
//! | null (when serialized) | `<name xsi:nil="true"/>` |
//! | list | `<tags><entry>..</entry><entry>..</entry></tags>` |
//! | object, map | nested elements, one per property or key |
//!
//! The document root is `<result>` unless the root object's class declares
//! an XML root name. `xmlns:xsi` is declared on the root element whenever
//! the document contains a nil element.
//!
//! ## Example output
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <result>
//!   <first_name><![CDATA[Adrien]]></first_name>
//!   <last_name><![CDATA[Brault]]></last_name>
//! </result>
//! ```

pub mod ser;
mod utils;

use hateoas_support::ClassInfo;

use crate::error::Result;
use crate::visitor::Visitor;

pub use ser::{to_xml_string, to_xml_vec};
pub use utils::XSI_NAMESPACE;

/// Content of an XML element.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    /// Rendered as `xsi:nil="true"` on the owning element.
    Nil,
    /// Escaped text (numbers and booleans).
    Text(String),
    /// Character data (strings).
    CData(String),
    /// Child elements; empty renders a self-closing element.
    Elements(Vec<XmlElement>),
}

impl XmlNode {
    /// An element container without children.
    pub fn empty() -> Self {
        XmlNode::Elements(Vec::new())
    }

    /// Appends a child element. Non-container nodes are turned into an empty
    /// container first.
    pub fn push(&mut self, element: XmlElement) {
        match self {
            XmlNode::Elements(children) => children.push(element),
            _ => *self = XmlNode::Elements(vec![element]),
        }
    }

    pub fn children(&self) -> &[XmlElement] {
        match self {
            XmlNode::Elements(children) => children,
            _ => &[],
        }
    }

    pub(crate) fn contains_nil(&self) -> bool {
        match self {
            XmlNode::Nil => true,
            XmlNode::Elements(children) => children.iter().any(|c| c.content.contains_nil()),
            XmlNode::Text(_) | XmlNode::CData(_) => false,
        }
    }
}

/// A named element with attributes and content.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub content: XmlNode,
}

impl XmlElement {
    pub fn new(name: impl Into<String>, content: XmlNode) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            content,
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }
}

/// Builds an [`XmlNode`] tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlVisitor;

impl Visitor for XmlVisitor {
    type Node = XmlNode;

    fn null(&self) -> XmlNode {
        XmlNode::Nil
    }

    fn boolean(&self, value: bool) -> XmlNode {
        XmlNode::Text(utils::bool_to_string(value).to_string())
    }

    fn integer(&self, value: i64) -> XmlNode {
        XmlNode::Text(value.to_string())
    }

    fn float(&self, value: f64) -> XmlNode {
        XmlNode::Text(value.to_string())
    }

    fn string(&self, value: &str) -> XmlNode {
        XmlNode::CData(value.to_string())
    }

    fn list(&self, items: Vec<XmlNode>) -> XmlNode {
        XmlNode::Elements(
            items
                .into_iter()
                .map(|item| XmlElement::new(utils::ENTRY_ELEMENT, item))
                .collect(),
        )
    }

    fn map(&self, entries: Vec<(String, XmlNode)>) -> XmlNode {
        XmlNode::Elements(
            entries
                .into_iter()
                .map(|(key, item)| utils::keyed_element(key, item))
                .collect(),
        )
    }

    fn object(&self, _class: &'static ClassInfo) -> XmlNode {
        XmlNode::empty()
    }

    fn add_property(&self, object: &mut XmlNode, name: &str, value: XmlNode) {
        object.push(utils::keyed_element(name.to_string(), value));
    }

    fn render(&self, root: XmlNode, root_name: &str) -> Result<Vec<u8>> {
        to_xml_vec(&XmlElement::new(root_name, root))
    }
}
