//! Links and embedded values produced for one object visit.

use hateoas_support::Value;

/// A resolved link.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    rel: String,
    href: String,
    attributes: Vec<(String, String)>,
}

impl Link {
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn rel(&self) -> &str {
        &self.rel
    }

    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }
}

/// A resolved embedded value.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedResource {
    rel: String,
    content: Value,
    cyclic: bool,
    max_depth: Option<usize>,
    xml_element_name: Option<String>,
}

impl EmbeddedResource {
    pub fn new(rel: impl Into<String>, content: Value) -> Self {
        Self {
            rel: rel.into(),
            content,
            cyclic: false,
            max_depth: None,
            xml_element_name: None,
        }
    }

    /// Marks the content as an object already on the visiting path.
    pub fn cyclic(mut self, cyclic: bool) -> Self {
        self.cyclic = cyclic;
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_xml_element_name(mut self, name: Option<String>) -> Self {
        self.xml_element_name = name;
        self
    }

    pub fn rel(&self) -> &str {
        &self.rel
    }

    pub fn content(&self) -> &Value {
        &self.content
    }

    pub fn is_cyclic(&self) -> bool {
        self.cyclic
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    pub fn xml_element_name(&self) -> Option<&str> {
        self.xml_element_name.as_deref()
    }
}
