//! Serializer facade: one entry point per call, both formats.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use hateoas_support::{ClassInfo, Value};

use crate::context::{Scope, SerializationContext};
use crate::error::{Result, SerdeError};
use crate::json::JsonVisitor;
use crate::naming::{PropertyNamingStrategy, SnakeCaseNaming};
use crate::navigator::{EventSubscriber, GraphNavigator};
use crate::visitor::{Visited, Visitor};
use crate::xml::XmlVisitor;

/// Default XML document root name.
pub const DEFAULT_ROOT_NAME: &str = "result";

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Xml,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Json => f.write_str("json"),
            Format::Xml => f.write_str("xml"),
        }
    }
}

impl FromStr for Format {
    type Err = SerdeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "xml" => Ok(Format::Xml),
            other => Err(SerdeError::Custom(format!("unsupported format `{other}`"))),
        }
    }
}

/// Class-level settings that come from outside the class descriptor.
pub trait ClassMetadataProvider: Send + Sync {
    /// XML root name configured for `class`, if any.
    fn xml_root_name(&self, class: &'static ClassInfo) -> Result<Option<String>>;
}

/// Serializes [`Value`] graphs to JSON or XML.
///
/// A serializer is immutable and can be shared between threads; every call
/// gets its own traversal state.
pub struct Serializer {
    naming: Arc<dyn PropertyNamingStrategy>,
    json_subscribers: Vec<Arc<dyn EventSubscriber<JsonVisitor>>>,
    xml_subscribers: Vec<Arc<dyn EventSubscriber<XmlVisitor>>>,
    metadata: Option<Arc<dyn ClassMetadataProvider>>,
}

impl Default for Serializer {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Serializer {
    pub fn builder() -> SerializerBuilder {
        SerializerBuilder::default()
    }

    pub fn serialize(
        &self,
        value: &Value,
        format: Format,
        context: &SerializationContext,
    ) -> Result<Vec<u8>> {
        match format {
            Format::Json => self.serialize_with(&JsonVisitor, &self.json_subscribers, value, context),
            Format::Xml => self.serialize_with(&XmlVisitor, &self.xml_subscribers, value, context),
        }
    }

    pub fn serialize_to_string(
        &self,
        value: &Value,
        format: Format,
        context: &SerializationContext,
    ) -> Result<String> {
        String::from_utf8(self.serialize(value, format, context)?)
            .map_err(|e| SerdeError::Custom(e.to_string()))
    }

    fn serialize_with<V: Visitor>(
        &self,
        visitor: &V,
        subscribers: &[Arc<dyn EventSubscriber<V>>],
        value: &Value,
        context: &SerializationContext,
    ) -> Result<Vec<u8>> {
        let navigator = GraphNavigator::new(visitor, subscribers, self.naming.as_ref(), context);
        let root = match navigator.navigate(value, &Scope::root())? {
            Visited::Node(node) => node,
            Visited::Null | Visited::Cycle | Visited::Excluded => visitor.null(),
        };
        let root_name = self.root_name(value)?;
        visitor.render(root, &root_name)
    }

    fn root_name(&self, value: &Value) -> Result<String> {
        let Some(object) = value.as_object() else {
            return Ok(DEFAULT_ROOT_NAME.to_string());
        };
        let class = object.class();
        if let Some(provider) = &self.metadata {
            if let Some(name) = provider.xml_root_name(class)? {
                return Ok(name);
            }
        }
        Ok(class.xml_root_name().unwrap_or(DEFAULT_ROOT_NAME).to_string())
    }
}

/// Assembles a [`Serializer`].
pub struct SerializerBuilder {
    naming: Arc<dyn PropertyNamingStrategy>,
    json_subscribers: Vec<Arc<dyn EventSubscriber<JsonVisitor>>>,
    xml_subscribers: Vec<Arc<dyn EventSubscriber<XmlVisitor>>>,
    metadata: Option<Arc<dyn ClassMetadataProvider>>,
}

impl Default for SerializerBuilder {
    fn default() -> Self {
        Self {
            naming: Arc::new(SnakeCaseNaming),
            json_subscribers: Vec::new(),
            xml_subscribers: Vec::new(),
            metadata: None,
        }
    }
}

impl SerializerBuilder {
    pub fn naming_strategy(mut self, naming: Arc<dyn PropertyNamingStrategy>) -> Self {
        self.naming = naming;
        self
    }

    pub fn add_json_subscriber(mut self, subscriber: Arc<dyn EventSubscriber<JsonVisitor>>) -> Self {
        self.json_subscribers.push(subscriber);
        self
    }

    pub fn add_xml_subscriber(mut self, subscriber: Arc<dyn EventSubscriber<XmlVisitor>>) -> Self {
        self.xml_subscribers.push(subscriber);
        self
    }

    pub fn metadata_provider(mut self, provider: Arc<dyn ClassMetadataProvider>) -> Self {
        self.metadata = Some(provider);
        self
    }

    pub fn build(self) -> Serializer {
        Serializer {
            naming: self.naming,
            json_subscribers: self.json_subscribers,
            xml_subscribers: self.xml_subscribers,
            metadata: self.metadata,
        }
    }
}
