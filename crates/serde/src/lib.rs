//! # Object Graph Serialization Module
//!
//! This crate serializes graphs of [`hateoas_support::Resource`] objects to
//! JSON and XML, with the hooks the hypermedia layer plugs into.
//!
//! ## Features
//!
//! - **Visit hooks**: [`EventSubscriber`]s run before and after every object
//!   and may append nodes to the object's output.
//! - **Exclusion**: serialization groups (members without groups belong to
//!   `Default`), since/until versions, per-property max depth.
//! - **Cycle safety**: every branch carries its visiting path in a [`Scope`];
//!   an object already on the path is reported as a cycle and not entered
//!   again, so traversal terminates on any graph.
//! - **Naming**: declared names go through a [`PropertyNamingStrategy`]
//!   (`firstName` → `first_name` by default).
//!
//! ## Architecture
//!
//! - **Navigator**: [`GraphNavigator`] walks the graph depth-first and asks a
//!   [`Visitor`] for output nodes.
//! - **JSON Layer**: [`JsonVisitor`] builds an ordered `serde_json::Value`.
//! - **XML Layer**: [`XmlVisitor`] builds an element tree rendered with
//!   quick-xml.
//!
//! ## Examples
//!
//! ```
//! use hateoas_serde::{Format, SerializationContext, Serializer};
//! use hateoas_support::Value;
//!
//! let serializer = Serializer::default();
//! let value = Value::map([("firstName", "Adrien")]);
//! let json = serializer
//!     .serialize_to_string(&value, Format::Json, &SerializationContext::new())
//!     .unwrap();
//! assert_eq!(json, r#"{"firstName":"Adrien"}"#);
//! ```

pub mod context;
pub mod error;
pub mod exclusion;
pub mod json;
pub mod naming;
pub mod navigator;
pub mod serializer;
pub mod visitor;
pub mod xml;

pub use context::{Scope, SerializationContext};
pub use error::{Result, SerdeError};
pub use json::JsonVisitor;
pub use naming::{IdenticalNaming, NamingStrategy, PropertyNamingStrategy, SnakeCaseNaming};
pub use navigator::{EventSubscriber, GraphNavigator, ObjectEvent};
pub use serializer::{ClassMetadataProvider, DEFAULT_ROOT_NAME, Format, Serializer, SerializerBuilder};
pub use visitor::{Visited, Visitor};
pub use xml::{XmlElement, XmlNode, XmlVisitor};
