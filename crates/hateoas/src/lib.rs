//! # HATEOAS for Serialized Objects
//!
//! This crate adds hypermedia controls to serialized objects: each object
//! gets the links (`_links`) and embedded resources (`_embedded`) its class
//! declares, rendered as HAL JSON or as XML.
//!
//! ## Overview
//!
//! Relations are declared per class and may come from several sources at
//! once:
//!
//! - **Code**: [`ClassInfo::with_attributes`](hateoas_support::ClassInfo::with_attributes)
//! - **Annotations**: docblock strings on the class descriptor
//! - **XML and YAML files**: one file per class in the metadata directories
//!
//! Hrefs, route parameters, embedded content and exclusion predicates are
//! templates: a plain string, or `expr(...)` evaluated against the object.
//!
//! ## Architecture
//!
//! - [`metadata`]: drivers, hierarchy merging, validation and caching
//! - [`factory`]: resolution of one object's relations into [`Link`]s and
//!   [`EmbeddedResource`]s
//! - [`serializer`]: the serialization hook and the JSON/XML layouts
//! - [`url_generator`]: route to URL translation
//! - [`representation`]: collection and pagination resources
//!
//! ## Example
//!
//! ```
//! use hateoas::{Format, HateoasBuilder};
//! use hateoas_support::{ClassInfo, Property, Relation, Resource, Value};
//!
//! static USER: ClassInfo = ClassInfo::new("app::User").with_attributes(user_relations);
//!
//! fn user_relations() -> Vec<Relation> {
//!     vec![Relation::new("self").with_href("expr('/users/' ~ object.id)")]
//! }
//!
//! struct User {
//!     id: i64,
//! }
//!
//! impl Resource for User {
//!     fn class(&self) -> &'static ClassInfo {
//!         &USER
//!     }
//!
//!     fn properties(&self) -> Vec<Property> {
//!         vec![Property::new("id", self.id)]
//!     }
//! }
//!
//! let hateoas = HateoasBuilder::new().build();
//! let json = hateoas
//!     .serialize(Value::object(User { id: 42 }), Format::Json, None)
//!     .unwrap();
//! assert_eq!(json, r#"{"id":42,"_links":{"self":{"href":"/users/42"}}}"#);
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod factory;
pub mod hateoas;
pub mod metadata;
pub mod model;
pub mod representation;
pub mod serializer;
pub mod url_generator;

pub use builder::HateoasBuilder;
pub use config::HateoasConfig;
pub use error::{HateoasError, MetadataLoadError, Result, UrlGenerationError};
pub use hateoas::Hateoas;
pub use metadata::{ClassMetadata, MetadataDriver, RelationProvider};
pub use model::{EmbeddedResource, Link};
pub use representation::{CollectionRepresentation, PaginatedRepresentation};
pub use url_generator::{CallableUrlGenerator, TemplateUrlGenerator, UrlGenerator};

pub use hateoas_serde::{Format, SerializationContext};
