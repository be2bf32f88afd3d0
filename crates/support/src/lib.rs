//! # Hypermedia Object Model
//!
//! This crate is the bridge between the expression evaluator
//! (`hateoas-expression`), the object serializer (`hateoas-serde`) and the
//! hypermedia layer (`hateoas`). It holds the types every one of them has to
//! agree on:
//!
//! - [`Value`]: the dynamic value that expressions evaluate to and that the
//!   serializer walks.
//! - [`Resource`] / [`ObjectRef`]: how a domain type exposes its properties and
//!   methods, and how object identity is tracked for cycle detection.
//! - [`ClassInfo`]: the static class descriptor (name, parent, declared
//!   relations and annotation strings).
//! - [`configuration`]: the normalized relation declarations every metadata
//!   source produces.
//!
//! ## Declaring a resource
//!
//! ```
//! use hateoas_support::{ClassInfo, Property, Relation, Resource};
//!
//! static USER: ClassInfo = ClassInfo::new("app::User").with_attributes(user_relations);
//!
//! fn user_relations() -> Vec<Relation> {
//!     vec![Relation::new("self").with_href("expr('/users/' ~ object.id)")]
//! }
//!
//! struct User {
//!     id: i64,
//!     name: String,
//! }
//!
//! impl Resource for User {
//!     fn class(&self) -> &'static ClassInfo {
//!         &USER
//!     }
//!
//!     fn properties(&self) -> Vec<Property> {
//!         vec![
//!             Property::new("id", self.id),
//!             Property::new("name", self.name.as_str()),
//!         ]
//!     }
//! }
//! ```

pub mod configuration;
pub mod resource;
pub mod value;

pub use configuration::{Condition, Embedded, Exclusion, Relation, RelationHref, Route, RouteParameters};
pub use resource::{ClassInfo, ObjectId, ObjectRef, Property, Resource};
pub use value::Value;
