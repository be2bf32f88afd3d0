//! Writing links and embeds into the serializer's output tree.
//!
//! [`HateoasSubscriber`] hooks into the object visit lifecycle of
//! `hateoas-serde`: after an object's properties are serialized it resolves
//! the object's relations, serializes embedded content through the
//! navigator, and hands the result to a format-specific [`LinkSerializer`].

mod json;
mod subscriber;
mod xml;

use hateoas_serde::{SerializationContext, Visited, Visitor};

use crate::model::{EmbeddedResource, Link};

pub use json::JsonHalSerializer;
pub use subscriber::HateoasSubscriber;
pub use xml::XmlSerializer;

/// Writes links and embeds into one format's object node.
pub trait LinkSerializer: Send + Sync {
    type Visitor: Visitor;

    /// Called only with a non-empty slice.
    fn serialize_links(
        &self,
        links: &[Link],
        node: &mut <Self::Visitor as Visitor>::Node,
        context: &SerializationContext,
    );

    /// Called only with a non-empty list. Each embed comes with the outcome
    /// of serializing its content; cyclic content arrives as
    /// [`Visited::Cycle`].
    fn serialize_embeddeds(
        &self,
        embeddeds: Vec<(&EmbeddedResource, Visited<<Self::Visitor as Visitor>::Node>)>,
        node: &mut <Self::Visitor as Visitor>::Node,
        context: &SerializationContext,
    );
}
