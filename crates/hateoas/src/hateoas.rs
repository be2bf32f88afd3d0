use std::sync::Arc;

use hateoas_serde::{Format, Scope, SerializationContext, Serializer};
use hateoas_support::{ClassInfo, ObjectRef, Value};

use crate::error::Result;
use crate::factory::{RelationResolver, ResolvedRelations};
use crate::metadata::ClassMetadata;

/// Serializes values to HAL JSON or XML with their links and embedded
/// resources.
///
/// Built by [`HateoasBuilder`](crate::HateoasBuilder). An instance is
/// immutable and may serve concurrent calls.
pub struct Hateoas {
    serializer: Serializer,
    resolver: Arc<RelationResolver>,
    default_context: SerializationContext,
}

impl Hateoas {
    pub(crate) fn new(
        serializer: Serializer,
        resolver: Arc<RelationResolver>,
        default_context: SerializationContext,
    ) -> Self {
        Self {
            serializer,
            resolver,
            default_context,
        }
    }

    /// Serializes `value` to a string. Without a context, the builder's
    /// default context is used.
    pub fn serialize(
        &self,
        value: impl Into<Value>,
        format: Format,
        context: Option<SerializationContext>,
    ) -> Result<String> {
        let context = context.unwrap_or_else(|| self.default_context.clone());
        Ok(self
            .serializer
            .serialize_to_string(&value.into(), format, &context)?)
    }

    pub fn serialize_to_vec(
        &self,
        value: impl Into<Value>,
        format: Format,
        context: Option<SerializationContext>,
    ) -> Result<Vec<u8>> {
        let context = context.unwrap_or_else(|| self.default_context.clone());
        Ok(self.serializer.serialize(&value.into(), format, &context)?)
    }

    /// Links and embeds `object` would get as the root of a serialization.
    /// Embedded content is returned unserialized.
    pub fn relations(&self, object: &ObjectRef, context: Option<&SerializationContext>) -> Result<ResolvedRelations> {
        let context = context.unwrap_or(&self.default_context);
        self.resolver
            .resolve_object(object, &Scope::root().enter(object), context)
    }

    /// The merged, validated relation metadata of `class`.
    pub fn metadata_for_class(&self, class: &'static ClassInfo) -> Result<Arc<ClassMetadata>> {
        Ok(self.resolver.metadata().metadata_for_class(class)?)
    }

    pub fn serializer(&self) -> &Serializer {
        &self.serializer
    }

    pub fn resolver(&self) -> &Arc<RelationResolver> {
        &self.resolver
    }
}
