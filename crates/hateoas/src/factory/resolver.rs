use std::collections::HashSet;
use std::sync::Arc;

use hateoas_expression::{Bindings, ExpressionEvaluator};
use hateoas_serde::{Scope, SerializationContext};
use hateoas_support::{ObjectRef, Value};

use super::{EmbeddedFactory, ExclusionManager, LinkFactory};
use crate::error::{HateoasError, Result};
use crate::metadata::{ClassMetadata, MetadataFactory};
use crate::model::{EmbeddedResource, Link};
use crate::url_generator::UrlGeneratorRegistry;

/// Links and embeds of one object, in declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedRelations {
    pub links: Vec<Link>,
    pub embeddeds: Vec<EmbeddedResource>,
}

impl ResolvedRelations {
    pub fn is_empty(&self) -> bool {
        self.links.is_empty() && self.embeddeds.is_empty()
    }
}

/// Turns the relation metadata of an object into links and embeds.
///
/// Templates see the object as `object` and the serialization context as
/// `context` (`groups`, `version`, `serialize_null`, `depth`,
/// `attributes`). Any evaluation or URL generation error aborts the
/// resolution.
pub struct RelationResolver {
    metadata: Arc<MetadataFactory>,
    evaluator: Arc<ExpressionEvaluator>,
    links: LinkFactory,
    embeddeds: EmbeddedFactory,
    exclusion: ExclusionManager,
}

impl RelationResolver {
    pub fn new(
        metadata: Arc<MetadataFactory>,
        evaluator: Arc<ExpressionEvaluator>,
        url_generators: Arc<UrlGeneratorRegistry>,
    ) -> Self {
        Self {
            links: LinkFactory::new(evaluator.clone(), url_generators),
            embeddeds: EmbeddedFactory::new(evaluator.clone()),
            exclusion: ExclusionManager::new(evaluator.clone()),
            metadata,
            evaluator,
        }
    }

    pub fn metadata(&self) -> &MetadataFactory {
        &self.metadata
    }

    /// Resolves `object` with the metadata of its class. `scope` is the
    /// object's own scope.
    pub fn resolve_object(
        &self,
        object: &ObjectRef,
        scope: &Scope,
        context: &SerializationContext,
    ) -> Result<ResolvedRelations> {
        let metadata = self.metadata.metadata_for_class(object.class())?;
        self.resolve(object, &metadata, scope, context)
    }

    pub fn resolve(
        &self,
        object: &ObjectRef,
        metadata: &ClassMetadata,
        scope: &Scope,
        context: &SerializationContext,
    ) -> Result<ResolvedRelations> {
        let mut resolved = ResolvedRelations::default();
        if metadata.relations().is_empty() {
            return Ok(resolved);
        }

        let bindings = Bindings::for_object(Value::Object(object.clone()))
            .with("context", context.to_value(scope));
        let mut emitted = HashSet::new();

        for relation in metadata.relations() {
            let with_link = !self.exclusion.should_skip_link(relation, &bindings, scope, context)?;
            let with_embed = !self.exclusion.should_skip_embedded(relation, &bindings, scope, context)?;
            if !with_link && !with_embed {
                continue;
            }

            let rel = self.evaluator.evaluate_template(relation.name(), &bindings)?.to_string();
            if !emitted.insert(rel.clone()) {
                return Err(HateoasError::DuplicateRelation {
                    class: metadata.class_name().to_string(),
                    relation: rel,
                });
            }

            if with_link {
                resolved.links.push(self.links.create_link(&rel, relation, &bindings)?);
            }
            if with_embed {
                if let Some(embedded) = self.embeddeds.create_embedded(&rel, relation, &bindings, scope)? {
                    resolved.embeddeds.push(embedded);
                }
            }
        }

        Ok(resolved)
    }
}
