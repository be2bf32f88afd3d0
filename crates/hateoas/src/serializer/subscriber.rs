use std::sync::Arc;

use hateoas_serde::{EventSubscriber, GraphNavigator, ObjectEvent, SerdeError, Visited};

use super::LinkSerializer;
use crate::error::{HateoasError, Result};
use crate::factory::RelationResolver;

/// Adds links and embeds to every serialized object.
pub struct HateoasSubscriber<S> {
    resolver: Arc<RelationResolver>,
    serializer: S,
}

impl<S: LinkSerializer> HateoasSubscriber<S> {
    pub fn new(resolver: Arc<RelationResolver>, serializer: S) -> Self {
        Self { resolver, serializer }
    }

    fn add_relations(
        &self,
        event: &mut ObjectEvent<'_, S::Visitor>,
        navigator: &GraphNavigator<'_, S::Visitor>,
    ) -> Result<()> {
        let context = navigator.context();
        let resolved = self.resolver.resolve_object(event.object, event.scope, context)?;

        if !resolved.links.is_empty() {
            self.serializer.serialize_links(&resolved.links, event.node, context);
        }
        if resolved.embeddeds.is_empty() {
            return Ok(());
        }

        let mut serialized = Vec::with_capacity(resolved.embeddeds.len());
        for embedded in &resolved.embeddeds {
            if embedded.is_cyclic() {
                tracing::trace!(rel = embedded.rel(), "embedding a cyclic reference as empty");
                serialized.push((embedded, Visited::Cycle));
                continue;
            }
            let scope = match embedded.max_depth() {
                Some(levels) => event.scope.with_max_depth(levels),
                None => event.scope.clone(),
            };
            let visited = navigator.navigate(embedded.content(), &scope)?;
            if matches!(visited, Visited::Cycle) {
                return Err(HateoasError::CyclicEmbedUnhandled {
                    class: event.object.class().name().to_string(),
                    relation: embedded.rel().to_string(),
                });
            }
            serialized.push((embedded, visited));
        }
        self.serializer.serialize_embeddeds(serialized, event.node, context);
        Ok(())
    }
}

impl<S: LinkSerializer> EventSubscriber<S::Visitor> for HateoasSubscriber<S> {
    fn on_post_serialize(
        &self,
        event: &mut ObjectEvent<'_, S::Visitor>,
        navigator: &GraphNavigator<'_, S::Visitor>,
    ) -> hateoas_serde::Result<()> {
        self.add_relations(event, navigator).map_err(SerdeError::subscriber)
    }
}
