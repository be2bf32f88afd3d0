//! Depth-first walk over a [`Value`] graph with visit hooks.

use std::sync::Arc;

use hateoas_support::{ObjectRef, Value};

use crate::context::{Scope, SerializationContext};
use crate::error::Result;
use crate::exclusion::should_skip_property;
use crate::naming::PropertyNamingStrategy;
use crate::visitor::{Visited, Visitor};

/// An object that has just been serialized.
pub struct ObjectEvent<'a, V: Visitor> {
    pub object: &'a ObjectRef,
    /// The object's output node, properties already added.
    pub node: &'a mut V::Node,
    /// The object's own scope; its path includes the object.
    pub scope: &'a Scope,
}

/// Hooks into the object visit lifecycle.
pub trait EventSubscriber<V: Visitor>: Send + Sync {
    /// Called after an object is entered, before its properties are visited.
    fn on_pre_serialize(
        &self,
        object: &ObjectRef,
        scope: &Scope,
        context: &SerializationContext,
    ) -> Result<()> {
        let _ = (object, scope, context);
        Ok(())
    }

    /// Called once an object's properties are in its node. The navigator can
    /// be used to serialize further values below the object.
    fn on_post_serialize(
        &self,
        event: &mut ObjectEvent<'_, V>,
        navigator: &GraphNavigator<'_, V>,
    ) -> Result<()>;
}

/// Walks values and dispatches to a visitor and subscribers.
///
/// Objects are entered only when they are not already on the current
/// branch's visiting path (otherwise [`Visited::Cycle`]) and the branch's
/// depth limit allows it (otherwise [`Visited::Excluded`]), which bounds the
/// walk on any graph.
pub struct GraphNavigator<'a, V: Visitor> {
    visitor: &'a V,
    subscribers: &'a [Arc<dyn EventSubscriber<V>>],
    naming: &'a dyn PropertyNamingStrategy,
    context: &'a SerializationContext,
}

impl<'a, V: Visitor> GraphNavigator<'a, V> {
    pub fn new(
        visitor: &'a V,
        subscribers: &'a [Arc<dyn EventSubscriber<V>>],
        naming: &'a dyn PropertyNamingStrategy,
        context: &'a SerializationContext,
    ) -> Self {
        Self {
            visitor,
            subscribers,
            naming,
            context,
        }
    }

    pub fn visitor(&self) -> &V {
        self.visitor
    }

    pub fn context(&self) -> &SerializationContext {
        self.context
    }

    /// Navigates `value` as seen from `scope` (the scope of the value's
    /// owner).
    pub fn navigate(&self, value: &Value, scope: &Scope) -> Result<Visited<V::Node>> {
        let visitor = self.visitor;
        let node = match value {
            Value::Null => return Ok(Visited::Null),
            Value::Bool(b) => visitor.boolean(*b),
            Value::Integer(i) => visitor.integer(*i),
            Value::Float(f) => visitor.float(*f),
            Value::String(s) => visitor.string(s),
            Value::List(items) => {
                let mut nodes = Vec::with_capacity(items.len());
                for item in items {
                    if let Some(node) = self.navigate_member(item, scope)? {
                        nodes.push(node);
                    }
                }
                visitor.list(nodes)
            }
            Value::Map(entries) => {
                let mut nodes = Vec::with_capacity(entries.len());
                for (key, item) in entries {
                    if let Some(node) = self.navigate_member(item, scope)? {
                        nodes.push((key.clone(), node));
                    }
                }
                visitor.map(nodes)
            }
            Value::Object(object) => return self.navigate_object(object, scope),
        };
        Ok(Visited::Node(node))
    }

    /// Navigates a collection member or property value; `None` when it is
    /// left out of the output.
    fn navigate_member(&self, value: &Value, scope: &Scope) -> Result<Option<V::Node>> {
        Ok(match self.navigate(value, scope)? {
            Visited::Node(node) => Some(node),
            Visited::Null if self.context.serialize_null() => Some(self.visitor.null()),
            Visited::Null | Visited::Cycle | Visited::Excluded => None,
        })
    }

    fn navigate_object(&self, object: &ObjectRef, scope: &Scope) -> Result<Visited<V::Node>> {
        if scope.is_visiting(object) {
            tracing::trace!(class = object.class().name(), "skipping cyclic reference");
            return Ok(Visited::Cycle);
        }
        if !scope.can_descend() {
            tracing::trace!(
                class = object.class().name(),
                depth = scope.depth(),
                "skipping object below depth limit"
            );
            return Ok(Visited::Excluded);
        }

        let object_scope = scope.enter(object);
        for subscriber in self.subscribers {
            subscriber.on_pre_serialize(object, &object_scope, self.context)?;
        }

        let mut node = self.visitor.object(object.class());
        for property in object.properties() {
            if should_skip_property(&property, self.context) {
                continue;
            }
            let property_scope = match property.depth_limit() {
                Some(levels) => object_scope.with_max_depth(levels),
                None => object_scope.clone(),
            };
            let Some(value) = self.navigate_member(property.value(), &property_scope)? else {
                continue;
            };
            let name = match property.serialized_name_override() {
                Some(name) => name.to_string(),
                None => self.naming.translate(property.name()),
            };
            self.visitor.add_property(&mut node, &name, value);
        }

        let mut event = ObjectEvent {
            object,
            node: &mut node,
            scope: &object_scope,
        };
        for subscriber in self.subscribers {
            subscriber.on_post_serialize(&mut event, self)?;
        }

        Ok(Visited::Node(node))
    }
}
