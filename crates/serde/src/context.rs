//! Per-call serialization settings and per-branch traversal state.

use std::sync::Arc;

use hateoas_support::{ObjectId, ObjectRef, Value};

/// Settings for one serialization call.
///
/// # Examples
///
/// ```
/// use hateoas_serde::SerializationContext;
///
/// let context = SerializationContext::new()
///     .with_groups(["simple"])
///     .with_version("2.0")
///     .with_serialize_null(true);
/// assert_eq!(context.groups(), Some(&["simple".to_string()][..]));
/// assert!(context.serialize_null());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SerializationContext {
    groups: Option<Vec<String>>,
    version: Option<String>,
    serialize_null: bool,
    attributes: Vec<(String, Value)>,
}

impl SerializationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activates group filtering. Without groups, every property and relation
    /// is eligible.
    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = Some(groups.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_serialize_null(mut self, serialize_null: bool) -> Self {
        self.serialize_null = serialize_null;
        self
    }

    /// Attaches a custom attribute, visible to expressions as
    /// `context.attributes.<name>`.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn groups(&self) -> Option<&[String]> {
        self.groups.as_deref()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn serialize_null(&self) -> bool {
        self.serialize_null
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// The map bound to `context` in expressions.
    pub fn to_value(&self, scope: &Scope) -> Value {
        Value::map([
            (
                "groups",
                self.groups
                    .as_ref()
                    .map(|groups| Value::from(groups.clone()))
                    .unwrap_or_default(),
            ),
            ("version", Value::from(self.version.clone())),
            ("serialize_null", Value::from(self.serialize_null)),
            ("depth", Value::from(scope.depth())),
            ("attributes", Value::Map(self.attributes.clone())),
        ])
    }
}

#[derive(Debug)]
struct PathNode {
    id: ObjectId,
    parent: Option<Arc<PathNode>>,
}

/// Traversal state of one branch of the object graph.
///
/// A scope is never mutated: entering an object yields a new scope whose
/// visiting path extends the parent's, so sibling branches cannot observe
/// each other and a branch's path never shrinks.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    depth: usize,
    path: Option<Arc<PathNode>>,
    depth_limit: Option<usize>,
}

impl Scope {
    /// Scope before the root value is entered (depth 0, empty path).
    pub fn root() -> Self {
        Self::default()
    }

    /// Number of objects on the visiting path; the root object has depth 1.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Absolute depth beyond which objects are not entered.
    pub fn depth_limit(&self) -> Option<usize> {
        self.depth_limit
    }

    /// Whether `object` is on the visiting path of this branch.
    pub fn is_visiting(&self, object: &ObjectRef) -> bool {
        let id = object.id();
        let mut node = self.path.as_deref();
        while let Some(current) = node {
            if current.id == id {
                return true;
            }
            node = current.parent.as_deref();
        }
        false
    }

    /// Whether an object may be entered from this scope.
    pub fn can_descend(&self) -> bool {
        self.depth_limit.is_none_or(|limit| self.depth < limit)
    }

    /// The scope of `object`, one level deeper.
    pub fn enter(&self, object: &ObjectRef) -> Scope {
        Scope {
            depth: self.depth + 1,
            path: Some(Arc::new(PathNode {
                id: object.id(),
                parent: self.path.clone(),
            })),
            depth_limit: self.depth_limit,
        }
    }

    /// Restricts descent to `levels` objects below the current depth. An
    /// existing tighter limit is kept.
    pub fn with_max_depth(&self, levels: usize) -> Scope {
        let limit = self.depth + levels;
        Scope {
            depth_limit: Some(self.depth_limit.map_or(limit, |current| current.min(limit))),
            ..self.clone()
        }
    }
}
