//! Resources, object identity and class descriptors.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::configuration::Relation;
use crate::value::Value;

/// A domain object that can be serialized and inspected by expressions.
///
/// Implementors list their properties in declaration order. Properties marked
/// [`Property::excluded`] are never written to the output but stay visible to
/// expressions through [`Resource::get`].
pub trait Resource: Send + Sync + 'static {
    /// The static class descriptor of this object.
    fn class(&self) -> &'static ClassInfo;

    /// Properties in declaration order.
    fn properties(&self) -> Vec<Property>;

    /// Reads a property by its declared (not serialized) name.
    fn get(&self, name: &str) -> Option<Value> {
        self.properties()
            .into_iter()
            .find(|p| p.name() == name)
            .map(Property::into_value)
    }

    /// Invokes a method by name. `None` means the method does not exist.
    fn call(&self, method: &str, args: &[Value]) -> Option<Value> {
        let _ = (method, args);
        None
    }
}

/// Identity of an object for the duration of a serialization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(usize);

/// Shared, identity-carrying handle to a [`Resource`].
#[derive(Clone)]
pub struct ObjectRef(Arc<dyn Resource>);

impl ObjectRef {
    pub fn new<R: Resource>(resource: R) -> Self {
        Self(Arc::new(resource))
    }

    pub fn id(&self) -> ObjectId {
        ObjectId(Arc::as_ptr(&self.0) as *const () as usize)
    }

    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        self.id() == other.id()
    }
}

impl Deref for ObjectRef {
    type Target = dyn Resource;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl<R: Resource> From<Arc<R>> for ObjectRef {
    fn from(resource: Arc<R>) -> Self {
        Self(resource)
    }
}

impl From<Arc<dyn Resource>> for ObjectRef {
    fn from(resource: Arc<dyn Resource>) -> Self {
        Self(resource)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{:x}", self.class().name(), self.id().0)
    }
}

/// A serializable property of a resource.
#[derive(Debug, Clone)]
pub struct Property {
    name: String,
    value: Value,
    serialized_name: Option<String>,
    groups: Option<Vec<String>>,
    since_version: Option<String>,
    until_version: Option<String>,
    max_depth: Option<usize>,
    excluded: bool,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            serialized_name: None,
            groups: None,
            since_version: None,
            until_version: None,
            max_depth: None,
            excluded: false,
        }
    }

    /// Overrides the naming strategy for this property.
    pub fn serialized_name(mut self, name: impl Into<String>) -> Self {
        self.serialized_name = Some(name.into());
        self
    }

    /// Serialization groups. A property without groups belongs to `Default`.
    pub fn groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = Some(groups.into_iter().map(Into::into).collect());
        self
    }

    pub fn since(mut self, version: impl Into<String>) -> Self {
        self.since_version = Some(version.into());
        self
    }

    pub fn until(mut self, version: impl Into<String>) -> Self {
        self.until_version = Some(version.into());
        self
    }

    /// Limits how many object levels below this property are serialized.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Hides the property from the output while keeping it readable by
    /// expressions.
    pub fn excluded(mut self) -> Self {
        self.excluded = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn serialized_name_override(&self) -> Option<&str> {
        self.serialized_name.as_deref()
    }

    pub fn group_list(&self) -> Option<&[String]> {
        self.groups.as_deref()
    }

    pub fn since_version(&self) -> Option<&str> {
        self.since_version.as_deref()
    }

    pub fn until_version(&self) -> Option<&str> {
        self.until_version.as_deref()
    }

    pub fn depth_limit(&self) -> Option<usize> {
        self.max_depth
    }

    pub fn is_excluded(&self) -> bool {
        self.excluded
    }
}

fn no_attributes() -> Vec<Relation> {
    Vec::new()
}

/// Static descriptor of a resource class.
///
/// Descriptors are meant to live in `static` items so that metadata can be
/// cached per class for the lifetime of the process:
///
/// ```
/// use hateoas_support::ClassInfo;
///
/// static ANIMAL: ClassInfo = ClassInfo::new("zoo::Animal");
/// static DOG: ClassInfo = ClassInfo::new("zoo::Dog")
///     .extends(&ANIMAL)
///     .with_annotations(&[r#"@Hateoas\Relation("self", href = "expr('/dogs/' ~ object.id)")"#]);
///
/// assert_eq!(DOG.ancestors().len(), 2);
/// ```
#[derive(Debug)]
pub struct ClassInfo {
    name: &'static str,
    parent: Option<&'static ClassInfo>,
    xml_root_name: Option<&'static str>,
    attributes: fn() -> Vec<Relation>,
    annotations: &'static [&'static str],
}

impl ClassInfo {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            parent: None,
            xml_root_name: None,
            attributes: no_attributes,
            annotations: &[],
        }
    }

    pub const fn extends(self, parent: &'static ClassInfo) -> Self {
        Self {
            parent: Some(parent),
            ..self
        }
    }

    /// Root element name used when an instance is the XML document root.
    pub const fn with_xml_root_name(self, name: &'static str) -> Self {
        Self {
            xml_root_name: Some(name),
            ..self
        }
    }

    /// Relations declared in code.
    pub const fn with_attributes(self, attributes: fn() -> Vec<Relation>) -> Self {
        Self { attributes, ..self }
    }

    /// Docblock-style annotation strings, parsed by the annotation driver.
    pub const fn with_annotations(self, annotations: &'static [&'static str]) -> Self {
        Self {
            annotations,
            ..self
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn parent(&self) -> Option<&'static ClassInfo> {
        self.parent
    }

    pub fn xml_root_name(&self) -> Option<&'static str> {
        self.xml_root_name
    }

    pub fn attributes(&self) -> Vec<Relation> {
        (self.attributes)()
    }

    pub fn annotations(&self) -> &'static [&'static str] {
        self.annotations
    }

    /// The class hierarchy, root class first and this class last.
    pub fn ancestors(&'static self) -> Vec<&'static ClassInfo> {
        let mut chain = vec![self];
        let mut current = self.parent;
        while let Some(class) = current {
            chain.push(class);
            current = class.parent;
        }
        chain.reverse();
        chain
    }
}

impl PartialEq for ClassInfo {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ClassInfo {}

#[cfg(test)]
mod tests {
    use super::*;

    static BASE: ClassInfo = ClassInfo::new("tests::Base");
    static CHILD: ClassInfo = ClassInfo::new("tests::Child")
        .extends(&BASE)
        .with_attributes(child_relations);

    fn child_relations() -> Vec<Relation> {
        vec![Relation::new("self").with_href("/child")]
    }

    struct Child {
        name: &'static str,
    }

    impl Resource for Child {
        fn class(&self) -> &'static ClassInfo {
            &CHILD
        }

        fn properties(&self) -> Vec<Property> {
            vec![
                Property::new("name", self.name),
                Property::new("secret", "hidden").excluded(),
            ]
        }
    }

    #[test]
    fn test_ancestors_root_first() {
        let names: Vec<_> = CHILD.ancestors().iter().map(|c| c.name()).collect();
        assert_eq!(names, ["tests::Base", "tests::Child"]);
        assert_eq!(CHILD.attributes().len(), 1);
        assert!(BASE.attributes().is_empty());
    }

    #[test]
    fn test_excluded_properties_remain_readable() {
        let child = Child { name: "c" };
        assert_eq!(child.get("secret"), Some(Value::from("hidden")));
        assert_eq!(child.get("name"), Some(Value::from("c")));
        assert_eq!(child.get("missing"), None);
        assert_eq!(child.call("anything", &[]), None);
    }

    #[test]
    fn test_object_identity() {
        let a = ObjectRef::new(Child { name: "a" });
        let b = ObjectRef::new(Child { name: "a" });
        assert!(a.ptr_eq(&a.clone()));
        assert!(!a.ptr_eq(&b));
        assert_eq!(Value::Object(a.clone()), Value::Object(a));
    }
}
