//! Relation metadata: what each class declares and where it comes from.
//!
//! Metadata is read by [`MetadataDriver`]s, one per source format:
//!
//! | Driver | Source |
//! |--------|--------|
//! | [`AttributeDriver`] | relations returned by [`ClassInfo::attributes`] |
//! | [`AnnotationDriver`] | docblock strings in [`ClassInfo::annotations`] |
//! | [`XmlDriver`] | `<Class.Name>.xml` files in the metadata directories |
//! | [`YamlDriver`] | `<Class.Name>.yml` / `.yaml` files in the metadata directories |
//!
//! A [`DriverChain`] unions their results and the [`MetadataFactory`] merges
//! the class hierarchy, validates and caches the outcome.

mod annotation;
mod attribute;
mod cache;
mod chain;
mod factory;
mod locator;
mod xml;
mod yaml;

use hateoas_support::{ClassInfo, Relation};

use crate::error::MetadataLoadError;

pub use annotation::AnnotationDriver;
pub use attribute::AttributeDriver;
pub use cache::MetadataCache;
pub use chain::DriverChain;
pub use factory::{MetadataFactory, RelationProvider};
pub use locator::FileLocator;
pub use xml::XmlDriver;
pub use yaml::YamlDriver;

/// Relations and class-level settings of one class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMetadata {
    class_name: String,
    xml_root_name: Option<String>,
    relations: Vec<Relation>,
}

impl ClassMetadata {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            xml_root_name: None,
            relations: Vec::new(),
        }
    }

    pub fn with_xml_root_name(mut self, name: impl Into<String>) -> Self {
        self.xml_root_name = Some(name.into());
        self
    }

    pub fn with_relation(mut self, relation: Relation) -> Self {
        self.relations.push(relation);
        self
    }

    pub fn add_relation(&mut self, relation: Relation) {
        self.relations.push(relation);
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn xml_root_name(&self) -> Option<&str> {
        self.xml_root_name.as_deref()
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty() && self.xml_root_name.is_none()
    }

    /// Appends `other`'s relations. A root name in `other` replaces this one.
    pub fn merge(&mut self, other: ClassMetadata) {
        if other.xml_root_name.is_some() {
            self.xml_root_name = other.xml_root_name;
        }
        self.relations.extend(other.relations);
    }
}

/// Reads the metadata one source declares for a class.
///
/// Drivers only look at the class itself; the hierarchy is merged by the
/// [`MetadataFactory`]. `Ok(None)` means the source has nothing for the
/// class.
pub trait MetadataDriver: Send + Sync {
    fn load_metadata_for_class(
        &self,
        class: &'static ClassInfo,
    ) -> Result<Option<ClassMetadata>, MetadataLoadError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_appends_relations() {
        let mut metadata = ClassMetadata::new("tests::User")
            .with_xml_root_name("user")
            .with_relation(Relation::new("self").with_href("/users/1"));
        metadata.merge(
            ClassMetadata::new("tests::User").with_relation(Relation::new("posts").with_href("/posts")),
        );

        let names: Vec<_> = metadata.relations().iter().map(Relation::name).collect();
        assert_eq!(names, ["self", "posts"]);
        assert_eq!(metadata.xml_root_name(), Some("user"));

        metadata.merge(ClassMetadata::new("tests::User").with_xml_root_name("member"));
        assert_eq!(metadata.xml_root_name(), Some("member"));
    }
}
