use hateoas_support::{ClassInfo, Embedded, Property, Relation, Resource, Value};

pub(super) static COLLECTION: ClassInfo = ClassInfo::new("hateoas::representation::CollectionRepresentation")
    .with_xml_root_name("collection")
    .with_attributes(collection_relations);

fn collection_relations() -> Vec<Relation> {
    vec![Relation::new("expr(object.getRel())").with_embedded(Embedded::new("expr(object.getResources())"))]
}

/// A list of resources embedded under one relation (`items` by default).
///
/// ```json
/// {"_embedded": {"items": [{"id": 1}, {"id": 2}]}}
/// ```
#[derive(Debug, Clone)]
pub struct CollectionRepresentation {
    resources: Value,
    rel: String,
}

impl CollectionRepresentation {
    pub const DEFAULT_REL: &'static str = "items";

    pub fn new(resources: impl Into<Value>) -> Self {
        Self {
            resources: resources.into(),
            rel: Self::DEFAULT_REL.to_string(),
        }
    }

    pub fn with_rel(mut self, rel: impl Into<String>) -> Self {
        self.rel = rel.into();
        self
    }

    pub fn resources(&self) -> &Value {
        &self.resources
    }

    pub fn rel(&self) -> &str {
        &self.rel
    }
}

impl Resource for CollectionRepresentation {
    fn class(&self) -> &'static ClassInfo {
        &COLLECTION
    }

    fn properties(&self) -> Vec<Property> {
        vec![
            Property::new("resources", self.resources.clone()).excluded(),
            Property::new("rel", self.rel.as_str()).excluded(),
        ]
    }
}
