use std::sync::Arc;

use hateoas_support::ClassInfo;

use super::{ClassMetadata, MetadataDriver};
use crate::error::MetadataLoadError;

/// Unions the metadata of several drivers, in registration order.
#[derive(Clone, Default)]
pub struct DriverChain {
    drivers: Vec<Arc<dyn MetadataDriver>>,
}

impl DriverChain {
    pub fn new(drivers: Vec<Arc<dyn MetadataDriver>>) -> Self {
        Self { drivers }
    }

    pub fn add_driver(&mut self, driver: Arc<dyn MetadataDriver>) {
        self.drivers.push(driver);
    }

    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }
}

impl MetadataDriver for DriverChain {
    fn load_metadata_for_class(
        &self,
        class: &'static ClassInfo,
    ) -> Result<Option<ClassMetadata>, MetadataLoadError> {
        let mut merged: Option<ClassMetadata> = None;
        for driver in &self.drivers {
            let Some(metadata) = driver.load_metadata_for_class(class)? else {
                continue;
            };
            match merged.as_mut() {
                Some(existing) => existing.merge(metadata),
                None => merged = Some(metadata),
            }
        }
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{AnnotationDriver, AttributeDriver};
    use hateoas_support::Relation;

    static MIXED: ClassInfo = ClassInfo::new("tests::Mixed")
        .with_attributes(mixed_relations)
        .with_annotations(&[r#"@Hateoas\Relation("friends", href = "/friends")"#]);

    fn mixed_relations() -> Vec<Relation> {
        vec![Relation::new("self").with_href("/mixed")]
    }

    #[test]
    fn test_union_in_registration_order() {
        let chain = DriverChain::new(vec![Arc::new(AttributeDriver), Arc::new(AnnotationDriver)]);
        let metadata = chain.load_metadata_for_class(&MIXED).unwrap().unwrap();

        let names: Vec<_> = metadata.relations().iter().map(Relation::name).collect();
        assert_eq!(names, ["self", "friends"]);
    }

    #[test]
    fn test_empty_chain() {
        assert!(DriverChain::default().load_metadata_for_class(&MIXED).unwrap().is_none());
    }
}
