use hateoas_support::ClassInfo;

use super::{ClassMetadata, MetadataDriver};
use crate::error::MetadataLoadError;

/// Reads relations declared in code through [`ClassInfo::with_attributes`],
/// and the class's own XML root name.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttributeDriver;

impl MetadataDriver for AttributeDriver {
    fn load_metadata_for_class(
        &self,
        class: &'static ClassInfo,
    ) -> Result<Option<ClassMetadata>, MetadataLoadError> {
        let mut metadata = ClassMetadata::new(class.name());
        if let Some(name) = class.xml_root_name() {
            metadata = metadata.with_xml_root_name(name);
        }
        for relation in class.attributes() {
            metadata.add_relation(relation);
        }
        Ok((!metadata.is_empty()).then_some(metadata))
    }
}
