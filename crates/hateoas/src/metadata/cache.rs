use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::ClassMetadata;

/// Loaded metadata per class name.
///
/// The cache is read-through: concurrent misses for the same class may both
/// compute the metadata, and the first insert wins. Keys do not include the
/// driver configuration, so a cache shared between instances must only be
/// shared between identically configured ones.
#[derive(Debug, Default)]
pub struct MetadataCache {
    entries: RwLock<HashMap<String, Arc<ClassMetadata>>>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, class_name: &str) -> Option<Arc<ClassMetadata>> {
        self.entries.read().get(class_name).cloned()
    }

    /// Stores `metadata` unless an entry already exists, and returns the
    /// cached entry.
    pub fn insert(&self, metadata: ClassMetadata) -> Arc<ClassMetadata> {
        let mut entries = self.entries.write();
        entries
            .entry(metadata.class_name().to_string())
            .or_insert_with(|| Arc::new(metadata))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
