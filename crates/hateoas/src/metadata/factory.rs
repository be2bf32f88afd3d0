use std::collections::HashSet;
use std::sync::Arc;

use hateoas_expression::{ExpressionEvaluator, expression_source};
use hateoas_serde::{ClassMetadataProvider, SerdeError};
use hateoas_support::{ClassInfo, Condition, Exclusion, Relation, RelationHref, RouteParameters};

use super::{ClassMetadata, MetadataCache, MetadataDriver};
use crate::error::{HateoasError, MetadataLoadError};

/// Supplies relations computed at runtime for a class, in addition to the
/// declared ones.
pub trait RelationProvider: Send + Sync {
    fn relations_for_class(&self, class: &'static ClassInfo) -> Vec<Relation>;
}

impl<F> RelationProvider for F
where
    F: Fn(&'static ClassInfo) -> Vec<Relation> + Send + Sync,
{
    fn relations_for_class(&self, class: &'static ClassInfo) -> Vec<Relation> {
        self(class)
    }
}

/// Produces the complete, validated metadata of a class.
///
/// The metadata of a class is the union of what the driver returns for each
/// class of its hierarchy (root class first) followed by the relations of
/// every provider. It is computed once per class and kept in the
/// [`MetadataCache`].
pub struct MetadataFactory {
    driver: Arc<dyn MetadataDriver>,
    providers: Vec<Arc<dyn RelationProvider>>,
    cache: Arc<MetadataCache>,
    evaluator: Arc<ExpressionEvaluator>,
}

impl MetadataFactory {
    pub fn new(
        driver: Arc<dyn MetadataDriver>,
        providers: Vec<Arc<dyn RelationProvider>>,
        cache: Arc<MetadataCache>,
        evaluator: Arc<ExpressionEvaluator>,
    ) -> Self {
        Self {
            driver,
            providers,
            cache,
            evaluator,
        }
    }

    pub fn cache(&self) -> &Arc<MetadataCache> {
        &self.cache
    }

    pub fn metadata_for_class(&self, class: &'static ClassInfo) -> Result<Arc<ClassMetadata>, MetadataLoadError> {
        if let Some(metadata) = self.cache.get(class.name()) {
            return Ok(metadata);
        }

        let metadata = self.load(class)?;
        tracing::debug!(
            class = class.name(),
            relations = metadata.relations().len(),
            "caching class metadata"
        );
        Ok(self.cache.insert(metadata))
    }

    fn load(&self, class: &'static ClassInfo) -> Result<ClassMetadata, MetadataLoadError> {
        let mut metadata = ClassMetadata::new(class.name());
        for ancestor in class.ancestors() {
            if let Some(declared) = self.driver.load_metadata_for_class(ancestor)? {
                metadata.merge(declared);
            }
        }
        for provider in &self.providers {
            for relation in provider.relations_for_class(class) {
                metadata.add_relation(relation);
            }
        }
        self.validate(&metadata)?;
        Ok(metadata)
    }

    fn validate(&self, metadata: &ClassMetadata) -> Result<(), MetadataLoadError> {
        let class = metadata.class_name();
        let mut unconditional = HashSet::new();
        for relation in metadata.relations() {
            if relation.href().is_none() && relation.embedded().is_none() {
                return Err(MetadataLoadError::EmptyRelation {
                    class: class.to_string(),
                    relation: relation.name().to_string(),
                });
            }
            let literal_name = expression_source(relation.name()).is_none();
            if literal_name && relation.is_unconditional() && !unconditional.insert(relation.name()) {
                return Err(MetadataLoadError::ConflictingRelation {
                    class: class.to_string(),
                    relation: relation.name().to_string(),
                });
            }
            for template in templates(relation) {
                self.evaluator
                    .validate_template(template)
                    .map_err(|source| MetadataLoadError::InvalidExpression {
                        class: class.to_string(),
                        relation: relation.name().to_string(),
                        source,
                    })?;
            }
        }
        Ok(())
    }
}

impl ClassMetadataProvider for MetadataFactory {
    fn xml_root_name(&self, class: &'static ClassInfo) -> hateoas_serde::Result<Option<String>> {
        let metadata = self
            .metadata_for_class(class)
            .map_err(|e| SerdeError::subscriber(HateoasError::from(e)))?;
        Ok(metadata.xml_root_name().map(str::to_string))
    }
}

/// Every template a relation evaluates.
fn templates(relation: &Relation) -> Vec<&str> {
    let mut templates = vec![relation.name()];
    match relation.href() {
        Some(RelationHref::Url(url)) => templates.push(url),
        Some(RelationHref::Route(route)) => {
            templates.push(route.name());
            match route.parameters() {
                RouteParameters::Map(parameters) => {
                    templates.extend(parameters.iter().map(|(_, value)| value.as_str()));
                }
                RouteParameters::Expression(expression) => templates.push(expression),
            }
            if let Condition::Template(absolute) = route.absolute() {
                templates.push(absolute);
            }
        }
        None => {}
    }
    if let Some(embedded) = relation.embedded() {
        templates.push(embedded.content());
        templates.extend(embedded.exclusion().and_then(exclude_if));
    }
    templates.extend(relation.exclusion().and_then(exclude_if));
    templates.extend(relation.attributes().iter().map(|(_, value)| value.as_str()));
    templates
}

fn exclude_if(exclusion: &Exclusion) -> Option<&str> {
    match exclusion.exclude_if_condition()? {
        Condition::Template(template) => Some(template),
        Condition::Literal(_) => None,
    }
}
