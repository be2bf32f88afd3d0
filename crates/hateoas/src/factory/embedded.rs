use std::sync::Arc;

use hateoas_expression::{Bindings, ExpressionEvaluator};
use hateoas_serde::Scope;
use hateoas_support::Relation;

use crate::error::Result;
use crate::model::EmbeddedResource;

/// Builds [`EmbeddedResource`]s from embedded declarations.
pub struct EmbeddedFactory {
    evaluator: Arc<ExpressionEvaluator>,
}

impl EmbeddedFactory {
    pub fn new(evaluator: Arc<ExpressionEvaluator>) -> Self {
        Self { evaluator }
    }

    /// The embed of `relation` under the already evaluated name `rel`, or
    /// `None` when the relation embeds nothing.
    ///
    /// Content that is an object on the visiting path of `scope` is flagged
    /// cyclic. The max depth of the rule that governs the embed limits how
    /// deep the content is serialized.
    pub fn create_embedded(
        &self,
        rel: &str,
        relation: &Relation,
        bindings: &Bindings,
        scope: &Scope,
    ) -> Result<Option<EmbeddedResource>> {
        let Some(embedded) = relation.embedded() else {
            return Ok(None);
        };
        let content = self.evaluator.evaluate_template(embedded.content(), bindings)?;
        let cyclic = content.as_object().is_some_and(|object| scope.is_visiting(object));
        let max_depth = embedded
            .exclusion()
            .or(relation.exclusion())
            .and_then(|exclusion| exclusion.max_depth());

        Ok(Some(
            EmbeddedResource::new(rel, content)
                .cyclic(cyclic)
                .with_max_depth(max_depth)
                .with_xml_element_name(embedded.xml_element_name().map(str::to_string)),
        ))
    }
}
