use std::sync::Arc;

use hateoas_expression::{Bindings, ExpressionEvaluator};
use hateoas_serde::exclusion::{groups_match, version_matches};
use hateoas_serde::{Scope, SerializationContext};
use hateoas_support::{Condition, Exclusion, Relation};

use crate::error::Result;

/// Decides whether the link or the embed of a relation is emitted.
pub struct ExclusionManager {
    evaluator: Arc<ExpressionEvaluator>,
}

impl ExclusionManager {
    pub fn new(evaluator: Arc<ExpressionEvaluator>) -> Self {
        Self { evaluator }
    }

    /// Links follow the relation's exclusion rule.
    pub fn should_skip_link(
        &self,
        relation: &Relation,
        bindings: &Bindings,
        scope: &Scope,
        context: &SerializationContext,
    ) -> Result<bool> {
        if relation.href().is_none() {
            return Ok(true);
        }
        self.should_skip(relation.exclusion(), bindings, scope, context)
    }

    /// Embeds follow the embedded declaration's own rule when it has one,
    /// the relation's rule otherwise.
    pub fn should_skip_embedded(
        &self,
        relation: &Relation,
        bindings: &Bindings,
        scope: &Scope,
        context: &SerializationContext,
    ) -> Result<bool> {
        let Some(embedded) = relation.embedded() else {
            return Ok(true);
        };
        let exclusion = embedded.exclusion().or(relation.exclusion());
        self.should_skip(exclusion, bindings, scope, context)
    }

    fn should_skip(
        &self,
        exclusion: Option<&Exclusion>,
        bindings: &Bindings,
        scope: &Scope,
        context: &SerializationContext,
    ) -> Result<bool> {
        let Some(exclusion) = exclusion else {
            return Ok(!groups_match(None, context.groups()));
        };

        if !groups_match(exclusion.groups(), context.groups()) {
            tracing::trace!(groups = ?exclusion.groups(), "relation outside the active groups");
            return Ok(true);
        }
        if !version_matches(context.version(), exclusion.since_version(), exclusion.until_version()) {
            tracing::trace!(version = ?context.version(), "relation outside the requested version");
            return Ok(true);
        }
        if exclusion.max_depth().is_some_and(|max| scope.depth() > max) {
            tracing::trace!(depth = scope.depth(), "relation below its max depth");
            return Ok(true);
        }
        match exclusion.exclude_if_condition() {
            None | Some(Condition::Literal(false)) => Ok(false),
            Some(Condition::Literal(true)) => Ok(true),
            Some(Condition::Template(template)) => {
                Ok(self.evaluator.evaluate_template(template, bindings)?.is_truthy())
            }
        }
    }
}
