use std::sync::Arc;

use hateoas_expression::{Bindings, ExpressionEvaluator};
use hateoas_support::{Condition, Relation, RelationHref, Route, RouteParameters, Value};

use crate::error::{Result, UrlGenerationError};
use crate::model::Link;
use crate::url_generator::UrlGeneratorRegistry;

/// Builds [`Link`]s from relation hrefs.
pub struct LinkFactory {
    evaluator: Arc<ExpressionEvaluator>,
    url_generators: Arc<UrlGeneratorRegistry>,
}

impl LinkFactory {
    pub fn new(evaluator: Arc<ExpressionEvaluator>, url_generators: Arc<UrlGeneratorRegistry>) -> Self {
        Self {
            evaluator,
            url_generators,
        }
    }

    /// The link of `relation` under the already evaluated name `rel`.
    /// `relation` must have an href.
    pub fn create_link(&self, rel: &str, relation: &Relation, bindings: &Bindings) -> Result<Link> {
        let href = match relation.href() {
            Some(href) => self.href(href, bindings)?,
            None => String::new(),
        };
        let mut link = Link::new(rel, href);
        for (name, template) in relation.attributes() {
            let value = self.evaluator.evaluate_template(template, bindings)?;
            link = link.with_attribute(name.as_str(), value.to_string());
        }
        Ok(link)
    }

    fn href(&self, href: &RelationHref, bindings: &Bindings) -> Result<String> {
        match href {
            RelationHref::Url(template) => Ok(self.evaluator.evaluate_template(template, bindings)?.to_string()),
            RelationHref::Route(route) => self.route(route, bindings),
        }
    }

    fn route(&self, route: &Route, bindings: &Bindings) -> Result<String> {
        let name = self.evaluator.evaluate_template(route.name(), bindings)?.to_string();
        let parameters = match route.parameters() {
            RouteParameters::Map(templates) => {
                let mut parameters = Vec::with_capacity(templates.len());
                for (key, template) in templates {
                    parameters.push((key.clone(), self.evaluator.evaluate_template(template, bindings)?));
                }
                parameters
            }
            RouteParameters::Expression(template) => {
                match self.evaluator.evaluate_template(template, bindings)? {
                    Value::Map(entries) => entries,
                    Value::Null => Vec::new(),
                    other => {
                        return Err(UrlGenerationError::InvalidParameters(other.type_name().to_string()).into());
                    }
                }
            }
        };
        let absolute = match route.absolute() {
            Condition::Literal(absolute) => *absolute,
            Condition::Template(template) => self.evaluator.evaluate_template(template, bindings)?.is_truthy(),
        };
        Ok(self
            .url_generators
            .generate(route.generator(), &name, &parameters, absolute)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HateoasError;
    use crate::url_generator::{CallableUrlGenerator, build_query};

    fn factory() -> LinkFactory {
        let mut registry = UrlGeneratorRegistry::new();
        registry.set_default(Arc::new(CallableUrlGenerator::new(
            |name: &str, parameters: &[(String, Value)], absolute: bool| {
                let prefix = if absolute { "http://localhost" } else { "" };
                Ok(format!("{prefix}{name}?{}", build_query(parameters)))
            },
        )));
        LinkFactory::new(Arc::new(ExpressionEvaluator::new()), Arc::new(registry))
    }

    fn bindings() -> Bindings {
        Bindings::for_object(Value::map([("id", Value::from(42)), ("name", Value::from("Adrien"))]))
    }

    #[test]
    fn test_url_and_attributes() {
        let relation = Relation::new("self")
            .with_href("expr('/users/' ~ object.id)")
            .with_attribute("title", "expr(object.name)")
            .with_attribute("type", "user");
        let link = factory().create_link("self", &relation, &bindings()).unwrap();

        assert_eq!(link.href(), "/users/42");
        assert_eq!(
            link.attributes(),
            &[
                ("title".to_string(), "Adrien".to_string()),
                ("type".to_string(), "user".to_string()),
            ]
        );
    }

    #[test]
    fn test_route_with_parameters() {
        let relation = Relation::new("self").with_href(
            Route::new("/users")
                .with_parameter("id", "expr(object.id)")
                .with_absolute("expr(object.id > 10)"),
        );
        let link = factory().create_link("self", &relation, &bindings()).unwrap();
        assert_eq!(link.href(), "http://localhost/users?id=42");

        let relation = Relation::new("self")
            .with_href(Route::new("/users").with_parameters_expression("expr({page: 2, limit: 10})"));
        let link = factory().create_link("self", &relation, &bindings()).unwrap();
        assert_eq!(link.href(), "/users?page=2&limit=10");
    }

    #[test]
    fn test_route_parameters_must_be_a_map() {
        let relation = Relation::new("self")
            .with_href(Route::new("/users").with_parameters_expression("expr(object.id)"));
        let err = factory().create_link("self", &relation, &bindings()).unwrap_err();
        assert!(matches!(
            err,
            HateoasError::UrlGeneration(UrlGenerationError::InvalidParameters(_))
        ));
    }
}
