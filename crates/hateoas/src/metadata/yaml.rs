//! YAML metadata files.
//!
//! ```yaml
//! app::User:
//!   xml_root_name: user
//!   relations:
//!     - rel: self
//!       href: "expr('/users/' ~ object.id)"
//!       exclusion:
//!         groups: [Default, detail]
//!     - rel: posts
//!       href:
//!         route: user_posts
//!         parameters: { id: "expr(object.id)" }
//!         absolute: true
//!       embedded:
//!         content: expr(object.getPosts())
//!         xml_element_name: post
//!         exclusion: { max_depth: 1 }
//!       attributes: { method: GET }
//! ```
//!
//! Unknown keys are rejected.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use hateoas_support::{ClassInfo, Condition, Embedded, Exclusion, Relation, Route};
use serde::Deserialize;
use serde_yaml::{Mapping, Value as YamlValue};

use super::{ClassMetadata, FileLocator, MetadataDriver};
use crate::error::MetadataLoadError;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ClassDocument {
    #[serde(default)]
    xml_root_name: Option<String>,
    #[serde(default)]
    relations: Vec<RelationDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RelationDocument {
    rel: String,
    #[serde(default)]
    href: Option<HrefDocument>,
    #[serde(default)]
    embedded: Option<EmbeddedDocument>,
    #[serde(default)]
    exclusion: Option<ExclusionDocument>,
    #[serde(default)]
    attributes: Mapping,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HrefDocument {
    Url(String),
    Route(RouteDocument),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RouteDocument {
    route: String,
    #[serde(default)]
    parameters: Option<ParametersDocument>,
    #[serde(default)]
    absolute: Option<ConditionDocument>,
    #[serde(default)]
    generator: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ParametersDocument {
    Expression(String),
    Map(Mapping),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ConditionDocument {
    Literal(bool),
    Template(String),
}

impl From<ConditionDocument> for Condition {
    fn from(document: ConditionDocument) -> Self {
        match document {
            ConditionDocument::Literal(b) => Condition::Literal(b),
            ConditionDocument::Template(t) => Condition::Template(t),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum EmbeddedDocument {
    Content(String),
    Full(FullEmbeddedDocument),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FullEmbeddedDocument {
    content: String,
    #[serde(default)]
    xml_element_name: Option<String>,
    #[serde(default)]
    exclusion: Option<ExclusionDocument>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ExclusionDocument {
    #[serde(default)]
    groups: Option<Vec<String>>,
    #[serde(default)]
    since_version: Option<String>,
    #[serde(default)]
    until_version: Option<String>,
    #[serde(default)]
    max_depth: Option<usize>,
    #[serde(default)]
    exclude_if: Option<ConditionDocument>,
}

impl From<ExclusionDocument> for Exclusion {
    fn from(document: ExclusionDocument) -> Self {
        let mut exclusion = Exclusion::new();
        if let Some(groups) = document.groups {
            exclusion = exclusion.with_groups(groups);
        }
        if let Some(version) = document.since_version {
            exclusion = exclusion.since(version);
        }
        if let Some(version) = document.until_version {
            exclusion = exclusion.until(version);
        }
        if let Some(depth) = document.max_depth {
            exclusion = exclusion.with_max_depth(depth);
        }
        if let Some(condition) = document.exclude_if {
            exclusion = exclusion.exclude_if(Condition::from(condition));
        }
        exclusion
    }
}

/// Reads `<Class.Name>.yml` or `.yaml` files found by a [`FileLocator`].
#[derive(Debug, Clone, Default)]
pub struct YamlDriver {
    locator: FileLocator,
}

impl YamlDriver {
    pub fn new(locator: FileLocator) -> Self {
        Self { locator }
    }

    /// Parses the metadata of `class_name` from a YAML document.
    pub fn parse(path: &Path, content: &str, class_name: &str) -> Result<ClassMetadata, MetadataLoadError> {
        let mut classes: BTreeMap<String, ClassDocument> =
            serde_yaml::from_str(content).map_err(|source| MetadataLoadError::Yaml {
                path: path.to_path_buf(),
                source,
            })?;
        let Some(document) = classes.remove(class_name) else {
            return Err(MetadataLoadError::ClassMismatch {
                path: path.to_path_buf(),
                expected: class_name.to_string(),
                found: classes.into_keys().next().unwrap_or_default(),
            });
        };

        let mut metadata = ClassMetadata::new(class_name);
        if let Some(name) = document.xml_root_name {
            metadata = metadata.with_xml_root_name(name);
        }
        for relation in document.relations {
            metadata.add_relation(convert_relation(path, relation)?);
        }
        Ok(metadata)
    }
}

impl MetadataDriver for YamlDriver {
    fn load_metadata_for_class(
        &self,
        class: &'static ClassInfo,
    ) -> Result<Option<ClassMetadata>, MetadataLoadError> {
        let Some(path) = self.locator.find_file_for_class(class.name(), &["yml", "yaml"]) else {
            return Ok(None);
        };
        tracing::debug!(class = class.name(), path = %path.display(), "loading YAML metadata");
        let content = fs::read_to_string(&path).map_err(|source| MetadataLoadError::Io {
            path: path.clone(),
            source,
        })?;
        Self::parse(&path, &content, class.name()).map(Some)
    }
}

fn convert_relation(path: &Path, document: RelationDocument) -> Result<Relation, MetadataLoadError> {
    let context = format!("relation `{}` in {}", document.rel, path.display());
    let mut relation = Relation::new(document.rel);

    match document.href {
        None => {}
        Some(HrefDocument::Url(url)) => relation = relation.with_href(url),
        Some(HrefDocument::Route(route_document)) => {
            let mut route = Route::new(route_document.route);
            match route_document.parameters {
                None => {}
                Some(ParametersDocument::Expression(expression)) => {
                    route = route.with_parameters_expression(expression);
                }
                Some(ParametersDocument::Map(parameters)) => {
                    for (name, value) in string_pairs(&parameters, "parameters", &context)? {
                        route = route.with_parameter(name, value);
                    }
                }
            }
            if let Some(absolute) = route_document.absolute {
                route = route.with_absolute(Condition::from(absolute));
            }
            if let Some(generator) = route_document.generator {
                route = route.with_generator(generator);
            }
            relation = relation.with_href(route);
        }
    }

    match document.embedded {
        None => {}
        Some(EmbeddedDocument::Content(content)) => relation = relation.with_embedded(content),
        Some(EmbeddedDocument::Full(full)) => {
            let mut embedded = Embedded::new(full.content);
            if let Some(name) = full.xml_element_name {
                embedded = embedded.with_xml_element_name(name);
            }
            if let Some(exclusion) = full.exclusion {
                embedded = embedded.with_exclusion(exclusion.into());
            }
            relation = relation.with_embedded(embedded);
        }
    }

    if let Some(exclusion) = document.exclusion {
        relation = relation.with_exclusion(exclusion.into());
    }
    for (name, value) in string_pairs(&document.attributes, "attributes", &context)? {
        relation = relation.with_attribute(name, value);
    }
    Ok(relation)
}

fn scalar(value: &YamlValue) -> Option<String> {
    match value {
        YamlValue::String(s) => Some(s.clone()),
        YamlValue::Number(n) => Some(n.to_string()),
        YamlValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn string_pairs(mapping: &Mapping, key: &str, context: &str) -> Result<Vec<(String, String)>, MetadataLoadError> {
    mapping
        .iter()
        .map(|(name, value)| match (scalar(name), scalar(value)) {
            (Some(name), Some(value)) => Ok((name, value)),
            _ => Err(MetadataLoadError::InvalidValue {
                key: key.to_string(),
                context: context.to_string(),
                message: "expected a map of scalar values".to_string(),
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hateoas_support::{RelationHref, RouteParameters};

    const DOCUMENT: &str = r#"
app::User:
  xml_root_name: user
  relations:
    - rel: self
      href: "expr('/users/' ~ object.id)"
      exclusion:
        groups: [Default, detail]
        since_version: "1.1"
    - rel: posts
      href:
        route: user_posts
        parameters: { id: "expr(object.id)", page: 1 }
        absolute: "expr(context.attributes.absolute)"
      embedded:
        content: expr(object.getPosts())
        xml_element_name: post
        exclusion: { max_depth: 1 }
      attributes: { method: GET }
    - rel: author
      embedded: expr(object.author)
"#;

    fn parse(document: &str) -> Result<ClassMetadata, MetadataLoadError> {
        YamlDriver::parse(Path::new("app.User.yml"), document, "app::User")
    }

    #[test]
    fn test_parse_relations() {
        let metadata = parse(DOCUMENT).unwrap();
        assert_eq!(metadata.xml_root_name(), Some("user"));
        assert_eq!(metadata.relations().len(), 3);

        let this = &metadata.relations()[0];
        assert_eq!(this.exclusion().unwrap().since_version(), Some("1.1"));

        let posts = &metadata.relations()[1];
        let Some(RelationHref::Route(route)) = posts.href() else {
            panic!("expected a route");
        };
        assert_eq!(
            route.parameters(),
            &RouteParameters::Map(vec![
                ("id".into(), "expr(object.id)".into()),
                ("page".into(), "1".into()),
            ])
        );
        assert_eq!(
            route.absolute(),
            &Condition::Template("expr(context.attributes.absolute)".into())
        );
        assert_eq!(posts.embedded().unwrap().exclusion().unwrap().max_depth(), Some(1));
        assert_eq!(posts.attributes(), &[("method".to_string(), "GET".to_string())]);

        assert_eq!(metadata.relations()[2].embedded().unwrap().content(), "expr(object.author)");
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = parse("app::User:\n  relations:\n    - rel: self\n      hrf: /x\n").unwrap_err();
        assert!(matches!(err, MetadataLoadError::Yaml { .. }));
        assert!(err.to_string().contains("hrf"));
    }

    #[test]
    fn test_class_mismatch() {
        let err = parse("app::Post:\n  relations: []\n").unwrap_err();
        assert!(matches!(
            err,
            MetadataLoadError::ClassMismatch { ref found, .. } if found == "app::Post"
        ));
    }
}
