//! Docblock annotation driver.
//!
//! Annotation strings follow the Doctrine syntax:
//!
//! ```text
//! @Hateoas\Relation(
//!     "self",
//!     href = @Hateoas\Route("user_get", parameters = {"id" = "expr(object.id)"}),
//!     exclusion = @Hateoas\Exclusion(groups = {"Default", "detail"})
//! )
//! @Serializer\XmlRoot("user")
//! ```
//!
//! Strings are double quoted with `""` as the escaped quote. Arrays use
//! braces and may carry keys (`{"id" = "1"}` or `{id: "1"}`). Docblock
//! decoration (`/**`, leading `*`, `*/`) is ignored. Annotations other than
//! `Relation` and `XmlRoot` are skipped; unknown arguments of known
//! annotations are rejected.

use std::collections::HashMap;

use chumsky::prelude::*;
use hateoas_support::{ClassInfo, Condition, Embedded, Exclusion, Relation, RelationHref, Route};

use super::{ClassMetadata, MetadataDriver};
use crate::error::MetadataLoadError;

type Extra<'src> = extra::Err<Rich<'src, char>>;

#[derive(Debug, Clone, PartialEq)]
enum AnnotationValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    Null,
    Array(Vec<(Option<String>, AnnotationValue)>),
    Annotation(Annotation),
}

impl AnnotationValue {
    fn describe(&self) -> &'static str {
        match self {
            AnnotationValue::String(_) => "string",
            AnnotationValue::Integer(_) => "integer",
            AnnotationValue::Boolean(_) => "boolean",
            AnnotationValue::Null => "null",
            AnnotationValue::Array(_) => "array",
            AnnotationValue::Annotation(_) => "annotation",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Annotation {
    name: String,
    arguments: Vec<(Option<String>, AnnotationValue)>,
}

impl Annotation {
    /// Name without its namespace: `Hateoas\Relation` → `Relation`.
    fn short_name(&self) -> &str {
        self.name.rsplit('\\').next().unwrap_or(&self.name)
    }
}

fn ident_char<'src>() -> impl Parser<'src, &'src str, char, Extra<'src>> + Clone {
    any().filter(|c: &char| c.is_ascii_alphanumeric() || *c == '_')
}

fn keyword<'src>(word: &'src str) -> impl Parser<'src, &'src str, &'src str, Extra<'src>> + Clone {
    just(word).then_ignore(ident_char().not())
}

fn identifier<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
    any()
        .filter(|c: &char| c.is_ascii_alphabetic() || *c == '_')
        .then(ident_char().repeated())
        .to_slice()
        .map(|s: &str| s.to_string())
}

fn string<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
    just("\"\"")
        .to('"')
        .or(none_of("\""))
        .repeated()
        .collect::<String>()
        .delimited_by(just('"'), just('"'))
}

fn integer<'src>() -> impl Parser<'src, &'src str, AnnotationValue, Extra<'src>> + Clone {
    just('-')
        .or_not()
        .then(any().filter(|c: &char| c.is_ascii_digit()).repeated().at_least(1))
        .to_slice()
        .try_map(|s: &str, span| {
            s.parse::<i64>()
                .map(AnnotationValue::Integer)
                .map_err(|e| Rich::custom(span, e))
        })
}

fn annotation<'src>() -> impl Parser<'src, &'src str, Annotation, Extra<'src>> + Clone {
    recursive(|annotation| {
        let value = recursive(move |value| {
            let key = identifier()
                .or(string())
                .padded()
                .then_ignore(one_of("=:"));
            let array = key
                .or_not()
                .then(value.padded())
                .separated_by(just(','))
                .allow_trailing()
                .collect::<Vec<_>>()
                .padded()
                .delimited_by(just('{'), just('}'))
                .map(AnnotationValue::Array);

            choice((
                string().map(AnnotationValue::String),
                keyword("true").to(AnnotationValue::Boolean(true)),
                keyword("false").to(AnnotationValue::Boolean(false)),
                keyword("null").to(AnnotationValue::Null),
                integer(),
                array,
                annotation.map(AnnotationValue::Annotation),
            ))
        });

        let argument = identifier()
            .padded()
            .then_ignore(just('='))
            .or_not()
            .then(value.padded());
        let arguments = argument
            .separated_by(just(','))
            .allow_trailing()
            .collect::<Vec<_>>()
            .padded()
            .delimited_by(just('('), just(')'));

        let qualified_name = identifier()
            .separated_by(just('\\'))
            .at_least(1)
            .collect::<Vec<_>>()
            .map(|parts| parts.join("\\"));

        just('@')
            .ignore_then(qualified_name)
            .then(arguments.or_not())
            .map(|(name, arguments)| Annotation {
                name,
                arguments: arguments.unwrap_or_default(),
            })
    })
}

fn strip_docblock(source: &str) -> String {
    source
        .lines()
        .map(|line| {
            let line = line.trim();
            let line = line.strip_prefix("/**").unwrap_or(line);
            let line = line.strip_suffix("*/").unwrap_or(line);
            line.trim_start_matches('*').trim()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn parse_annotations(class: &str, source: &str) -> Result<Vec<Annotation>, MetadataLoadError> {
    let cleaned = strip_docblock(source);
    annotation()
        .padded()
        .repeated()
        .collect::<Vec<_>>()
        .then_ignore(end())
        .parse(cleaned.as_str())
        .into_result()
        .map_err(|errors| MetadataLoadError::Annotation {
            class: class.to_string(),
            message: errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        })
}

/// Arguments of one annotation, keyed by their declared names.
struct Arguments {
    context: String,
    values: HashMap<&'static str, AnnotationValue>,
}

impl Arguments {
    /// Assigns each argument to one of `keys`. Only the first argument may
    /// be positional; it stands for `keys[0]`.
    fn new(annotation: Annotation, keys: &[&'static str], class: &str) -> Result<Self, MetadataLoadError> {
        let context = format!("@{} on {}", annotation.name, class);
        let mut values = HashMap::new();
        for (position, (key, value)) in annotation.arguments.into_iter().enumerate() {
            let key = match key {
                Some(key) => keys.iter().copied().find(|k| *k == key).ok_or_else(|| {
                    MetadataLoadError::UnknownKey {
                        key,
                        context: context.clone(),
                    }
                })?,
                None if position == 0 => keys[0],
                None => {
                    return Err(MetadataLoadError::InvalidValue {
                        key: format!("#{position}"),
                        context,
                        message: "only the first argument may be positional".to_string(),
                    });
                }
            };
            values.insert(key, value);
        }
        Ok(Self { context, values })
    }

    fn take(&mut self, key: &'static str) -> Option<AnnotationValue> {
        self.values.remove(key)
    }

    fn invalid(&self, key: &str, expected: &str, found: &AnnotationValue) -> MetadataLoadError {
        MetadataLoadError::InvalidValue {
            key: key.to_string(),
            context: self.context.clone(),
            message: format!("expected {expected}, found {}", found.describe()),
        }
    }

    fn string(&mut self, key: &'static str) -> Result<Option<String>, MetadataLoadError> {
        match self.take(key) {
            None | Some(AnnotationValue::Null) => Ok(None),
            Some(AnnotationValue::String(s)) => Ok(Some(s)),
            Some(other) => Err(self.invalid(key, "a string", &other)),
        }
    }

    fn required_string(&mut self, key: &'static str) -> Result<String, MetadataLoadError> {
        self.string(key)?.ok_or_else(|| MetadataLoadError::MissingField {
            field: key.to_string(),
            context: self.context.clone(),
        })
    }

    fn condition(&mut self, key: &'static str) -> Result<Option<Condition>, MetadataLoadError> {
        match self.take(key) {
            None | Some(AnnotationValue::Null) => Ok(None),
            Some(AnnotationValue::Boolean(b)) => Ok(Some(Condition::Literal(b))),
            Some(AnnotationValue::String(s)) => Ok(Some(Condition::Template(s))),
            Some(other) => Err(self.invalid(key, "a boolean or an expression", &other)),
        }
    }

    fn annotation(&mut self, key: &'static str, expected: &str) -> Result<Option<Annotation>, MetadataLoadError> {
        match self.take(key) {
            None | Some(AnnotationValue::Null) => Ok(None),
            Some(AnnotationValue::Annotation(a)) if a.short_name() == expected => Ok(Some(a)),
            Some(other) => Err(self.invalid(key, &format!("@{expected}"), &other)),
        }
    }

    /// A keyed array of scalars, as ordered string pairs.
    fn string_map(&mut self, key: &'static str) -> Result<Vec<(String, String)>, MetadataLoadError> {
        let entries = match self.take(key) {
            None | Some(AnnotationValue::Null) => return Ok(Vec::new()),
            Some(AnnotationValue::Array(entries)) => entries,
            Some(other) => return Err(self.invalid(key, "a keyed array", &other)),
        };
        let mut pairs = Vec::with_capacity(entries.len());
        for (name, value) in entries {
            let Some(name) = name else {
                return Err(self.invalid(key, "keyed entries", &value));
            };
            let value = match value {
                AnnotationValue::String(s) => s,
                AnnotationValue::Integer(i) => i.to_string(),
                AnnotationValue::Boolean(b) => b.to_string(),
                other => return Err(self.invalid(key, "scalar values", &other)),
            };
            pairs.push((name, value));
        }
        Ok(pairs)
    }

    fn string_list(&mut self, key: &'static str) -> Result<Option<Vec<String>>, MetadataLoadError> {
        match self.take(key) {
            None | Some(AnnotationValue::Null) => Ok(None),
            Some(AnnotationValue::String(s)) => Ok(Some(vec![s])),
            Some(AnnotationValue::Array(entries)) => entries
                .into_iter()
                .map(|(_, value)| match value {
                    AnnotationValue::String(s) => Ok(s),
                    other => Err(self.invalid(key, "strings", &other)),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(other) => Err(self.invalid(key, "an array of strings", &other)),
        }
    }
}

fn relation(annotation: Annotation, class: &str) -> Result<Relation, MetadataLoadError> {
    let mut args = Arguments::new(
        annotation,
        &["name", "href", "embedded", "exclusion", "attributes"],
        class,
    )?;
    let mut relation = Relation::new(args.required_string("name")?);

    match args.take("href") {
        None | Some(AnnotationValue::Null) => {}
        Some(AnnotationValue::String(url)) => relation = relation.with_href(url),
        Some(AnnotationValue::Annotation(a)) if a.short_name() == "Route" => {
            relation = relation.with_href(RelationHref::Route(route(a, class)?));
        }
        Some(other) => return Err(args.invalid("href", "a string or @Route", &other)),
    }

    match args.take("embedded") {
        None | Some(AnnotationValue::Null) => {}
        Some(AnnotationValue::String(content)) => relation = relation.with_embedded(content),
        Some(AnnotationValue::Annotation(a)) if a.short_name() == "Embedded" => {
            relation = relation.with_embedded(embedded(a, class)?);
        }
        Some(other) => return Err(args.invalid("embedded", "a string or @Embedded", &other)),
    }

    if let Some(a) = args.annotation("exclusion", "Exclusion")? {
        relation = relation.with_exclusion(exclusion(a, class)?);
    }
    for (name, value) in args.string_map("attributes")? {
        relation = relation.with_attribute(name, value);
    }
    Ok(relation)
}

fn route(annotation: Annotation, class: &str) -> Result<Route, MetadataLoadError> {
    let mut args = Arguments::new(
        annotation,
        &["name", "parameters", "absolute", "generator"],
        class,
    )?;
    let mut route = Route::new(args.required_string("name")?);

    match args.take("parameters") {
        None | Some(AnnotationValue::Null) => {}
        Some(AnnotationValue::String(expression)) => {
            route = route.with_parameters_expression(expression);
        }
        Some(value @ AnnotationValue::Array(_)) => {
            args.values.insert("parameters", value);
            for (name, value) in args.string_map("parameters")? {
                route = route.with_parameter(name, value);
            }
        }
        Some(other) => return Err(args.invalid("parameters", "an array or an expression", &other)),
    }

    if let Some(absolute) = args.condition("absolute")? {
        route = route.with_absolute(absolute);
    }
    if let Some(generator) = args.string("generator")? {
        route = route.with_generator(generator);
    }
    Ok(route)
}

fn embedded(annotation: Annotation, class: &str) -> Result<Embedded, MetadataLoadError> {
    let mut args = Arguments::new(
        annotation,
        &["content", "exclusion", "xmlElementName"],
        class,
    )?;
    let mut embedded = Embedded::new(args.required_string("content")?);
    if let Some(a) = args.annotation("exclusion", "Exclusion")? {
        embedded = embedded.with_exclusion(exclusion(a, class)?);
    }
    if let Some(name) = args.string("xmlElementName")? {
        embedded = embedded.with_xml_element_name(name);
    }
    Ok(embedded)
}

fn exclusion(annotation: Annotation, class: &str) -> Result<Exclusion, MetadataLoadError> {
    let mut args = Arguments::new(
        annotation,
        &["groups", "sinceVersion", "untilVersion", "maxDepth", "excludeIf"],
        class,
    )?;
    let mut exclusion = Exclusion::new();
    if let Some(groups) = args.string_list("groups")? {
        exclusion = exclusion.with_groups(groups);
    }
    if let Some(version) = args.string("sinceVersion")? {
        exclusion = exclusion.since(version);
    }
    if let Some(version) = args.string("untilVersion")? {
        exclusion = exclusion.until(version);
    }
    match args.take("maxDepth") {
        None | Some(AnnotationValue::Null) => {}
        Some(AnnotationValue::Integer(depth)) if depth >= 0 => {
            exclusion = exclusion.with_max_depth(depth as usize);
        }
        Some(other) => return Err(args.invalid("maxDepth", "a non-negative integer", &other)),
    }
    if let Some(condition) = args.condition("excludeIf")? {
        exclusion = exclusion.exclude_if(condition);
    }
    Ok(exclusion)
}

fn xml_root(annotation: Annotation, class: &str) -> Result<String, MetadataLoadError> {
    let mut args = Arguments::new(annotation, &["name", "namespace"], class)?;
    args.take("namespace");
    args.required_string("name")
}

/// Reads relations from the annotation strings attached to a class.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnotationDriver;

impl MetadataDriver for AnnotationDriver {
    fn load_metadata_for_class(
        &self,
        class: &'static ClassInfo,
    ) -> Result<Option<ClassMetadata>, MetadataLoadError> {
        let mut metadata = ClassMetadata::new(class.name());
        for source in class.annotations() {
            for annotation in parse_annotations(class.name(), source)? {
                match annotation.short_name() {
                    "Relation" => metadata.add_relation(relation(annotation, class.name())?),
                    "XmlRoot" => {
                        metadata = metadata.with_xml_root_name(xml_root(annotation, class.name())?);
                    }
                    other => {
                        tracing::trace!(class = class.name(), annotation = other, "ignoring annotation");
                    }
                }
            }
        }
        Ok((!metadata.is_empty()).then_some(metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hateoas_support::RouteParameters;

    fn parse_one(source: &str) -> Annotation {
        let mut annotations = parse_annotations("tests::Fixture", source).unwrap();
        assert_eq!(annotations.len(), 1);
        annotations.remove(0)
    }

    #[test]
    fn test_parse_nested_annotation() {
        let annotation = parse_one(
            r#"@Hateoas\Relation("self", href = "http://adrienbrault.fr", exclusion = @Hateoas\Exclusion(groups = {"Default", "simple"}))"#,
        );
        assert_eq!(annotation.name, "Hateoas\\Relation");
        assert_eq!(annotation.arguments.len(), 3);
        assert_eq!(annotation.arguments[0], (None, AnnotationValue::String("self".into())));
        assert!(matches!(
            &annotation.arguments[2],
            (Some(key), AnnotationValue::Annotation(inner)) if key == "exclusion" && inner.short_name() == "Exclusion"
        ));
    }

    #[test]
    fn test_parse_docblock_with_several_annotations() {
        let annotations = parse_annotations(
            "tests::Fixture",
            r#"/**
              * @Serializer\XmlRoot("user")
              * @Hateoas\Relation(
              *     "self",
              *     href = "expr('/users/' ~ object.id)"
              * )
              */"#,
        )
        .unwrap();
        assert_eq!(annotations.len(), 2);
        assert_eq!(annotations[0].short_name(), "XmlRoot");
        assert_eq!(annotations[1].short_name(), "Relation");
    }

    #[test]
    fn test_parse_escaped_quotes_and_keyed_arrays() {
        let annotation = parse_one(r#"@Route("a ""quoted"" name", parameters = {"id" = "1", page: 2})"#);
        assert_eq!(
            annotation.arguments[0].1,
            AnnotationValue::String("a \"quoted\" name".into())
        );
        assert_eq!(
            annotation.arguments[1].1,
            AnnotationValue::Array(vec![
                (Some("id".into()), AnnotationValue::String("1".into())),
                (Some("page".into()), AnnotationValue::Integer(2)),
            ])
        );
    }

    #[test]
    fn test_relation_with_route() {
        let relation = relation(
            parse_one(
                r#"@Hateoas\Relation(
                    "search",
                    href = @Hateoas\Route("/search", parameters = {"query" = "hello"}, absolute = true, generator = "my_generator"),
                    attributes = {"method" = "GET"}
                )"#,
            ),
            "tests::Fixture",
        )
        .unwrap();

        let Some(RelationHref::Route(route)) = relation.href() else {
            panic!("expected a route href");
        };
        assert_eq!(route.name(), "/search");
        assert_eq!(
            route.parameters(),
            &RouteParameters::Map(vec![("query".into(), "hello".into())])
        );
        assert_eq!(route.absolute(), &Condition::Literal(true));
        assert_eq!(route.generator(), Some("my_generator"));
        assert_eq!(relation.attributes(), &[("method".to_string(), "GET".to_string())]);
    }

    #[test]
    fn test_relation_with_embedded() {
        let relation = relation(
            parse_one(
                r#"@Hateoas\Relation("b_embed", embedded = @Hateoas\Embedded("expr(object.b)", xmlElementName = "b", exclusion = @Hateoas\Exclusion(maxDepth = 1, excludeIf = "expr(object.b === null)")))"#,
            ),
            "tests::Fixture",
        )
        .unwrap();

        let embedded = relation.embedded().unwrap();
        assert_eq!(embedded.content(), "expr(object.b)");
        assert_eq!(embedded.xml_element_name(), Some("b"));
        let exclusion = embedded.exclusion().unwrap();
        assert_eq!(exclusion.max_depth(), Some(1));
        assert_eq!(
            exclusion.exclude_if_condition(),
            Some(&Condition::Template("expr(object.b === null)".into()))
        );
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = relation(parse_one(r#"@Hateoas\Relation("self", hrf = "/x")"#), "tests::Fixture")
            .unwrap_err();
        assert!(matches!(err, MetadataLoadError::UnknownKey { ref key, .. } if key == "hrf"));
    }

    #[test]
    fn test_missing_name_and_wrong_types() {
        let err = relation(parse_one(r#"@Hateoas\Relation(href = "/x")"#), "tests::Fixture").unwrap_err();
        assert!(matches!(err, MetadataLoadError::MissingField { ref field, .. } if field == "name"));

        let err = relation(
            parse_one(r#"@Hateoas\Relation("self", exclusion = @Hateoas\Exclusion(maxDepth = "one"))"#),
            "tests::Fixture",
        )
        .unwrap_err();
        assert!(matches!(err, MetadataLoadError::InvalidValue { ref key, .. } if key == "maxDepth"));
    }

    #[test]
    fn test_syntax_error() {
        let err = parse_annotations("tests::Fixture", r#"@Hateoas\Relation("self", href = )"#).unwrap_err();
        assert!(matches!(err, MetadataLoadError::Annotation { .. }));
    }

    static ANNOTATED: ClassInfo = ClassInfo::new("tests::Annotated").with_annotations(&[
        r#"@Serializer\XmlRoot("annotated")"#,
        r#"@Hateoas\Relation("self", href = "/annotated")"#,
        r#"@Serializer\Exclude"#,
    ]);

    #[test]
    fn test_driver_reads_relations_and_root_name() {
        let metadata = AnnotationDriver.load_metadata_for_class(&ANNOTATED).unwrap().unwrap();
        assert_eq!(metadata.xml_root_name(), Some("annotated"));
        assert_eq!(metadata.relations().len(), 1);
        assert_eq!(metadata.relations()[0].name(), "self");
    }
}
