//! Normalized relation declarations.
//!
//! Every metadata source (code attributes, annotation strings, XML and YAML
//! files) produces these types, so everything downstream is source-agnostic.
//!
//! String fields documented as *templates* are either literal text or an
//! expression wrapped in `expr(...)`, e.g. `"expr('/users/' ~ object.id)"`.

/// A named hypermedia relation declared on a class.
#[derive(Debug, Clone, PartialEq)]
pub struct Relation {
    name: String,
    href: Option<RelationHref>,
    embedded: Option<Embedded>,
    exclusion: Option<Exclusion>,
    attributes: Vec<(String, String)>,
}

impl Relation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            href: None,
            embedded: None,
            exclusion: None,
            attributes: Vec::new(),
        }
    }

    pub fn with_href(mut self, href: impl Into<RelationHref>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn with_embedded(mut self, embedded: impl Into<Embedded>) -> Self {
        self.embedded = Some(embedded.into());
        self
    }

    pub fn with_exclusion(mut self, exclusion: Exclusion) -> Self {
        self.exclusion = Some(exclusion);
        self
    }

    /// Adds a link attribute; the value is a template.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn href(&self) -> Option<&RelationHref> {
        self.href.as_ref()
    }

    pub fn embedded(&self) -> Option<&Embedded> {
        self.embedded.as_ref()
    }

    pub fn exclusion(&self) -> Option<&Exclusion> {
        self.exclusion.as_ref()
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Whether the relation can be emitted unconditionally (no exclusion rule).
    pub fn is_unconditional(&self) -> bool {
        self.exclusion.is_none()
    }
}

/// Where a link points to.
#[derive(Debug, Clone, PartialEq)]
pub enum RelationHref {
    /// A literal URL or an `expr(...)` template.
    Url(String),
    /// A named route resolved by a URL generator.
    Route(Route),
}

impl From<&str> for RelationHref {
    fn from(value: &str) -> Self {
        RelationHref::Url(value.to_string())
    }
}

impl From<String> for RelationHref {
    fn from(value: String) -> Self {
        RelationHref::Url(value)
    }
}

impl From<Route> for RelationHref {
    fn from(value: Route) -> Self {
        RelationHref::Route(value)
    }
}

/// A route reference: route name (template), parameters, absolute flag and
/// the name of the URL generator to use (`None` selects the default one).
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    name: String,
    parameters: RouteParameters,
    absolute: Condition,
    generator: Option<String>,
}

impl Route {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: RouteParameters::Map(Vec::new()),
            absolute: Condition::Literal(false),
            generator: None,
        }
    }

    /// Adds one parameter; the value is a template.
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        match &mut self.parameters {
            RouteParameters::Map(entries) => entries.push((name.into(), value.into())),
            RouteParameters::Expression(_) => {
                self.parameters = RouteParameters::Map(vec![(name.into(), value.into())]);
            }
        }
        self
    }

    /// Replaces the parameters by a single expression evaluating to a map.
    pub fn with_parameters_expression(mut self, expression: impl Into<String>) -> Self {
        self.parameters = RouteParameters::Expression(expression.into());
        self
    }

    pub fn with_absolute(mut self, absolute: impl Into<Condition>) -> Self {
        self.absolute = absolute.into();
        self
    }

    pub fn with_generator(mut self, generator: impl Into<String>) -> Self {
        self.generator = Some(generator.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &RouteParameters {
        &self.parameters
    }

    pub fn absolute(&self) -> &Condition {
        &self.absolute
    }

    pub fn generator(&self) -> Option<&str> {
        self.generator.as_deref()
    }
}

/// Route parameters: an ordered list of templates, or one expression that
/// evaluates to a map.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteParameters {
    Map(Vec<(String, String)>),
    Expression(String),
}

/// A boolean setting that may be computed per object.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Literal(bool),
    /// A template; literal text is read as a boolean (`"true"`, `"1"`).
    Template(String),
}

impl From<bool> for Condition {
    fn from(value: bool) -> Self {
        Condition::Literal(value)
    }
}

impl From<&str> for Condition {
    fn from(value: &str) -> Self {
        Condition::Template(value.to_string())
    }
}

impl From<String> for Condition {
    fn from(value: String) -> Self {
        Condition::Template(value)
    }
}

/// Describes how to compute an embedded resource from the owning object.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedded {
    content: String,
    exclusion: Option<Exclusion>,
    xml_element_name: Option<String>,
}

impl Embedded {
    /// `content` is a template, usually `expr(object.something)`.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            exclusion: None,
            xml_element_name: None,
        }
    }

    /// Replaces the relation's exclusion rule for the embedded part.
    pub fn with_exclusion(mut self, exclusion: Exclusion) -> Self {
        self.exclusion = Some(exclusion);
        self
    }

    pub fn with_xml_element_name(mut self, name: impl Into<String>) -> Self {
        self.xml_element_name = Some(name.into());
        self
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn exclusion(&self) -> Option<&Exclusion> {
        self.exclusion.as_ref()
    }

    pub fn xml_element_name(&self) -> Option<&str> {
        self.xml_element_name.as_deref()
    }
}

impl From<&str> for Embedded {
    fn from(value: &str) -> Self {
        Embedded::new(value)
    }
}

impl From<String> for Embedded {
    fn from(value: String) -> Self {
        Embedded::new(value)
    }
}

/// Rules deciding whether a relation is emitted for a serialization pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Exclusion {
    groups: Option<Vec<String>>,
    since_version: Option<String>,
    until_version: Option<String>,
    max_depth: Option<usize>,
    exclude_if: Option<Condition>,
}

impl Exclusion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = Some(groups.into_iter().map(Into::into).collect());
        self
    }

    pub fn since(mut self, version: impl Into<String>) -> Self {
        self.since_version = Some(version.into());
        self
    }

    pub fn until(mut self, version: impl Into<String>) -> Self {
        self.until_version = Some(version.into());
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn exclude_if(mut self, condition: impl Into<Condition>) -> Self {
        self.exclude_if = Some(condition.into());
        self
    }

    pub fn groups(&self) -> Option<&[String]> {
        self.groups.as_deref()
    }

    pub fn since_version(&self) -> Option<&str> {
        self.since_version.as_deref()
    }

    pub fn until_version(&self) -> Option<&str> {
        self.until_version.as_deref()
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    pub fn exclude_if_condition(&self) -> Option<&Condition> {
        self.exclude_if.as_ref()
    }
}
