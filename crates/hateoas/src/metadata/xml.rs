//! XML metadata files.
//!
//! ```xml
//! <serializer>
//!   <class name="app::User" xml-root-name="user">
//!     <relation rel="self" href="expr('/users/' ~ object.id)">
//!       <exclusion groups="Default,detail" exclude-if="expr(object.id === null)"/>
//!     </relation>
//!     <relation rel="posts">
//!       <href route="user_posts" absolute="true" generator="api">
//!         <parameter name="id" value="expr(object.id)"/>
//!       </href>
//!       <embedded xml-element-name="post">
//!         <content>expr(object.getPosts())</content>
//!         <exclusion max-depth="1"/>
//!       </embedded>
//!       <attribute name="method" value="GET"/>
//!     </relation>
//!   </class>
//! </serializer>
//! ```
//!
//! Elements are matched by local name, so the relation vocabulary may live
//! in its own namespace. Class elements may carry other serializer settings,
//! which are ignored; inside a relation every attribute and element must be
//! known.

use std::fs;
use std::path::Path;

use hateoas_support::{ClassInfo, Condition, Embedded, Exclusion, Relation, RelationHref, Route};
use roxmltree::{Document, Node};

use super::{ClassMetadata, FileLocator, MetadataDriver};
use crate::error::MetadataLoadError;

/// Reads `<Class.Name>.xml` files found by a [`FileLocator`].
#[derive(Debug, Clone, Default)]
pub struct XmlDriver {
    locator: FileLocator,
}

impl XmlDriver {
    pub fn new(locator: FileLocator) -> Self {
        Self { locator }
    }

    /// Parses the metadata of `class_name` from an XML document.
    pub fn parse(path: &Path, content: &str, class_name: &str) -> Result<ClassMetadata, MetadataLoadError> {
        let document = Document::parse(content).map_err(|e| MetadataLoadError::Xml {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let reader = Reader { path };

        let classes: Vec<Node> = elements(document.root_element())
            .filter(|n| n.tag_name().name() == "class")
            .collect();
        let Some(class) = classes
            .iter()
            .find(|n| n.attribute("name") == Some(class_name))
        else {
            return Err(match classes.first() {
                Some(other) => MetadataLoadError::ClassMismatch {
                    path: path.to_path_buf(),
                    expected: class_name.to_string(),
                    found: other.attribute("name").unwrap_or_default().to_string(),
                },
                None => reader.error("no <class> element"),
            });
        };

        let mut metadata = ClassMetadata::new(class_name);
        if let Some(root_name) = class.attribute("xml-root-name") {
            metadata = metadata.with_xml_root_name(root_name);
        }
        for child in elements(*class) {
            match child.tag_name().name() {
                "relation" => metadata.add_relation(reader.relation(child)?),
                other => tracing::trace!(class = class_name, element = other, "ignoring class element"),
            }
        }
        Ok(metadata)
    }
}

impl MetadataDriver for XmlDriver {
    fn load_metadata_for_class(
        &self,
        class: &'static ClassInfo,
    ) -> Result<Option<ClassMetadata>, MetadataLoadError> {
        let Some(path) = self.locator.find_file_for_class(class.name(), &["xml"]) else {
            return Ok(None);
        };
        tracing::debug!(class = class.name(), path = %path.display(), "loading XML metadata");
        let content = fs::read_to_string(&path).map_err(|source| MetadataLoadError::Io {
            path: path.clone(),
            source,
        })?;
        Self::parse(&path, &content, class.name()).map(Some)
    }
}

fn elements<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(Node::is_element)
}

struct Reader<'p> {
    path: &'p Path,
}

impl Reader<'_> {
    fn error(&self, message: impl Into<String>) -> MetadataLoadError {
        MetadataLoadError::Xml {
            path: self.path.to_path_buf(),
            message: message.into(),
        }
    }

    fn context(&self, node: Node) -> String {
        let position = node.document().text_pos_at(node.range().start);
        format!("<{}> at {}:{}", node.tag_name().name(), self.path.display(), position)
    }

    fn check_attributes(&self, node: Node, allowed: &[&str]) -> Result<(), MetadataLoadError> {
        match node.attributes().find(|a| !allowed.contains(&a.name())) {
            Some(attribute) => Err(MetadataLoadError::UnknownKey {
                key: attribute.name().to_string(),
                context: self.context(node),
            }),
            None => Ok(()),
        }
    }

    fn required<'a>(&self, node: Node<'a, '_>, name: &str) -> Result<&'a str, MetadataLoadError> {
        node.attribute(name).ok_or_else(|| MetadataLoadError::MissingField {
            field: name.to_string(),
            context: self.context(node),
        })
    }

    fn unknown_element(&self, node: Node) -> MetadataLoadError {
        MetadataLoadError::UnknownKey {
            key: node.tag_name().name().to_string(),
            context: self.context(node.parent_element().unwrap_or(node)),
        }
    }

    fn relation(&self, node: Node) -> Result<Relation, MetadataLoadError> {
        self.check_attributes(node, &["rel", "href"])?;
        let mut relation = Relation::new(self.required(node, "rel")?);
        if let Some(href) = node.attribute("href") {
            relation = relation.with_href(href);
        }
        for child in elements(node) {
            match child.tag_name().name() {
                "href" => relation = relation.with_href(self.href(child)?),
                "embedded" => relation = relation.with_embedded(self.embedded(child)?),
                "exclusion" => relation = relation.with_exclusion(self.exclusion(child)?),
                "attribute" => {
                    self.check_attributes(child, &["name", "value"])?;
                    relation = relation.with_attribute(
                        self.required(child, "name")?,
                        self.required(child, "value")?,
                    );
                }
                _ => return Err(self.unknown_element(child)),
            }
        }
        Ok(relation)
    }

    fn href(&self, node: Node) -> Result<RelationHref, MetadataLoadError> {
        self.check_attributes(node, &["uri", "route", "absolute", "generator", "parameters"])?;
        if let Some(uri) = node.attribute("uri") {
            if node.attribute("route").is_some() {
                return Err(MetadataLoadError::InvalidValue {
                    key: "uri".to_string(),
                    context: self.context(node),
                    message: "an href has either a uri or a route".to_string(),
                });
            }
            return Ok(RelationHref::Url(uri.to_string()));
        }

        let mut route = Route::new(self.required(node, "route")?);
        if let Some(expression) = node.attribute("parameters") {
            route = route.with_parameters_expression(expression);
        }
        if let Some(absolute) = node.attribute("absolute") {
            route = route.with_absolute(condition(absolute));
        }
        if let Some(generator) = node.attribute("generator") {
            route = route.with_generator(generator);
        }
        for child in elements(node) {
            if child.tag_name().name() != "parameter" {
                return Err(self.unknown_element(child));
            }
            self.check_attributes(child, &["name", "value"])?;
            route = route.with_parameter(self.required(child, "name")?, self.required(child, "value")?);
        }
        Ok(RelationHref::Route(route))
    }

    fn embedded(&self, node: Node) -> Result<Embedded, MetadataLoadError> {
        self.check_attributes(node, &["content", "xml-element-name"])?;
        let mut content = node.attribute("content").map(str::to_string);
        let mut exclusion = None;
        for child in elements(node) {
            match child.tag_name().name() {
                "content" => content = Some(child.text().unwrap_or_default().trim().to_string()),
                "exclusion" => exclusion = Some(self.exclusion(child)?),
                _ => return Err(self.unknown_element(child)),
            }
        }
        let content = content.ok_or_else(|| MetadataLoadError::MissingField {
            field: "content".to_string(),
            context: self.context(node),
        })?;

        let mut embedded = Embedded::new(content);
        if let Some(exclusion) = exclusion {
            embedded = embedded.with_exclusion(exclusion);
        }
        if let Some(name) = node.attribute("xml-element-name") {
            embedded = embedded.with_xml_element_name(name);
        }
        Ok(embedded)
    }

    fn exclusion(&self, node: Node) -> Result<Exclusion, MetadataLoadError> {
        self.check_attributes(
            node,
            &["groups", "since-version", "until-version", "max-depth", "exclude-if"],
        )?;
        if let Some(child) = elements(node).next() {
            return Err(self.unknown_element(child));
        }

        let mut exclusion = Exclusion::new();
        if let Some(groups) = node.attribute("groups") {
            exclusion = exclusion.with_groups(
                groups
                    .split(',')
                    .map(str::trim)
                    .filter(|g| !g.is_empty()),
            );
        }
        if let Some(version) = node.attribute("since-version") {
            exclusion = exclusion.since(version);
        }
        if let Some(version) = node.attribute("until-version") {
            exclusion = exclusion.until(version);
        }
        if let Some(depth) = node.attribute("max-depth") {
            let depth = depth.trim().parse::<usize>().map_err(|e| MetadataLoadError::InvalidValue {
                key: "max-depth".to_string(),
                context: self.context(node),
                message: e.to_string(),
            })?;
            exclusion = exclusion.with_max_depth(depth);
        }
        if let Some(condition_source) = node.attribute("exclude-if") {
            exclusion = exclusion.exclude_if(condition(condition_source));
        }
        Ok(exclusion)
    }
}

fn condition(source: &str) -> Condition {
    match source.trim() {
        "true" => Condition::Literal(true),
        "false" => Condition::Literal(false),
        other => Condition::Template(other.to_string()),
    }
}
