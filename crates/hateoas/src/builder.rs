//! Assembles a [`Hateoas`] instance from metadata sources, URL generators
//! and expression settings.

use std::path::PathBuf;
use std::sync::Arc;

use hateoas_expression::{ExpressionEvaluator, ExpressionFunction};
use hateoas_serde::{PropertyNamingStrategy, SerializationContext, Serializer, SnakeCaseNaming};
use hateoas_support::Value;

use crate::config::HateoasConfig;
use crate::factory::RelationResolver;
use crate::hateoas::Hateoas;
use crate::metadata::{
    AnnotationDriver, AttributeDriver, DriverChain, FileLocator, MetadataCache, MetadataDriver, MetadataFactory,
    RelationProvider, XmlDriver, YamlDriver,
};
use crate::serializer::{HateoasSubscriber, JsonHalSerializer, XmlSerializer};
use crate::url_generator::{TemplateUrlGenerator, UrlGenerator, UrlGeneratorRegistry};

/// Builder for [`Hateoas`].
///
/// Metadata drivers are consulted in a fixed order: relations declared in
/// code, annotation strings, XML files, YAML files, then custom drivers. Their
/// results are merged, so a class may spread its relations over several
/// sources.
///
/// ```
/// use hateoas::{Format, HateoasBuilder};
/// use hateoas_support::Value;
///
/// let hateoas = HateoasBuilder::new().build();
/// let json = hateoas
///     .serialize(Value::map([("firstName", "Adrien")]), Format::Json, None)
///     .unwrap();
/// assert_eq!(json, r#"{"firstName":"Adrien"}"#);
/// ```
pub struct HateoasBuilder {
    locator: FileLocator,
    url_generators: UrlGeneratorRegistry,
    drivers: Vec<Arc<dyn MetadataDriver>>,
    providers: Vec<Arc<dyn RelationProvider>>,
    evaluator: ExpressionEvaluator,
    naming: Arc<dyn PropertyNamingStrategy>,
    cache: Option<Arc<MetadataCache>>,
    default_context: SerializationContext,
    include_attributes: bool,
    include_annotations: bool,
}

impl Default for HateoasBuilder {
    fn default() -> Self {
        Self {
            locator: FileLocator::new(),
            url_generators: UrlGeneratorRegistry::new(),
            drivers: Vec::new(),
            providers: Vec::new(),
            evaluator: ExpressionEvaluator::new(),
            naming: Arc::new(SnakeCaseNaming),
            cache: None,
            default_context: SerializationContext::new(),
            include_attributes: true,
            include_annotations: true,
        }
    }
}

impl HateoasBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create() -> Self {
        Self::default()
    }

    /// Shorthand for `HateoasBuilder::new().build()`.
    pub fn build_hateoas() -> Hateoas {
        Self::new().build()
    }

    /// Applies a [`HateoasConfig`]: metadata directories, naming strategy,
    /// null serialization and, when a base URL is set, a
    /// [`TemplateUrlGenerator`] as default URL generator.
    ///
    /// Missing directories are skipped with a warning. An unknown naming
    /// strategy keeps the default one.
    pub fn from_config(config: &HateoasConfig) -> Self {
        let mut builder = Self::new()
            .include_annotation_metadata(config.include_annotations)
            .set_default_context(config.default_context());

        for dir in &config.metadata_dirs {
            if dir.is_dir() {
                builder = builder.add_metadata_dir(dir.clone());
            } else {
                tracing::warn!(dir = %dir.display(), "metadata directory does not exist, skipping");
            }
        }

        match config.naming() {
            Ok(naming) => builder = builder.set_naming_strategy(naming.into_strategy()),
            Err(e) => tracing::warn!(error = %e, "keeping the default naming strategy"),
        }

        if let Some(base_url) = &config.base_url {
            builder = builder.set_default_url_generator(TemplateUrlGenerator::new().with_base_url(base_url.as_str()));
        }

        builder
    }

    /// Looks up `<Class.Name>.xml`, `.yml` and `.yaml` metadata files in
    /// `dir`.
    pub fn add_metadata_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.locator.add_directory(dir);
        self
    }

    /// Looks up metadata files of classes under the `prefix` namespace in
    /// `dir`, with the prefix stripped from file names.
    pub fn add_metadata_dir_with_prefix(mut self, dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        self.locator.add_directory_with_prefix(prefix, dir);
        self
    }

    /// Registers a URL generator that routes select with `generator`.
    pub fn set_url_generator(mut self, name: impl Into<String>, generator: impl UrlGenerator + 'static) -> Self {
        self.url_generators.set(name, Arc::new(generator));
        self
    }

    /// Registers the URL generator used by routes without a `generator`.
    pub fn set_default_url_generator(mut self, generator: impl UrlGenerator + 'static) -> Self {
        self.url_generators.set_default(Arc::new(generator));
        self
    }

    /// Adds a driver consulted after the built-in ones.
    pub fn add_metadata_driver(mut self, driver: impl MetadataDriver + 'static) -> Self {
        self.drivers.push(Arc::new(driver));
        self
    }

    pub fn add_relation_provider(mut self, provider: impl RelationProvider + 'static) -> Self {
        self.providers.push(Arc::new(provider));
        self
    }

    /// Exposes `value` as `name` to every expression.
    pub fn set_expression_context_variable(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.evaluator.set_context_variable(name, value);
        self
    }

    pub fn register_expression_function(
        mut self,
        name: impl Into<String>,
        function: impl ExpressionFunction + 'static,
    ) -> Self {
        self.evaluator.register_function(name, function);
        self
    }

    pub fn set_naming_strategy(mut self, naming: Arc<dyn PropertyNamingStrategy>) -> Self {
        self.naming = naming;
        self
    }

    /// Shares a metadata cache between several instances.
    ///
    /// Entries are keyed by class name only. Instances sharing a cache must
    /// be configured with the same metadata sources, otherwise each gets
    /// whichever instance loaded a class first.
    pub fn set_metadata_cache(mut self, cache: Arc<MetadataCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Context of serialize calls that pass none.
    pub fn set_default_context(mut self, context: SerializationContext) -> Self {
        self.default_context = context;
        self
    }

    pub fn include_attribute_metadata(mut self, include: bool) -> Self {
        self.include_attributes = include;
        self
    }

    pub fn include_annotation_metadata(mut self, include: bool) -> Self {
        self.include_annotations = include;
        self
    }

    pub fn build(self) -> Hateoas {
        let mut drivers: Vec<Arc<dyn MetadataDriver>> = Vec::new();
        if self.include_attributes {
            drivers.push(Arc::new(AttributeDriver));
        }
        if self.include_annotations {
            drivers.push(Arc::new(AnnotationDriver));
        }
        if self.locator.directories().next().is_some() {
            drivers.push(Arc::new(XmlDriver::new(self.locator.clone())));
            drivers.push(Arc::new(YamlDriver::new(self.locator)));
        }
        drivers.extend(self.drivers);
        tracing::debug!(drivers = drivers.len(), "building hateoas serializer");

        let evaluator = Arc::new(self.evaluator);
        let metadata = Arc::new(MetadataFactory::new(
            Arc::new(DriverChain::new(drivers)),
            self.providers,
            self.cache.unwrap_or_default(),
            evaluator.clone(),
        ));
        let resolver = Arc::new(RelationResolver::new(
            metadata.clone(),
            evaluator,
            Arc::new(self.url_generators),
        ));

        let serializer = Serializer::builder()
            .naming_strategy(self.naming)
            .metadata_provider(metadata)
            .add_json_subscriber(Arc::new(HateoasSubscriber::new(resolver.clone(), JsonHalSerializer)))
            .add_xml_subscriber(Arc::new(HateoasSubscriber::new(resolver.clone(), XmlSerializer)))
            .build();

        Hateoas::new(serializer, resolver, self.default_context)
    }
}
