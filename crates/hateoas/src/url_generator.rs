//! Route-to-URL generation.
//!
//! Relations whose href is a route are turned into URLs by a
//! [`UrlGenerator`] picked from the [`UrlGeneratorRegistry`]: the generator
//! the route names, or the registry's default one.
//!
//! Two generators ship with the crate:
//!
//! - [`CallableUrlGenerator`] wraps a closure.
//! - [`TemplateUrlGenerator`] expands `{name}` placeholders in registered
//!   path patterns and appends the remaining parameters as a query string.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use hateoas_support::Value;
use url::form_urlencoded;

use crate::error::UrlGenerationError;

pub type UrlResult<T> = std::result::Result<T, UrlGenerationError>;

/// Generates the URL of a named route.
pub trait UrlGenerator: Send + Sync {
    fn generate(&self, name: &str, parameters: &[(String, Value)], absolute: bool) -> UrlResult<String>;
}

/// A [`UrlGenerator`] backed by a closure.
///
/// ```
/// use hateoas::url_generator::{CallableUrlGenerator, UrlGenerator, build_query};
/// use hateoas_support::Value;
///
/// let generator = CallableUrlGenerator::new(|name, parameters, _absolute| {
///     Ok(format!("{name}?{}", build_query(parameters)))
/// });
/// let url = generator
///     .generate("/search", &[("query".to_string(), Value::from("hello"))], false)
///     .unwrap();
/// assert_eq!(url, "/search?query=hello");
/// ```
pub struct CallableUrlGenerator<F> {
    callable: F,
}

impl<F> CallableUrlGenerator<F>
where
    F: Fn(&str, &[(String, Value)], bool) -> UrlResult<String> + Send + Sync,
{
    pub fn new(callable: F) -> Self {
        Self { callable }
    }
}

impl<F> UrlGenerator for CallableUrlGenerator<F>
where
    F: Fn(&str, &[(String, Value)], bool) -> UrlResult<String> + Send + Sync,
{
    fn generate(&self, name: &str, parameters: &[(String, Value)], absolute: bool) -> UrlResult<String> {
        (self.callable)(name, parameters, absolute)
    }
}

impl<F> fmt::Debug for CallableUrlGenerator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CallableUrlGenerator")
    }
}

/// Encodes parameters as an `application/x-www-form-urlencoded` query
/// string. Null parameters are left out and list parameters repeat their
/// key with a `[]` suffix.
pub fn build_query(parameters: &[(String, Value)]) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (name, value) in parameters {
        match value {
            Value::Null => {}
            Value::List(items) => {
                let key = format!("{name}[]");
                for item in items.iter().filter(|item| !item.is_null()) {
                    serializer.append_pair(&key, &item.to_string());
                }
            }
            other => {
                serializer.append_pair(name, &other.to_string());
            }
        }
    }
    serializer.finish()
}

/// Expands registered path patterns such as `/users/{id}`.
///
/// Route names that are not registered but start with `/` are used as their
/// own pattern. Parameters that no placeholder consumes are appended as a
/// query string. Absolute URLs are prefixed with the base URL.
#[derive(Debug, Clone, Default)]
pub struct TemplateUrlGenerator {
    base_url: Option<String>,
    routes: HashMap<String, String>,
}

impl TemplateUrlGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_route(mut self, name: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.routes.insert(name.into(), pattern.into());
        self
    }

    fn pattern<'a>(&'a self, name: &'a str) -> UrlResult<&'a str> {
        match self.routes.get(name) {
            Some(pattern) => Ok(pattern),
            None if name.starts_with('/') => Ok(name),
            None => Err(UrlGenerationError::UnknownRoute(name.to_string())),
        }
    }
}

/// Placeholder names in `pattern`, in order of appearance.
pub fn extract_param_names(pattern: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut chars = pattern.chars();
    while let Some(ch) = chars.next() {
        if ch == '{' {
            let name: String = chars.by_ref().take_while(|&c| c != '}').collect();
            if !name.is_empty() {
                names.push(name);
            }
        }
    }
    names
}

impl UrlGenerator for TemplateUrlGenerator {
    fn generate(&self, name: &str, parameters: &[(String, Value)], absolute: bool) -> UrlResult<String> {
        let pattern = self.pattern(name)?;
        let placeholders = extract_param_names(pattern);

        let mut path = String::with_capacity(pattern.len());
        let mut chars = pattern.chars();
        while let Some(ch) = chars.next() {
            if ch != '{' {
                path.push(ch);
                continue;
            }
            let parameter: String = chars.by_ref().take_while(|&c| c != '}').collect();
            let value = parameters
                .iter()
                .find(|(n, v)| *n == parameter && !v.is_null())
                .map(|(_, v)| v.to_string())
                .ok_or_else(|| UrlGenerationError::MissingParameter {
                    route: name.to_string(),
                    parameter: parameter.clone(),
                })?;
            path.extend(form_urlencoded::byte_serialize(value.as_bytes()));
        }

        let remaining: Vec<(String, Value)> = parameters
            .iter()
            .filter(|(n, _)| !placeholders.contains(n))
            .cloned()
            .collect();
        let query = build_query(&remaining);
        if !query.is_empty() {
            path.push(if path.contains('?') { '&' } else { '?' });
            path.push_str(&query);
        }

        match (&self.base_url, absolute) {
            (Some(base), true) => Ok(format!("{}{}", base.trim_end_matches('/'), path)),
            _ => Ok(path),
        }
    }
}

/// Named URL generators plus an optional default one.
#[derive(Clone, Default)]
pub struct UrlGeneratorRegistry {
    default: Option<Arc<dyn UrlGenerator>>,
    named: HashMap<String, Arc<dyn UrlGenerator>>,
}

impl UrlGeneratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_default(&mut self, generator: Arc<dyn UrlGenerator>) {
        self.default = Some(generator);
    }

    pub fn set(&mut self, name: impl Into<String>, generator: Arc<dyn UrlGenerator>) {
        self.named.insert(name.into(), generator);
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// The generator registered as `name`, or the default one for `None`.
    /// `route` only feeds the error message.
    pub fn get(&self, name: Option<&str>, route: &str) -> UrlResult<&dyn UrlGenerator> {
        match name {
            Some(name) => self
                .named
                .get(name)
                .map(Arc::as_ref)
                .ok_or_else(|| UrlGenerationError::UnknownGenerator(name.to_string())),
            None => self
                .default
                .as_deref()
                .ok_or_else(|| UrlGenerationError::NoDefaultGenerator(route.to_string())),
        }
    }

    pub fn generate(
        &self,
        generator: Option<&str>,
        route: &str,
        parameters: &[(String, Value)],
        absolute: bool,
    ) -> UrlResult<String> {
        self.get(generator, route)?.generate(route, parameters, absolute)
    }
}

impl fmt::Debug for UrlGeneratorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.named.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("UrlGeneratorRegistry")
            .field("default", &self.default.is_some())
            .field("named", &names)
            .finish()
    }
}
