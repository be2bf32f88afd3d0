//! Error types for the hypermedia layer.

use std::path::PathBuf;

use hateoas_expression::ExpressionError;
use hateoas_serde::SerdeError;
use thiserror::Error;

/// Failure while loading or validating relation metadata.
#[derive(Error, Debug)]
pub enum MetadataLoadError {
    #[error("failed to read metadata file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid XML metadata in {path}: {message}")]
    Xml { path: PathBuf, message: String },

    #[error("invalid YAML metadata in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid annotation on {class}: {message}")]
    Annotation { class: String, message: String },

    #[error("unknown key `{key}` in {context}")]
    UnknownKey { key: String, context: String },

    #[error("invalid value for `{key}` in {context}: {message}")]
    InvalidValue {
        key: String,
        context: String,
        message: String,
    },

    #[error("missing `{field}` in {context}")]
    MissingField { field: String, context: String },

    #[error("metadata file {path} describes `{found}`, expected `{expected}`")]
    ClassMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },

    #[error("relation `{relation}` is declared more than once on {class}")]
    ConflictingRelation { class: String, relation: String },

    #[error("relation `{relation}` on {class} has neither an href nor embedded content")]
    EmptyRelation { class: String, relation: String },

    #[error("invalid expression in relation `{relation}` on {class}: {source}")]
    InvalidExpression {
        class: String,
        relation: String,
        #[source]
        source: ExpressionError,
    },
}

/// Failure while turning a route into a URL.
#[derive(Error, Debug)]
pub enum UrlGenerationError {
    #[error("no URL generator named `{0}`")]
    UnknownGenerator(String),

    #[error("no default URL generator configured to generate route `{0}`")]
    NoDefaultGenerator(String),

    #[error("unknown route `{0}`")]
    UnknownRoute(String),

    #[error("route `{route}` requires parameter `{parameter}`")]
    MissingParameter { route: String, parameter: String },

    #[error("route parameters must evaluate to a map, {0} given")]
    InvalidParameters(String),

    #[error("{0}")]
    Custom(String),
}

/// Errors surfaced by [`Hateoas`](crate::Hateoas).
#[derive(Error, Debug)]
pub enum HateoasError {
    #[error(transparent)]
    MetadataLoad(#[from] MetadataLoadError),

    #[error(transparent)]
    Expression(#[from] ExpressionError),

    #[error(transparent)]
    UrlGeneration(#[from] UrlGenerationError),

    #[error("relation `{relation}` is emitted more than once for {class}")]
    DuplicateRelation { class: String, relation: String },

    #[error("embedded relation `{relation}` on {class} points back to an object being serialized")]
    CyclicEmbedUnhandled { class: String, relation: String },

    #[error("serialization failed: {0}")]
    Serialization(SerdeError),
}

impl From<SerdeError> for HateoasError {
    fn from(err: SerdeError) -> Self {
        match err {
            SerdeError::Subscriber(inner) => match inner.downcast::<HateoasError>() {
                Ok(original) => *original,
                Err(other) => HateoasError::Serialization(SerdeError::Subscriber(other)),
            },
            other => HateoasError::Serialization(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, HateoasError>;
