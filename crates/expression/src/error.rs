//! Error types for expression parsing and evaluation.

use thiserror::Error;

/// Errors raised while parsing or evaluating an expression.
///
/// Every variant aborts the evaluation that produced it; there is no partial
/// result.
#[derive(Error, Debug)]
pub enum ExpressionError {
    /// The expression could not be parsed.
    #[error("syntax error in expression `{expression}`: {message}")]
    Syntax { expression: String, message: String },

    /// A name is neither bound nor a context variable.
    #[error("variable `{0}` is not defined")]
    UnboundName(String),

    #[error("property `{property}` does not exist on {target}")]
    UnknownProperty { property: String, target: String },

    #[error("method `{method}()` does not exist on {target}")]
    UnknownMethod { method: String, target: String },

    #[error("function `{0}()` is not registered")]
    UnknownFunction(String),

    /// An operator or function received a value of the wrong type.
    #[error("type error: {0}")]
    Type(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("invalid regular expression `{pattern}`: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl ExpressionError {
    pub(crate) fn type_error(message: impl Into<String>) -> Self {
        ExpressionError::Type(message.into())
    }
}

/// Result type for expression operations.
pub type Result<T> = std::result::Result<T, ExpressionError>;
