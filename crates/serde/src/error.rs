use std::error::Error as StdError;
use std::fmt;
use std::io;

/// Errors raised while walking an object graph or rendering its output.
#[derive(Debug)]
pub enum SerdeError {
    /// The JSON tree could not be written
    Json(serde_json::Error),

    /// The XML document could not be written
    Xml(quick_xml::Error),

    /// Writing the rendered bytes failed
    Io(io::Error),

    /// Error raised by an event subscriber, kept intact so the caller can
    /// recover its original type
    Subscriber(Box<dyn StdError + Send + Sync>),

    /// Custom error message
    Custom(String),
}

impl SerdeError {
    pub fn subscriber<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        SerdeError::Subscriber(Box::new(err))
    }
}

impl fmt::Display for SerdeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerdeError::Json(e) => write!(f, "failed to render JSON: {e}"),
            SerdeError::Xml(e) => write!(f, "failed to render XML: {e}"),
            SerdeError::Io(e) => write!(f, "failed to write output: {e}"),
            SerdeError::Subscriber(e) => write!(f, "{e}"),
            SerdeError::Custom(msg) => f.write_str(msg),
        }
    }
}

impl StdError for SerdeError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            SerdeError::Json(e) => Some(e),
            SerdeError::Xml(e) => Some(e),
            SerdeError::Io(e) => Some(e),
            SerdeError::Subscriber(e) => Some(e.as_ref()),
            SerdeError::Custom(_) => None,
        }
    }
}

impl From<serde_json::Error> for SerdeError {
    fn from(err: serde_json::Error) -> Self {
        SerdeError::Json(err)
    }
}

impl From<quick_xml::Error> for SerdeError {
    fn from(err: quick_xml::Error) -> Self {
        SerdeError::Xml(err)
    }
}

impl From<io::Error> for SerdeError {
    fn from(err: io::Error) -> Self {
        SerdeError::Io(err)
    }
}

impl From<String> for SerdeError {
    fn from(msg: String) -> Self {
        SerdeError::Custom(msg)
    }
}

/// Result type alias for serialization operations
pub type Result<T> = std::result::Result<T, SerdeError>;
