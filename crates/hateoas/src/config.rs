//! Configuration for building a [`Hateoas`](crate::Hateoas) instance.
//!
//! Settings can be given programmatically, on the command line, or through
//! environment variables.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `HATEOAS_METADATA_DIRS` | (none) | Comma-separated XML/YAML metadata directories |
//! | `HATEOAS_NAMING_STRATEGY` | snake_case | Property naming (`snake_case`, `identical`) |
//! | `HATEOAS_SERIALIZE_NULL` | false | Serialize null properties and embeds |
//! | `HATEOAS_BASE_URL` | (none) | Base URL of absolute links |
//! | `HATEOAS_INCLUDE_ANNOTATIONS` | true | Read annotation strings of classes |
//!
//! # Example
//!
//! ```rust
//! use hateoas::HateoasConfig;
//!
//! let config = HateoasConfig {
//!     base_url: Some("https://api.example.com".to_string()),
//!     serialize_null: true,
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use hateoas_serde::{NamingStrategy, SerializationContext};

/// Settings read by [`HateoasBuilder::from_config`](crate::HateoasBuilder::from_config).
#[derive(Debug, Clone, Parser)]
#[command(name = "hateoas")]
#[command(about = "HATEOAS serialization settings")]
pub struct HateoasConfig {
    /// Directories holding XML and YAML metadata files.
    #[arg(long, env = "HATEOAS_METADATA_DIRS", value_delimiter = ',')]
    pub metadata_dirs: Vec<PathBuf>,

    /// Property naming strategy (snake_case, identical).
    #[arg(long, env = "HATEOAS_NAMING_STRATEGY", default_value = "snake_case")]
    pub naming_strategy: String,

    /// Serialize null properties and embeds.
    #[arg(long, env = "HATEOAS_SERIALIZE_NULL", default_value = "false")]
    pub serialize_null: bool,

    /// Base URL prepended to absolute links.
    #[arg(long, env = "HATEOAS_BASE_URL")]
    pub base_url: Option<String>,

    /// Read relation annotations declared on classes.
    #[arg(
        long,
        env = "HATEOAS_INCLUDE_ANNOTATIONS",
        default_value = "true",
        action = ArgAction::Set
    )]
    pub include_annotations: bool,
}

impl Default for HateoasConfig {
    fn default() -> Self {
        Self {
            metadata_dirs: Vec::new(),
            naming_strategy: "snake_case".to_string(),
            serialize_null: false,
            base_url: None,
            include_annotations: true,
        }
    }
}

impl HateoasConfig {
    /// Reads the configuration from environment variables, falling back to
    /// defaults.
    pub fn from_env() -> Self {
        Self::try_parse_from(["hateoas"]).unwrap_or_default()
    }

    pub fn naming(&self) -> Result<NamingStrategy, String> {
        self.naming_strategy.parse()
    }

    /// Serialization context used when a call passes none.
    pub fn default_context(&self) -> SerializationContext {
        SerializationContext::new().with_serialize_null(self.serialize_null)
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Err(e) = self.naming() {
            errors.push(e);
        }

        if let Some(base_url) = &self.base_url {
            if let Err(e) = url::Url::parse(base_url) {
                errors.push(format!("Invalid base URL `{base_url}`: {e}"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HateoasConfig::default();
        assert!(config.metadata_dirs.is_empty());
        assert_eq!(config.naming().unwrap(), NamingStrategy::SnakeCase);
        assert!(!config.default_context().serialize_null());
        assert!(config.include_annotations);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_arguments() {
        let config = HateoasConfig::try_parse_from([
            "hateoas",
            "--metadata-dirs",
            "config/a,config/b",
            "--naming-strategy",
            "identical",
            "--serialize-null",
            "--include-annotations",
            "false",
            "--base-url",
            "https://api.example.com",
        ])
        .unwrap();

        assert_eq!(
            config.metadata_dirs,
            vec![PathBuf::from("config/a"), PathBuf::from("config/b")]
        );
        assert_eq!(config.naming().unwrap(), NamingStrategy::Identical);
        assert!(config.serialize_null);
        assert!(!config.include_annotations);
        assert_eq!(config.base_url.as_deref(), Some("https://api.example.com"));
    }

    #[test]
    fn test_invalid_config() {
        let config = HateoasConfig {
            naming_strategy: "kebab".to_string(),
            base_url: Some("not a url".to_string()),
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
