//! Property naming strategies.

use std::str::FromStr;
use std::sync::Arc;

/// Translates a declared property name into its serialized name.
pub trait PropertyNamingStrategy: Send + Sync {
    fn translate(&self, name: &str) -> String;
}

/// `firstName` → `first_name`. The default strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnakeCaseNaming;

impl PropertyNamingStrategy for SnakeCaseNaming {
    fn translate(&self, name: &str) -> String {
        let mut out = String::with_capacity(name.len() + 4);
        let mut previous_upper = true;
        for c in name.chars() {
            if c.is_uppercase() {
                if !previous_upper {
                    out.push('_');
                }
                out.extend(c.to_lowercase());
                previous_upper = true;
            } else {
                out.push(c);
                previous_upper = false;
            }
        }
        out
    }
}

/// Keeps declared names as they are.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdenticalNaming;

impl PropertyNamingStrategy for IdenticalNaming {
    fn translate(&self, name: &str) -> String {
        name.to_string()
    }
}

/// Named strategies selectable from configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NamingStrategy {
    #[default]
    SnakeCase,
    Identical,
}

impl NamingStrategy {
    pub fn into_strategy(self) -> Arc<dyn PropertyNamingStrategy> {
        match self {
            NamingStrategy::SnakeCase => Arc::new(SnakeCaseNaming),
            NamingStrategy::Identical => Arc::new(IdenticalNaming),
        }
    }
}

impl FromStr for NamingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "snake_case" | "snake-case" | "camel_case_to_snake_case" => Ok(NamingStrategy::SnakeCase),
            "identical" | "none" => Ok(NamingStrategy::Identical),
            other => Err(format!(
                "unknown naming strategy `{other}` (expected `snake_case` or `identical`)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case() {
        let naming = SnakeCaseNaming;
        assert_eq!(naming.translate("firstName"), "first_name");
        assert_eq!(naming.translate("macbookPro"), "macbook_pro");
        assert_eq!(naming.translate("name"), "name");
        assert_eq!(naming.translate("URL"), "url");
        assert_eq!(naming.translate("already_snake"), "already_snake");
    }

    #[test]
    fn test_from_str() {
        assert_eq!("identical".parse(), Ok(NamingStrategy::Identical));
        assert_eq!("SNAKE_CASE".parse(), Ok(NamingStrategy::SnakeCase));
        assert!("kebab".parse::<NamingStrategy>().is_err());
    }
}
