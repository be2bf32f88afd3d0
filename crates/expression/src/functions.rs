//! Functions callable from expressions.

use std::sync::Arc;

use hateoas_support::Value;

use crate::error::{ExpressionError, Result};

/// A function that can be called by name from an expression, e.g.
/// `upper(object.name)`.
pub trait ExpressionFunction: Send + Sync {
    fn call(&self, args: &[Value]) -> Result<Value>;
}

impl<F> ExpressionFunction for F
where
    F: Fn(&[Value]) -> Result<Value> + Send + Sync,
{
    fn call(&self, args: &[Value]) -> Result<Value> {
        self(args)
    }
}

fn single_arg<'a>(name: &str, args: &'a [Value]) -> Result<&'a Value> {
    match args {
        [value] => Ok(value),
        _ => Err(ExpressionError::type_error(format!(
            "{name}() expects 1 argument, {} given",
            args.len()
        ))),
    }
}

fn count(args: &[Value]) -> Result<Value> {
    match single_arg("count", args)? {
        Value::List(items) => Ok(Value::from(items.len())),
        Value::Map(entries) => Ok(Value::from(entries.len())),
        Value::String(s) => Ok(Value::from(s.chars().count())),
        other => Err(ExpressionError::type_error(format!(
            "count() expects a list, a map or a string, {} given",
            other.type_name()
        ))),
    }
}

fn lower(args: &[Value]) -> Result<Value> {
    Ok(Value::from(single_arg("lower", args)?.to_string().to_lowercase()))
}

fn upper(args: &[Value]) -> Result<Value> {
    Ok(Value::from(single_arg("upper", args)?.to_string().to_uppercase()))
}

fn join(args: &[Value]) -> Result<Value> {
    let (items, separator) = match args {
        [Value::List(items)] => (items, ","),
        [Value::List(items), Value::String(separator)] => (items, separator.as_str()),
        _ => {
            return Err(ExpressionError::type_error(
                "join() expects a list and an optional string separator",
            ));
        }
    };
    Ok(Value::from(
        items
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(separator),
    ))
}

/// Functions registered on every evaluator.
pub(crate) fn builtin_functions() -> Vec<(&'static str, Arc<dyn ExpressionFunction>)> {
    let functions: [(&'static str, Arc<dyn ExpressionFunction>); 4] = [
        ("count", Arc::new(count)),
        ("lower", Arc::new(lower)),
        ("upper", Arc::new(upper)),
        ("join", Arc::new(join)),
    ];
    functions.into()
}
