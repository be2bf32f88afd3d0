//! Tree-walking interpreter.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use hateoas_support::Value;
use parking_lot::RwLock;
use regex::Regex;

use crate::error::{ExpressionError, Result};
use crate::functions::{ExpressionFunction, builtin_functions};
use crate::parser::{BinaryOp, Expression, Literal, UnaryOp, parse_expression};

/// Returns the expression inside an `expr(...)` template, or `None` when the
/// template is a literal string.
///
/// ```
/// use hateoas_expression::expression_source;
///
/// assert_eq!(expression_source("expr(object.id)"), Some("object.id"));
/// assert_eq!(expression_source("http://example.com"), None);
/// ```
pub fn expression_source(template: &str) -> Option<&str> {
    let trimmed = template.trim();
    trimmed
        .strip_prefix("expr(")
        .and_then(|rest| rest.strip_suffix(')'))
}

/// Names visible to one evaluation.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    variables: Vec<(String, Value)>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bindings exposing `value` as `object`.
    pub fn for_object(value: impl Into<Value>) -> Self {
        Self::new().with("object", value)
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Binds a name, replacing a previous binding of the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.variables.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.variables.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.variables
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

/// Evaluates expressions against bindings.
///
/// Parsed expressions are cached per source string, so an evaluator is meant
/// to be shared (it is `Send + Sync`). Context variables and functions are
/// configured before sharing and are visible to every evaluation.
pub struct ExpressionEvaluator {
    cache: RwLock<HashMap<String, Arc<Expression>>>,
    context_variables: HashMap<String, Value>,
    functions: HashMap<String, Arc<dyn ExpressionFunction>>,
}

impl Default for ExpressionEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpressionEvaluator {
    pub fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
            context_variables: HashMap::new(),
            functions: builtin_functions()
                .into_iter()
                .map(|(name, function)| (name.to_string(), function))
                .collect(),
        }
    }

    /// Exposes a value under `name` to every evaluation. Bindings passed to
    /// [`evaluate`](Self::evaluate) take precedence.
    pub fn set_context_variable(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.context_variables.insert(name.into(), value.into());
    }

    pub fn register_function(
        &mut self,
        name: impl Into<String>,
        function: impl ExpressionFunction + 'static,
    ) {
        self.functions.insert(name.into(), Arc::new(function));
    }

    /// Parses `source`, reusing a cached tree when available.
    pub fn parse(&self, source: &str) -> Result<Arc<Expression>> {
        if let Some(expression) = self.cache.read().get(source) {
            return Ok(Arc::clone(expression));
        }

        tracing::trace!(expression = source, "parsing expression");
        let expression = Arc::new(parse_expression(source)?);
        self.cache
            .write()
            .entry(source.to_string())
            .or_insert_with(|| Arc::clone(&expression));
        Ok(expression)
    }

    pub fn evaluate(&self, source: &str, bindings: &Bindings) -> Result<Value> {
        let expression = self.parse(source)?;
        self.eval(&expression, bindings)
    }

    /// Evaluates an `expr(...)` template, or returns a literal template as a
    /// string value.
    pub fn evaluate_template(&self, template: &str, bindings: &Bindings) -> Result<Value> {
        match expression_source(template) {
            Some(source) => self.evaluate(source, bindings),
            None => Ok(Value::String(template.to_string())),
        }
    }

    /// Parses the expression of a template without evaluating it.
    pub fn validate_template(&self, template: &str) -> Result<()> {
        if let Some(source) = expression_source(template) {
            self.parse(source)?;
        }
        Ok(())
    }

    fn eval(&self, expression: &Expression, bindings: &Bindings) -> Result<Value> {
        match expression {
            Expression::Literal(literal) => Ok(match literal {
                Literal::Null => Value::Null,
                Literal::Boolean(b) => Value::Bool(*b),
                Literal::Integer(i) => Value::Integer(*i),
                Literal::Float(f) => Value::Float(*f),
                Literal::String(s) => Value::String(s.clone()),
            }),
            Expression::Array(items) => Ok(Value::List(
                items
                    .iter()
                    .map(|item| self.eval(item, bindings))
                    .collect::<Result<_>>()?,
            )),
            Expression::Hash(entries) => Ok(Value::Map(
                entries
                    .iter()
                    .map(|(key, value)| Ok((key.clone(), self.eval(value, bindings)?)))
                    .collect::<Result<_>>()?,
            )),
            Expression::Name(name) => bindings
                .get(name)
                .or_else(|| self.context_variables.get(name))
                .cloned()
                .ok_or_else(|| ExpressionError::UnboundName(name.clone())),
            Expression::Property(base, property) => {
                let base = self.eval(base, bindings)?;
                read_property(&base, property)
            }
            Expression::MethodCall(base, method, args) => {
                let base = self.eval(base, bindings)?;
                let args = self.eval_args(args, bindings)?;
                call_method(&base, method, &args)
            }
            Expression::Index(base, index) => {
                let base = self.eval(base, bindings)?;
                let index = self.eval(index, bindings)?;
                read_index(&base, &index)
            }
            Expression::Function(name, args) => {
                let function = self
                    .functions
                    .get(name)
                    .ok_or_else(|| ExpressionError::UnknownFunction(name.clone()))?;
                let args = self.eval_args(args, bindings)?;
                function.call(&args)
            }
            Expression::Unary(op, operand) => {
                let operand = self.eval(operand, bindings)?;
                unary(*op, operand)
            }
            Expression::Binary(lhs, BinaryOp::Or, rhs) => Ok(Value::Bool(
                self.eval(lhs, bindings)?.is_truthy() || self.eval(rhs, bindings)?.is_truthy(),
            )),
            Expression::Binary(lhs, BinaryOp::And, rhs) => Ok(Value::Bool(
                self.eval(lhs, bindings)?.is_truthy() && self.eval(rhs, bindings)?.is_truthy(),
            )),
            Expression::Binary(lhs, op, rhs) => {
                let lhs = self.eval(lhs, bindings)?;
                let rhs = self.eval(rhs, bindings)?;
                binary(*op, lhs, rhs)
            }
            Expression::Conditional(condition, then, otherwise) => {
                if self.eval(condition, bindings)?.is_truthy() {
                    self.eval(then, bindings)
                } else {
                    self.eval(otherwise, bindings)
                }
            }
        }
    }

    fn eval_args(&self, args: &[Expression], bindings: &Bindings) -> Result<Vec<Value>> {
        args.iter().map(|arg| self.eval(arg, bindings)).collect()
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Object(object) => format!("object of class {}", object.class().name()),
        other => other.type_name().to_string(),
    }
}

fn read_property(base: &Value, property: &str) -> Result<Value> {
    let found = match base {
        Value::Object(object) => object.get(property),
        Value::Map(_) => base.get_key(property).cloned(),
        _ => None,
    };
    found.ok_or_else(|| ExpressionError::UnknownProperty {
        property: property.to_string(),
        target: describe(base),
    })
}

/// `getFooBar` and `isFooBar` fall back to the `fooBar` property.
fn accessor_property(method: &str) -> Option<String> {
    let rest = method
        .strip_prefix("get")
        .or_else(|| method.strip_prefix("is"))?;
    let mut chars = rest.chars();
    let first = chars.next()?;
    if !first.is_uppercase() {
        return None;
    }
    Some(first.to_lowercase().chain(chars).collect())
}

fn call_method(base: &Value, method: &str, args: &[Value]) -> Result<Value> {
    let unknown = || ExpressionError::UnknownMethod {
        method: method.to_string(),
        target: describe(base),
    };
    let Value::Object(object) = base else {
        return Err(unknown());
    };
    if let Some(value) = object.call(method, args) {
        return Ok(value);
    }
    if args.is_empty() {
        if let Some(value) = accessor_property(method).and_then(|p| object.get(&p)) {
            return Ok(value);
        }
    }
    Err(unknown())
}

fn read_index(base: &Value, index: &Value) -> Result<Value> {
    match (base, index) {
        (Value::List(items), _) => {
            let position = index.as_i64().ok_or_else(|| {
                ExpressionError::type_error(format!(
                    "list index must be an integer, {} given",
                    index.type_name()
                ))
            })?;
            let position = if position < 0 {
                items.len() as i64 + position
            } else {
                position
            };
            Ok(usize::try_from(position)
                .ok()
                .and_then(|p| items.get(p))
                .cloned()
                .unwrap_or_default())
        }
        (Value::Map(_), key) => Ok(base.get_key(&key.to_string()).cloned().unwrap_or_default()),
        (Value::Object(_), key) => read_property(base, &key.to_string()),
        _ => Err(ExpressionError::type_error(format!(
            "cannot index into {}",
            base.type_name()
        ))),
    }
}

fn unary(op: UnaryOp, operand: Value) -> Result<Value> {
    match (op, operand) {
        (UnaryOp::Not, operand) => Ok(Value::Bool(!operand.is_truthy())),
        (UnaryOp::Negate, Value::Integer(i)) => i
            .checked_neg()
            .map(Value::Integer)
            .ok_or_else(|| ExpressionError::type_error("integer overflow")),
        (UnaryOp::Negate, Value::Float(f)) => Ok(Value::Float(-f)),
        (UnaryOp::Plus, value @ (Value::Integer(_) | Value::Float(_))) => Ok(value),
        (_, operand) => Err(ExpressionError::type_error(format!(
            "unary operator expects a number, {} given",
            operand.type_name()
        ))),
    }
}

/// Equality used by `==`, `!=` and `in`: numbers compare by value across
/// integer and float.
fn loose_eq(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Integer(_) | Value::Float(_), Value::Integer(_) | Value::Float(_)) => {
            lhs.as_f64() == rhs.as_f64()
        }
        _ => lhs == rhs,
    }
}

fn compare(lhs: &Value, rhs: &Value) -> Result<Ordering> {
    let ordering = match (lhs, rhs) {
        (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => match (lhs.as_f64(), rhs.as_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => None,
        },
    };
    ordering.ok_or_else(|| {
        ExpressionError::type_error(format!(
            "cannot compare {} with {}",
            lhs.type_name(),
            rhs.type_name()
        ))
    })
}

fn contains(needle: &Value, haystack: &Value) -> Result<bool> {
    match haystack {
        Value::List(items) => Ok(items.iter().any(|item| loose_eq(needle, item))),
        Value::Map(entries) => Ok(entries.iter().any(|(key, _)| *key == needle.to_string())),
        other => Err(ExpressionError::type_error(format!(
            "`in` expects a list or a map on its right side, {} given",
            other.type_name()
        ))),
    }
}

/// Compiles a pattern, accepting both bare patterns and `/pattern/flags`.
fn compile_pattern(pattern: &str) -> Result<Regex> {
    let source = match pattern.strip_prefix('/').and_then(|rest| rest.rsplit_once('/')) {
        Some((body, flags)) if flags.chars().all(|c| "imsux".contains(c)) => {
            let flags: String = flags.chars().filter(|c| *c != 'u').collect();
            if flags.is_empty() {
                body.to_string()
            } else {
                format!("(?{flags}){body}")
            }
        }
        _ => pattern.to_string(),
    };
    Regex::new(&source).map_err(|source| ExpressionError::InvalidRegex {
        pattern: pattern.to_string(),
        source,
    })
}

fn arithmetic(
    op: BinaryOp,
    lhs: &Value,
    rhs: &Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value> {
    match (lhs, rhs) {
        (Value::Integer(a), Value::Integer(b)) => Ok(int_op(*a, *b)
            .map(Value::Integer)
            .unwrap_or_else(|| Value::Float(float_op(*a as f64, *b as f64)))),
        _ => match (lhs.as_f64(), rhs.as_f64()) {
            (Some(a), Some(b)) => Ok(Value::Float(float_op(a, b))),
            _ => Err(ExpressionError::type_error(format!(
                "operator {op:?} expects numbers, {} and {} given",
                lhs.type_name(),
                rhs.type_name()
            ))),
        },
    }
}

fn binary(op: BinaryOp, lhs: Value, rhs: Value) -> Result<Value> {
    match op {
        BinaryOp::Equal => Ok(Value::Bool(loose_eq(&lhs, &rhs))),
        BinaryOp::NotEqual => Ok(Value::Bool(!loose_eq(&lhs, &rhs))),
        BinaryOp::Identical => Ok(Value::Bool(lhs == rhs)),
        BinaryOp::NotIdentical => Ok(Value::Bool(lhs != rhs)),
        BinaryOp::Less => Ok(Value::Bool(compare(&lhs, &rhs)?.is_lt())),
        BinaryOp::LessOrEqual => Ok(Value::Bool(compare(&lhs, &rhs)?.is_le())),
        BinaryOp::Greater => Ok(Value::Bool(compare(&lhs, &rhs)?.is_gt())),
        BinaryOp::GreaterOrEqual => Ok(Value::Bool(compare(&lhs, &rhs)?.is_ge())),
        BinaryOp::In => Ok(Value::Bool(contains(&lhs, &rhs)?)),
        BinaryOp::NotIn => Ok(Value::Bool(!contains(&lhs, &rhs)?)),
        BinaryOp::Matches => {
            let pattern = rhs.as_str().ok_or_else(|| {
                ExpressionError::type_error("`matches` expects a string pattern")
            })?;
            Ok(Value::Bool(
                compile_pattern(pattern)?.is_match(&lhs.to_string()),
            ))
        }
        BinaryOp::Concat => Ok(Value::String(format!("{lhs}{rhs}"))),
        BinaryOp::Add if matches!(lhs, Value::String(_)) || matches!(rhs, Value::String(_)) => {
            Ok(Value::String(format!("{lhs}{rhs}")))
        }
        BinaryOp::Add => arithmetic(op, &lhs, &rhs, i64::checked_add, |a, b| a + b),
        BinaryOp::Subtract => arithmetic(op, &lhs, &rhs, i64::checked_sub, |a, b| a - b),
        BinaryOp::Multiply => arithmetic(op, &lhs, &rhs, i64::checked_mul, |a, b| a * b),
        BinaryOp::Divide => {
            if rhs.as_f64() == Some(0.0) {
                return Err(ExpressionError::DivisionByZero);
            }
            arithmetic(
                op,
                &lhs,
                &rhs,
                |a, b| match a.checked_rem(b) {
                    Some(0) => a.checked_div(b),
                    _ => None,
                },
                |a, b| a / b,
            )
        }
        BinaryOp::Modulo => match (&lhs, &rhs) {
            (_, Value::Integer(0)) => Err(ExpressionError::DivisionByZero),
            (Value::Integer(a), Value::Integer(b)) => a
                .checked_rem(*b)
                .map(Value::Integer)
                .ok_or_else(|| ExpressionError::type_error("integer overflow")),
            _ => Err(ExpressionError::type_error("`%` expects integers")),
        },
        BinaryOp::Or => Ok(Value::Bool(lhs.is_truthy() || rhs.is_truthy())),
        BinaryOp::And => Ok(Value::Bool(lhs.is_truthy() && rhs.is_truthy())),
    }
}
