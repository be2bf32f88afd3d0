//! # Expression Language
//!
//! A small, side-effect-free expression language evaluated against the object
//! being serialized. It computes link hrefs, route parameters, embedded content
//! and `exclude_if` predicates.
//!
//! Expressions are parsed with [chumsky](https://docs.rs/chumsky) into a tagged
//! AST and interpreted by walking the tree. There is no general `eval`: the only
//! things an expression can touch are its [`Bindings`], the evaluator's context
//! variables, the registered functions and the [`Resource`] accessors of
//! objects reachable from them.
//!
//! ```
//! use hateoas_expression::{Bindings, ExpressionEvaluator};
//! use hateoas_support::Value;
//!
//! let evaluator = ExpressionEvaluator::new();
//! let bindings = Bindings::new().with("page", 2).with("pages", 5);
//!
//! let next = evaluator.evaluate("page < pages ? page + 1 : null", &bindings).unwrap();
//! assert_eq!(next, Value::Integer(3));
//!
//! let href = evaluator.evaluate_template("expr('/items?page=' ~ page)", &bindings).unwrap();
//! assert_eq!(href.to_string(), "/items?page=2");
//! ```
//!
//! [`Resource`]: hateoas_support::Resource

pub mod error;
pub mod evaluator;
pub mod functions;
pub mod parser;

pub use error::{ExpressionError, Result};
pub use evaluator::{Bindings, ExpressionEvaluator, expression_source};
pub use functions::ExpressionFunction;
pub use parser::{Expression, parse_expression};
