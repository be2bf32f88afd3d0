//! Expression grammar and AST.
//!
//! Operator precedence, loosest first:
//!
//! | Level | Operators |
//! |-------|-----------|
//! | conditional | `c ? a : b` |
//! | or | `or`, `\|\|` |
//! | and | `and`, `&&` |
//! | comparison | `==`, `!=`, `===`, `!==`, `<`, `<=`, `>`, `>=`, `in`, `not in`, `matches` |
//! | additive | `+`, `-` |
//! | concatenation | `~` |
//! | multiplicative | `*`, `/`, `%` |
//! | unary | `not`, `!`, `-`, `+` |
//! | access | `a.b`, `a.b(args)`, `a[i]` |

use chumsky::prelude::*;

use crate::error::{ExpressionError, Result};

type Extra<'src> = extra::Err<Rich<'src, char>>;

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Negate,
    Plus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Equal,
    NotEqual,
    Identical,
    NotIdentical,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    In,
    NotIn,
    Matches,
    Add,
    Subtract,
    Concat,
    Multiply,
    Divide,
    Modulo,
}

/// Parsed expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Literal),
    Array(Vec<Expression>),
    Hash(Vec<(String, Expression)>),
    Name(String),
    Property(Box<Expression>, String),
    MethodCall(Box<Expression>, String, Vec<Expression>),
    Index(Box<Expression>, Box<Expression>),
    Function(String, Vec<Expression>),
    Unary(UnaryOp, Box<Expression>),
    Binary(Box<Expression>, BinaryOp, Box<Expression>),
    Conditional(Box<Expression>, Box<Expression>, Box<Expression>),
}

enum Postfix {
    Member(String, Option<Vec<Expression>>),
    Index(Expression),
}

fn ident_char<'src>() -> impl Parser<'src, &'src str, char, Extra<'src>> + Clone {
    any().filter(|c: &char| c.is_ascii_alphanumeric() || *c == '_')
}

fn keyword<'src>(word: &'src str) -> impl Parser<'src, &'src str, &'src str, Extra<'src>> + Clone {
    just(word).then_ignore(ident_char().not())
}

fn identifier<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
    any()
        .filter(|c: &char| c.is_ascii_alphabetic() || *c == '_')
        .then(ident_char().repeated())
        .to_slice()
        .map(|s: &str| s.to_string())
}

fn string_literal<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
    let escape = just('\\').ignore_then(choice((
        just('\\'),
        just('\''),
        just('"'),
        just('n').to('\n'),
        just('t').to('\t'),
        just('r').to('\r'),
    )));

    let single = none_of("\\'")
        .or(escape.clone())
        .repeated()
        .collect::<String>()
        .delimited_by(just('\''), just('\''));
    let double = none_of("\\\"")
        .or(escape)
        .repeated()
        .collect::<String>()
        .delimited_by(just('"'), just('"'));

    single.or(double)
}

fn number<'src>() -> impl Parser<'src, &'src str, Literal, Extra<'src>> + Clone {
    let digits = any()
        .filter(|c: &char| c.is_ascii_digit())
        .repeated()
        .at_least(1);

    digits
        .clone()
        .then(just('.').then(digits).or_not())
        .to_slice()
        .try_map(|s: &str, span| {
            if s.contains('.') {
                s.parse::<f64>()
                    .map(Literal::Float)
                    .map_err(|e| Rich::custom(span, e))
            } else {
                s.parse::<i64>()
                    .map(Literal::Integer)
                    .map_err(|e| Rich::custom(span, e))
            }
        })
}

fn binary<'src>(
    operand: impl Parser<'src, &'src str, Expression, Extra<'src>> + Clone + 'src,
    op: impl Parser<'src, &'src str, BinaryOp, Extra<'src>> + Clone + 'src,
) -> Boxed<'src, 'src, &'src str, Expression, Extra<'src>> {
    operand
        .clone()
        .foldl(op.padded().then(operand).repeated(), |lhs, (op, rhs)| {
            Expression::Binary(Box::new(lhs), op, Box::new(rhs))
        })
        .boxed()
}

/// The expression parser. Leading and trailing whitespace is accepted.
pub fn parser<'src>() -> impl Parser<'src, &'src str, Expression, Extra<'src>> {
    recursive(|expr| {
        let args = expr
            .clone()
            .separated_by(just(','))
            .collect::<Vec<_>>()
            .padded()
            .delimited_by(just('('), just(')'));

        let literal = choice((
            keyword("true").to(Literal::Boolean(true)),
            keyword("false").to(Literal::Boolean(false)),
            keyword("null").to(Literal::Null),
            number(),
            string_literal().map(Literal::String),
        ))
        .map(Expression::Literal);

        let array = expr
            .clone()
            .separated_by(just(','))
            .allow_trailing()
            .collect::<Vec<_>>()
            .padded()
            .delimited_by(just('['), just(']'))
            .map(Expression::Array);

        let hash_key = choice((
            identifier(),
            string_literal(),
            any()
                .filter(|c: &char| c.is_ascii_digit())
                .repeated()
                .at_least(1)
                .to_slice()
                .map(|s: &str| s.to_string()),
        ));
        let hash = hash_key
            .padded()
            .then_ignore(just(':'))
            .then(expr.clone())
            .separated_by(just(','))
            .allow_trailing()
            .collect::<Vec<_>>()
            .padded()
            .delimited_by(just('{'), just('}'))
            .map(Expression::Hash);

        let name_or_call = identifier()
            .then(args.clone().or_not())
            .map(|(name, args)| match args {
                Some(args) => Expression::Function(name, args),
                None => Expression::Name(name),
            });

        let atom = choice((
            literal,
            array,
            hash,
            expr.clone().delimited_by(just('('), just(')')),
            name_or_call,
        ))
        .padded()
        .boxed();

        let postfix = choice((
            just('.')
                .ignore_then(identifier().padded())
                .then(args.or_not())
                .map(|(name, args)| Postfix::Member(name, args)),
            expr.clone()
                .delimited_by(just('['), just(']'))
                .map(Postfix::Index),
        ))
        .padded();

        let access = atom
            .foldl(postfix.repeated(), |base, op| match op {
                Postfix::Member(name, None) => Expression::Property(Box::new(base), name),
                Postfix::Member(name, Some(args)) => {
                    Expression::MethodCall(Box::new(base), name, args)
                }
                Postfix::Index(index) => Expression::Index(Box::new(base), Box::new(index)),
            })
            .boxed();

        let unary_op = choice((
            keyword("not").to(UnaryOp::Not),
            just('!').to(UnaryOp::Not),
            just('-').to(UnaryOp::Negate),
            just('+').to(UnaryOp::Plus),
        ))
        .padded();
        let unary = unary_op
            .repeated()
            .foldr(access, |op, operand| Expression::Unary(op, Box::new(operand)))
            .boxed();

        let product = binary(
            unary,
            choice((
                just('*').to(BinaryOp::Multiply),
                just('/').to(BinaryOp::Divide),
                just('%').to(BinaryOp::Modulo),
            )),
        );
        let concat = binary(product, just('~').to(BinaryOp::Concat));
        let sum = binary(
            concat,
            choice((
                just('+').to(BinaryOp::Add),
                just('-').to(BinaryOp::Subtract),
            )),
        );
        let comparison = binary(
            sum,
            choice((
                just("===").to(BinaryOp::Identical),
                just("!==").to(BinaryOp::NotIdentical),
                just("==").to(BinaryOp::Equal),
                just("!=").to(BinaryOp::NotEqual),
                just("<=").to(BinaryOp::LessOrEqual),
                just(">=").to(BinaryOp::GreaterOrEqual),
                just('<').to(BinaryOp::Less),
                just('>').to(BinaryOp::Greater),
                keyword("not")
                    .padded()
                    .then(keyword("in"))
                    .to(BinaryOp::NotIn),
                keyword("in").to(BinaryOp::In),
                keyword("matches").to(BinaryOp::Matches),
            )),
        );
        let and = binary(
            comparison,
            choice((keyword("and"), just("&&"))).to(BinaryOp::And),
        );
        let or = binary(and, choice((keyword("or"), just("||"))).to(BinaryOp::Or));

        or.then(
            just('?')
                .padded()
                .ignore_then(expr.clone())
                .then_ignore(just(':').padded())
                .then(expr)
                .or_not(),
        )
        .map(|(condition, branches)| match branches {
            Some((then, otherwise)) => {
                Expression::Conditional(Box::new(condition), Box::new(then), Box::new(otherwise))
            }
            None => condition,
        })
    })
}

/// Parses a complete expression.
pub fn parse_expression(source: &str) -> Result<Expression> {
    parser()
        .then_ignore(end())
        .parse(source)
        .into_result()
        .map_err(|errors| ExpressionError::Syntax {
            expression: source.to_string(),
            message: errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        })
}
