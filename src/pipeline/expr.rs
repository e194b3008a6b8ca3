//! Derived-field expressions
//!
//! A small discriminated-union AST evaluated by an interpreter, covering
//! field references, arithmetic, flooring, decimal rounding, string
//! concatenation, string coercion and object literals. Parsed from the
//! Mongo-style JSON operator shapes (`{"$floor": {"$divide": [...]}}`).
//!
//! Arithmetic runs in f64; integral finite results are re-emitted as
//! integer JSON numbers so derived group keys and stringified values read
//! as integers. Rounding is half away from zero.

use serde_json::Value;

use crate::document::{get_path, Document};
use crate::query::{InvalidQueryError, QueryResult};

use super::errors::{EvalResult, EvaluationError};

/// A derived-field expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal value
    Literal(Value),
    /// Field reference (`"$field"`, dot paths allowed)
    Field(String),
    /// Addition
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction
    Subtract(Box<Expr>, Box<Expr>),
    /// Multiplication
    Multiply(Box<Expr>, Box<Expr>),
    /// Division; a zero divisor fails the whole pipeline
    Divide(Box<Expr>, Box<Expr>),
    /// Largest integer less than or equal to the operand
    Floor(Box<Expr>),
    /// Round to N decimal digits, half away from zero
    Round(Box<Expr>, i32),
    /// String concatenation
    Concat(Vec<Expr>),
    /// Coercion to string
    ToString(Box<Expr>),
    /// Object literal with expression values (insertion order kept)
    Object(Vec<(String, Expr)>),
}

impl Expr {
    /// Evaluates the expression against one document.
    pub fn eval(&self, document: &Document) -> EvalResult<Value> {
        match self {
            Expr::Literal(value) => Ok(value.clone()),
            // An absent field evaluates to null; arithmetic over it then
            // fails with a type mismatch rather than guessing a value.
            Expr::Field(path) => Ok(get_path(document, path).cloned().unwrap_or(Value::Null)),
            Expr::Add(left, right) => Self::arith(document, left, right, "$add", |a, b| a + b),
            Expr::Subtract(left, right) => {
                Self::arith(document, left, right, "$subtract", |a, b| a - b)
            }
            Expr::Multiply(left, right) => {
                Self::arith(document, left, right, "$multiply", |a, b| a * b)
            }
            Expr::Divide(left, right) => {
                let dividend = numeric(&left.eval(document)?, "$divide")?;
                let divisor = numeric(&right.eval(document)?, "$divide")?;
                if divisor == 0.0 {
                    return Err(EvaluationError::divide_by_zero("$divide"));
                }
                number_value(dividend / divisor)
            }
            Expr::Floor(operand) => {
                let value = numeric(&operand.eval(document)?, "$floor")?;
                number_value(value.floor())
            }
            Expr::Round(operand, digits) => {
                let value = numeric(&operand.eval(document)?, "$round")?;
                let scale = 10f64.powi(*digits);
                // f64::round is half-away-from-zero, which is the rounding
                // policy this engine guarantees.
                number_value((value * scale).round() / scale)
            }
            Expr::Concat(parts) => {
                let mut out = String::new();
                for part in parts {
                    match part.eval(document)? {
                        Value::String(s) => out.push_str(&s),
                        other => {
                            return Err(EvaluationError::type_mismatch(format!(
                                "$concat expects strings, got {}",
                                type_name(&other)
                            )));
                        }
                    }
                }
                Ok(Value::String(out))
            }
            Expr::ToString(operand) => match operand.eval(document)? {
                Value::String(s) => Ok(Value::String(s)),
                Value::Number(n) => Ok(Value::String(n.to_string())),
                Value::Bool(b) => Ok(Value::String(b.to_string())),
                Value::Null => Ok(Value::Null),
                other => Err(EvaluationError::type_mismatch(format!(
                    "$toString cannot convert {}",
                    type_name(&other)
                ))),
            },
            Expr::Object(fields) => {
                let mut out = Document::new();
                for (name, expr) in fields {
                    out.insert(name.clone(), expr.eval(document)?);
                }
                Ok(Value::Object(out))
            }
        }
    }

    fn arith(
        document: &Document,
        left: &Expr,
        right: &Expr,
        op: &str,
        apply: fn(f64, f64) -> f64,
    ) -> EvalResult<Value> {
        let a = numeric(&left.eval(document)?, op)?;
        let b = numeric(&right.eval(document)?, op)?;
        number_value(apply(a, b))
    }
}

/// Extracts a numeric operand or fails with a definite error.
pub(crate) fn numeric(value: &Value, op: &str) -> EvalResult<f64> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| {
            EvaluationError::type_mismatch(format!("{} operand is not representable", op))
        }),
        other => Err(EvaluationError::type_mismatch(format!(
            "{} expects a number, got {}",
            op,
            type_name(other)
        ))),
    }
}

/// Emits a computed number, normalizing integral results to integer JSON
/// numbers.
pub(crate) fn number_value(value: f64) -> EvalResult<Value> {
    if !value.is_finite() {
        return Err(EvaluationError::type_mismatch(
            "numeric result is not finite",
        ));
    }
    const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0; // 2^53
    if value.fract() == 0.0 && value.abs() < MAX_EXACT_INT {
        return Ok(Value::from(value as i64));
    }
    serde_json::Number::from_f64(value)
        .map(Value::Number)
        .ok_or_else(|| EvaluationError::type_mismatch("numeric result is not representable"))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Parses a Mongo-style expression value into the AST.
pub fn parse_expr(value: &Value) -> QueryResult<Expr> {
    match value {
        Value::String(s) if s.starts_with('$') => Ok(Expr::Field(s[1..].to_string())),
        Value::Object(map) => {
            if map.keys().any(|k| k.starts_with('$')) {
                if map.len() != 1 {
                    return Err(InvalidQueryError::invalid_pipeline(
                        "operator expression must have exactly one key",
                    ));
                }
                let (op, body) = match map.iter().next() {
                    Some(entry) => entry,
                    None => {
                        return Err(InvalidQueryError::invalid_pipeline(
                            "operator expression must have exactly one key",
                        ))
                    }
                };
                parse_operator(op, body)
            } else {
                let mut fields = Vec::with_capacity(map.len());
                for (name, inner) in map {
                    fields.push((name.clone(), parse_expr(inner)?));
                }
                Ok(Expr::Object(fields))
            }
        }
        other => Ok(Expr::Literal(other.clone())),
    }
}

fn parse_operator(op: &str, body: &Value) -> QueryResult<Expr> {
    match op {
        "$add" => parse_binary(op, body, Expr::Add),
        "$subtract" => parse_binary(op, body, Expr::Subtract),
        "$multiply" => parse_binary(op, body, Expr::Multiply),
        "$divide" => parse_binary(op, body, Expr::Divide),
        "$floor" => Ok(Expr::Floor(Box::new(parse_expr(body)?))),
        "$round" => parse_round(body),
        "$concat" => {
            let parts = body.as_array().ok_or_else(|| {
                InvalidQueryError::invalid_pipeline("$concat expects an array of expressions")
            })?;
            let parsed = parts.iter().map(parse_expr).collect::<QueryResult<_>>()?;
            Ok(Expr::Concat(parsed))
        }
        "$toString" => Ok(Expr::ToString(Box::new(parse_expr(body)?))),
        other => Err(InvalidQueryError::invalid_operator(other.to_string())),
    }
}

fn parse_binary(
    op: &str,
    body: &Value,
    build: fn(Box<Expr>, Box<Expr>) -> Expr,
) -> QueryResult<Expr> {
    let items = match body.as_array() {
        Some(items) if items.len() == 2 => items,
        _ => {
            return Err(InvalidQueryError::invalid_pipeline(format!(
                "{} expects [left, right]",
                op
            )));
        }
    };
    Ok(build(
        Box::new(parse_expr(&items[0])?),
        Box::new(parse_expr(&items[1])?),
    ))
}

fn parse_round(body: &Value) -> QueryResult<Expr> {
    let items = body.as_array().ok_or_else(|| {
        InvalidQueryError::invalid_pipeline("$round expects [expression, digits]")
    })?;
    match items.as_slice() {
        [operand] => Ok(Expr::Round(Box::new(parse_expr(operand)?), 0)),
        [operand, digits] => {
            let digits = digits.as_i64().and_then(|d| i32::try_from(d).ok()).ok_or_else(
                || InvalidQueryError::invalid_pipeline("$round digits must be an integer"),
            )?;
            Ok(Expr::Round(Box::new(parse_expr(operand)?), digits))
        }
        _ => Err(InvalidQueryError::invalid_pipeline(
            "$round expects [expression, digits]",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn test_field_reference() {
        let d = doc(json!({"published_year": 1965}));
        let expr = parse_expr(&json!("$published_year")).unwrap();
        assert_eq!(expr.eval(&d).unwrap(), json!(1965));
    }

    #[test]
    fn test_absent_field_evaluates_to_null() {
        let d = doc(json!({}));
        let expr = Expr::Field("missing".into());
        assert_eq!(expr.eval(&d).unwrap(), Value::Null);
    }

    #[test]
    fn test_divide_then_floor() {
        let d = doc(json!({"published_year": 1965}));
        let expr = parse_expr(&json!({"$floor": {"$divide": ["$published_year", 10]}})).unwrap();
        assert_eq!(expr.eval(&d).unwrap(), json!(196));
    }

    #[test]
    fn test_arithmetic_normalizes_integral_results() {
        let d = doc(json!({"decade": 196}));
        let expr = parse_expr(&json!({"$multiply": ["$decade", 10]})).unwrap();
        // 1960, not 1960.0
        assert_eq!(expr.eval(&d).unwrap(), json!(1960));
    }

    #[test]
    fn test_add_subtract() {
        let d = doc(json!({"pages": 412, "published_year": 1965}));

        let add = parse_expr(&json!({"$add": ["$pages", 8]})).unwrap();
        assert_eq!(add.eval(&d).unwrap(), json!(420));

        let sub = parse_expr(&json!({"$subtract": ["$published_year", 5]})).unwrap();
        assert_eq!(sub.eval(&d).unwrap(), json!(1960));
    }

    #[test]
    fn test_divide_by_zero_is_error() {
        let d = doc(json!({"pages": 412, "chapters": 0}));
        let expr = parse_expr(&json!({"$divide": ["$pages", "$chapters"]})).unwrap();

        let err = expr.eval(&d).unwrap_err();
        assert_eq!(err.code().code(), "SHELF_EVAL_DIVIDE_BY_ZERO");
    }

    #[test]
    fn test_arithmetic_on_non_number_is_error() {
        let d = doc(json!({"title": "Dune"}));
        let expr = parse_expr(&json!({"$add": ["$title", 1]})).unwrap();

        let err = expr.eval(&d).unwrap_err();
        assert_eq!(err.code().code(), "SHELF_EVAL_TYPE_MISMATCH");
    }

    #[test]
    fn test_arithmetic_on_absent_field_is_error() {
        let d = doc(json!({}));
        let expr = parse_expr(&json!({"$add": ["$missing", 1]})).unwrap();
        assert!(expr.eval(&d).is_err());
    }

    #[test]
    fn test_round_half_away_from_zero() {
        let d = doc(json!({}));

        let cases = [
            (json!({"$round": [2.5, 0]}), json!(3)),
            (json!({"$round": [-2.5, 0]}), json!(-3)),
            (json!({"$round": [13.906, 2]}), json!(13.91)),
            (json!({"$round": [12.344, 2]}), json!(12.34)),
        ];
        for (input, expected) in cases {
            let expr = parse_expr(&input).unwrap();
            assert_eq!(expr.eval(&d).unwrap(), expected, "case {}", input);
        }
    }

    #[test]
    fn test_round_default_digits() {
        let d = doc(json!({}));
        let expr = parse_expr(&json!({"$round": [13.6]})).unwrap();
        assert_eq!(expr.eval(&d).unwrap(), json!(14));
    }

    #[test]
    fn test_concat_and_to_string() {
        let d = doc(json!({"decade": 1960}));
        let expr =
            parse_expr(&json!({"$concat": [{"$toString": "$decade"}, "s"]})).unwrap();
        assert_eq!(expr.eval(&d).unwrap(), json!("1960s"));
    }

    #[test]
    fn test_concat_rejects_non_strings() {
        let d = doc(json!({}));
        let expr = parse_expr(&json!({"$concat": ["a", 1]})).unwrap();
        let err = expr.eval(&d).unwrap_err();
        assert_eq!(err.code().code(), "SHELF_EVAL_TYPE_MISMATCH");
    }

    #[test]
    fn test_object_expression() {
        let d = doc(json!({"title": "Dune", "published_year": 1965}));
        let expr =
            parse_expr(&json!({"title": "$title", "year": "$published_year"})).unwrap();
        assert_eq!(
            expr.eval(&d).unwrap(),
            json!({"title": "Dune", "year": 1965})
        );
    }

    #[test]
    fn test_unknown_expression_operator_rejected() {
        let err = parse_expr(&json!({"$sqrt": "$pages"})).unwrap_err();
        assert_eq!(err.code().code(), "SHELF_QUERY_INVALID_OPERATOR");
        assert_eq!(err.key(), Some("$sqrt"));
    }

    #[test]
    fn test_malformed_binary_shape_rejected() {
        assert!(parse_expr(&json!({"$divide": ["$a"]})).is_err());
        assert!(parse_expr(&json!({"$divide": "$a"})).is_err());
    }
}
