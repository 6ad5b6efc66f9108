//! Type-directed coercion between text literals and JSON-ready values.
//!
//! The remote side only reports type *names*. Scalars are recognised by name and
//! checked lexically; any other name is treated as a composite whose literal is
//! JSON text.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use thiserror::Error;

/// Output format for materialized dates.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Fundamental scalar kinds understood locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    String,
    Decimal,
    Integer,
    Boolean,
    Date,
}

impl ScalarKind {
    /// Classify a remote type name. Returns `None` for composite types.
    #[must_use]
    pub fn from_type_name(type_name: &str) -> Option<Self> {
        match type_name {
            "java.lang.String" | "string" | "String" | "char" | "java.lang.Character" => {
                Some(Self::String)
            }
            "java.math.BigDecimal" | "java.lang.Double" | "java.lang.Float" | "double"
            | "float" | "decimal" => Some(Self::Decimal),
            "java.lang.Integer" | "java.lang.Long" | "java.lang.Short" | "java.lang.Byte"
            | "java.math.BigInteger" | "int" | "long" | "short" | "byte" | "integer" => {
                Some(Self::Integer)
            }
            "java.lang.Boolean" | "boolean" | "bool" => Some(Self::Boolean),
            "java.util.Date" | "java.sql.Date" | "java.sql.Timestamp" | "java.time.LocalDate"
            | "java.time.LocalDateTime" | "date" => Some(Self::Date),
            _ => None,
        }
    }

    /// Check `literal` against this kind's grammar and return its canonical text.
    fn canonical(self, literal: &str) -> Result<String, &'static str> {
        match self {
            Self::String => Ok(literal.to_owned()),
            Self::Decimal => {
                if !is_decimal_text(literal) {
                    return Err("not a decimal number");
                }
                Decimal::from_str(literal)
                    .or_else(|_| Decimal::from_scientific(literal))
                    .map(|d| d.to_string())
                    .map_err(|_| "not a decimal number")
            }
            Self::Integer => {
                if literal.is_empty() || !literal.bytes().all(|b| b.is_ascii_digit()) {
                    return Err("not a digit-only integer");
                }
                let digits = literal.trim_start_matches('0');
                Ok(if digits.is_empty() { "0" } else { digits }.to_owned())
            }
            Self::Boolean => match literal.to_ascii_lowercase().as_str() {
                "true" => Ok("true".to_owned()),
                "false" => Ok("false".to_owned()),
                _ => Err("expected true or false"),
            },
            Self::Date => NaiveDateTime::parse_from_str(literal, DATE_TIME_FORMAT)
                .or_else(|_| {
                    NaiveDate::parse_from_str(literal, DATE_FORMAT)
                        .map(|d| d.and_time(chrono::NaiveTime::MIN))
                })
                .map(|dt| dt.format(DATE_TIME_FORMAT).to_string())
                .map_err(|_| "expected YYYY-MM-DD or YYYY-MM-DD HH:MM:SS"),
        }
    }
}

fn is_decimal_text(literal: &str) -> bool {
    !literal.is_empty()
        && literal
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E'))
}

/// Range of a fixed-width integer type, checked only when materializing.
fn integer_fits(type_name: &str, digits: &str) -> bool {
    match type_name {
        "java.lang.Byte" | "byte" => digits.parse::<i8>().is_ok(),
        "java.lang.Short" | "short" => digits.parse::<i16>().is_ok(),
        "java.lang.Integer" | "int" => digits.parse::<i32>().is_ok(),
        "java.lang.Long" | "long" => digits.parse::<i64>().is_ok(),
        _ => true,
    }
}

/// Returns true if `type_name` is a fundamental scalar.
#[must_use]
pub fn is_scalar(type_name: &str) -> bool {
    ScalarKind::from_type_name(type_name).is_some()
}

/// Coercion error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    #[error("value [{literal}] is not of type [{type_name}]: {reason}")]
    TypeMismatch {
        literal: String,
        type_name: String,
        reason: String,
    },
}

impl CoercionError {
    fn mismatch(literal: &str, type_name: &str, reason: impl Into<String>) -> Self {
        Self::TypeMismatch {
            literal: literal.to_owned(),
            type_name: type_name.to_owned(),
            reason: reason.into(),
        }
    }
}

/// Tagged value model replacing runtime reflection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Null,
    Scalar { kind: ScalarKind, literal: String },
    Object(IndexMap<String, Value>),
    Sequence(Vec<Value>),
}

impl Value {
    /// Convert a generic JSON value. Numbers become decimals.
    #[must_use]
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Scalar {
                kind: ScalarKind::Boolean,
                literal: b.to_string(),
            },
            serde_json::Value::Number(n) => Self::Scalar {
                kind: ScalarKind::Decimal,
                literal: n.to_string(),
            },
            serde_json::Value::String(s) => Self::Scalar {
                kind: ScalarKind::String,
                literal: s,
            },
            serde_json::Value::Array(items) => {
                Self::Sequence(items.into_iter().map(Self::from_json).collect())
            }
            serde_json::Value::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Self::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Render as a JSON value for embedding into a larger document.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Scalar { kind, literal } => match kind {
                ScalarKind::Decimal | ScalarKind::Integer => literal
                    .parse::<serde_json::Number>()
                    .map_or_else(
                        |_| serde_json::Value::String(literal.clone()),
                        serde_json::Value::Number,
                    ),
                ScalarKind::Boolean => serde_json::Value::Bool(literal == "true"),
                ScalarKind::String | ScalarKind::Date => {
                    serde_json::Value::String(literal.clone())
                }
            },
            Self::Object(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Self::Sequence(items) => {
                serde_json::Value::Array(items.iter().map(Self::to_json).collect())
            }
        }
    }

    /// Text form suitable for a container value or transport argument.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Scalar { literal, .. } => literal.clone(),
            other => other.to_json().to_string(),
        }
    }
}

/// A materialized value with its declared remote type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedValue {
    pub type_name: String,
    pub value: Value,
}

/// Result of [`parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedValue {
    /// Validated literal kept as text for use as a transport argument.
    Literal(String),
    /// Value converted for embedding into a JSON structure.
    Typed(TypedValue),
}

impl ParsedValue {
    /// Text form, whichever variant this is.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::Literal(text) => text,
            Self::Typed(typed) => typed.value.to_text(),
        }
    }
}

/// Validate `literal` against `type_name`, converting it when `materialize` is set.
///
/// # Errors
/// Returns `TypeMismatch` when a scalar literal does not match its grammar, or when
/// a composite literal being materialized is not a JSON object or array.
pub fn parse(literal: &str, type_name: &str, materialize: bool) -> Result<ParsedValue, CoercionError> {
    if let Some(kind) = ScalarKind::from_type_name(type_name) {
        let canonical = kind
            .canonical(literal)
            .map_err(|reason| CoercionError::mismatch(literal, type_name, reason))?;
        if !materialize {
            return Ok(ParsedValue::Literal(literal.to_owned()));
        }
        if kind == ScalarKind::Integer && !integer_fits(type_name, &canonical) {
            return Err(CoercionError::mismatch(literal, type_name, "integer out of range"));
        }
        return Ok(ParsedValue::Typed(TypedValue {
            type_name: type_name.to_owned(),
            value: Value::Scalar {
                kind,
                literal: canonical,
            },
        }));
    }

    if !materialize {
        return Ok(ParsedValue::Literal(literal.to_owned()));
    }

    let json: serde_json::Value = serde_json::from_str(literal)
        .map_err(|e| CoercionError::mismatch(literal, type_name, e.to_string()))?;
    let value = match json {
        serde_json::Value::Array(items) if all_bare_integers(&items) => Value::Sequence(
            items
                .into_iter()
                .map(|n| Value::Scalar {
                    kind: ScalarKind::Integer,
                    literal: n.to_string(),
                })
                .collect(),
        ),
        json @ (serde_json::Value::Array(_)
        | serde_json::Value::Object(_)
        | serde_json::Value::Null) => Value::from_json(json),
        _ => {
            return Err(CoercionError::mismatch(
                literal,
                type_name,
                "expected a JSON object or array",
            ));
        }
    };
    Ok(ParsedValue::Typed(TypedValue {
        type_name: type_name.to_owned(),
        value,
    }))
}

fn all_bare_integers(items: &[serde_json::Value]) -> bool {
    !items.is_empty()
        && items
            .iter()
            .all(|item| item.as_number().is_some_and(serde_json::Number::is_u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCALARS: [&str; 5] = [
        "java.lang.String",
        "java.math.BigDecimal",
        "java.lang.Integer",
        "java.lang.Boolean",
        "java.util.Date",
    ];

    fn typed(parsed: ParsedValue) -> Value {
        match parsed {
            ParsedValue::Typed(t) => t.value,
            ParsedValue::Literal(l) => panic!("expected typed value, got literal {l}"),
        }
    }

    #[test]
    fn test_scalar_classification() {
        for name in SCALARS {
            assert!(is_scalar(name), "{name}");
        }
        assert!(!is_scalar("com.example.User"));
        assert_eq!(
            ScalarKind::from_type_name("java.lang.Long"),
            Some(ScalarKind::Integer)
        );
    }

    #[test]
    fn test_integer_rejects_non_digits() {
        for literal in ["x", "", "-1", "1.5", " 1", "1e3"] {
            for materialize in [false, true] {
                let err = parse(literal, "java.lang.Integer", materialize).unwrap_err();
                assert!(matches!(err, CoercionError::TypeMismatch { .. }), "{literal}");
            }
        }
    }

    #[test]
    fn test_decimal_boolean_date_mismatch() {
        assert!(parse("abc", "java.math.BigDecimal", false).is_err());
        assert!(parse("yes", "java.lang.Boolean", true).is_err());
        assert!(parse("2024-13-01", "java.util.Date", false).is_err());
        assert!(parse("01/02/2024", "java.util.Date", true).is_err());
    }

    #[test]
    fn test_deferred_keeps_literal() {
        assert_eq!(
            parse("042", "java.lang.Integer", false).unwrap(),
            ParsedValue::Literal("042".to_owned())
        );
        assert_eq!(
            parse("TRUE", "java.lang.Boolean", false).unwrap(),
            ParsedValue::Literal("TRUE".to_owned())
        );
        assert_eq!(
            parse("{not json", "com.example.User", false).unwrap(),
            ParsedValue::Literal("{not json".to_owned())
        );
    }

    #[test]
    fn test_materialize_scalars() {
        assert_eq!(
            typed(parse("042", "java.lang.Long", true).unwrap()).to_json(),
            serde_json::json!(42)
        );
        assert_eq!(
            typed(parse("12.50", "java.math.BigDecimal", true).unwrap())
                .to_json()
                .to_string(),
            "12.50"
        );
        assert_eq!(
            typed(parse("True", "java.lang.Boolean", true).unwrap()).to_json(),
            serde_json::json!(true)
        );
        assert_eq!(
            typed(parse("2024-02-29", "java.util.Date", true).unwrap()).to_json(),
            serde_json::json!("2024-02-29 00:00:00")
        );
        assert_eq!(
            typed(parse("2024-02-29 13:05:09", "java.util.Date", true).unwrap()).to_json(),
            serde_json::json!("2024-02-29 13:05:09")
        );
    }

    #[test]
    fn test_materialize_object_keeps_field_order() {
        let value = typed(parse(r#"{"b":1,"a":"x"}"#, "com.example.User", true).unwrap());
        let Value::Object(fields) = &value else {
            panic!("expected object");
        };
        assert_eq!(fields.keys().collect::<Vec<_>>(), ["b", "a"]);
        assert_eq!(value.to_text(), r#"{"b":1,"a":"x"}"#);
    }

    #[test]
    fn test_materialize_array_element_kinds() {
        let ints = typed(parse("[1, 2, 3]", "java.util.List", true).unwrap());
        assert_eq!(
            ints,
            Value::Sequence(
                ["1", "2", "3"]
                    .into_iter()
                    .map(|l| Value::Scalar {
                        kind: ScalarKind::Integer,
                        literal: l.to_owned()
                    })
                    .collect()
            )
        );

        let mixed = typed(parse(r#"[1, "2"]"#, "java.util.List", true).unwrap());
        let Value::Sequence(items) = mixed else {
            panic!("expected sequence");
        };
        assert!(matches!(
            &items[1],
            Value::Scalar {
                kind: ScalarKind::String,
                ..
            }
        ));
    }

    #[test]
    fn test_materialize_composite_rejects_bad_json() {
        assert!(parse("{oops", "com.example.User", true).is_err());
        assert!(parse("\"text\"", "com.example.User", true).is_err());
    }

    #[test]
    fn test_scalar_text_round_trip() {
        let cases = [
            ("java.lang.String", "hello world"),
            ("java.math.BigDecimal", "3.14"),
            ("java.lang.Integer", "7"),
            ("java.lang.Boolean", "false"),
            ("java.util.Date", "2023-01-31 08:00:00"),
        ];
        for (type_name, literal) in cases {
            let text = parse(literal, type_name, true).unwrap().into_text();
            let again = parse(&text, type_name, true).unwrap().into_text();
            assert_eq!(text, again, "{type_name}");
            assert_eq!(text, literal, "{type_name}");
        }
    }

    #[test]
    fn test_deferred_integer_is_lexical_only() {
        let big = "99999999999999999999";
        assert_eq!(
            parse(big, "java.math.BigInteger", false).unwrap(),
            ParsedValue::Literal(big.to_owned())
        );
        assert_eq!(
            parse(big, "java.lang.Long", false).unwrap(),
            ParsedValue::Literal(big.to_owned())
        );
        assert_eq!(
            typed(parse(big, "java.math.BigInteger", true).unwrap()).to_text(),
            big
        );
        assert!(parse(big, "java.lang.Long", true).is_err());
        assert!(parse("128", "java.lang.Byte", true).is_err());
        assert!(parse("0", "java.lang.Integer", true).is_ok());
    }

    #[test]
    fn test_decimal_rejects_underscores() {
        for materialize in [false, true] {
            assert!(parse("1_000", "java.math.BigDecimal", materialize).is_err());
            assert!(parse("1,5", "java.lang.Double", materialize).is_err());
        }
        assert!(parse("-1.5e3", "java.lang.Double", false).is_ok());
    }

    #[test]
    fn test_embedded_decimal_keeps_precision() {
        let amount = "12345678901234567.89";
        let value = typed(parse(amount, "java.math.BigDecimal", true).unwrap());
        assert_eq!(value.to_json().to_string(), amount);

        let order = typed(
            parse(r#"{"amount":12345678901234567.89,"id":99999999999999999999}"#, "com.example.Order", true)
                .unwrap(),
        );
        assert_eq!(
            order.to_text(),
            r#"{"amount":12345678901234567.89,"id":99999999999999999999}"#
        );
    }
}
