//! Conversions between opaque JSON records and engine values.
//!
//! Snapshot rows are `serde_json::Map`s. The libSQL engine needs them as
//! positional `libsql::Value`s, and its results converted back. Column and
//! table names come from untrusted snapshot keys, so every identifier is
//! quoted.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Number, Value};

/// Quote an SQL identifier, doubling embedded quotes.
///
/// Valid for both SQLite and PostgreSQL.
#[must_use]
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Convert a libSQL column value into JSON.
///
/// BLOBs become base64 text; non-finite REALs become `null`.
#[must_use]
pub fn libsql_to_json(value: libsql::Value) -> Value {
    match value {
        libsql::Value::Null => Value::Null,
        libsql::Value::Integer(i) => Value::Number(i.into()),
        libsql::Value::Real(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
        libsql::Value::Text(s) => Value::String(s),
        libsql::Value::Blob(bytes) => Value::String(BASE64.encode(bytes)),
    }
}

/// Convert a JSON field into a libSQL bind value.
///
/// Booleans are stored as 0/1. Nested arrays and objects are stored as JSON text.
#[must_use]
pub fn json_to_libsql(value: &Value) -> libsql::Value {
    match value {
        Value::Null => libsql::Value::Null,
        Value::Bool(b) => libsql::Value::Integer(i64::from(*b)),
        Value::Number(n) => n.as_i64().map_or_else(
            || libsql::Value::Real(n.as_f64().unwrap_or_default()),
            libsql::Value::Integer,
        ),
        Value::String(s) => libsql::Value::Text(s.clone()),
        Value::Array(_) | Value::Object(_) => libsql::Value::Text(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case::plain("Account", "\"Account\"")]
    #[case::camel_case("passwordHash", "\"passwordHash\"")]
    #[case::reserved_word("order", "\"order\"")]
    #[case::embedded_quote("we\"ird", "\"we\"\"ird\"")]
    fn quote_ident_wraps_and_escapes(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(quote_ident(name), expected);
    }

    #[test]
    fn libsql_values_map_to_json() {
        assert_eq!(libsql_to_json(libsql::Value::Null), Value::Null);
        assert_eq!(libsql_to_json(libsql::Value::Integer(7)), json!(7));
        assert_eq!(libsql_to_json(libsql::Value::Real(0.5)), json!(0.5));
        assert_eq!(libsql_to_json(libsql::Value::Real(f64::NAN)), Value::Null);
        assert_eq!(
            libsql_to_json(libsql::Value::Text("hi".into())),
            json!("hi")
        );
        assert_eq!(
            libsql_to_json(libsql::Value::Blob(vec![1, 2, 3])),
            json!("AQID")
        );
    }

    #[test]
    fn json_values_map_to_libsql() {
        assert!(matches!(json_to_libsql(&json!(null)), libsql::Value::Null));
        assert!(matches!(json_to_libsql(&json!(true)), libsql::Value::Integer(1)));
        assert!(matches!(json_to_libsql(&json!(42)), libsql::Value::Integer(42)));
        assert!(
            matches!(json_to_libsql(&json!(2.5)), libsql::Value::Real(f) if (f - 2.5).abs() < f64::EPSILON)
        );
        assert!(
            matches!(json_to_libsql(&json!({"a": [1]})), libsql::Value::Text(s) if s == r#"{"a":[1]}"#)
        );
    }
}
