use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?[0-9]+$").expect("valid integer pattern"));
static FLOAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?([0-9]*\.)?[0-9]+$").expect("valid float pattern"));
static BOOLEAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(true|false)$").expect("valid boolean pattern"));

/// A cell value with its inferred type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    String(String),
}

impl Value {
    /// Infers the type of a raw cell.
    ///
    /// Patterns are tried in order: integer, float, boolean. The first match
    /// wins; anything else stays a string. Digits too large for `i64` are a
    /// float, so large float values read back as numbers.
    pub fn infer(raw: &str) -> Value {
        if INTEGER.is_match(raw) {
            if let Ok(n) = raw.parse::<i64>() {
                return Value::Integer(n);
            }
            if let Ok(x) = raw.parse::<f64>() {
                return Value::Float(x);
            }
        } else if FLOAT.is_match(raw) {
            if let Ok(x) = raw.parse::<f64>() {
                return Value::Float(x);
            }
        } else if BOOLEAN.is_match(raw) {
            return Value::Boolean(raw == "true");
        }
        Value::String(raw.to_string())
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(n) => Some(*n as f64),
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Boolean(_) => "boolean",
            Value::String(_) => "string",
        }
    }
}

/// Canonical text: base-10 integers, shortest round-trip floats,
/// `true`/`false`, strings unchanged.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => n.fmt(f),
            Value::Float(x) => x.fmt(f),
            Value::Boolean(b) => b.fmt(f),
            Value::String(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

/// One schema-less record: a value per column.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Row(Vec<Value>);

impl Row {
    pub fn new(values: Vec<Value>) -> Self {
        Row(values)
    }

    /// Infers a value for every field of an already-split record.
    pub fn from_raw(fields: &[String]) -> Self {
        fields.iter().map(|field| Value::infer(field)).collect()
    }

    /// Renders every value as canonical text.
    pub fn to_raw(&self) -> Vec<String> {
        self.0.iter().map(Value::to_string).collect()
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    pub fn into_values(self) -> Vec<Value> {
        self.0
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Row(values)
    }
}

impl FromIterator<Value> for Row {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Row(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence() {
        assert_eq!(Value::infer("123"), Value::Integer(123));
        assert_eq!(Value::infer("-7"), Value::Integer(-7));
        assert_eq!(Value::infer("+7"), Value::Integer(7));
        assert_eq!(Value::infer("123.0"), Value::Float(123.0));
        assert_eq!(Value::infer(".5"), Value::Float(0.5));
        assert_eq!(Value::infer("-1.25"), Value::Float(-1.25));
        assert_eq!(Value::infer("true"), Value::Boolean(true));
        assert_eq!(Value::infer("false"), Value::Boolean(false));
    }

    #[test]
    fn everything_else_is_a_string() {
        for raw in ["True", "1.", "1e5", " 1", "", "abc", "1,2", "d\ne", "0x1F"] {
            assert_eq!(Value::infer(raw), Value::String(raw.to_string()), "{raw:?}");
        }
    }

    #[test]
    fn integer_overflow_becomes_a_float() {
        assert_eq!(Value::infer("99999999999999999999"), Value::Float(1e20));
        assert_eq!(Value::infer("-10000000000000000000"), Value::Float(-1e19));
        assert_eq!(Value::infer("9223372036854775807"), Value::Integer(i64::MAX));
    }

    #[test]
    fn canonical_text() {
        assert_eq!(Value::Integer(-42).to_string(), "-42");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::Float(3.0).to_string(), "3");
        assert_eq!(Value::Float(0.1).to_string(), "0.1");
        assert_eq!(Value::Boolean(false).to_string(), "false");
        assert_eq!(Value::from("a,b").to_string(), "a,b");
    }

    #[test]
    fn raw_conversion() {
        let raw = vec!["1".to_string(), "x".to_string(), "0.50".to_string()];
        let row = Row::from_raw(&raw);
        assert_eq!(
            row.values(),
            &[Value::Integer(1), Value::from("x"), Value::Float(0.5)]
        );
        assert_eq!(row.to_raw(), vec!["1", "x", "0.5"]);
    }

    #[test]
    fn serializes_untagged() {
        let row: Row = vec![Value::from(1i64), Value::from(true), Value::from("s")].into();
        assert_eq!(serde_json::to_string(&row).unwrap(), r#"[1,true,"s"]"#);
    }
}
