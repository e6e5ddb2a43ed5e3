use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Data types a row value can carry
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Boolean = 1,
    Int64 = 2,
    Float64 = 3,
    Varchar = 4,
}

/// Values produced by rows, literals and evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Boolean(bool),
    Int64(i64),
    Float64(f64),
    String(String),
}

impl Value {
    /// Get the data type of this value
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Null => None,
            Value::Boolean(_) => Some(DataType::Boolean),
            Value::Int64(_) => Some(DataType::Int64),
            Value::Float64(_) => Some(DataType::Float64),
            Value::String(_) => Some(DataType::Varchar),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// SQL truthiness: NULL is unknown, numbers are true when non-zero.
    pub fn truthy(&self) -> Option<bool> {
        match self {
            Value::Null => None,
            Value::Boolean(b) => Some(*b),
            Value::Int64(n) => Some(*n != 0),
            Value::Float64(f) => Some(*f != 0.0),
            Value::String(s) => Some(leading_number(s) != 0.0),
        }
    }

    /// Numeric view of the value, following MySQL's lenient string coercion
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Null => None,
            Value::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Int64(n) => Some(*n as f64),
            Value::Float64(f) => Some(*f),
            Value::String(s) => Some(leading_number(s)),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(n) => Some(*n),
            Value::Boolean(b) => Some(*b as i64),
            other => other.as_f64().map(|f| f as i64),
        }
    }

    /// Compare two non-NULL values. Returns `None` when either side is NULL.
    pub fn sql_cmp(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Null, _) | (_, Value::Null) => None,
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Int64(a), Value::Int64(b)) => Some(a.cmp(b)),
            (Value::Boolean(a), Value::Boolean(b)) => Some(a.cmp(b)),
            (a, b) => {
                let (a, b) = (a.as_f64()?, b.as_f64()?);
                a.partial_cmp(&b)
            }
        }
    }
}

/// Parses the numeric prefix of a string the way MySQL does ("12abc" is 12).
fn leading_number(s: &str) -> f64 {
    let s = s.trim_start();
    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in s.char_indices() {
        match c {
            '0'..='9' => end = i + 1,
            '-' | '+' if i == 0 => {}
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
    }
    s[..end].parse().unwrap_or(0.0)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Int64(n) => write!(f, "{}", n),
            Value::Float64(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type() {
        assert_eq!(Value::Null.data_type(), None);
        assert_eq!(Value::Boolean(true).data_type(), Some(DataType::Boolean));
        assert_eq!(Value::Int64(42).data_type(), Some(DataType::Int64));
        assert_eq!(Value::Float64(1.5).data_type(), Some(DataType::Float64));
        assert_eq!(
            Value::String("hello".to_string()).data_type(),
            Some(DataType::Varchar)
        );
    }

    #[test]
    fn test_truthiness() {
        assert_eq!(Value::Null.truthy(), None);
        assert_eq!(Value::Int64(0).truthy(), Some(false));
        assert_eq!(Value::Int64(-3).truthy(), Some(true));
        assert_eq!(Value::String("1".to_string()).truthy(), Some(true));
        assert_eq!(Value::String("abc".to_string()).truthy(), Some(false));
    }

    #[test]
    fn test_sql_cmp() {
        assert_eq!(Value::Int64(5).sql_cmp(&Value::Int64(5)), Some(Ordering::Equal));
        assert_eq!(Value::Int64(5).sql_cmp(&Value::Float64(6.5)), Some(Ordering::Less));
        assert_eq!(
            Value::String("12abc".to_string()).sql_cmp(&Value::Int64(12)),
            Some(Ordering::Equal)
        );
        assert_eq!(Value::Null.sql_cmp(&Value::Int64(1)), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Int64(-7).to_string(), "-7");
        assert_eq!(Value::String("it's".to_string()).to_string(), "'it''s'");
    }
}
