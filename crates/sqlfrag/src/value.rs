//! Literal values carried by condition templates.
//!
//! [`Value`] is the closed set of value kinds the sanitizer knows how to
//! render. Builders never see raw Rust values; everything is normalized to a
//! `Value` at the call site via the `From` conversions below.

/// A literal value substituted into a condition template.
///
/// `List` exists for `IN (...)` / `NOT IN (...)` predicates and may not nest.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL.
    Null,
    /// Boolean, rendered as `TRUE` / `FALSE`.
    Bool(bool),
    /// Integer, rendered unquoted.
    Int(i64),
    /// Floating point, rendered unquoted.
    Float(f64),
    /// String, quoted and escaped by the dialect adapter.
    Text(String),
    /// Sequence, rendered as a parenthesized comma-separated list.
    List(Vec<Value>),
}

impl Value {
    /// Short kind name, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::List(_) => "list",
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i16> for Value {
    fn from(v: i16) -> Self {
        Value::Int(v.into())
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v.into())
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v.into())
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(feature = "json")]
impl TryFrom<serde_json::Value> for Value {
    type Error = crate::sanitize::SanitizeError;

    /// Convert decoded JSON into a [`Value`].
    ///
    /// Objects are rejected: there is no literal form for them.
    fn try_from(v: serde_json::Value) -> Result<Self, Self::Error> {
        use crate::sanitize::SanitizeError;

        match v {
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::Bool(b) => Ok(Value::Bool(b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Int(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(Value::Float(f))
                } else {
                    Err(SanitizeError::UnsupportedValue(format!(
                        "json number out of range: {n}"
                    )))
                }
            }
            serde_json::Value::String(s) => Ok(Value::Text(s)),
            serde_json::Value::Array(items) => {
                let values = items
                    .into_iter()
                    .map(Value::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Value::List(values))
            }
            serde_json::Value::Object(_) => Err(SanitizeError::UnsupportedValue(
                "json object has no literal form".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_primitives() {
        assert_eq!(Value::from(20i32), Value::Int(20));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from("abc"), Value::Text("abc".to_string()));
        assert_eq!(Value::from(1.5f64), Value::Float(1.5));
    }

    #[test]
    fn from_option() {
        assert_eq!(Value::from(Some(1i64)), Value::Int(1));
        assert_eq!(Value::from(None::<i64>), Value::Null);
    }

    #[test]
    fn from_vec() {
        assert_eq!(
            Value::from(vec!["a", "b"]),
            Value::List(vec![Value::Text("a".into()), Value::Text("b".into())])
        );
    }

    #[cfg(feature = "json")]
    #[test]
    fn from_json() {
        let v: Value = serde_json::json!([1, "x", null]).try_into().unwrap();
        assert_eq!(
            v,
            Value::List(vec![Value::Int(1), Value::Text("x".into()), Value::Null])
        );
        assert!(Value::try_from(serde_json::json!({"a": 1})).is_err());
    }
}
