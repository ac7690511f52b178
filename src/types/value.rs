use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

use super::error::ArgError;

/// Argument value passed to predicates and actions.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// A boolean value.
    Bool(bool),
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit floating-point number.
    Float(f64),
    /// A UTF-8 string.
    String(String),
    /// An ordered sequence of values.
    List(Vec<Value>),
}

impl Value {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "\"{v}\""),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Keyword arguments of a predicate or action call, keyed by name.
///
/// Kept ordered so compiled trees compare and print deterministically.
/// A `null` value deserializes as an absent argument.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "BTreeMap<String, Option<Value>>")]
pub struct Args(BTreeMap<String, Value>);

impl From<BTreeMap<String, Option<Value>>> for Args {
    fn from(map: BTreeMap<String, Option<Value>>) -> Self {
        Self(
            map.into_iter()
                .filter_map(|(name, value)| Some((name, value?)))
                .collect(),
        )
    }
}

impl Args {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an argument, replacing any previous value under the same name.
    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<Value>) {
        self.0.insert(name.to_owned(), value.into());
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// An optional string argument. Present but non-string is an error.
    ///
    /// # Errors
    ///
    /// Returns [`ArgError::WrongType`] if the argument is not a string.
    pub fn opt_str(&self, name: &str) -> Result<Option<&str>, ArgError> {
        match self.0.get(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(_) => Err(ArgError::WrongType {
                name: name.to_owned(),
                expected: "a string",
            }),
        }
    }

    /// A required string argument.
    ///
    /// # Errors
    ///
    /// Returns [`ArgError::Missing`] if absent, [`ArgError::WrongType`] if not a string.
    pub fn require_str(&self, name: &str) -> Result<&str, ArgError> {
        self.opt_str(name)?.ok_or_else(|| ArgError::Missing {
            name: name.to_owned(),
        })
    }

    /// An optional list-of-strings argument.
    ///
    /// # Errors
    ///
    /// Returns [`ArgError::WrongType`] if the argument is not a list of strings.
    pub fn opt_str_list(&self, name: &str) -> Result<Option<Vec<&str>>, ArgError> {
        let Some(value) = self.0.get(name) else {
            return Ok(None);
        };
        let wrong = || ArgError::WrongType {
            name: name.to_owned(),
            expected: "a list of strings",
        };
        let items = value.as_list().ok_or_else(wrong)?;
        items
            .iter()
            .map(|item| item.as_str().ok_or_else(wrong))
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }
}

impl fmt::Display for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Args {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
