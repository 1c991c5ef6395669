//! # Attributes
//!
//! A string-keyed store of dynamically typed values with coercing typed reads.
//!
//! Values are held as [`serde_json::Value`] so anything deserialized from an
//! application file, or produced by `serde_json::json!`, can be stored as-is.
//! Reads go through [`FromAttribute`], which applies a small set of lenient
//! conversions:
//!
//! | Target | Accepted values |
//! |---|---|
//! | `String` | any value; strings verbatim, other values in their JSON form |
//! | integers | integers within range, numeric strings |
//! | `f32` / `f64` | numbers, numeric strings |
//! | `bool` | booleans, `"true"`/`"false"`/`"1"`/`"0"`..., integers (`0` is false) |
//!
//! ```rust
//! use globrouter::attributes::Attributes;
//!
//! let mut attrs = Attributes::new();
//! attrs.put("port", "8080");
//! attrs.put("debug", 1);
//!
//! assert_eq!(attrs.get_as::<u16>("port").unwrap(), 8080);
//! assert!(attrs.get_as::<bool>("debug").unwrap());
//! assert_eq!(attrs.get_or::<i32>("missing", -1), -1);
//! ```

use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Why a typed attribute read failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttributeError {
    #[error("attribute {0:?} not found")]
    Missing(String),

    #[error("unable to parse the {target} with key: {key}")]
    Unconvertible { key: String, target: &'static str },
}

/// Types that can be read out of an attribute value.
pub trait FromAttribute: Sized {
    /// Name used in error messages.
    const TARGET: &'static str;

    fn from_attribute(value: &Value) -> Option<Self>;
}

impl FromAttribute for String {
    const TARGET: &'static str = "string";

    fn from_attribute(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

impl FromAttribute for bool {
    const TARGET: &'static str = "bool";

    fn from_attribute(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::String(s) => parse_bool(s),
            Value::Number(n) => n.as_i64().map(|i| i != 0).or_else(|| n.as_u64().map(|u| u != 0)),
            _ => None,
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

macro_rules! impl_from_attribute_int {
    ($($ty:ty => $name:literal),* $(,)?) => {$(
        impl FromAttribute for $ty {
            const TARGET: &'static str = $name;

            fn from_attribute(value: &Value) -> Option<Self> {
                match value {
                    Value::String(s) => s.trim().parse::<$ty>().ok(),
                    Value::Number(n) => {
                        if let Some(i) = n.as_i64() {
                            <$ty>::try_from(i).ok()
                        } else {
                            n.as_u64().and_then(|u| <$ty>::try_from(u).ok())
                        }
                    }
                    _ => None,
                }
            }
        }
    )*};
}

impl_from_attribute_int!(
    i8 => "int8",
    i16 => "int16",
    i32 => "int32",
    i64 => "int64",
    isize => "int",
    u8 => "uint8",
    u16 => "uint16",
    u32 => "uint32",
    u64 => "uint64",
    usize => "uint",
);

impl FromAttribute for f64 {
    const TARGET: &'static str = "float64";

    fn from_attribute(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => s.trim().parse::<f64>().ok(),
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }
}

impl FromAttribute for f32 {
    const TARGET: &'static str = "float32";

    fn from_attribute(value: &Value) -> Option<Self> {
        let wide = f64::from_attribute(value)?;
        if wide.is_finite() && wide.abs() > f64::from(f32::MAX) {
            return None;
        }
        Some(wide as f32)
    }
}

/// String-keyed dynamic attribute storage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    entries: HashMap<String, Value>,
}

impl Attributes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `key`.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Raw value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Typed read with coercion.
    ///
    /// # Errors
    ///
    /// [`AttributeError::Missing`] if the key is absent or null,
    /// [`AttributeError::Unconvertible`] if the value cannot become a `T`.
    pub fn get_as<T: FromAttribute>(&self, key: &str) -> Result<T, AttributeError> {
        let value = match self.entries.get(key) {
            None | Some(Value::Null) => return Err(AttributeError::Missing(key.to_owned())),
            Some(v) => v,
        };
        T::from_attribute(value).ok_or_else(|| AttributeError::Unconvertible {
            key: key.to_owned(),
            target: T::TARGET,
        })
    }

    /// Typed read falling back to `default` on any failure.
    #[must_use]
    pub fn get_or<T: FromAttribute>(&self, key: &str, default: T) -> T {
        self.get_as(key).unwrap_or(default)
    }

    /// String read with surrounding whitespace removed; empty when absent.
    #[must_use]
    pub fn get_string_trim(&self, key: &str) -> String {
        self.get_or(key, String::new()).trim().to_owned()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_put_overwrites() {
        let mut attrs = Attributes::new();
        attrs.put("a", 1);
        attrs.put("a", "two");
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs.get("a"), Some(&json!("two")));
    }

    #[test]
    fn test_integer_range_checks() {
        let mut attrs = Attributes::new();
        attrs.put("big", 300);
        attrs.put("neg", -1);
        assert_eq!(attrs.get_as::<u16>("big"), Ok(300));
        assert_eq!(
            attrs.get_as::<u8>("big"),
            Err(AttributeError::Unconvertible {
                key: "big".to_string(),
                target: "uint8"
            })
        );
        assert!(attrs.get_as::<u32>("neg").is_err());
        assert_eq!(attrs.get_as::<i8>("neg"), Ok(-1));
    }

    #[test]
    fn test_missing_and_null_are_missing() {
        let mut attrs = Attributes::new();
        attrs.put("nothing", Value::Null);
        assert_eq!(
            attrs.get_as::<String>("nothing"),
            Err(AttributeError::Missing("nothing".to_string()))
        );
        assert!(matches!(
            attrs.get_as::<String>("absent"),
            Err(AttributeError::Missing(_))
        ));
    }

    #[test]
    fn test_float_coercions() {
        let attrs: Attributes = [("pi", json!("3.5")), ("n", json!(2)), ("huge", json!(1e300))]
            .into_iter()
            .collect();
        assert_eq!(attrs.get_as::<f64>("pi"), Ok(3.5));
        assert_eq!(attrs.get_as::<f32>("n"), Ok(2.0));
        assert!(attrs.get_as::<f32>("huge").is_err());
        assert_eq!(attrs.get_as::<f64>("huge"), Ok(1e300));
    }

    #[test]
    fn test_string_of_non_string() {
        let mut attrs = Attributes::new();
        attrs.put("n", 42);
        attrs.put("padded", "  hi  ");
        assert_eq!(attrs.get_as::<String>("n"), Ok("42".to_string()));
        assert_eq!(attrs.get_string_trim("padded"), "hi");
        assert_eq!(attrs.get_string_trim("absent"), "");
    }
}
