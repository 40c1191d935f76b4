//! Attribute values attached to datasets and variables.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single attribute value.
///
/// Only the shapes that occur in gridded forcing data are modelled; readers
/// skip anything else.
///
/// Untagged variants are tried in order, so the integer shapes come before
/// the floating ones and a serialized `Int` reads back as an `Int`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Str(String),
    Int(i64),
    Ints(Vec<i64>),
    Double(f64),
    Doubles(Vec<f64>),
}

impl AttrValue {
    /// Borrow the value as a string, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric scalar view (integers are widened).
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Integer list view. Single integers become a one-element list and
    /// integral doubles are accepted.
    pub fn as_ints(&self) -> Option<Vec<i64>> {
        match self {
            Self::Int(v) => Some(vec![*v]),
            Self::Ints(v) => Some(v.clone()),
            Self::Doubles(v) if v.iter().all(|d| d.fract() == 0.0) => {
                Some(v.iter().map(|d| *d as i64).collect())
            }
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{}", s),
            Self::Double(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Doubles(v) => {
                let parts: Vec<String> = v.iter().map(|x| x.to_string()).collect();
                write!(f, "{}", parts.join(", "))
            }
            Self::Ints(v) => {
                let parts: Vec<String> = v.iter().map(|x| x.to_string()).collect();
                write!(f, "{}", parts.join(", "))
            }
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<Vec<i64>> for AttrValue {
    fn from(v: Vec<i64>) -> Self {
        Self::Ints(v)
    }
}

/// Name-sorted attribute map.
///
/// Setting an existing name replaces its value, so writing the same set of
/// attributes twice leaves the map unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attributes(BTreeMap<String, AttrValue>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.0.get(name)
    }

    /// Look up a string attribute.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(AttrValue::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<AttrValue> {
        self.0.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AttrValue)> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<AttrValue>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_existing_value() {
        let mut attrs = Attributes::new();
        attrs.set("units", "m");
        attrs.set("units", "km");

        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs.get_str("units"), Some("km"));
    }

    #[test]
    fn test_as_ints_accepts_integral_doubles() {
        assert_eq!(
            AttrValue::Doubles(vec![10.0, 12.0]).as_ints(),
            Some(vec![10, 12])
        );
        assert_eq!(AttrValue::Doubles(vec![10.5, 12.0]).as_ints(), None);
        assert_eq!(AttrValue::Int(3).as_ints(), Some(vec![3]));
        assert_eq!(AttrValue::from("3").as_ints(), None);
    }

    #[test]
    fn test_numeric_views() {
        assert_eq!(AttrValue::Int(1000).as_f64(), Some(1000.0));
        assert_eq!(AttrValue::Double(0.5).as_f64(), Some(0.5));
        assert_eq!(AttrValue::from("x").as_f64(), None);
    }

    #[test]
    fn test_json_keeps_integer_and_double_shapes() {
        let values = vec![
            AttrValue::Int(3500),
            AttrValue::Ints(vec![1900, 2099]),
            AttrValue::Double(1000.0),
            AttrValue::Doubles(vec![30.0, 60.0]),
            AttrValue::from("CF-1.8"),
        ];

        let json = serde_json::to_string(&values).unwrap();
        let back: Vec<AttrValue> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, values);
    }
}
