//! Attribute value types for vertices, edges and graphs
//!
//! DOT attribute values are untyped text. They are kept as a tagged value so
//! that numerals can optionally be coerced and HTML labels stay distinguishable
//! from quoted strings.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Attribute value
///
/// Supports:
/// - String (identifiers, quoted strings, numerals kept verbatim)
/// - Integer (i64, only when numeral coercion is enabled)
/// - Float (f64, only when numeral coercion is enabled)
/// - Html (the text between the outer `<` `>` of an HTML string)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    String(String),
    Integer(i64),
    Float(f64),
    Html(String),
}

impl PropertyValue {
    /// Get string value if this is a string
    pub fn as_string(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get integer value if this is an integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get float value if this is a float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            PropertyValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get the markup if this is an HTML string
    pub fn as_html(&self) -> Option<&str> {
        match self {
            PropertyValue::Html(s) => Some(s),
            _ => None,
        }
    }

    /// Get type name as string
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::String(_) => "String",
            PropertyValue::Integer(_) => "Integer",
            PropertyValue::Float(_) => "Float",
            PropertyValue::Html(_) => "Html",
        }
    }

    /// Text form of the value, without quoting
    pub fn to_text(&self) -> String {
        match self {
            PropertyValue::String(s) | PropertyValue::Html(s) => s.clone(),
            PropertyValue::Integer(i) => i.to_string(),
            PropertyValue::Float(f) => f.to_string(),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::String(s) => write!(f, "\"{}\"", s),
            PropertyValue::Integer(i) => write!(f, "{}", i),
            PropertyValue::Float(fl) => write!(f, "{}", fl),
            PropertyValue::Html(s) => write!(f, "<{}>", s),
        }
    }
}

// Convenience conversions
impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        PropertyValue::Integer(i)
    }
}

impl From<f64> for PropertyValue {
    fn from(f: f64) -> Self {
        PropertyValue::Float(f)
    }
}

/// Insertion-ordered attribute map for vertices, edges and graphs
pub type PropertyMap = IndexMap<String, PropertyValue>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_value_types() {
        assert_eq!(PropertyValue::String("test".to_string()).type_name(), "String");
        assert_eq!(PropertyValue::Integer(42).type_name(), "Integer");
        assert_eq!(PropertyValue::Float(2.5).type_name(), "Float");
        assert_eq!(PropertyValue::Html("<b>x</b>".to_string()).type_name(), "Html");
    }

    #[test]
    fn test_property_value_conversions() {
        let string_prop: PropertyValue = "hello".into();
        assert_eq!(string_prop.as_string(), Some("hello"));
        assert_eq!(string_prop.as_integer(), None);

        let int_prop: PropertyValue = 42i64.into();
        assert_eq!(int_prop.as_integer(), Some(42));

        let float_prop: PropertyValue = 0.5.into();
        assert_eq!(float_prop.as_float(), Some(0.5));
    }

    #[test]
    fn test_property_map_keeps_insertion_order() {
        let mut props = PropertyMap::new();
        props.insert("shape".to_string(), "box".into());
        props.insert("label".to_string(), "A".into());
        props.insert("color".to_string(), "red".into());

        let keys: Vec<&str> = props.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["shape", "label", "color"]);
    }

    #[test]
    fn test_display_and_text() {
        let html = PropertyValue::Html("<b>bold</b>".to_string());
        assert_eq!(format!("{}", html), "<<b>bold</b>>");
        assert_eq!(html.to_text(), "<b>bold</b>");

        assert_eq!(format!("{}", PropertyValue::from("x")), "\"x\"");
        assert_eq!(PropertyValue::Integer(-3).to_text(), "-3");
    }
}
