//! Tagged answer values.
//!
//! Answers vary in shape by question kind. The closed variant set keeps the
//! persisted JSON as plain string | array-of-strings | number, while letting
//! the validator and the pricing table pattern-match instead of sniffing
//! shapes at runtime.

use serde::{Deserialize, Serialize};

/// A single answer value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    /// Checkbox selections, in insertion order.
    Multi(Vec<String>),
    /// Numeric answers (tolerated for input steps).
    Number(f64),
    /// Free text, radio selections.
    Text(String),
}

impl Answer {
    pub fn text(value: impl Into<String>) -> Self {
        Answer::Text(value.into())
    }

    pub fn multi<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Answer::Multi(values.into_iter().map(Into::into).collect())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Answer::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_multi(&self) -> Option<&[String]> {
        match self {
            Answer::Multi(values) => Some(values),
            _ => None,
        }
    }

    /// True when the answer carries no usable content.
    pub fn is_empty(&self) -> bool {
        match self {
            Answer::Text(value) => value.trim().is_empty(),
            Answer::Multi(values) => values.is_empty(),
            Answer::Number(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_to_bare_json_shapes() {
        assert_eq!(
            serde_json::to_string(&Answer::text("Healthcare")).unwrap(),
            "\"Healthcare\""
        );
        assert_eq!(
            serde_json::to_string(&Answer::multi(["A", "B"])).unwrap(),
            "[\"A\",\"B\"]"
        );
        assert_eq!(serde_json::to_string(&Answer::Number(12.0)).unwrap(), "12.0");
    }

    #[test]
    fn deserializes_from_bare_json_shapes() {
        assert_eq!(
            serde_json::from_str::<Answer>("\"Rush\"").unwrap(),
            Answer::text("Rush")
        );
        assert_eq!(
            serde_json::from_str::<Answer>("[\"E-commerce\"]").unwrap(),
            Answer::multi(["E-commerce"])
        );
        assert_eq!(
            serde_json::from_str::<Answer>("7").unwrap(),
            Answer::Number(7.0)
        );
    }

    #[test]
    fn emptiness_trims_whitespace() {
        assert!(Answer::text("   ").is_empty());
        assert!(Answer::multi(Vec::<String>::new()).is_empty());
        assert!(!Answer::text("ok").is_empty());
        assert!(!Answer::Number(0.0).is_empty());
    }
}
