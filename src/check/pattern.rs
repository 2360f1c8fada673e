// SPDX-License-Identifier: MIT

//! Pattern rules and per-rule evaluation results

use serde::{Deserialize, Deserializer, Serialize};

/// A field-matching rule checked against the payload
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Pattern {
    /// Path expression selecting a value inside the payload
    pub key: String,
    /// Comparison operator
    #[serde(rename = "type")]
    pub operator: Operator,
    /// Expected value, compared against the string form of the field
    #[serde(deserialize_with = "scalar_string")]
    pub value: String,
}

impl Pattern {
    pub fn new(key: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            operator,
            value: value.into(),
        }
    }

    pub fn equals(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, Operator::Equals, value)
    }

    pub fn not_equals(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, Operator::NotEquals, value)
    }
}

/// Comparison operators
///
/// Anything other than `equals` / `not_equals` is kept verbatim as
/// `Unknown` and always matches.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    /// equals
    Equals,
    /// not_equals
    NotEquals,
    /// Unsupported type string, evaluated as a no-op match
    Unknown(String),
}

impl Operator {
    /// Whether `resolved` satisfies the operator against `expected`
    pub fn matches(&self, resolved: &str, expected: &str) -> bool {
        match self {
            Operator::Equals => resolved == expected,
            Operator::NotEquals => resolved != expected,
            Operator::Unknown(_) => true,
        }
    }

    /// Name as written in flow definitions
    pub fn as_str(&self) -> &str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "not_equals",
            Operator::Unknown(name) => name,
        }
    }
}

impl From<String> for Operator {
    fn from(s: String) -> Self {
        match s.as_str() {
            "equals" => Operator::Equals,
            "not_equals" => Operator::NotEquals,
            _ => Operator::Unknown(s),
        }
    }
}

impl From<&str> for Operator {
    fn from(s: &str) -> Self {
        Operator::from(s.to_string())
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.as_str().to_string()
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::Equals => write!(f, "=="),
            Operator::NotEquals => write!(f, "!="),
            Operator::Unknown(name) => write!(f, "{}", name),
        }
    }
}

/// Outcome of checking one pattern
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    pub key: String,
    pub operator: Operator,
    pub expected_value: String,
    /// String form of the resolved field; empty when the path is absent
    pub resolved_value: String,
    pub matched: bool,
}

impl EvaluationResult {
    /// Progress message reported for this rule
    pub fn message(&self) -> String {
        match (&self.operator, self.matched) {
            (Operator::Equals, true) => format!(
                "Pattern: {} == {} matched. Continue to next step",
                self.key, self.expected_value
            ),
            (Operator::Equals, false) => {
                format!("Pattern: {} == {} not found.", self.key, self.expected_value)
            }
            (Operator::NotEquals, true) => format!(
                "Pattern: {} != {} not found. Continue to next step",
                self.key, self.expected_value
            ),
            (Operator::NotEquals, false) => {
                format!("Pattern: {} != {} matched.", self.key, self.expected_value)
            }
            (Operator::Unknown(name), _) => format!(
                "Pattern: {} has unsupported type '{}'. Skipped",
                self.key, name
            ),
        }
    }
}

/// Accept any scalar for `value` and keep its string form
fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!(
            "pattern value must be a scalar, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(operator: Operator, matched: bool) -> EvaluationResult {
        EvaluationResult {
            key: "status".to_string(),
            operator,
            expected_value: "ok".to_string(),
            resolved_value: String::new(),
            matched,
        }
    }

    #[test]
    fn test_operator_from_string() {
        assert_eq!(Operator::from("equals"), Operator::Equals);
        assert_eq!(Operator::from("not_equals"), Operator::NotEquals);
        assert_eq!(
            Operator::from("regex"),
            Operator::Unknown("regex".to_string())
        );
    }

    #[test]
    fn test_operator_display() {
        assert_eq!(format!("{}", Operator::Equals), "==");
        assert_eq!(format!("{}", Operator::NotEquals), "!=");
        assert_eq!(format!("{}", Operator::Unknown("gt".to_string())), "gt");
    }

    #[test]
    fn test_not_equals_negates_equals() {
        let cases = [("ok", "ok"), ("ok", "error"), ("", ""), ("", "x")];
        for (resolved, expected) in cases {
            assert_eq!(
                Operator::Equals.matches(resolved, expected),
                !Operator::NotEquals.matches(resolved, expected)
            );
        }
    }

    #[test]
    fn test_unknown_operator_always_matches() {
        let op = Operator::Unknown("contains".to_string());
        assert!(op.matches("anything", "else"));
        assert!(op.matches("", "x"));
    }

    #[test]
    fn test_pattern_deserialize() {
        let yaml = r#"
            - key: status
              type: equals
              value: ok
            - key: code
              type: not_equals
              value: 500
            - key: level
              type: regex
              value: "^warn"
        "#;
        let patterns: Vec<Pattern> = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(patterns.len(), 3);
        assert_eq!(patterns[0], Pattern::equals("status", "ok"));
        assert_eq!(patterns[1], Pattern::not_equals("code", "500"));
        assert_eq!(
            patterns[2].operator,
            Operator::Unknown("regex".to_string())
        );
    }

    #[test]
    fn test_pattern_rejects_structured_value() {
        let json = r#"{"key": "a", "type": "equals", "value": {"nested": true}}"#;
        assert!(serde_json::from_str::<Pattern>(json).is_err());
    }

    #[test]
    fn test_pattern_serializes_type_name() {
        let json = serde_json::to_value(Pattern::not_equals("level", "debug")).unwrap();
        assert_eq!(json["type"], "not_equals");
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            result(Operator::Equals, true).message(),
            "Pattern: status == ok matched. Continue to next step"
        );
        assert_eq!(
            result(Operator::Equals, false).message(),
            "Pattern: status == ok not found."
        );
        assert_eq!(
            result(Operator::NotEquals, true).message(),
            "Pattern: status != ok not found. Continue to next step"
        );
        assert_eq!(
            result(Operator::NotEquals, false).message(),
            "Pattern: status != ok matched."
        );
        assert_eq!(
            result(Operator::Unknown("gt".to_string()), true).message(),
            "Pattern: status has unsupported type 'gt'. Skipped"
        );
    }
}
