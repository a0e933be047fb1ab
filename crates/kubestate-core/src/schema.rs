//! Schema descriptors mirroring a CRD's OpenAPI shape
//!
//! A `KindSchema` is the field list a generated adapter declares for one
//! kind: a tree of attribute types over the spec subtree. Validation is
//! structural only - every attribute is optional (matching the source
//! schemas, where every spec field is optional), and violations are
//! reported with the dotted path that produced them.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Type of a single attribute in a kind's spec tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AttributeType {
    String,
    Bool,
    Integer,
    Number,
    List {
        items: Box<AttributeType>,
    },
    Map {
        values: Box<AttributeType>,
    },
    Object {
        attributes: BTreeMap<String, AttributeType>,
    },
}

impl AttributeType {
    fn name(&self) -> &'static str {
        match self {
            AttributeType::String => "string",
            AttributeType::Bool => "bool",
            AttributeType::Integer => "integer",
            AttributeType::Number => "number",
            AttributeType::List { .. } => "list",
            AttributeType::Map { .. } => "map",
            AttributeType::Object { .. } => "object",
        }
    }
}

/// A structural problem found during validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaViolation {
    /// Dotted path to the offending value
    pub path: String,

    /// What went wrong
    pub message: String,
}

impl std::fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// The declared spec schema for one kind
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KindSchema {
    /// Top-level spec attributes
    pub attributes: BTreeMap<String, AttributeType>,
}

impl KindSchema {
    pub fn new(attributes: BTreeMap<String, AttributeType>) -> Self {
        Self { attributes }
    }

    /// Validate a spec subtree against the schema.
    ///
    /// Returns every violation found; an empty vector means the spec
    /// conforms. A missing or null spec conforms trivially.
    pub fn validate(&self, spec: &JsonValue) -> Vec<SchemaViolation> {
        let mut violations = Vec::new();
        check_attributes(&self.attributes, spec, "spec", &mut violations);
        violations
    }
}

fn check_attributes(
    attributes: &BTreeMap<String, AttributeType>,
    value: &JsonValue,
    path: &str,
    violations: &mut Vec<SchemaViolation>,
) {
    match value {
        JsonValue::Null => {}
        JsonValue::Object(map) => {
            for (key, child) in map {
                let child_path = format!("{}.{}", path, key);
                match attributes.get(key) {
                    Some(expected) => check_value(expected, child, &child_path, violations),
                    None => violations.push(SchemaViolation {
                        path: child_path,
                        message: "unknown attribute".to_string(),
                    }),
                }
            }
        }
        other => violations.push(SchemaViolation {
            path: path.to_string(),
            message: format!("expected object, got {}", json_type_name(other)),
        }),
    }
}

fn check_value(
    expected: &AttributeType,
    value: &JsonValue,
    path: &str,
    violations: &mut Vec<SchemaViolation>,
) {
    if value.is_null() {
        return;
    }

    let mismatch = |violations: &mut Vec<SchemaViolation>| {
        violations.push(SchemaViolation {
            path: path.to_string(),
            message: format!(
                "expected {}, got {}",
                expected.name(),
                json_type_name(value)
            ),
        });
    };

    match expected {
        AttributeType::String => {
            if !value.is_string() {
                mismatch(violations);
            }
        }
        AttributeType::Bool => {
            if !value.is_boolean() {
                mismatch(violations);
            }
        }
        AttributeType::Integer => {
            if !value.is_i64() && !value.is_u64() {
                mismatch(violations);
            }
        }
        AttributeType::Number => {
            if !value.is_number() {
                mismatch(violations);
            }
        }
        AttributeType::List { items } => match value.as_array() {
            Some(entries) => {
                for (index, entry) in entries.iter().enumerate() {
                    check_value(items, entry, &format!("{}[{}]", path, index), violations);
                }
            }
            None => mismatch(violations),
        },
        AttributeType::Map { values } => match value.as_object() {
            Some(map) => {
                for (key, entry) in map {
                    check_value(values, entry, &format!("{}.{}", path, key), violations);
                }
            }
            None => mismatch(violations),
        },
        AttributeType::Object { attributes } => {
            check_attributes(attributes, value, path, violations);
        }
    }
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "list",
        JsonValue::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn widget_schema() -> KindSchema {
        KindSchema::new(BTreeMap::from([
            ("replicas".to_string(), AttributeType::Integer),
            ("image".to_string(), AttributeType::String),
            (
                "resources".to_string(),
                AttributeType::Map {
                    values: Box::new(AttributeType::String),
                },
            ),
            (
                "ports".to_string(),
                AttributeType::List {
                    items: Box::new(AttributeType::Object {
                        attributes: BTreeMap::from([
                            ("name".to_string(), AttributeType::String),
                            ("port".to_string(), AttributeType::Integer),
                        ]),
                    }),
                },
            ),
        ]))
    }

    #[test]
    fn test_conforming_spec() {
        let spec = json!({
            "replicas": 3,
            "image": "nginx:1.27",
            "resources": {"cpu": "500m", "memory": "128Mi"},
            "ports": [{"name": "http", "port": 80}]
        });
        assert!(widget_schema().validate(&spec).is_empty());
    }

    #[test]
    fn test_all_attributes_optional() {
        assert!(widget_schema().validate(&json!({})).is_empty());
        assert!(widget_schema().validate(&JsonValue::Null).is_empty());
        assert!(widget_schema().validate(&json!({"replicas": null})).is_empty());
    }

    #[test]
    fn test_type_mismatch_reports_path() {
        let violations = widget_schema().validate(&json!({"replicas": "three"}));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "spec.replicas");
        assert_eq!(violations[0].message, "expected integer, got string");
    }

    #[test]
    fn test_unknown_attribute() {
        let violations = widget_schema().validate(&json!({"replicaCount": 3}));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "spec.replicaCount");
        assert_eq!(violations[0].message, "unknown attribute");
    }

    #[test]
    fn test_nested_list_violation_path() {
        let spec = json!({"ports": [{"name": "http", "port": "eighty"}]});
        let violations = widget_schema().validate(&spec);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "spec.ports[0].port");
    }

    #[test]
    fn test_map_value_violation_path() {
        let spec = json!({"resources": {"cpu": 2}});
        let violations = widget_schema().validate(&spec);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "spec.resources.cpu");
    }

    #[test]
    fn test_number_accepts_integer_but_not_vice_versa() {
        let schema = KindSchema::new(BTreeMap::from([(
            "weight".to_string(),
            AttributeType::Number,
        )]));
        assert!(schema.validate(&json!({"weight": 1})).is_empty());
        assert!(schema.validate(&json!({"weight": 0.5})).is_empty());

        let violations = widget_schema().validate(&json!({"replicas": 1.5}));
        assert_eq!(violations[0].message, "expected integer, got number");
    }

    #[test]
    fn test_schema_roundtrip() {
        let schema = widget_schema();
        let yaml = serde_yaml::to_string(&schema).unwrap();
        let back: KindSchema = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, schema);
    }

    #[test]
    fn test_schema_from_yaml() {
        let schema: KindSchema = serde_yaml::from_str(
            r#"
attributes:
  replicas:
    type: integer
  selector:
    type: map
    values:
      type: string
"#,
        )
        .unwrap();
        assert!(
            schema
                .validate(&json!({"replicas": 2, "selector": {"app": "demo"}}))
                .is_empty()
        );
    }
}
