//! Declarative state for a single custom resource
//!
//! Every kind instantiates the same shape: an optional composite `id`,
//! optional `apiVersion`/`kind`, a `metadata` record, and an untyped `spec`
//! subtree transcribed from the kind's CRD schema. Instances live for one
//! operation: populated from configuration or from an API response, written
//! back, and discarded.
//!
//! The shape must round-trip through JSON to match the API server's
//! representation of the object: absent optional fields stay absent (never
//! `null`), and empty maps/lists are preserved as empty.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue, json};
use std::collections::BTreeMap;

use crate::descriptor::ResourceDescriptor;
use crate::error::Result;

/// Object metadata tracked in state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Object name
    pub name: String,

    /// Namespace, absent for cluster-scoped objects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,

    /// Labels, absent when never set (an empty map is distinct from absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,

    /// Annotations, absent when never set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,
}

impl Metadata {
    /// Create metadata for a namespaced object
    pub fn namespaced(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Some(namespace.into()),
            ..Default::default()
        }
    }
}

/// The state shape every custom-resource kind instantiates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceState {
    /// Composite identifier, `"namespace/name"`; caller-supplied and never
    /// overwritten by API responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Optional in configuration; the descriptor is authoritative on the wire
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,

    /// Optional in configuration; the descriptor is authoritative on the wire
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Object metadata
    pub metadata: Metadata,

    /// Direct transcription of the CRD's spec subtree
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec: Option<JsonValue>,
}

impl ResourceState {
    /// Create a state identifying an object by name and namespace
    pub fn named(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            metadata: Metadata::namespaced(name, namespace),
            ..Default::default()
        }
    }

    /// Parse a state from YAML configuration
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse a state from JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// The composite identifier for this object: `"namespace/name"`, or the
    /// bare name for cluster-scoped objects
    pub fn object_id(&self) -> String {
        match &self.metadata.namespace {
            Some(ns) => format!("{}/{}", ns, self.metadata.name),
            None => self.metadata.name.clone(),
        }
    }

    /// Build the wire object submitted to the API server.
    ///
    /// `apiVersion` and `kind` always come from the descriptor, overriding
    /// whatever the configuration carried. The `id` field is state-only and
    /// never serialized.
    pub fn to_object(&self, descriptor: &ResourceDescriptor) -> JsonValue {
        let mut metadata = Map::new();
        if let Some(annotations) = &self.metadata.annotations {
            metadata.insert("annotations".to_string(), json!(annotations));
        }
        if let Some(labels) = &self.metadata.labels {
            metadata.insert("labels".to_string(), json!(labels));
        }
        metadata.insert("name".to_string(), json!(self.metadata.name));
        if let Some(ns) = &self.metadata.namespace {
            metadata.insert("namespace".to_string(), json!(ns));
        }

        let mut obj = Map::new();
        obj.insert("apiVersion".to_string(), json!(descriptor.api_version()));
        obj.insert("kind".to_string(), json!(descriptor.kind));
        obj.insert("metadata".to_string(), JsonValue::Object(metadata));
        if let Some(spec) = &self.spec {
            obj.insert("spec".to_string(), spec.clone());
        }

        JsonValue::Object(obj)
    }

    /// Merge an API response into this state.
    ///
    /// Overwrites `apiVersion`, `kind`, `metadata`, and `spec` with what the
    /// server returned; `id` is preserved as supplied by the caller.
    pub fn merge_response(&mut self, obj: &JsonValue) {
        self.api_version = obj
            .get("apiVersion")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        self.kind = obj.get("kind").and_then(|v| v.as_str()).map(str::to_string);

        if let Some(meta) = obj.get("metadata") {
            if let Some(name) = meta.get("name").and_then(|v| v.as_str()) {
                self.metadata.name = name.to_string();
            }
            self.metadata.namespace = meta
                .get("namespace")
                .and_then(|v| v.as_str())
                .map(str::to_string);
            self.metadata.labels = meta
                .get("labels")
                .cloned()
                .and_then(|v| serde_json::from_value(v).ok());
            self.metadata.annotations = meta
                .get("annotations")
                .cloned()
                .and_then(|v| serde_json::from_value(v).ok());
        }

        self.spec = obj.get("spec").cloned();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget_descriptor() -> ResourceDescriptor {
        ResourceDescriptor::new("example.io", "v1", "Widget", "widgets")
    }

    #[test]
    fn test_roundtrip_preserves_all_fields() {
        let state = ResourceState {
            id: Some("default/demo".to_string()),
            api_version: Some("example.io/v1".to_string()),
            kind: Some("Widget".to_string()),
            metadata: Metadata {
                name: "demo".to_string(),
                namespace: Some("default".to_string()),
                labels: Some(BTreeMap::from([(
                    "app".to_string(),
                    "demo".to_string(),
                )])),
                annotations: None,
            },
            spec: Some(json!({"replicas": 3, "enabled": true, "weight": 0.5})),
        };

        let encoded = serde_json::to_string(&state).unwrap();
        let decoded: ResourceState = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, state);
    }

    #[test]
    fn test_roundtrip_absent_fields_stay_absent() {
        let state = ResourceState::named("demo", "default");
        let encoded = serde_json::to_value(&state).unwrap();

        // Absent optionals must not serialize as null
        let obj = encoded.as_object().unwrap();
        assert!(!obj.contains_key("id"));
        assert!(!obj.contains_key("apiVersion"));
        assert!(!obj.contains_key("spec"));
        let meta = obj["metadata"].as_object().unwrap();
        assert!(!meta.contains_key("labels"));
        assert!(!meta.contains_key("annotations"));

        let decoded: ResourceState = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, state);
    }

    #[test]
    fn test_roundtrip_empty_map_distinct_from_absent() {
        let mut state = ResourceState::named("demo", "default");
        state.metadata.labels = Some(BTreeMap::new());
        state.spec = Some(json!({"items": [], "selector": {}}));

        let encoded = serde_json::to_string(&state).unwrap();
        let decoded: ResourceState = serde_json::from_str(&encoded).unwrap();

        assert_eq!(decoded.metadata.labels, Some(BTreeMap::new()));
        assert_eq!(decoded.spec, Some(json!({"items": [], "selector": {}})));
        assert_eq!(decoded, state);
    }

    #[test]
    fn test_object_id() {
        assert_eq!(ResourceState::named("demo", "prod").object_id(), "prod/demo");

        let cluster = ResourceState {
            metadata: Metadata {
                name: "global".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(cluster.object_id(), "global");
    }

    #[test]
    fn test_to_object_injects_api_version_and_kind() {
        let state = ResourceState::named("demo", "default");
        let obj = state.to_object(&widget_descriptor());

        assert_eq!(obj["apiVersion"], json!("example.io/v1"));
        assert_eq!(obj["kind"], json!("Widget"));
        assert_eq!(obj["metadata"]["name"], json!("demo"));
    }

    #[test]
    fn test_to_object_descriptor_overrides_configured_type() {
        let mut state = ResourceState::named("demo", "default");
        state.api_version = Some("wrong/v9".to_string());
        state.kind = Some("Wrong".to_string());

        let obj = state.to_object(&widget_descriptor());
        assert_eq!(obj["apiVersion"], json!("example.io/v1"));
        assert_eq!(obj["kind"], json!("Widget"));
    }

    #[test]
    fn test_to_object_omits_id_and_absent_spec() {
        let mut state = ResourceState::named("demo", "default");
        state.id = Some("default/demo".to_string());

        let obj = state.to_object(&widget_descriptor());
        let map = obj.as_object().unwrap();
        assert!(!map.contains_key("id"));
        assert!(!map.contains_key("spec"));
    }

    #[test]
    fn test_merge_response_overwrites_spec_preserves_id() {
        let mut state = ResourceState::named("demo", "default");
        state.id = Some("default/demo".to_string());
        state.spec = Some(json!({"replicas": 1}));

        let response = json!({
            "apiVersion": "example.io/v1",
            "kind": "Widget",
            "metadata": {
                "name": "demo",
                "namespace": "default",
                "labels": {"managed-by": "kubestate"}
            },
            "spec": {"replicas": 5}
        });
        state.merge_response(&response);

        assert_eq!(state.id, Some("default/demo".to_string()));
        assert_eq!(state.api_version, Some("example.io/v1".to_string()));
        assert_eq!(state.kind, Some("Widget".to_string()));
        assert_eq!(state.spec, Some(json!({"replicas": 5})));
        assert_eq!(
            state.metadata.labels,
            Some(BTreeMap::from([(
                "managed-by".to_string(),
                "kubestate".to_string()
            )]))
        );
    }

    #[test]
    fn test_merge_response_clears_stale_fields() {
        let mut state = ResourceState::named("demo", "default");
        state.metadata.labels = Some(BTreeMap::from([(
            "stale".to_string(),
            "yes".to_string(),
        )]));
        state.spec = Some(json!({"old": true}));

        // A response without labels or spec drops both
        let response = json!({
            "apiVersion": "example.io/v1",
            "kind": "Widget",
            "metadata": {"name": "demo", "namespace": "default"}
        });
        state.merge_response(&response);

        assert_eq!(state.metadata.labels, None);
        assert_eq!(state.spec, None);
    }

    #[test]
    fn test_from_yaml_config() {
        let state = ResourceState::from_yaml(
            r#"
metadata:
  name: demo
  namespace: default
spec:
  replicas: 3
"#,
        )
        .unwrap();
        assert_eq!(state.metadata.name, "demo");
        assert_eq!(state.spec, Some(json!({"replicas": 3})));
    }
}
