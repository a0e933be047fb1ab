//! Manifest rendering
//!
//! The "manifest" variant of a kind renders the desired object as a single
//! YAML document for `kubectl apply`-style workflows, with no cluster
//! round-trip. `apiVersion` and `kind` are always injected from the
//! descriptor, even when the configuration omitted them.

use serde_json::Value as JsonValue;

use crate::descriptor::ResourceDescriptor;
use crate::error::Result;
use crate::state::ResourceState;

/// Render a state as a Kubernetes YAML manifest
pub fn render_manifest(descriptor: &ResourceDescriptor, state: &ResourceState) -> Result<String> {
    Ok(serde_yaml::to_string(&state.to_object(descriptor))?)
}

/// Parse a rendered manifest back into its JSON representation
pub fn parse_manifest(yaml: &str) -> Result<JsonValue> {
    Ok(serde_yaml::from_str(yaml)?)
}
