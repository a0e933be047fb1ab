//! Resource descriptors
//!
//! A `ResourceDescriptor` is the `{group, version, resource}` tuple a
//! generated adapter is parameterized by. Descriptors are plain data and
//! round-trip through serde, so a catalog of kinds can be loaded from
//! JSON or YAML. Conversion to `kube` API types lives in kubestate-client.

use serde::{Deserialize, Serialize};

/// Identifies one custom-resource kind on the API server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    /// API group ("" for the core group)
    pub group: String,

    /// API version within the group
    pub version: String,

    /// Kind name as it appears in manifests
    pub kind: String,

    /// Plural resource name used in API paths
    pub plural: String,

    /// Whether objects of this kind are namespace-scoped
    #[serde(default = "default_true")]
    pub namespaced: bool,
}

fn default_true() -> bool {
    true
}

impl ResourceDescriptor {
    /// Create a namespaced descriptor
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        kind: impl Into<String>,
        plural: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
            plural: plural.into(),
            namespaced: true,
        }
    }

    /// Mark the descriptor as cluster-scoped
    pub fn cluster_scoped(mut self) -> Self {
        self.namespaced = false;
        self
    }

    /// The `apiVersion` string for manifests: `group/version`, or bare
    /// `version` for the core group
    pub fn api_version(&self) -> String {
        if self.group.is_empty() {
            self.version.clone()
        } else {
            format!("{}/{}", self.group, self.version)
        }
    }
}
