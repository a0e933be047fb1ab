//! Error types for kubestate-client

use std::time::Duration;

use thiserror::Error;

/// Result type for kubestate-client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during resource operations
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// Kubernetes API error
    #[error("Kubernetes API error: {0}")]
    Api(#[from] kube::Error),

    /// An API request that failed; requests are never retried outside the
    /// wait pollers
    #[error("failed to {verb} {resource}: {source}\nIf the cluster is reachable and healthy, please report this issue")]
    Request {
        verb: &'static str,
        resource: String,
        #[source]
        source: kube::Error,
    },

    /// Object not found on read, distinct from other API failures
    #[error("{kind} \"{id}\" does not exist")]
    ResourceNotFound { kind: String, id: String },

    /// Cluster operation attempted while configured for offline use
    #[error("provider is configured for offline use; cluster operations are unavailable")]
    Offline,

    /// Invalid provider configuration, fatal at configure time
    #[error("invalid provider configuration: {0}")]
    Misconfigured(String),

    /// A wait condition was not reached within its timeout
    #[error("wait condition not reached after {timeout:?}")]
    WaitTimeout { timeout: Duration },

    /// Marshal/unmarshal failure; indicates a bug and is surfaced verbatim
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Core model error
    #[error(transparent)]
    Core(#[from] kubestate_core::CoreError),
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::Serialization(e.to_string())
    }
}

impl ClientError {
    /// Check if this is a Kubernetes 404 Not Found error
    pub fn is_not_found(&self) -> bool {
        match self {
            ClientError::ResourceNotFound { .. } => true,
            ClientError::Api(kube::Error::Api(resp)) => resp.code == 404,
            ClientError::Request {
                source: kube::Error::Api(resp),
                ..
            } => resp.code == 404,
            _ => false,
        }
    }

    /// Check if this is a conflict error (409)
    pub fn is_conflict(&self) -> bool {
        match self {
            ClientError::Api(kube::Error::Api(resp)) => resp.code == 409,
            ClientError::Request {
                source: kube::Error::Api(resp),
                ..
            } => resp.code == 409,
            _ => false,
        }
    }
}
