//! Generic resource operations
//!
//! The four standard operations every generated adapter performs, expressed
//! once and parameterized by a `ResourceDescriptor`: read, apply
//! (Server-Side Apply), delete, and import. Each call is a sequential
//! request/response against the dynamic API; nothing outside the wait
//! pollers is retried.

use kube::api::{Api, ApiResource, DeleteParams, DynamicObject, Patch, PropagationPolicy};
use kube::core::GroupVersionKind;

use kubestate_core::{ResourceDescriptor, ResourceState, parse_import_id};

use crate::config::{ApplyOptions, DeleteOptions, ProviderConfig};
use crate::error::{ClientError, Result};
use crate::wait::{self, Presence};

/// Result of applying a single object
#[derive(Debug, Clone)]
pub struct ApplyOutcome {
    /// Resource kind
    pub kind: String,
    /// Object name
    pub name: String,
    /// Object namespace (None for cluster-scoped)
    pub namespace: Option<String>,
    /// Whether it was created (true) or configured (false)
    pub created: bool,
}

/// Generic client for descriptor-parameterized resource operations
///
/// Holds the `kube::Client` handle and the provider defaults, both set once
/// at configure time and read-only afterwards. Callers may run operations
/// concurrently across different resource instances.
pub struct ResourceClient {
    client: Option<kube::Client>,
    config: ProviderConfig,
}

impl ResourceClient {
    /// Connect using the ambient kubeconfig. An offline provider skips the
    /// connection entirely and can only render manifests.
    pub async fn try_default(config: ProviderConfig) -> Result<Self> {
        if config.offline {
            return Ok(Self {
                client: None,
                config,
            });
        }
        let client = kube::Client::try_default().await?;
        Ok(Self {
            client: Some(client),
            config,
        })
    }

    /// Create with an existing Kubernetes client
    pub fn with_client(client: kube::Client, config: ProviderConfig) -> Self {
        Self {
            client: Some(client),
            config,
        }
    }

    /// Create a client with no cluster connection
    pub fn offline(config: ProviderConfig) -> Self {
        Self {
            client: None,
            config: config.offline(),
        }
    }

    /// The provider defaults this client was configured with
    pub fn provider_config(&self) -> &ProviderConfig {
        &self.config
    }

    fn cluster(&self) -> Result<&kube::Client> {
        self.client.as_ref().ok_or(ClientError::Offline)
    }

    /// Create a dynamic Api for a descriptor, scoped by namespace when the
    /// descriptor says so
    fn api_for(
        &self,
        descriptor: &ResourceDescriptor,
        namespace: Option<&str>,
    ) -> Result<Api<DynamicObject>> {
        let client = self.cluster()?.clone();
        let gvk = GroupVersionKind::gvk(&descriptor.group, &descriptor.version, &descriptor.kind);
        let resource = ApiResource::from_gvk_with_plural(&gvk, &descriptor.plural);

        Ok(if descriptor.namespaced {
            let ns = namespace.unwrap_or("default");
            Api::namespaced_with(client, ns, &resource)
        } else {
            Api::all_with(client, &resource)
        })
    }

    // ========== Read ==========

    /// Fetch the object identified by the state's metadata and merge the
    /// response into it, overwriting `metadata`/`spec` while preserving the
    /// caller-supplied `id`.
    pub async fn read(
        &self,
        descriptor: &ResourceDescriptor,
        state: &mut ResourceState,
    ) -> Result<()> {
        let name = require_name(state)?;
        let api = self.api_for(descriptor, state.metadata.namespace.as_deref())?;

        let obj = match api.get(&name).await {
            Ok(obj) => obj,
            Err(kube::Error::Api(ae)) if ae.code == 404 => {
                return Err(ClientError::ResourceNotFound {
                    kind: descriptor.kind.clone(),
                    id: state.object_id(),
                });
            }
            Err(e) => {
                return Err(ClientError::Request {
                    verb: "get",
                    resource: format!("{} {}", descriptor.kind, state.object_id()),
                    source: e,
                });
            }
        };

        state.merge_response(&serde_json::to_value(&obj)?);
        Ok(())
    }

    // ========== Apply ==========

    /// Submit the desired object as a Server-Side Apply patch and merge the
    /// response back into the state.
    ///
    /// The wire object always carries the descriptor's apiVersion/kind, and
    /// the patch always requests strict field validation. When a wait
    /// condition is configured the call polls the live object after the
    /// patch until every field matcher holds.
    pub async fn apply(
        &self,
        descriptor: &ResourceDescriptor,
        state: &mut ResourceState,
        options: &ApplyOptions,
    ) -> Result<ApplyOutcome> {
        let name = require_name(state)?;
        let api = self.api_for(descriptor, state.metadata.namespace.as_deref())?;

        // Existence probe to report created vs configured
        let exists = api.get_opt(&name).await.map_err(ClientError::Api)?.is_some();

        let params = options.patch_params(&self.config);
        let obj = state.to_object(descriptor);
        let applied = api
            .patch(&name, &params, &Patch::Apply(&obj))
            .await
            .map_err(|e| ClientError::Request {
                verb: "apply",
                resource: format!("{} {}", descriptor.kind, state.object_id()),
                source: e,
            })?;

        state.merge_response(&serde_json::to_value(&applied)?);

        if let Some(wait_spec) = &options.wait
            && !options.dry_run
        {
            wait::wait_for_upsert(
                || {
                    let api = api.clone();
                    let name = name.clone();
                    async move {
                        let obj = api.get(&name).await.map_err(ClientError::Api)?;
                        Ok(serde_json::to_value(&obj)?)
                    }
                },
                wait_spec,
            )
            .await?;
        }

        tracing::debug!(
            "applied {} {} ({})",
            descriptor.kind,
            state.object_id(),
            if exists { "configured" } else { "created" }
        );

        Ok(ApplyOutcome {
            kind: descriptor.kind.clone(),
            name,
            namespace: state.metadata.namespace.clone(),
            created: !exists,
        })
    }

    // ========== Delete ==========

    /// Delete an object with background propagation. An object that is
    /// already gone is not an error. When a wait config is given the call
    /// polls until the object is confirmed gone or the timeout elapses.
    pub async fn delete(
        &self,
        descriptor: &ResourceDescriptor,
        namespace: Option<&str>,
        name: &str,
        options: &DeleteOptions,
    ) -> Result<()> {
        let api = self.api_for(descriptor, namespace)?;

        let params = DeleteParams {
            propagation_policy: Some(PropagationPolicy::Background),
            ..Default::default()
        };
        match api.delete(name, &params).await {
            Ok(_) => {}
            Err(kube::Error::Api(ae)) if ae.code == 404 => return Ok(()),
            Err(e) => {
                return Err(ClientError::Request {
                    verb: "delete",
                    resource: format!("{} {}", descriptor.kind, name),
                    source: e,
                });
            }
        }

        if let Some(config) = &options.wait {
            wait::wait_for_delete(
                || {
                    let api = api.clone();
                    let name = name.to_string();
                    async move {
                        match api.get_opt(&name).await {
                            Ok(Some(_)) => Ok(Presence::Present),
                            Ok(None) => Ok(Presence::Gone),
                            Err(e) => Err(ClientError::Api(e)),
                        }
                    }
                },
                config,
            )
            .await?;
        }

        tracing::debug!("deleted {} {}", descriptor.kind, name);
        Ok(())
    }

    // ========== Import ==========

    /// Import an existing object from its `"namespace/name"` identifier
    pub async fn import(
        &self,
        descriptor: &ResourceDescriptor,
        id: &str,
    ) -> Result<ResourceState> {
        let (namespace, name) = parse_import_id(id)?;
        let mut state = ResourceState::named(name, namespace);
        state.id = Some(id.to_string());
        self.read(descriptor, &mut state).await?;
        Ok(state)
    }
}

fn require_name(state: &ResourceState) -> Result<String> {
    if state.metadata.name.is_empty() {
        return Err(ClientError::Misconfigured(
            "metadata.name must be set".to_string(),
        ));
    }
    Ok(state.metadata.name.clone())
}
