//! Provider configuration and per-operation options
//!
//! A `ProviderConfig` is set once at configure time and read-only afterwards.
//! Operations take option structs whose overrides resolve against the
//! provider defaults (config-override-or-provider-default).

use kube::api::{PatchParams, ValidationDirective};
use serde::{Deserialize, Serialize};

use kubestate_core::{UpsertWait, WaitConfig};

/// Default field manager for Server-Side Apply
pub const DEFAULT_FIELD_MANAGER: &str = "kubestate";

/// Provider-level defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    /// Field manager under which field ownership is tracked
    #[serde(default = "default_field_manager")]
    pub field_manager: String,

    /// Take ownership of fields held by other managers on apply
    #[serde(default)]
    pub force_conflicts: bool,

    /// Render manifests only; every cluster operation fails
    #[serde(default)]
    pub offline: bool,
}

fn default_field_manager() -> String {
    DEFAULT_FIELD_MANAGER.to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            field_manager: default_field_manager(),
            force_conflicts: false,
            offline: false,
        }
    }
}

impl ProviderConfig {
    /// Set the provider-wide field manager
    pub fn with_field_manager(mut self, manager: impl Into<String>) -> Self {
        self.field_manager = manager.into();
        self
    }

    /// Force conflicts by default on apply
    pub fn with_force_conflicts(mut self) -> Self {
        self.force_conflicts = true;
        self
    }

    /// Mark the provider as offline
    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }
}

/// Options for the apply (create/update) operation
#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    /// Override the provider's field manager for this operation
    pub field_manager: Option<String>,

    /// Override the provider's force-conflicts flag for this operation
    pub force_conflicts: Option<bool>,

    /// Validate server-side without persisting
    pub dry_run: bool,

    /// Poll after the patch until the condition holds
    pub wait: Option<UpsertWait>,
}

impl ApplyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the field manager
    pub fn with_field_manager(mut self, manager: impl Into<String>) -> Self {
        self.field_manager = Some(manager.into());
        self
    }

    /// Override force-conflicts
    pub fn with_force_conflicts(mut self, force: bool) -> Self {
        self.force_conflicts = Some(force);
        self
    }

    /// Enable dry-run mode
    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Wait for the given condition after applying
    pub fn with_wait(mut self, wait: UpsertWait) -> Self {
        self.wait = Some(wait);
        self
    }

    /// Build patch params for Server-Side Apply.
    ///
    /// Field validation is always strict: the API server rejects unknown or
    /// duplicate fields instead of pruning them.
    pub fn patch_params(&self, provider: &ProviderConfig) -> PatchParams {
        let manager = self
            .field_manager
            .as_deref()
            .unwrap_or(&provider.field_manager);

        let mut params = PatchParams::apply(manager);
        params.force = self.force_conflicts.unwrap_or(provider.force_conflicts);
        params.dry_run = self.dry_run;
        params.field_validation = Some(ValidationDirective::Strict);
        params
    }
}

/// Options for the delete operation
#[derive(Debug, Clone, Default)]
pub struct DeleteOptions {
    /// Poll after the delete until the object is gone
    pub wait: Option<WaitConfig>,
}

impl DeleteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for the object to disappear
    pub fn with_wait(mut self, config: WaitConfig) -> Self {
        self.wait = Some(config);
        self
    }
}
