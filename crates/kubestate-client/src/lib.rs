//! Kubestate Client - Kubernetes integration for kubestate
//!
//! This crate provides:
//! - **ResourceClient**: generic read/apply/delete/import operations over
//!   `kube`'s dynamic API, parameterized by a `ResourceDescriptor`
//! - **Server-Side Apply**: idempotent writes with strict field validation
//!   and configurable field manager / force-conflicts resolution
//! - **Wait pollers**: bounded wait-for-condition loops used by the apply
//!   and delete paths
//! - **Provider configuration**: per-provider defaults with per-operation
//!   overrides, including an offline mode for manifest-only use

pub mod config;
pub mod error;
pub mod ops;
pub mod wait;

pub use config::{ApplyOptions, DEFAULT_FIELD_MANAGER, DeleteOptions, ProviderConfig};
pub use error::{ClientError, Result};
pub use ops::{ApplyOutcome, ResourceClient};
pub use wait::{Presence, wait_for_delete, wait_for_upsert};
