//! Kubestate Core - Core types for declarative custom-resource management
//!
//! This crate provides the cluster-independent building blocks used
//! throughout kubestate:
//! - `ResourceDescriptor`: the group/version/kind/plural tuple identifying a kind
//! - `ResourceState`: the declarative state shape every kind instantiates
//! - `KindSchema`: attribute trees mirroring a CRD's OpenAPI shape
//! - `WaitConfig` / `FieldMatch`: wait-condition configuration for the pollers
//! - Manifest rendering and import-ID parsing

pub mod descriptor;
pub mod error;
pub mod import;
pub mod manifest;
pub mod schema;
pub mod state;
pub mod wait;

pub use descriptor::ResourceDescriptor;
pub use error::{CoreError, Result};
pub use import::parse_import_id;
pub use manifest::{parse_manifest, render_manifest};
pub use schema::{AttributeType, KindSchema, SchemaViolation};
pub use state::{Metadata, ResourceState};
pub use wait::{FieldMatch, UpsertWait, WaitConfig, parse_timeout};
