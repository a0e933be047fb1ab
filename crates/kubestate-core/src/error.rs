//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("invalid import id {id:?}: expected \"namespace/name\"")]
    InvalidImportId { id: String },

    #[error("invalid duration {value:?}: {message}")]
    InvalidDuration { value: String, message: String },

    #[error("invalid wait pattern {pattern:?}: {message}")]
    InvalidWaitPattern { pattern: String, message: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Missing required field: {field}")]
    MissingField { field: String },
}

pub type Result<T> = std::result::Result<T, CoreError>;
