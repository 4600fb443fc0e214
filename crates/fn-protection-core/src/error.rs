//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("invalid duration {value:?}: {message}")]
    InvalidDuration { value: String, message: String },

    #[error("invalid resource: {message}")]
    InvalidResource { message: String },

    #[error("missing required field: {field}")]
    MissingField { field: String },

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
