//! CLI error types with exit code handling
//!
//! This module provides a unified error type for CLI operations that
//! maps errors to appropriate exit codes.

use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// The request document could not be read or decoded
    #[error("Request error: {message}")]
    #[diagnostic(code(fn_protection::cli::request))]
    Request {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// The function produced a fatal result
    #[error("Function failed: {message}")]
    #[diagnostic(
        code(fn_protection::cli::fatal),
        help("run `fn-protection render` to see the full response")
    )]
    Fatal { message: String },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(fn_protection::cli::io))]
    Io { message: String },

    /// Internal error (runtime, unexpected failure)
    #[error("Internal error: {message}")]
    #[diagnostic(code(fn_protection::cli::internal))]
    Internal { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Request { .. } => exit_codes::ERROR,
            CliError::Fatal { .. } => exit_codes::FATAL_RESULT,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Internal { .. } => exit_codes::ERROR,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a request error with help text
    pub fn request_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Request {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create an error for a fatal function result
    pub fn fatal(message: impl Into<String>) -> Self {
        Self::Fatal {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::internal(format!("cannot encode output: {err}"))
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(err: serde_yaml::Error) -> Self {
        CliError::internal(format!("cannot encode output: {err}"))
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
