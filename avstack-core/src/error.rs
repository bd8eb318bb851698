//! Custom error types for avstack.
//!
//! This module defines explicit enum error types as per coding guidelines.
//! No `Box<dyn Error>`, no `anyhow::Result` - all errors are strongly typed.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the deployment CLI.
/// All errors are explicit variants - no catch-all or generic handling.
#[derive(Debug, Error)]
pub enum StackError {
    // =========================================================================
    // Preflight Errors - Fatal Before Any Orchestrator Invocation
    // =========================================================================
    #[error("Docker daemon is not reachable - start Docker Desktop and try again")]
    DockerUnavailable,

    #[error(
        "no environment file found: looked for {primary} and {fallback} - \
         copy {template} to {primary} and fill in your credentials"
    )]
    EnvFileMissing {
        primary: PathBuf,
        fallback: PathBuf,
        template: PathBuf,
    },

    // =========================================================================
    // Configuration Errors - Fail-Fast on Invalid Config
    // =========================================================================
    #[error("configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("configuration parse error: {message}")]
    ConfigParse { message: String },

    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    // =========================================================================
    // Orchestrator Errors
    // =========================================================================
    #[error("docker-compose {op} exited with status {}", exit_code(.code))]
    ComposeFailed { op: &'static str, code: Option<i32> },

    // =========================================================================
    // System Errors
    // =========================================================================
    #[error("HTTP client initialization failed: {reason}")]
    HttpClient { reason: String },

    #[error("IO error: {context} - {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

fn exit_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => c.to_string(),
        None => "unknown (killed by signal)".to_string(),
    }
}

/// Validation errors cause immediate termination before any action is taken.
/// Used when the stack configuration is invalid and the CLI cannot safely run.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid field value: {field} = {value} - {reason}")]
    InvalidFieldValue {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid port: {port} - {reason}")]
    InvalidPort { port: u16, reason: String },

    #[error("invalid URL path: {path} - must begin with '/'")]
    InvalidUrlPath { path: String },

    #[error("duplicate service name: {name}")]
    DuplicateService { name: String },

    #[error("port {port} is already used by another service")]
    DuplicatePort { port: u16 },

    #[error("schema validation failed: {message}")]
    SchemaValidation { message: String },
}

/// Result type alias using StackError.
pub type StackResult<T> = Result<T, StackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_file_missing_display() {
        let err = StackError::EnvFileMissing {
            primary: PathBuf::from(".env"),
            fallback: PathBuf::from(".env.local"),
            template: PathBuf::from(".env.example"),
        };
        let msg = err.to_string();
        assert!(msg.contains(".env"));
        assert!(msg.contains(".env.local"));
        assert!(msg.contains(".env.example"));
    }

    #[test]
    fn test_compose_failed_display() {
        let err = StackError::ComposeFailed {
            op: "build",
            code: Some(1),
        };
        assert!(err.to_string().contains("build"));
        assert!(err.to_string().contains('1'));

        let killed = StackError::ComposeFailed {
            op: "up",
            code: None,
        };
        assert!(killed.to_string().contains("signal"));
    }

    #[test]
    fn test_error_chain() {
        let validation_err = ValidationError::InvalidPort {
            port: 0,
            reason: "Port must be non-zero".to_string(),
        };
        let stack_err: StackError = validation_err.into();
        assert!(matches!(stack_err, StackError::Validation(_)));
    }
}
