//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (handlers reference declared formatters,
//!   loggers reference declared handlers)
//! - Validate value ranges (rotation limits, tolerance)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function: ToolkitConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::{HandlerSink, ToolkitConfig};

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("duplicate handler name '{0}'")]
    DuplicateHandler(String),

    #[error("duplicate formatter name '{0}'")]
    DuplicateFormatter(String),

    #[error("handler '{handler}' references unknown formatter '{formatter}'")]
    UnknownFormatter { handler: String, formatter: String },

    #[error("logger '{logger}' references unknown handler '{handler}'")]
    UnknownHandler { logger: String, handler: String },

    #[error("logger '{0}' is bound to no handlers")]
    UnboundLogger(String),

    #[error("file handler '{0}' has a zero rotation size")]
    ZeroRotationSize(String),

    #[error("file handler '{0}' retains zero backups")]
    ZeroBackupCount(String),

    #[error("file handler '{0}' has an empty path")]
    EmptyHandlerPath(String),

    #[error("pipeline declares steps but matrix axis '{0}' is empty")]
    EmptyMatrixAxis(String),

    #[error("publish commands declared but token variable name is empty")]
    EmptyTokenVar,

    #[error("analysis tolerance must be finite and non-negative, got {0}")]
    BadTolerance(f64),
}

/// Check a parsed configuration for semantic problems.
pub fn validate_config(config: &ToolkitConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut formatter_names = HashSet::new();
    for formatter in &config.logging.formatters {
        if !formatter_names.insert(formatter.name.as_str()) {
            errors.push(ValidationError::DuplicateFormatter(formatter.name.clone()));
        }
    }

    let mut handler_names = HashSet::new();
    for handler in &config.logging.handlers {
        if !handler_names.insert(handler.name.as_str()) {
            errors.push(ValidationError::DuplicateHandler(handler.name.clone()));
        }
        if !formatter_names.contains(handler.formatter.as_str()) {
            errors.push(ValidationError::UnknownFormatter {
                handler: handler.name.clone(),
                formatter: handler.formatter.clone(),
            });
        }
        if let HandlerSink::File {
            path,
            max_bytes,
            backup_count,
        } = &handler.sink
        {
            if *max_bytes == 0 {
                errors.push(ValidationError::ZeroRotationSize(handler.name.clone()));
            }
            if *backup_count == 0 {
                errors.push(ValidationError::ZeroBackupCount(handler.name.clone()));
            }
            if path.is_empty() {
                errors.push(ValidationError::EmptyHandlerPath(handler.name.clone()));
            }
        }
    }

    for logger in &config.logging.loggers {
        if logger.handlers.is_empty() {
            errors.push(ValidationError::UnboundLogger(logger.name.clone()));
        }
        for handler in &logger.handlers {
            if !handler_names.contains(handler.as_str()) {
                errors.push(ValidationError::UnknownHandler {
                    logger: logger.name.clone(),
                    handler: handler.clone(),
                });
            }
        }
    }
    for handler in &config.logging.root.handlers {
        if !handler_names.contains(handler.as_str()) {
            errors.push(ValidationError::UnknownHandler {
                logger: "root".to_string(),
                handler: handler.clone(),
            });
        }
    }

    if config.pipeline.has_steps() {
        if config.pipeline.matrix.os.is_empty() {
            errors.push(ValidationError::EmptyMatrixAxis("os".to_string()));
        }
        if config.pipeline.matrix.versions.is_empty() {
            errors.push(ValidationError::EmptyMatrixAxis("versions".to_string()));
        }
    }
    if !config.pipeline.publish.commands.is_empty() && config.pipeline.publish.token_var.is_empty()
    {
        errors.push(ValidationError::EmptyTokenVar);
    }

    if !config.analysis.tolerance.is_finite() || config.analysis.tolerance < 0.0 {
        errors.push(ValidationError::BadTolerance(config.analysis.tolerance));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
