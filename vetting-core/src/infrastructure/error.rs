// vetting-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(vetting::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(vetting::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error("Project configuration not found at '{0}'")]
    #[diagnostic(code(vetting::infra::config_missing))]
    ConfigNotFound(String),

    // --- RULE FILES ---
    #[error("Rule '{rule}' in '{path}' is bound to unknown logic '{logic}'")]
    #[diagnostic(
        code(vetting::infra::unknown_logic),
        help("Use one of the built-in leaves or register the logic in the catalog before loading.")
    )]
    UnknownLogic {
        path: String,
        rule: String,
        logic: String,
    },

    #[error("Invalid rule file '{path}': {reason}")]
    #[diagnostic(code(vetting::infra::invalid_document))]
    InvalidDocument { path: String, reason: String },
}
