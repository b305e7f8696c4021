// vetting-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VettingError {
    // --- DOMAIN ERRORS (configuration, faults raised by rules) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE ERRORS (IO, Parsing) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- GENERIC / APPLICATION ERRORS ---
    #[error("Internal Error: {0}")]
    InternalError(String),
}

impl VettingError {
    /// True when the error comes from a rule raising an expected fault
    /// during a run, as opposed to a broken configuration.
    pub fn is_validation_fault(&self) -> bool {
        matches!(self, VettingError::Domain(DomainError::ValidationFault { .. }))
    }
}

// Manual implementation to avoid duplicate enum variant but keep ergonomics
impl From<std::io::Error> for VettingError {
    fn from(err: std::io::Error) -> Self {
        VettingError::Infrastructure(InfrastructureError::Io(err))
    }
}
