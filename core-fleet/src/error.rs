use crate::validation::ValidationReport;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FleetError {
    #[error("Validation failed: {0}")]
    Validation(ValidationReport),

    #[error("Invalid slot label: {0}")]
    InvalidSlotLabel(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FleetError>;
