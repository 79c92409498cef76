use thiserror::Error;

/// Failure kinds of a growth assessment. Every kind aborts the whole request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GrowthError {
    /// A collaborator (forecaster, scaler, reference table) is missing or malformed.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Caller supplied window or profile violates a shape or range constraint.
    #[error("validation error: {0}")]
    Validation(String),
    /// The forecaster failed or returned a malformed tensor.
    #[error("inference error: {0}")]
    Inference(String),
    /// Reference table has no entry for the requested key.
    #[error("reference lookup error: {0}")]
    ReferenceLookup(String),
}

pub type GrowthResult<T> = Result<T, GrowthError>;

impl GrowthError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }

    pub fn reference_lookup(msg: impl Into<String>) -> Self {
        Self::ReferenceLookup(msg.into())
    }
}
