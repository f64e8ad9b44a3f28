use bridge_amm_domain::error::DomainError;
use thiserror::Error;

/// Errors raised while building transaction bundles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// Pool math or currency validation failed.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// An amount that must be strictly positive is zero.
    #[error("{0} must be strictly positive")]
    NonPositiveAmount(String),

    /// The bundle has no recipient account.
    #[error("recipient must not be empty")]
    MissingRecipient,
}

/// Result type for bundle construction.
pub type ExecutionResult<T> = Result<T, ExecutionError>;
