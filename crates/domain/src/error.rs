//! Error type shared by the domain model and the pure math modules.

use thiserror::Error;

/// Errors raised while building pool snapshots or evaluating pool math.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A raw pool record is absent or could not be fetched.
    #[error("pool data unavailable: {0}")]
    PoolDataUnavailable(String),

    /// The pool layout is not supported (for example a meta pool over a meta pool).
    #[error("invalid pool structure: {0}")]
    InvalidPoolStructure(String),

    /// Supplied currencies do not match the expected ones.
    #[error("currency mismatch: expected {expected}, found {found}")]
    CurrencyMismatch {
        /// Expected currency (or currency set).
        expected: String,
        /// Supplied currency (or currency set).
        found: String,
    },

    /// Wrong number of amounts supplied for a pool operation.
    #[error("expected {expected} amounts, got {found}")]
    ImbalancedInputCount {
        /// Number of amounts the pool requires.
        expected: usize,
        /// Number of amounts supplied.
        found: usize,
    },

    /// The pool holds a zero reserve and cannot price trades.
    #[error("pool {0} is empty")]
    EmptyPool(String),

    /// An amount is outside the range accepted by the operation.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// The requested output exceeds what the pool can pay out.
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// Arithmetic overflow in an intermediate value.
    #[error("overflow: {0}")]
    Overflow(&'static str),

    /// Arithmetic underflow in an intermediate value.
    #[error("underflow: {0}")]
    Underflow(&'static str),

    /// Division by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Newton's method did not converge within the iteration bound.
    #[error("did not converge: {0}")]
    NonConvergence(&'static str),

    /// Conversion between integer and decimal representations failed.
    #[error("conversion error: {0}")]
    Conversion(String),
}

/// Convenience result alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Builds a [`DomainError::CurrencyMismatch`] from any displayable pair.
    pub fn mismatch(expected: impl ToString, found: impl ToString) -> Self {
        Self::CurrencyMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}
