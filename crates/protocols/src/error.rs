use bridge_amm_domain::entities::CurrencyId;
use bridge_amm_domain::error::DomainError;
use thiserror::Error;

/// Errors raised while fetching and assembling a pool snapshot.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The registry does not know the currency.
    #[error("unknown currency {0}")]
    UnknownCurrency(CurrencyId),

    /// Reading a snapshot file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A snapshot file is not valid JSON for the expected layout.
    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),

    /// A record could not be turned into a pool.
    #[error(transparent)]
    Domain(#[from] DomainError),
}
