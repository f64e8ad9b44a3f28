pub mod amount;
pub mod fee_rate;
pub mod percentage;
pub mod pooled_currencies;
pub mod price;

pub use amount::MonetaryAmount;
pub use fee_rate::FeeRate;
pub use percentage::Percentage;
pub use pooled_currencies::PooledCurrencies;
pub use price::Price;
