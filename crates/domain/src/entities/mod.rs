pub mod currency;
pub mod meta_pool;
pub mod pool;
pub mod stable_pool;
pub mod standard_pool;

// Re-export for easier access
pub use currency::{Currency, CurrencyId};
pub use meta_pool::StableLiquidityMetaPool;
pub use pool::LiquidityPool;
pub use stable_pool::StableLiquidityPool;
pub use standard_pool::StandardLiquidityPool;
