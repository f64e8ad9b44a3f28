pub mod constant_product;
pub mod fixed;
pub mod liquidity;
pub mod stable_swap;
