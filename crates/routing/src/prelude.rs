//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```rust
//! use bridge_amm_routing::prelude::*;
//! ```

pub use crate::config::{MAX_HOPS, RoutingConfig};
pub use crate::finder::RouteFinder;
pub use crate::graph::{PairEdge, PairGraph};
pub use crate::trade::{PathElement, Trade};
