//! Pool Metadata Assembly
//!
//! Combines governance state with asset-registry and price-feed lookups
//! into one display-ready view per (pool token, reserve asset, user),
//! cached behind an explicit LRU.

pub mod assembler;
pub mod cache;
pub mod error;
pub mod providers;

pub use assembler::{MetaAssembler, PoolContext, PoolMeta};
pub use cache::{MetaCache, MetaKey, NO_USER};
pub use error::{MetaError, Result};
pub use providers::{AssetMetadata, AssetRegistry, PriceFeed};
