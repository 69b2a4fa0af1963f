//! External data providers consumed by the meta assembler
//!
//! The assembler never talks to the chain or a price service directly;
//! callers inject implementations of these traits. Tests plug in mocks.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::assembler::PoolContext;
use crate::error::Result;

/// Symbol and decimal precision of a registered asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetMetadata {
    pub symbol: String,
    pub decimals: u32,
}

/// Resolves asset ids to their registered metadata.
#[async_trait::async_trait]
pub trait AssetRegistry: Send + Sync {
    async fn asset_metadata(&self, asset: &str) -> Result<AssetMetadata>;
}

/// Supplies reserve-asset and pool-token prices.
#[async_trait::async_trait]
pub trait PriceFeed: Send + Sync {
    /// USD price published by the reserve price oracle.
    async fn reserve_price(&self, reserve_price_aa: &str) -> Result<f64>;

    /// Prices of `assets` in units of the pool's reserve asset.
    async fn asset_prices(
        &self,
        pool: &str,
        assets: &[String],
        ctx: &PoolContext,
    ) -> Result<HashMap<String, f64>>;
}
