//! Pool metadata assembly
//!
//! Builds the consolidated per-pool view consumed by the UI: governance
//! proposal statuses, the caller's stake and voting power, and USD
//! valuations of the reserve and the staked balance.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use perp_governance::proposal::{resolve_oracle_proposals, OracleProposals, StakingParams};
use perp_governance::vars::{PoolState, StakingVars};

use crate::cache::{MetaCache, MetaKey};
use crate::error::{MetaError, Result};
use crate::providers::{AssetMetadata, AssetRegistry, PriceFeed};

/// Everything known about one pool: its own state plus the staking
/// contract's params and variable snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolContext {
    /// Address of the pool contract.
    pub aa: String,
    pub state: PoolState,
    pub reserve_asset: String,
    /// Address of the oracle publishing the reserve asset's USD price.
    pub reserve_price_aa: String,
    #[serde(default)]
    pub staking_params: StakingParams,
    #[serde(default)]
    pub staking_vars: StakingVars,
}

/// The assembled, display-ready view of one pool for one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolMeta {
    pub asset0: AssetMetadata,
    pub reserve_asset: AssetMetadata,
    pub proposals: OracleProposals,
    /// The caller's normalized voting power; zero without a user context.
    pub vp: f64,
    /// Whether the caller may exercise governance control.
    pub allowed_control: bool,
    /// The caller's staked balance, in display units of the pool token.
    pub stake_balance: f64,
    pub reserve_price_aa: String,
    /// Reserve oracle price scaled to smallest reserve-asset units.
    pub reserve_price_value: f64,
    /// Pool reserve in display units of the reserve asset.
    pub reserve: f64,
    pub reserve_in_usd: f64,
    /// Total staked pool-token balance, in smallest units.
    pub total_stake_balance: f64,
    pub stake_in_usd: f64,
}

/// Assembles and caches [`PoolMeta`] views.
pub struct MetaAssembler {
    assets: Arc<dyn AssetRegistry>,
    prices: Arc<dyn PriceFeed>,
    cache: MetaCache,
}

impl MetaAssembler {
    pub fn new(assets: Arc<dyn AssetRegistry>, prices: Arc<dyn PriceFeed>, cache: MetaCache) -> Self {
        Self {
            assets,
            prices,
            cache,
        }
    }

    /// The cached view for `(ctx, user)`, assembling it on a miss or when
    /// `force` bypasses the cache. Provider failures propagate and leave
    /// the cache untouched.
    pub async fn prepared_meta(
        &self,
        ctx: &PoolContext,
        user: Option<&str>,
        force: bool,
    ) -> Result<Arc<PoolMeta>> {
        let key = MetaKey::new(&ctx.state.asset0, &ctx.reserve_asset, user);

        if !force {
            if let Some(cached) = self.cache.get(&key) {
                debug!(asset0 = %key.asset0, user = %key.user, "pool meta cache hit");
                return Ok(cached);
            }
        }

        debug!(asset0 = %key.asset0, user = %key.user, force, "assembling pool meta");
        let meta = Arc::new(self.assemble(ctx, user).await?);
        self.cache.put(key, Arc::clone(&meta));

        Ok(meta)
    }

    async fn assemble(&self, ctx: &PoolContext, user: Option<&str>) -> Result<PoolMeta> {
        let now = Utc::now().timestamp() as u64;
        let proposals =
            resolve_oracle_proposals(&ctx.state, &ctx.staking_params, &ctx.staking_vars, now);

        let stake = user
            .map(|address| ctx.staking_vars.user_stake(address))
            .unwrap_or_default();

        let asset0 = self.assets.asset_metadata(&ctx.state.asset0).await?;
        let mut stake_balance = stake.balance;
        if stake_balance != 0.0 {
            stake_balance /= 10f64.powi(asset0.decimals as i32);
        }

        let reserve_asset = self.assets.asset_metadata(&ctx.reserve_asset).await?;
        let reserve_price = self.prices.reserve_price(&ctx.reserve_price_aa).await?;
        let reserve_price_value = reserve_price * 10f64.powi(reserve_asset.decimals as i32);

        let reserve = ctx.state.reserve / 10f64.powi(reserve_asset.decimals as i32);
        let reserve_in_usd = reserve * reserve_price_value;
        let total_stake_balance = ctx.staking_vars.staked_asset_balance();

        let asset_prices = self
            .prices
            .asset_prices(&ctx.aa, std::slice::from_ref(&ctx.state.asset0), ctx)
            .await?;
        let asset0_price = asset_prices
            .get(&ctx.state.asset0)
            .copied()
            .ok_or_else(|| MetaError::MissingAssetPrice(ctx.state.asset0.clone()))?;
        let stake_in_usd = asset0_price * reserve_price;

        Ok(PoolMeta {
            asset0,
            reserve_asset,
            proposals,
            vp: stake.normalized_vp,
            allowed_control: stake.normalized_vp > 0.0,
            stake_balance,
            reserve_price_aa: ctx.reserve_price_aa.clone(),
            reserve_price_value,
            reserve,
            reserve_in_usd,
            total_stake_balance,
            stake_in_usd,
        })
    }
}
