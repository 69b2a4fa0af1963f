//! Typed views over the raw on-chain variable snapshot
//!
//! The staking contract publishes its state as a flat key/value map whose
//! keys encode compound identifiers (`value_votes_add_price_aa<id>_<value>`,
//! `leader_add_price_aa<id>`, `user_<address>_a0`, ...). This module decodes
//! those keys and values once, into typed records, so the rest of the crate
//! never touches raw strings or untyped JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GovernanceError, Result};
use crate::params;

/// Prefix of every vote-weight variable.
pub const VALUE_VOTES_PREFIX: &str = "value_votes_";

/// Prefix of the current-leader variable of an add-price-oracle proposal.
pub const LEADER_ADD_PRICE_AA_PREFIX: &str = "leader_add_price_aa";

/// Key prefixes of the three compound proposal categories.
pub const ADD_PRICE_AA_PREFIX: &str = "add_price_aa";
pub const CHANGE_PRICE_AA_PREFIX: &str = "change_price_aa";
pub const CHANGE_DRIFT_RATE_PREFIX: &str = "change_drift_rate";

/// Variable holding the total staked pool-token balance.
pub const STAKED_BALANCE_VAR: &str = "perp_asset_balance_a0";

/// Snapshot of the staking contract's variables at one point in time.
///
/// Backed by a `BTreeMap` so scan order is deterministic; tie order inside
/// vote lists and the proposal id list depends on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StakingVars(BTreeMap<String, Value>);

impl StakingVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> + '_ {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Numeric value of a variable, if it is a number.
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    /// The variable's value unless it is absent or "falsy" on chain
    /// (`null`, `false`, `0`, or the empty string all read as unset).
    pub fn truthy(&self, key: &str) -> Option<&Value> {
        let raw = self.get(key)?;
        let unset = match raw {
            Value::Null => true,
            Value::Bool(flag) => !flag,
            Value::Number(n) => n.as_f64() == Some(0.0),
            Value::String(text) => text.is_empty(),
            _ => false,
        };
        if unset {
            None
        } else {
            Some(raw)
        }
    }

    /// Total normalized voting power across all stakers, from the
    /// contract's aggregate `state` variable.
    pub fn total_normalized_vp(&self) -> f64 {
        self.get("state")
            .and_then(|state| state.get("total_normalized_vp"))
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    }

    /// Total staked pool-token balance, in smallest units.
    pub fn staked_asset_balance(&self) -> f64 {
        self.number(STAKED_BALANCE_VAR).unwrap_or(0.0)
    }

    /// Stake record of one user, zeroed when the user has no position.
    pub fn user_stake(&self, address: &str) -> UserStake {
        self.get(&format!("user_{address}_a0"))
            .and_then(|raw| serde_json::from_value(raw.clone()).ok())
            .unwrap_or_default()
    }
}

/// What a decoded vote-weight key targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteTarget {
    /// One of the governed simple parameters (swap fee, presale period, ...).
    Param(String),
    /// Proposal to register a new price oracle, by oracle id.
    AddPriceAa(String),
    /// Proposal to switch an existing price oracle, by oracle id.
    ChangePriceAa(String),
    /// Proposal to change the drift rate of an asset, by asset id.
    ChangeDriftRate(String),
}

/// A fully decoded `value_votes_*` key: the target being voted on and the
/// proposed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteKey {
    pub target: VoteTarget,
    pub value: String,
}

impl VoteKey {
    /// Decode a raw variable key, or `None` when the key is not a
    /// recognized vote-weight variable. Unknown keys are not an error:
    /// the contract publishes plenty of variables that are not votes.
    pub fn parse(raw: &str) -> Option<Self> {
        let rest = raw.strip_prefix(VALUE_VOTES_PREFIX)?;
        let (key, value) = rest.rsplit_once('_')?;

        let target = if params::is_governed_param(key) {
            VoteTarget::Param(key.to_string())
        } else if let Some(id) = key.strip_prefix(ADD_PRICE_AA_PREFIX) {
            VoteTarget::AddPriceAa(id.to_string())
        } else if let Some(id) = key.strip_prefix(CHANGE_PRICE_AA_PREFIX) {
            VoteTarget::ChangePriceAa(id.to_string())
        } else if let Some(id) = key.strip_prefix(CHANGE_DRIFT_RATE_PREFIX) {
            VoteTarget::ChangeDriftRate(id.to_string())
        } else {
            return None;
        };

        Some(Self {
            target,
            value: value.to_string(),
        })
    }
}

/// Current leader of an add-price-oracle proposal: the favored value and
/// the timestamp it took the lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderRecord {
    pub value: String,
    pub flip_ts: u64,
}

impl TryFrom<&Value> for LeaderRecord {
    type Error = GovernanceError;

    fn try_from(raw: &Value) -> Result<Self> {
        let record = raw.as_object().ok_or_else(|| malformed("leader", "not an object"))?;

        // The voted value is usually a string but the chain may store it
        // as a bare number.
        let value = match record.get("value") {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => return Err(malformed("leader", "missing value field")),
        };

        let flip_ts = record
            .get("flip_ts")
            .and_then(Value::as_u64)
            .ok_or_else(|| malformed("leader", "missing flip_ts field"))?;

        Ok(Self { value, flip_ts })
    }
}

/// One user's position in the staking contract, in smallest units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UserStake {
    #[serde(default)]
    pub balance: f64,
    #[serde(default)]
    pub normalized_vp: f64,
}

/// State of the pool contract itself (as opposed to the staking contract).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolState {
    /// Id of the pool's own share token.
    pub asset0: String,
    /// Reserve balance, in smallest units of the reserve asset.
    #[serde(default)]
    pub reserve: f64,
    /// Total supply of the share token.
    #[serde(default)]
    pub s0: f64,
}

fn malformed(kind: &'static str, reason: &str) -> GovernanceError {
    GovernanceError::MalformedRecord {
        kind,
        reason: reason.to_string(),
    }
}
