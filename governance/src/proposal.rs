//! Price-oracle proposal status
//!
//! Classifies every add-price-oracle proposal in a snapshot as finished or
//! still open, and for open ones decides whether the leading value can be
//! committed right now: either its voting power clears the majority
//! threshold, or the challenge window around the current leader has lapsed.

use std::collections::BTreeMap;

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::vars::{
    LeaderRecord, PoolState, StakingVars, ADD_PRICE_AA_PREFIX, LEADER_ADD_PRICE_AA_PREFIX,
    VALUE_VOTES_PREFIX,
};

/// Challenge window applied when the staking params leave it unset (5 days).
pub const DEFAULT_CHALLENGING_PERIOD: u64 = 432_000;

/// Governance-relevant parameters of the staking contract. Everything the
/// contract publishes beyond the known fields is kept verbatim in `extra`
/// (that is where governed parameter overrides live).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StakingParams {
    #[serde(default)]
    pub challenging_period: Option<u64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl StakingParams {
    /// The configured challenge window, falling back to the default when
    /// the param is unset or zero.
    pub fn challenging_period_secs(&self) -> u64 {
        match self.challenging_period {
            Some(period) if period > 0 => period,
            _ => DEFAULT_CHALLENGING_PERIOD,
        }
    }
}

/// Status of one add-price-oracle proposal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OracleProposal {
    /// The committed value, once the proposal has finished.
    pub result: Option<Value>,
    /// The currently favored value and when it took the lead.
    pub leader: LeaderRecord,
    /// Effective voting power behind the leader; `None` when no votes are
    /// recorded for it.
    pub voting_power: Option<f64>,
    /// Whether the leader can be committed right now. `None` whenever
    /// `voting_power` is unknown.
    pub can_commit: Option<bool>,
    /// End of the challenge window, human readable. `None` once finished.
    pub finish_date: Option<String>,
}

/// All add-price-oracle proposals in a snapshot, split by completion.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OracleProposals {
    pub finished: BTreeMap<String, OracleProposal>,
    pub not_finished: BTreeMap<String, OracleProposal>,
    pub all_proposal_ids: Vec<String>,
}

/// Minimum voting power the leading value needs for an immediate commit:
/// half the total normalized power, scaled by the share-token supply over
/// the staked balance.
pub fn majority_threshold(state: &PoolState, vars: &StakingVars) -> f64 {
    (vars.total_normalized_vp() / 2.0) * state.s0 / vars.staked_asset_balance()
}

/// Resolve the status of every add-price-oracle proposal in `vars`.
///
/// `now` is the current wall-clock time in seconds; callers own the clock
/// so results stay reproducible. A leader record that does not decode is
/// skipped along with its proposal.
pub fn resolve_oracle_proposals(
    state: &PoolState,
    params: &StakingParams,
    vars: &StakingVars,
    now: u64,
) -> OracleProposals {
    let mut proposals = OracleProposals::default();
    let challenging_period = params.challenging_period_secs();

    for (key, raw) in vars.iter() {
        let Some(proposal_id) = key.strip_prefix(LEADER_ADD_PRICE_AA_PREFIX) else {
            continue;
        };
        let Ok(leader) = LeaderRecord::try_from(raw) else {
            continue;
        };

        let result = vars
            .truthy(&format!("{ADD_PRICE_AA_PREFIX}{proposal_id}"))
            .cloned();
        let finished = result.is_some();

        // A zero tally reads the same as no votes at all.
        let voting_power = vars
            .number(&format!(
                "{VALUE_VOTES_PREFIX}{ADD_PRICE_AA_PREFIX}{proposal_id}_{}",
                leader.value
            ))
            .filter(|power| *power != 0.0);

        let deadline = leader.flip_ts.saturating_add(challenging_period);
        let can_commit = voting_power
            .map(|power| power > majority_threshold(state, vars) || now > deadline);

        let finish_date = if finished {
            None
        } else {
            Some(format_finish_date(deadline))
        };

        let proposal = OracleProposal {
            result,
            leader,
            voting_power,
            can_commit,
            finish_date,
        };

        let bucket = if finished {
            &mut proposals.finished
        } else {
            &mut proposals.not_finished
        };
        bucket.insert(proposal_id.to_string(), proposal);
        proposals.all_proposal_ids.push(proposal_id.to_string());
    }

    proposals
}

/// `"January 6, 1970 00:00"`-style UTC rendering of a deadline.
/// Timestamps outside chrono's range render empty.
fn format_finish_date(deadline: u64) -> String {
    DateTime::from_timestamp(deadline as i64, 0)
        .map(|date| date.format("%B %-d, %Y %H:%M").to_string())
        .unwrap_or_default()
}
