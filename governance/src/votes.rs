//! Vote tally aggregation
//!
//! Folds every vote-weight variable in a snapshot into ranked per-target
//! tallies. Weights are stored normalized; the `PowerNormalizer` seam
//! converts them into effective voting power at the requested timestamp.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::vars::{StakingVars, VoteKey, VoteTarget};

/// Length of a voting year used by the decay curve (360 days).
pub const VOTING_YEAR_SECONDS: f64 = 360.0 * 86_400.0;

/// Converts a stored normalized weight into effective voting power.
///
/// The staking contract defines the real curve; callers plug in
/// [`ExponentialDecay`] to match it, tests plug in stubs.
pub trait PowerNormalizer {
    fn effective_power(&self, normalized_vp: f64, decay_factor: f64, timestamp: u64) -> f64;
}

/// The staking contract's decay curve: effective power shrinks by
/// `decay_factor` per 360-day voting year elapsed since `reference_ts`.
#[derive(Debug, Clone, Copy)]
pub struct ExponentialDecay {
    /// Launch timestamp of the staking contract.
    pub reference_ts: u64,
}

impl PowerNormalizer for ExponentialDecay {
    fn effective_power(&self, normalized_vp: f64, decay_factor: f64, timestamp: u64) -> f64 {
        let elapsed = timestamp.saturating_sub(self.reference_ts) as f64;
        normalized_vp * decay_factor.powf(elapsed / VOTING_YEAR_SECONDS)
    }
}

/// One candidate value and its aggregated effective voting power.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteEntry {
    pub value: String,
    pub amount: f64,
}

/// Ranked vote lists per proposal category and per governed parameter.
/// Every list is sorted by `amount` descending.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VoteTally {
    pub add_price_aa: BTreeMap<String, Vec<VoteEntry>>,
    pub change_price_aa: BTreeMap<String, Vec<VoteEntry>>,
    pub change_drift_rate: BTreeMap<String, Vec<VoteEntry>>,
    pub params: BTreeMap<String, Vec<VoteEntry>>,
}

impl VoteTally {
    pub fn is_empty(&self) -> bool {
        self.add_price_aa.is_empty()
            && self.change_price_aa.is_empty()
            && self.change_drift_rate.is_empty()
            && self.params.is_empty()
    }

    fn sort(&mut self) {
        for list in self
            .add_price_aa
            .values_mut()
            .chain(self.change_price_aa.values_mut())
            .chain(self.change_drift_rate.values_mut())
            .chain(self.params.values_mut())
        {
            // Stable sort: ties keep snapshot scan order.
            list.sort_by(|a, b| b.amount.partial_cmp(&a.amount).unwrap_or(Ordering::Equal));
        }
    }
}

/// Aggregate every vote-weight variable in `vars` into ranked tallies.
///
/// Keys that do not decode as vote-weight variables are skipped, as are
/// vote variables whose stored weight is not numeric. `timestamp` and
/// `decay_factor` are passed through to the normalizer untouched.
pub fn aggregate_votes(
    vars: &StakingVars,
    timestamp: u64,
    decay_factor: f64,
    normalizer: &dyn PowerNormalizer,
) -> VoteTally {
    let mut tally = VoteTally::default();

    for (key, raw) in vars.iter() {
        let Some(vote) = VoteKey::parse(key) else {
            continue;
        };
        let Some(stored) = raw.as_f64() else {
            continue;
        };

        let entry = VoteEntry {
            value: vote.value,
            amount: normalizer.effective_power(stored, decay_factor, timestamp),
        };

        let list = match vote.target {
            VoteTarget::Param(name) => tally.params.entry(name),
            VoteTarget::AddPriceAa(id) => tally.add_price_aa.entry(id),
            VoteTarget::ChangePriceAa(id) => tally.change_price_aa.entry(id),
            VoteTarget::ChangeDriftRate(id) => tally.change_drift_rate.entry(id),
        };
        list.or_default().push(entry);
    }

    tally.sort();
    tally
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Passes the stored weight through unchanged.
    struct Unit;

    impl PowerNormalizer for Unit {
        fn effective_power(&self, normalized_vp: f64, _decay_factor: f64, _timestamp: u64) -> f64 {
            normalized_vp
        }
    }

    fn vars_from(value: serde_json::Value) -> StakingVars {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_single_add_price_vote() {
        let vars = vars_from(json!({"value_votes_add_price_aa1_5": 42}));

        let tally = aggregate_votes(&vars, 1000, 1.0, &Unit);

        assert_eq!(
            tally.add_price_aa["1"],
            vec![VoteEntry {
                value: "5".to_string(),
                amount: 42.0
            }]
        );
        assert!(tally.change_price_aa.is_empty());
        assert!(tally.params.is_empty());
    }

    #[test]
    fn test_lists_sorted_by_amount_descending() {
        let vars = vars_from(json!({
            "value_votes_add_price_aaORACLE_no": 10,
            "value_votes_add_price_aaORACLE_yes": 250,
            "value_votes_add_price_aaORACLE_maybe": 40,
            "value_votes_swap_fee_0.001": 7,
            "value_votes_swap_fee_0.005": 90,
        }));

        let tally = aggregate_votes(&vars, 0, 1.0, &Unit);

        let amounts: Vec<f64> = tally.add_price_aa["ORACLE"].iter().map(|e| e.amount).collect();
        assert_eq!(amounts, vec![250.0, 40.0, 10.0]);

        let fees: Vec<&str> = tally.params["swap_fee"].iter().map(|e| e.value.as_str()).collect();
        assert_eq!(fees, vec!["0.005", "0.001"]);
    }

    #[test]
    fn test_ties_keep_scan_order() {
        let vars = vars_from(json!({
            "value_votes_change_drift_rateASSET_a": 5,
            "value_votes_change_drift_rateASSET_b": 5,
            "value_votes_change_drift_rateASSET_c": 9,
        }));

        let tally = aggregate_votes(&vars, 0, 1.0, &Unit);

        let order: Vec<&str> = tally.change_drift_rate["ASSET"]
            .iter()
            .map(|e| e.value.as_str())
            .collect();
        // "c" wins outright; "a" and "b" tie and keep lexicographic scan order.
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_unrelated_keys_contribute_nothing() {
        let vars = vars_from(json!({
            "value_votes_add_price_aa1_5": 42,
            "perp_asset_balance_a0": 1_000_000,
            "leader_add_price_aa1": {"value": "5", "flip_ts": 0},
            "state": {"total_normalized_vp": 99},
            "value_votes_mystery_target_1": 10,
            "value_votes_presale_period_604800": "not a number",
        }));

        let tally = aggregate_votes(&vars, 0, 1.0, &Unit);

        assert_eq!(tally.add_price_aa.len(), 1);
        assert!(tally.change_price_aa.is_empty());
        assert!(tally.change_drift_rate.is_empty());
        assert!(tally.params.is_empty());
    }

    #[test]
    fn test_categories_do_not_bleed_into_each_other() {
        let vars = vars_from(json!({
            "value_votes_add_price_aaX_yes": 1,
            "value_votes_change_price_aaX_yes": 2,
            "value_votes_change_drift_rateX_yes": 3,
            "value_votes_max_drift_rate_40": 4,
        }));

        let tally = aggregate_votes(&vars, 0, 1.0, &Unit);

        assert_eq!(tally.add_price_aa["X"][0].amount, 1.0);
        assert_eq!(tally.change_price_aa["X"][0].amount, 2.0);
        assert_eq!(tally.change_drift_rate["X"][0].amount, 3.0);
        assert_eq!(tally.params["max_drift_rate"][0].amount, 4.0);
    }

    #[test]
    fn test_exponential_decay_curve() {
        let curve = ExponentialDecay { reference_ts: 0 };

        // One full voting year at factor 0.5 halves the power.
        let year = VOTING_YEAR_SECONDS as u64;
        assert_eq!(curve.effective_power(100.0, 0.5, year), 50.0);

        // At the reference timestamp the stored weight passes through.
        assert_eq!(curve.effective_power(100.0, 0.5, 0), 100.0);

        // Timestamps before the reference clamp to it.
        let late = ExponentialDecay { reference_ts: 1000 };
        assert_eq!(late.effective_power(100.0, 0.5, 500), 100.0);
    }
}
