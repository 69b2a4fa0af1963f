use perp_governance::*;

use serde_json::json;

/// Passes stored weights through unchanged.
struct Unit;

impl PowerNormalizer for Unit {
    fn effective_power(&self, normalized_vp: f64, _decay_factor: f64, _timestamp: u64) -> f64 {
        normalized_vp
    }
}

const NOW: u64 = 1_700_000_000;

fn snapshot() -> (PoolState, StakingParams, StakingVars) {
    let state = PoolState {
        asset0: "ASSET0".to_string(),
        reserve: 200_000_000.0,
        s0: 2.0,
    };

    let params: StakingParams = serde_json::from_value(json!({
        "challenging_period": 600,
        "swap_fee": 0.001,
    }))
    .unwrap();

    let vars: StakingVars = serde_json::from_value(json!({
        "state": {"total_normalized_vp": 1000.0},
        "perp_asset_balance_a0": 100,
        "user_ALICE_a0": {"balance": 5_000_000_000u64, "normalized_vp": 120.5},
        "leader_add_price_aaORACLE": {"value": "yes", "flip_ts": NOW},
        "value_votes_add_price_aaORACLE_yes": 42,
        "value_votes_add_price_aaORACLE_no": 7,
        "value_votes_swap_fee_0.001": 15,
        "value_votes_swap_fee_0.003": 3,
        "some_unrelated_variable": "ignored",
    }))
    .unwrap();

    (state, params, vars)
}

#[test]
fn test_tally_and_resolver_agree_on_the_leader() {
    let (state, params, vars) = snapshot();

    let tally = aggregate_votes(&vars, NOW, 1.0, &Unit);
    let proposals = resolve_oracle_proposals(&state, &params, &vars, NOW);

    // The tally's top entry for the proposal is the resolver's leader.
    let ranked = &tally.add_price_aa["ORACLE"];
    let open = &proposals.not_finished["ORACLE"];
    assert_eq!(ranked[0].value, open.leader.value);
    assert_eq!(Some(ranked[0].amount), open.voting_power);

    // 42 > (1000 / 2) * 2 / 100, so the leader is committable on power alone.
    assert_eq!(open.can_commit, Some(true));
    assert_eq!(proposals.all_proposal_ids, vec!["ORACLE".to_string()]);
}

#[test]
fn test_param_votes_rank_separately_from_proposals() {
    let (_, _, vars) = snapshot();

    let tally = aggregate_votes(&vars, NOW, 1.0, &Unit);

    let fees: Vec<&str> = tally.params["swap_fee"].iter().map(|e| e.value.as_str()).collect();
    assert_eq!(fees, vec!["0.001", "0.003"]);
    assert_eq!(tally.add_price_aa.len(), 1);
    assert!(tally.change_price_aa.is_empty());
    assert!(tally.change_drift_rate.is_empty());
}

#[test]
fn test_configured_challenge_window_drives_the_deadline() {
    let (state, params, mut vars) = snapshot();

    // Drop the leader below the majority threshold of 10 so only the
    // challenge window can make it committable.
    vars.insert("value_votes_add_price_aaORACLE_yes", json!(5));

    let proposals = resolve_oracle_proposals(&state, &params, &vars, NOW + 599);
    assert_eq!(proposals.not_finished["ORACLE"].can_commit, Some(false));

    // One second past flip_ts + 600: committable by elapsed time alone.
    let proposals = resolve_oracle_proposals(&state, &params, &vars, NOW + 601);
    assert_eq!(proposals.not_finished["ORACLE"].can_commit, Some(true));
}

#[test]
fn test_user_stake_feeds_voting_power() {
    let (_, _, vars) = snapshot();

    assert_eq!(vars.user_stake("ALICE").normalized_vp, 120.5);
    assert_eq!(vars.user_stake("ALICE").balance, 5_000_000_000.0);
    assert_eq!(vars.user_stake("NOBODY"), UserStake::default());
}
