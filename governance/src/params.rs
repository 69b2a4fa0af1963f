//! Governed pool parameters
//!
//! The simple (non-proposal) parameters stakers can vote on, with the
//! defaults that apply until governance overrides them. The key set of
//! this table also decides which vote-weight variables count as simple
//! parameter votes during tally aggregation.

use std::collections::BTreeMap;

use serde_json::Value;

/// Default values of the governed parameters. Periods are in seconds,
/// fees and shares are fractions of 1.
pub const PARAM_DEFAULTS: &[(&str, f64)] = &[
    ("swap_fee", 0.003),
    ("arb_profit_tax", 0.9),
    ("stakers_fee_share", 0.5),
    ("adjustment_period", 3.0 * 86_400.0),
    ("presale_period", 14.0 * 86_400.0),
    ("auction_price_halving_period", 3.0 * 86_400.0),
    ("token_share_threshold", 0.1),
    ("min_s0_share", 0.01),
    ("max_drift_rate", 50.0),
];

/// Whether `name` is one of the governed simple parameters.
pub fn is_governed_param(name: &str) -> bool {
    PARAM_DEFAULTS.iter().any(|(param, _)| *param == name)
}

/// The default for a governed parameter.
pub fn default_param(name: &str) -> Option<f64> {
    PARAM_DEFAULTS
        .iter()
        .find(|(param, _)| *param == name)
        .map(|(_, default)| *default)
}

/// Effective value of a parameter: the pool's override when set, the
/// table default otherwise, and the `"none"` marker for names this
/// governance does not know about.
pub fn param_value(name: &str, overrides: &BTreeMap<String, Value>) -> Value {
    if let Some(value) = overrides.get(name) {
        return value.clone();
    }
    match default_param(name) {
        Some(default) => Value::from(default),
        None => Value::from("none"),
    }
}

/// How a governed parameter's raw value is shown to voters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Stored in seconds, displayed in days.
    Date,
    /// Stored as a fraction of 1, displayed in percent.
    Percent,
    Plain,
}

/// Convert a raw voted value into its display form.
pub fn display_vote_value(value: f64, kind: ParamKind) -> f64 {
    match kind {
        ParamKind::Date => value / 86_400.0,
        ParamKind::Percent => value * 100.0,
        ParamKind::Plain => value,
    }
}
