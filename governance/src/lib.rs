//! Perpetual Pool Governance Module
//!
//! Derives display-ready governance state from a raw snapshot of the
//! staking contract's on-chain variables:
//! - Ranked vote tallies per governed parameter and per oracle proposal
//! - Commit/challenge status for pending price-oracle additions
//!
//! The snapshot is read-only input; everything here is a pure, synchronous
//! computation over it.

pub mod error;
pub mod params;
pub mod proposal;
pub mod vars;
pub mod votes;

pub use error::{GovernanceError, Result};
pub use proposal::{
    majority_threshold, resolve_oracle_proposals, OracleProposal, OracleProposals, StakingParams,
    DEFAULT_CHALLENGING_PERIOD,
};
pub use vars::{LeaderRecord, PoolState, StakingVars, UserStake, VoteKey, VoteTarget};
pub use votes::{aggregate_votes, ExponentialDecay, PowerNormalizer, VoteEntry, VoteTally};
