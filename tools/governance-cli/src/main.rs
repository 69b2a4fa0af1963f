use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Deserialize;

use perp_governance::{
    aggregate_votes, params, resolve_oracle_proposals, ExponentialDecay, PoolState, StakingParams,
    StakingVars, VoteTally,
};

#[derive(Parser)]
#[command(name = "governance-cli")]
#[command(about = "Perpetual pool governance snapshot inspector")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show ranked vote tallies from a snapshot
    Votes {
        /// Path to a JSON snapshot of the pool and staking contract state
        #[arg(short, long)]
        snapshot: PathBuf,

        /// Timestamp to evaluate voting power at (defaults to now)
        #[arg(short, long)]
        timestamp: Option<u64>,

        /// Decay factor of the voting-power curve
        #[arg(short, long, default_value_t = 1.0)]
        decay_factor: f64,

        /// Launch timestamp of the staking contract
        #[arg(long, default_value_t = 0)]
        launch_ts: u64,
    },

    /// Show add-price-oracle proposal statuses
    Proposals {
        #[arg(short, long)]
        snapshot: PathBuf,
    },

    /// Show effective governed parameter values
    Params {
        #[arg(short, long)]
        snapshot: PathBuf,
    },
}

#[derive(Deserialize)]
struct Snapshot {
    state: PoolState,
    #[serde(default)]
    staking_params: StakingParams,
    #[serde(default)]
    staking_vars: StakingVars,
}

fn load_snapshot(path: &PathBuf) -> Result<Snapshot, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

fn print_tally(tally: &VoteTally) {
    let sections = [
        ("add_price_aa", &tally.add_price_aa),
        ("change_price_aa", &tally.change_price_aa),
        ("change_drift_rate", &tally.change_drift_rate),
        ("params", &tally.params),
    ];

    for (title, targets) in sections {
        if targets.is_empty() {
            continue;
        }
        println!("{}:", title);
        for (target, entries) in targets {
            println!("  {}", target);
            for entry in entries {
                println!("    {:<24} {}", entry.value, entry.amount);
            }
        }
    }

    if tally.is_empty() {
        println!("No votes recorded in this snapshot");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Votes {
            snapshot,
            timestamp,
            decay_factor,
            launch_ts,
        } => {
            let snapshot = load_snapshot(&snapshot)?;
            let timestamp =
                timestamp.unwrap_or_else(|| chrono::Utc::now().timestamp() as u64);
            let curve = ExponentialDecay {
                reference_ts: launch_ts,
            };

            let tally =
                aggregate_votes(&snapshot.staking_vars, timestamp, decay_factor, &curve);
            print_tally(&tally);
        }

        Commands::Proposals { snapshot } => {
            let snapshot = load_snapshot(&snapshot)?;
            let now = chrono::Utc::now().timestamp() as u64;

            let proposals = resolve_oracle_proposals(
                &snapshot.state,
                &snapshot.staking_params,
                &snapshot.staking_vars,
                now,
            );

            if proposals.all_proposal_ids.is_empty() {
                println!("No add-price-oracle proposals in this snapshot");
                return Ok(());
            }

            for (id, proposal) in &proposals.finished {
                if let Some(result) = &proposal.result {
                    println!("{}: finished, result {}", id, result);
                }
            }
            for (id, proposal) in &proposals.not_finished {
                println!("{}: open, leader {}", id, proposal.leader.value);
                match proposal.voting_power {
                    Some(power) => println!("  voting power {}", power),
                    None => println!("  no votes recorded for the leader"),
                }
                if let Some(can_commit) = proposal.can_commit {
                    println!("  committable now: {}", if can_commit { "yes" } else { "no" });
                }
                if let Some(finish_date) = &proposal.finish_date {
                    println!("  challenge window ends {}", finish_date);
                }
            }
        }

        Commands::Params { snapshot } => {
            let snapshot = load_snapshot(&snapshot)?;
            for &(name, _) in params::PARAM_DEFAULTS {
                let value = params::param_value(name, &snapshot.staking_params.extra);
                println!("{:<30} {}", name, value);
            }
        }
    }

    Ok(())
}
