//! `htlc genesis`: genesis snapshot tools.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use htlc_engine::{HtlcRegistry, query_by_state};
use htlc_types::{GenesisState, HtlcState};

#[derive(Subcommand, Debug)]
pub enum GenesisCommand {
    /// Check a genesis file; exits non-zero on the first invalid entry.
    Validate {
        /// Path to the genesis JSON file.
        file: PathBuf,

        /// Also report entries already expired at this block height.
        #[arg(long)]
        height: Option<u64>,
    },
    /// Print an empty genesis snapshot.
    Default,
}

/// Load and validate a snapshot into a registry.
pub fn check(file: &Path) -> anyhow::Result<HtlcRegistry> {
    let state = GenesisState::load(file)
        .map_err(|e| anyhow::anyhow!("cannot read genesis {}: {e}", file.display()))?;
    let mut registry = HtlcRegistry::new();
    for htlc in state.htlcs()? {
        registry.put(htlc)?;
    }
    Ok(registry)
}

pub fn run(cmd: &GenesisCommand) -> anyhow::Result<()> {
    match cmd {
        GenesisCommand::Validate { file, height } => {
            let registry = match check(file) {
                Ok(registry) => registry,
                Err(err) => {
                    tracing::error!(file = %file.display(), error = %err, "Genesis rejected");
                    return Err(err);
                }
            };
            println!(
                "Genesis OK: {} pending HTLC(s) in {}",
                registry.len(),
                file.display()
            );
            if let Some(height) = height {
                let expired = query_by_state(&registry, HtlcState::Expired, *height);
                println!("{} expired at height {height}:", expired.len());
                for view in expired {
                    println!(
                        "  {} expired at {} ({})",
                        view.htlc.hash_lock, view.htlc.expiration_height, view.htlc.amount
                    );
                }
            }
            Ok(())
        }
        GenesisCommand::Default => {
            println!("{}", GenesisState::default_genesis().to_json()?);
            Ok(())
        }
    }
}
