//! htlc CLI: build HTLC messages and check genesis snapshots.
//!
//! Subcommands: create, claim, refund, genesis validate.
//!
//! Messages are printed as unsigned JSON on stdout for the surrounding
//! transaction tooling to sign and broadcast. Logs go to stderr.

mod commands;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use htlc_types::EngineConfig;
use tracing_subscriber::EnvFilter;

/// HTLC: hash time-locked escrow for cross-chain swaps.
#[derive(Parser, Debug)]
#[command(name = "htlc", version, about, long_about = None)]
struct Cli {
    /// Engine config file (JSON). Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a create-HTLC message.
    Create(commands::create::CreateArgs),
    /// Build a claim message revealing the secret.
    Claim(commands::claim::ClaimArgs),
    /// Build a refund message for an expired HTLC.
    Refund(commands::refund::RefundArgs),
    /// Genesis snapshot tools.
    #[command(subcommand)]
    Genesis(commands::genesis::GenesisCommand),
}

fn init_tracing(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if cli.log_json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path)
            .map_err(|e| anyhow::anyhow!("config {}: {e}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);
    let config = load_config(cli.config.as_deref())?;
    tracing::debug!(?config, "Engine config loaded");

    match &cli.command {
        Commands::Create(args) => commands::create::run(args, &config),
        Commands::Claim(args) => commands::claim::run(args),
        Commands::Refund(args) => commands::refund::run(args),
        Commands::Genesis(cmd) => commands::genesis::run(cmd),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_genesis_validate() {
        let cli = Cli::try_parse_from(["htlc", "genesis", "validate", "genesis.json"]).unwrap();
        assert!(matches!(cli.command, Commands::Genesis(_)));
        assert_eq!(cli.log_level, "warn");
    }

    #[test]
    fn secret_and_hash_lock_are_exclusive() {
        let lock = "ab".repeat(32);
        let res = Cli::try_parse_from([
            "htlc",
            "create",
            "--from",
            "alice",
            "--to",
            "bob",
            "--amount",
            "100stake",
            "--time-lock",
            "50",
            "--secret",
            lock.as_str(),
            "--hash-lock",
            lock.as_str(),
        ]);
        assert!(res.is_err());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let path = Path::new("/nonexistent/htlc-config.json");
        assert!(load_config(Some(path)).is_err());
        assert_eq!(load_config(None).unwrap(), EngineConfig::default());
    }
}
