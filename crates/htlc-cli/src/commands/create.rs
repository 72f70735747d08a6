//! `htlc create`: build a create-HTLC message.

use clap::Args;
use htlc_types::hashlock;
use htlc_types::{AccountId, Coins, CreateMode, EngineConfig, HashLock, MsgCreateHtlc, Secret};

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Account whose funds are escrowed.
    #[arg(long)]
    pub from: String,

    /// Account that receives the funds on claim.
    #[arg(long)]
    pub to: String,

    /// Receiver address on the counter chain.
    #[arg(long, default_value = "")]
    pub receiver_on_other_chain: String,

    /// Amount to lock, e.g. `100stake,5atom`.
    #[arg(long)]
    pub amount: Coins,

    /// Hex secret to derive the hash lock from.
    #[arg(long, conflicts_with = "hash_lock")]
    pub secret: Option<String>,

    /// Hex hash lock committed by the counter-leg.
    #[arg(long)]
    pub hash_lock: Option<String>,

    /// Timestamp mixed into the hash lock (0 = none).
    #[arg(long, default_value_t = 0)]
    pub timestamp: u64,

    /// Blocks until the HTLC becomes refundable.
    #[arg(long)]
    pub time_lock: u64,
}

/// A freshly generated secret, shown to the operator once.
#[derive(Debug)]
pub struct Generated {
    pub secret: Secret,
    pub hash_lock: HashLock,
}

/// Build the message. The secret, if any, is replaced by its hash lock.
pub fn build(
    args: &CreateArgs,
    config: &EngineConfig,
) -> anyhow::Result<(MsgCreateHtlc, Option<Generated>)> {
    let (mode, generated) = match (&args.secret, &args.hash_lock) {
        (Some(secret), _) => (
            CreateMode::BySecret {
                secret: Secret::from_hex(secret)?,
                timestamp: args.timestamp,
            },
            None,
        ),
        (None, Some(hash_lock)) => (
            CreateMode::ByHashLock {
                hash_lock: HashLock::from_hex(hash_lock)?,
                timestamp: args.timestamp,
            },
            None,
        ),
        (None, None) => {
            let secret = hashlock::generate_secret();
            let hash_lock = hashlock::derive(&secret, args.timestamp)?;
            (
                CreateMode::BySecret {
                    secret: secret.clone(),
                    timestamp: args.timestamp,
                },
                Some(Generated { secret, hash_lock }),
            )
        }
    };

    let msg = MsgCreateHtlc {
        sender: AccountId::new(&args.from),
        to: AccountId::new(&args.to),
        receiver_on_other_chain: args.receiver_on_other_chain.clone(),
        amount: args.amount.clone(),
        mode: mode.into_committed()?,
        time_lock: args.time_lock,
    };
    msg.validate_basic()?;
    config.check_time_lock(msg.time_lock)?;
    config.check_parties(&msg.sender, &msg.to)?;
    Ok((msg, generated))
}

pub fn run(args: &CreateArgs, config: &EngineConfig) -> anyhow::Result<()> {
    let (msg, generated) = build(args, config)?;

    if let Some(generated) = generated {
        eprintln!("WARNING: a random secret was generated. Save it now, it will not be shown again.");
        eprintln!("  Secret:    {}", generated.secret.to_hex());
        eprintln!("  Hash lock: {}", generated.hash_lock);
        eprintln!("Without the secret the HTLC can only be refunded after it expires.");
    }

    if let Ok(hash_lock) = msg.mode.hash_lock() {
        tracing::info!(hash_lock = %hash_lock, sender = %msg.sender, amount = %msg.amount, "Create message built");
    }
    super::print_json(&msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use htlc_types::HtlcError;
    use rust_decimal::Decimal;

    fn args() -> CreateArgs {
        CreateArgs {
            from: "alice".into(),
            to: "bob".into(),
            receiver_on_other_chain: "0xb0b".into(),
            amount: Coins::single("stake", Decimal::new(100, 0)),
            secret: None,
            hash_lock: None,
            timestamp: 1000,
            time_lock: 50,
        }
    }

    #[test]
    fn generated_secret_is_returned_and_not_in_message() {
        let (msg, generated) = build(&args(), &EngineConfig::default()).unwrap();
        let generated = generated.unwrap();
        assert_eq!(generated.secret.len(), 32);
        assert_eq!(
            msg.mode,
            CreateMode::ByHashLock {
                hash_lock: generated.hash_lock,
                timestamp: 1000
            }
        );
        let json = serde_json::to_string(&msg).unwrap();
        assert!(!json.contains(&generated.secret.to_hex()));
    }

    #[test]
    fn explicit_secret_is_committed() {
        let mut args = args();
        args.secret = Some("00".repeat(32));
        let (msg, generated) = build(&args, &EngineConfig::default()).unwrap();
        assert!(generated.is_none());
        let expected = hashlock::derive(&Secret::new(vec![0u8; 32]), 1000).unwrap();
        assert_eq!(msg.mode.hash_lock().unwrap(), expected);
    }

    #[test]
    fn explicit_hash_lock_is_passed_through() {
        let mut args = args();
        args.hash_lock = Some("cd".repeat(32));
        let (msg, _) = build(&args, &EngineConfig::default()).unwrap();
        assert_eq!(msg.mode.hash_lock().unwrap(), HashLock([0xcd; 32]));
    }

    #[test]
    fn short_secret_rejected() {
        let mut args = args();
        args.secret = Some("00".repeat(16));
        let err = build(&args, &EngineConfig::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HtlcError>(),
            Some(HtlcError::InvalidSecretLength { .. })
        ));
    }

    #[test]
    fn time_lock_outside_config_rejected() {
        let mut args = args();
        args.time_lock = 30_000;
        let err = build(&args, &EngineConfig::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HtlcError>(),
            Some(HtlcError::InvalidTimeLock { .. })
        ));
    }

    #[test]
    fn custody_receiver_rejected() {
        let mut args = args();
        args.to = "htlc_custody".into();
        let err = build(&args, &EngineConfig::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<HtlcError>(),
            Some(HtlcError::InvalidAddress { .. })
        ));
    }
}
