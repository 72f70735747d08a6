//! `htlc claim`: build a claim message revealing the secret.

use clap::Args;
use htlc_types::{AccountId, HashLock, MsgClaimHtlc, Secret, hashlock};

#[derive(Args, Debug)]
pub struct ClaimArgs {
    /// Hex hash lock of the HTLC.
    pub hash_lock: String,

    /// Hex secret.
    pub secret: String,

    /// Account submitting the claim.
    #[arg(long)]
    pub from: String,

    /// Creation timestamp; when given, the secret is checked locally first.
    #[arg(long)]
    pub timestamp: Option<u64>,
}

pub fn build(args: &ClaimArgs) -> anyhow::Result<MsgClaimHtlc> {
    let msg = MsgClaimHtlc {
        sender: AccountId::new(&args.from),
        hash_lock: HashLock::from_hex(&args.hash_lock)?,
        secret: Secret::from_hex(&args.secret)?,
    };
    msg.validate_basic()?;

    if let Some(timestamp) = args.timestamp {
        if !hashlock::verify(&msg.secret, timestamp, &msg.hash_lock) {
            anyhow::bail!(
                "secret does not match hash lock {} at timestamp {timestamp}",
                msg.hash_lock
            );
        }
    }
    Ok(msg)
}

pub fn run(args: &ClaimArgs) -> anyhow::Result<()> {
    let msg = build(args)?;
    tracing::info!(hash_lock = %msg.hash_lock, claimer = %msg.sender, "Claim message built");
    super::print_json(&msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(secret: &str, timestamp: Option<u64>) -> ClaimArgs {
        let lock = hashlock::derive(&Secret::new(vec![7u8; 32]), 99).unwrap();
        ClaimArgs {
            hash_lock: lock.to_hex(),
            secret: secret.into(),
            from: "bob".into(),
            timestamp,
        }
    }

    #[test]
    fn builds_message() {
        let msg = build(&args(&"07".repeat(32), None)).unwrap();
        assert_eq!(msg.secret, Secret::new(vec![7u8; 32]));
        assert_eq!(msg.sender, AccountId::new("bob"));
    }

    #[test]
    fn local_check_catches_wrong_secret() {
        assert!(build(&args(&"07".repeat(32), Some(99))).is_ok());
        assert!(build(&args(&"08".repeat(32), Some(99))).is_err());
    }

    #[test]
    fn bad_hash_lock_rejected() {
        let mut args = args(&"07".repeat(32), None);
        args.hash_lock = "xyz".into();
        assert!(build(&args).is_err());
    }
}
