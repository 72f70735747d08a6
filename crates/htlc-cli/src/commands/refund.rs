//! `htlc refund`: build a refund message for an expired HTLC.

use clap::Args;
use htlc_types::{AccountId, HashLock, MsgRefundHtlc};

#[derive(Args, Debug)]
pub struct RefundArgs {
    /// Hex hash lock of the HTLC.
    pub hash_lock: String,

    /// Account submitting the refund.
    #[arg(long)]
    pub from: String,
}

pub fn build(args: &RefundArgs) -> anyhow::Result<MsgRefundHtlc> {
    let msg = MsgRefundHtlc {
        sender: AccountId::new(&args.from),
        hash_lock: HashLock::from_hex(&args.hash_lock)?,
    };
    msg.validate_basic()?;
    Ok(msg)
}

pub fn run(args: &RefundArgs) -> anyhow::Result<()> {
    let msg = build(args)?;
    tracing::info!(hash_lock = %msg.hash_lock, caller = %msg.sender, "Refund message built");
    super::print_json(&msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_message() {
        let msg = build(&RefundArgs {
            hash_lock: "ef".repeat(32),
            from: "alice".into(),
        })
        .unwrap();
        assert_eq!(msg.hash_lock, HashLock([0xef; 32]));
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["hash_lock"], "ef".repeat(32));
    }

    #[test]
    fn empty_sender_rejected() {
        assert!(
            build(&RefundArgs {
                hash_lock: "ef".repeat(32),
                from: "  ".into(),
            })
            .is_err()
        );
    }
}
