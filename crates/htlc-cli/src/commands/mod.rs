pub mod claim;
pub mod create;
pub mod genesis;
pub mod refund;

/// Print a message as pretty JSON on stdout.
pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
