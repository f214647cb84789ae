use anyhow::Result;

pub fn execute() -> Result<()> {
    println!("reelroute version {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
