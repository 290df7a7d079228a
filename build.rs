#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

use anyhow::Result;
use vergen::EmitBuilder;

fn main() -> Result<()> {
    // Falls back to placeholder values when built outside of a git checkout.
    EmitBuilder::builder().all_build().all_git().emit()?;

    return Ok(());
}
