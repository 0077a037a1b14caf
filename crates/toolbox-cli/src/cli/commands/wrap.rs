//! `toolbox wrap` – re-wrap stdin to a column width.

use anyhow::Result;
use std::io;
use toolbox_core::wrap;

pub fn run_wrap(width: usize) -> Result<()> {
    wrap::wrap_text(io::stdin().lock(), io::stdout().lock(), width)?;
    Ok(())
}
